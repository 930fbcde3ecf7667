//! Non-convex outline reconstruction
//!
//! Every strategy turns the member polygons of one cluster into a single
//! outline polygon (closed exterior ring, no holes):
//!
//! - **DelaunayMerge**: union of the members with the short, single-class
//!   triangles of their vertex triangulation
//! - **LineProjection**: hull samples projected onto the member edges
//! - **Snake**: active contour over a distance field of the member outlines
//!
//! A cluster with one member is returned as that member's exterior ring.

mod delaunay_merge;
mod field;
mod line_projection;
mod snake;

pub use delaunay_merge::{DelaunayMerge, DelaunayMergeParams};
pub use field::{mask_outline, DistanceField};
pub use line_projection::{LineProjection, LineProjectionParams};
pub use snake::{Snake, SnakeParams};

use delinea_core::{Algorithm, Error, GeometryContext, GeometryError, Result};
use geo::{BooleanOps, InteriorPoint, Intersects, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::vector::{exterior_only, union_all};

/// Reconstructs one outline from the member polygons of a cluster.
pub trait BoundaryReconstructor {
    fn retrieve_polygon(&self, ctx: &GeometryContext, polygons: &[Polygon<f64>]) -> Result<Polygon<f64>>;
}

/// Strategy selected by configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum BoundaryStrategy {
    DelaunayMerge(DelaunayMergeParams),
    LineProjection(LineProjectionParams),
    Snake(SnakeParams),
}

impl Default for BoundaryStrategy {
    fn default() -> Self {
        BoundaryStrategy::DelaunayMerge(DelaunayMergeParams::default())
    }
}

impl BoundaryStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            BoundaryStrategy::DelaunayMerge(_) => "delaunay_merge",
            BoundaryStrategy::LineProjection(_) => "line_projection",
            BoundaryStrategy::Snake(_) => "snake",
        }
    }
}

impl BoundaryReconstructor for BoundaryStrategy {
    fn retrieve_polygon(&self, ctx: &GeometryContext, polygons: &[Polygon<f64>]) -> Result<Polygon<f64>> {
        match self {
            BoundaryStrategy::DelaunayMerge(p) => DelaunayMerge::new(*p).retrieve_polygon(ctx, polygons),
            BoundaryStrategy::LineProjection(p) => LineProjection::new(*p).retrieve_polygon(ctx, polygons),
            BoundaryStrategy::Snake(p) => Snake::new(*p).retrieve_polygon(ctx, polygons),
        }
    }
}

/// Outline reconstruction algorithm
#[derive(Debug, Clone, Default)]
pub struct ReconstructBoundary;

impl Algorithm for ReconstructBoundary {
    type Input = Vec<Polygon<f64>>;
    type Output = Polygon<f64>;
    type Params = BoundaryStrategy;
    type Error = Error;

    fn name(&self) -> &'static str {
        "ReconstructBoundary"
    }

    fn description(&self) -> &'static str {
        "Non-convex outline of a polygon cluster"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        params.retrieve_polygon(&GeometryContext::default(), &input)
    }
}

/// Shortcut shared by all strategies: an empty cluster is an error and a
/// single member is its own outline.
pub(crate) fn trivial_outline(polygons: &[Polygon<f64>]) -> Result<Option<Polygon<f64>>> {
    match polygons {
        [] => Err(GeometryError::EmptyCluster.into()),
        [only] => Ok(Some(exterior_only(only))),
        _ => Ok(None),
    }
}

/// Clip a candidate outline to the hull and merge the members into it.
///
/// When that leaves several parts, the part holding the members is kept.
/// Falls back to the hull when the members themselves are apart and the
/// candidate does not join them.
pub(crate) fn enclose(candidate: &Polygon<f64>, members: &[Polygon<f64>], hull: &Polygon<f64>) -> Polygon<f64> {
    let clipped = MultiPolygon::new(vec![candidate.clone()]).intersection(&MultiPolygon::new(vec![hull.clone()]));
    let merged = union_all(clipped.0.iter().chain(members));
    if let [single] = merged.0.as_slice() {
        return exterior_only(single);
    }

    let body = union_all(members);
    let keep = match body.0.as_slice() {
        [body] => body
            .interior_point()
            .and_then(|p| merged.0.iter().find(|part| part.intersects(&p))),
        _ => None,
    };
    match keep {
        Some(part) => {
            debug!(parts = merged.0.len(), "dropping candidate parts away from the members");
            exterior_only(part)
        }
        None => {
            debug!(parts = merged.0.len(), "candidate outline leaves members apart, using hull");
            exterior_only(hull)
        }
    }
}

pub(crate) fn invalid(name: &'static str, value: f64, reason: &str) -> Error {
    Error::InvalidParameter {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Area, LineString};

    fn square(x0: f64, y0: f64, side: f64) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![
                (x0, y0),
                (x0 + side, y0),
                (x0 + side, y0 + side),
                (x0, y0 + side),
                (x0, y0),
            ]),
            vec![],
        )
    }

    #[test]
    fn test_strategy_from_json() {
        let s: BoundaryStrategy = serde_json::from_str(r#"{"strategy":"line_projection","resolution":2.5}"#).unwrap();
        assert_eq!(
            s,
            BoundaryStrategy::LineProjection(LineProjectionParams { resolution: 2.5 })
        );
        let d: BoundaryStrategy = serde_json::from_str(r#"{"strategy":"snake"}"#).unwrap();
        assert_eq!(d, BoundaryStrategy::Snake(SnakeParams::default()));
        assert_eq!(d.name(), "snake");
    }

    #[test]
    fn test_single_member_unchanged_by_every_strategy() {
        let member = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (4.0, 0.0), (4.0, 3.0), (0.0, 3.0)]),
            vec![square(1.0, 1.0, 1.0).exterior().clone()],
        );
        let strategies = [
            BoundaryStrategy::DelaunayMerge(Default::default()),
            BoundaryStrategy::LineProjection(Default::default()),
            BoundaryStrategy::Snake(Default::default()),
        ];
        for s in strategies {
            let out = s
                .retrieve_polygon(&GeometryContext::default(), std::slice::from_ref(&member))
                .unwrap();
            assert_eq!(out.exterior(), member.exterior(), "{}", s.name());
            assert!(out.interiors().is_empty());
        }
    }

    #[test]
    fn test_empty_cluster() {
        for s in [
            BoundaryStrategy::DelaunayMerge(Default::default()),
            BoundaryStrategy::LineProjection(Default::default()),
            BoundaryStrategy::Snake(Default::default()),
        ] {
            let err = s.retrieve_polygon(&GeometryContext::default(), &[]).unwrap_err();
            assert!(matches!(err, Error::Geometry(GeometryError::EmptyCluster)));
        }
    }

    #[test]
    fn test_enclose_clips_and_covers() {
        let members = [square(0.0, 0.0, 2.0), square(4.0, 0.0, 2.0)];
        let hull = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (6.0, 0.0), (6.0, 2.0), (0.0, 2.0), (0.0, 0.0)]),
            vec![],
        );
        // bridge reaching past the hull
        let candidate = Polygon::new(
            LineString::from(vec![(1.0, 0.5), (5.0, 0.5), (5.0, 5.0), (1.0, 5.0), (1.0, 0.5)]),
            vec![],
        );
        let out = enclose(&candidate, &members, &hull);
        // members (8) plus the bridge between them inside the hull (2 x 1.5)
        assert!((out.unsigned_area() - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_enclose_falls_back_to_hull() {
        let members = [square(0.0, 0.0, 2.0), square(4.0, 0.0, 2.0)];
        let hull = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (6.0, 0.0), (6.0, 2.0), (0.0, 2.0), (0.0, 0.0)]),
            vec![],
        );
        let out = enclose(&members[0], &members, &hull);
        assert!((out.unsigned_area() - 12.0).abs() < 1e-9);
    }
}
