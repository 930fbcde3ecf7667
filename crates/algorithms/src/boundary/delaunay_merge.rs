//! Outline from the merged short triangles of the member vertices

use delinea_core::{GeometryContext, GeometryError, Result, Triangle};
use geo::{LineString, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{invalid, trivial_outline, BoundaryReconstructor};
use crate::clustering::{GraphClusterer, ThresholdPolicy};
use crate::triangulation::triangulate;
use crate::vector::{dominant_part, exterior_only, ring_points, union_all};

/// Parameters for the triangulation-merge strategy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelaunayMergeParams {
    /// Longest triangle edge kept, also the vertex clustering threshold
    pub max_edge_length: f64,
    /// Area share the largest merged part needs to be kept alone
    pub dominance: f64,
    /// Retries with a doubled edge length before giving up
    pub max_depth: usize,
}

impl Default for DelaunayMergeParams {
    fn default() -> Self {
        Self {
            max_edge_length: 10.0,
            dominance: 0.9,
            max_depth: 5,
        }
    }
}

/// Triangulation-merge reconstructor.
///
/// The member vertices are clustered with a fixed threshold and
/// triangulated. Triangles whose vertices all fall in one vertex cluster and
/// whose edges are no longer than the threshold are merged with the member
/// polygons. When the merge is not one polygon, the largest part wins if it
/// holds at least `dominance` of the merged area; otherwise the parts are
/// merged again with twice the edge length.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelaunayMerge {
    params: DelaunayMergeParams,
}

impl DelaunayMerge {
    pub fn new(params: DelaunayMergeParams) -> Self {
        Self { params }
    }

    fn validate(&self) -> Result<()> {
        let p = &self.params;
        if !(p.max_edge_length.is_finite() && p.max_edge_length > 0.0) {
            return Err(invalid("max_edge_length", p.max_edge_length, "must be a positive length"));
        }
        if !(p.dominance > 0.0 && p.dominance <= 1.0) {
            return Err(invalid("dominance", p.dominance, "must be in (0, 1]"));
        }
        Ok(())
    }
}

impl BoundaryReconstructor for DelaunayMerge {
    fn retrieve_polygon(&self, ctx: &GeometryContext, polygons: &[Polygon<f64>]) -> Result<Polygon<f64>> {
        if let Some(outline) = trivial_outline(polygons)? {
            return Ok(outline);
        }
        self.validate()?;

        let mut members = polygons.to_vec();
        let mut threshold = self.params.max_edge_length;
        let mut depth = 0;
        loop {
            let merged = merge_short_triangles(ctx, &members, threshold)?;
            if let [single] = merged.0.as_slice() {
                return Ok(exterior_only(single));
            }
            let parts = merged.0.len();
            if let Some((part, share)) = dominant_part(&merged) {
                if share + ctx.area_tolerance >= self.params.dominance {
                    debug!(parts, share, depth, "dominant part kept");
                    return Ok(exterior_only(&part));
                }
            }
            if depth >= self.params.max_depth {
                return Err(GeometryError::NoDominantPolygon { depth, parts }.into());
            }
            depth += 1;
            threshold *= 2.0;
            debug!(parts, depth, threshold, "no dominant part, merging again");
            members = merged.0;
        }
    }
}

fn merge_short_triangles(
    ctx: &GeometryContext,
    members: &[Polygon<f64>],
    threshold: f64,
) -> Result<MultiPolygon<f64>> {
    let vertices: Vec<_> = members
        .iter()
        .enumerate()
        .flat_map(|(i, p)| ring_points(p.exterior(), Some(i)))
        .collect();

    let mut kept = Vec::new();
    if vertices.len() >= 3 {
        let classes = GraphClusterer::new(ThresholdPolicy::fixed(threshold))
            .with_context(*ctx)
            .cluster_points(&vertices)?
            .labels();
        match triangulate(&vertices, ctx) {
            Ok(tin) => {
                kept.extend(
                    tin.triangles()
                        .iter()
                        .filter(|t| single_class(t, &classes) && longest_edge(t) <= threshold)
                        .map(triangle_polygon),
                );
                debug!(
                    triangles = tin.len(),
                    kept = kept.len(),
                    threshold,
                    "triangles selected for merging"
                );
            }
            Err(GeometryError::Collinear { .. }) | Err(GeometryError::TooFewPoints { .. }) => {}
            Err(e) => return Err(e.into()),
        }
    }

    Ok(union_all(members.iter().chain(&kept)))
}

fn single_class(t: &Triangle, classes: &[usize]) -> bool {
    t.vertex_indices()
        .is_some_and(|[a, b, c]| classes[a] == classes[b] && classes[b] == classes[c])
}

fn longest_edge(t: &Triangle) -> f64 {
    t.edges()
        .iter()
        .map(|(a, b)| a.distance(b))
        .fold(0.0, f64::max)
}

fn triangle_polygon(t: &Triangle) -> Polygon<f64> {
    let coords = t.vertices().iter().map(|v| v.coord()).collect::<Vec<_>>();
    Polygon::new(LineString::new(coords), vec![])
}

#[cfg(test)]
mod tests {
    use super::*;
    use delinea_core::Error;
    use geo::Area;

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

    fn merge(params: DelaunayMergeParams, polygons: &[Polygon<f64>]) -> Result<Polygon<f64>> {
        DelaunayMerge::new(params).retrieve_polygon(&GeometryContext::default(), polygons)
    }

    #[test]
    fn test_overlapping_members() {
        let out = merge(Default::default(), &[square(0.0, 0.0, 2.0), square(1.0, 0.0, 2.0)]).unwrap();
        assert!((out.unsigned_area() - 6.0).abs() < 1e-9);
        assert_eq!(out.exterior().0.first(), out.exterior().0.last());
    }

    #[test]
    fn test_concave_arrangement_kept() {
        // L of five 4x4 squares; its hull has area 112
        let members = [
            square(0.0, 0.0, 4.0),
            square(0.0, 4.0, 4.0),
            square(0.0, 8.0, 4.0),
            square(4.0, 0.0, 4.0),
            square(8.0, 0.0, 4.0),
        ];
        let params = DelaunayMergeParams { max_edge_length: 5.0, ..Default::default() };
        let out = merge(params, &members).unwrap();
        assert!((out.unsigned_area() - 80.0).abs() < 1e-6);
    }

    #[test]
    fn test_dominant_part_wins() {
        let members = [square(0.0, 0.0, 10.0), square(100.0, 0.0, 1.0)];
        let params = DelaunayMergeParams { max_edge_length: 5.0, ..Default::default() };
        let out = merge(params, &members).unwrap();
        assert!((out.unsigned_area() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_retry_bridges_parts() {
        let members = [square(0.0, 0.0, 10.0), square(100.0, 0.0, 10.0)];
        let params = DelaunayMergeParams { max_edge_length: 5.0, ..Default::default() };
        let out = merge(params, &members).unwrap();
        assert!((out.unsigned_area() - 1100.0).abs() < 1e-6);
    }

    #[test]
    fn test_depth_exhausted() {
        let members = [square(0.0, 0.0, 10.0), square(100.0, 0.0, 10.0)];
        let params = DelaunayMergeParams {
            max_edge_length: 5.0,
            max_depth: 2,
            ..Default::default()
        };
        let err = merge(params, &members).unwrap_err();
        assert!(matches!(
            err,
            Error::Geometry(GeometryError::NoDominantPolygon { depth: 2, parts: 2 })
        ));
    }

    #[test]
    fn test_invalid_dominance() {
        let params = DelaunayMergeParams { dominance: 1.5, ..Default::default() };
        let err = merge(params, &[square(0.0, 0.0, 1.0), square(0.5, 0.0, 1.0)]).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "dominance", .. }));
    }
}
