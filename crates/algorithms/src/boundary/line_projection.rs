//! Outline from hull samples projected onto the member edges

use delinea_core::geometry::segment_distance;
use delinea_core::{GeometryContext, Result};
use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{Area, Contains, Coord, Line, Point, Polygon};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{enclose, invalid, trivial_outline, BoundaryReconstructor};
use crate::vector::{close_ring, convex_hull, envelope_of, open_ring};

/// Rings needing more samples than this per pass are refused.
const MAX_SAMPLES: usize = 4_000_000;

/// Parameters for the line-projection strategy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineProjectionParams {
    /// Spacing of the samples along the ring (map units)
    pub resolution: f64,
}

impl Default for LineProjectionParams {
    fn default() -> Self {
        Self { resolution: 1.0 }
    }
}

/// Line-projection reconstructor.
///
/// Samples the convex hull every `resolution` and casts a ray from each
/// sample along the inward normal (outward when the sample lies inside a
/// member). The nearest crossing with a member edge becomes an outline
/// vertex. A second pass repeats the projection from the first outline.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineProjection {
    params: LineProjectionParams,
}

impl LineProjection {
    pub fn new(params: LineProjectionParams) -> Self {
        Self { params }
    }
}

impl BoundaryReconstructor for LineProjection {
    fn retrieve_polygon(&self, ctx: &GeometryContext, polygons: &[Polygon<f64>]) -> Result<Polygon<f64>> {
        if let Some(outline) = trivial_outline(polygons)? {
            return Ok(outline);
        }
        let resolution = self.params.resolution;
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(invalid("resolution", resolution, "must be positive"));
        }

        let hull = convex_hull(polygons);
        let ray_len = envelope_of(polygons).map_or(0.0, |e| e.diagonal());
        let edges: Vec<Line<f64>> = polygons.iter().flat_map(|p| p.exterior().lines()).collect();

        let mut ring = open_ring(hull.exterior()).to_vec();
        for pass in 1..=2 {
            let samples = ring_length(&ring) / resolution + ring.len() as f64;
            if samples > MAX_SAMPLES as f64 {
                return Err(invalid(
                    "resolution",
                    resolution,
                    &format!("about {samples:.0} samples along a ring of {} vertices", ring.len()),
                ));
            }
            ring = project(&ring, polygons, &edges, resolution, ray_len, ctx.duplicate_tolerance);
            trace!(pass, vertices = ring.len(), "projection pass done");
        }
        debug!(members = polygons.len(), vertices = ring.len(), "line projection outline");

        Ok(enclose(&Polygon::new(close_ring(ring), vec![]), polygons, &hull))
    }
}

fn project(
    ring: &[Coord<f64>],
    polygons: &[Polygon<f64>],
    edges: &[Line<f64>],
    resolution: f64,
    ray_len: f64,
    tolerance: f64,
) -> Vec<Coord<f64>> {
    let mut hits: Vec<Coord<f64>> = Vec::new();
    for (s, inward) in sample_ring(ring, resolution) {
        let outward = polygons.iter().any(|p| p.contains(&Point::from(s)));
        let sign = if outward { -1.0 } else { 1.0 };
        let ray = Line::new(
            s,
            Coord {
                x: s.x + sign * inward.x * ray_len,
                y: s.y + sign * inward.y * ray_len,
            },
        );
        if let Some(hit) = closest_hit(&ray, edges) {
            if hits.last().map_or(true, |h| distance(*h, hit) > tolerance) {
                hits.push(hit);
            }
        }
    }
    while hits.len() > 1 && distance(hits[0], hits[hits.len() - 1]) <= tolerance {
        hits.pop();
    }

    if hits.len() < 3 {
        ring.to_vec()
    } else {
        hits
    }
}

/// Nearest crossing of `ray` with any of `edges`, measured from its start.
fn closest_hit(ray: &Line<f64>, edges: &[Line<f64>]) -> Option<Coord<f64>> {
    let s = ray.start;
    edges
        .iter()
        .filter_map(|edge| match line_intersection(*ray, *edge)? {
            LineIntersection::SinglePoint { intersection, .. } => Some(intersection),
            LineIntersection::Collinear { intersection } => {
                let (a, b) = (intersection.start, intersection.end);
                if segment_distance((s.x, s.y), (a.x, a.y), (b.x, b.y)) == 0.0 {
                    Some(s)
                } else if distance(s, a) <= distance(s, b) {
                    Some(a)
                } else {
                    Some(b)
                }
            }
        })
        .min_by(|a, b| distance(s, *a).total_cmp(&distance(s, *b)))
}

/// Points every `spacing` along a closed ring, each with its inward unit
/// normal. Ring vertices are always included and take the mean normal of
/// their two edges.
pub(crate) fn sample_ring(ring: &[Coord<f64>], spacing: f64) -> Vec<(Coord<f64>, Coord<f64>)> {
    let n = ring.len();
    if n < 2 {
        return Vec::new();
    }
    // left normals point inwards on a counter-clockwise ring
    let ccw = Polygon::new(close_ring(ring.iter().copied()), vec![]).signed_area() >= 0.0;
    let side = if ccw { 1.0 } else { -1.0 };

    let normals: Vec<Option<Coord<f64>>> = (0..n)
        .map(|i| {
            let (a, b) = (ring[i], ring[(i + 1) % n]);
            let len = distance(a, b);
            (len > 0.0).then(|| Coord {
                x: -side * (b.y - a.y) / len,
                y: side * (b.x - a.x) / len,
            })
        })
        .collect();

    let mut samples = Vec::new();
    for i in 0..n {
        let Some(normal) = normals[i] else {
            continue;
        };
        let prev = (0..n)
            .map(|k| normals[(i + n - 1 - k) % n])
            .find_map(|m| m)
            .unwrap_or(normal);
        samples.push((ring[i], unit(prev.x + normal.x, prev.y + normal.y).unwrap_or(normal)));

        let (a, b) = (ring[i], ring[(i + 1) % n]);
        let len = distance(a, b);
        let mut k = 1.0;
        while k * spacing < len * (1.0 - 1e-9) {
            let t = k * spacing / len;
            samples.push((
                Coord {
                    x: a.x + t * (b.x - a.x),
                    y: a.y + t * (b.y - a.y),
                },
                normal,
            ));
            k += 1.0;
        }
    }
    samples
}

/// Perimeter of a closed ring given without its closing vertex.
fn ring_length(ring: &[Coord<f64>]) -> f64 {
    let n = ring.len();
    (0..n).map(|i| distance(ring[i], ring[(i + 1) % n])).sum()
}

fn unit(x: f64, y: f64) -> Option<Coord<f64>> {
    let len = x.hypot(y);
    (len > 1e-12).then(|| Coord { x: x / len, y: y / len })
}

fn distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use delinea_core::Error;
    use geo::LineString;

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

    /// Seven 4x4 squares forming a U open at the top. Union 112, hull 144.
    fn u_shape() -> Vec<Polygon<f64>> {
        vec![
            square(0.0, 0.0, 4.0),
            square(4.0, 0.0, 4.0),
            square(8.0, 0.0, 4.0),
            square(0.0, 4.0, 4.0),
            square(0.0, 8.0, 4.0),
            square(8.0, 4.0, 4.0),
            square(8.0, 8.0, 4.0),
        ]
    }

    #[test]
    fn test_sample_ring() {
        let ring = [
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 4.0, y: 0.0 },
            Coord { x: 4.0, y: 2.0 },
            Coord { x: 0.0, y: 2.0 },
        ];
        let samples = sample_ring(&ring, 1.0);
        // 4 vertices + 3 + 1 + 3 + 1 interior samples
        assert_eq!(samples.len(), 12);
        let (p, n) = samples[1];
        assert_eq!(p, Coord { x: 1.0, y: 0.0 });
        assert_eq!(n, Coord { x: 0.0, y: 1.0 });
    }

    #[test]
    fn test_sample_ring_clockwise_normals() {
        let ring = [
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 0.0, y: 2.0 },
            Coord { x: 4.0, y: 2.0 },
            Coord { x: 4.0, y: 0.0 },
        ];
        let (_, n) = sample_ring(&ring, 1.0)[1];
        assert_eq!(n, Coord { x: 1.0, y: 0.0 });
    }

    #[test]
    fn test_closest_hit() {
        let edges = [
            Line::new(Coord { x: 0.0, y: 5.0 }, Coord { x: 10.0, y: 5.0 }),
            Line::new(Coord { x: 0.0, y: 3.0 }, Coord { x: 10.0, y: 3.0 }),
        ];
        let ray = Line::new(Coord { x: 4.0, y: 10.0 }, Coord { x: 4.0, y: -10.0 });
        assert_eq!(closest_hit(&ray, &edges), Some(Coord { x: 4.0, y: 5.0 }));
        let miss = Line::new(Coord { x: 40.0, y: 10.0 }, Coord { x: 40.0, y: -10.0 });
        assert_eq!(closest_hit(&miss, &edges), None);
    }

    #[test]
    fn test_u_shape_is_carved() {
        let members = u_shape();
        let out = LineProjection::default()
            .retrieve_polygon(&GeometryContext::default(), &members)
            .unwrap();
        let area = out.unsigned_area();
        assert!(area >= 112.0 - 1e-6, "area {area}");
        assert!(area < 130.0, "area {area}");
        assert_eq!(out.exterior().0.first(), out.exterior().0.last());
    }

    #[test]
    fn test_convex_cluster_keeps_hull() {
        let members = [square(0.0, 0.0, 2.0), square(1.0, 0.0, 2.0)];
        let out = LineProjection::default()
            .retrieve_polygon(&GeometryContext::default(), &members)
            .unwrap();
        assert!((out.unsigned_area() - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_ring_length() {
        let ring = [
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 4.0, y: 0.0 },
            Coord { x: 4.0, y: 3.0 },
        ];
        assert!((ring_length(&ring) - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_tiny_resolution_is_refused() {
        // a perimeter of 48 at 1e-6 spacing needs 48 million samples
        let err = LineProjection::new(LineProjectionParams { resolution: 1e-6 })
            .retrieve_polygon(&GeometryContext::default(), &u_shape())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "resolution", .. }));
    }

    #[test]
    fn test_invalid_resolution() {
        let err = LineProjection::new(LineProjectionParams { resolution: 0.0 })
            .retrieve_polygon(&GeometryContext::default(), &u_shape())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "resolution", .. }));
    }
}
