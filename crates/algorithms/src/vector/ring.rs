//! Ring bookkeeping

use delinea_core::Point2D;
use geo::{Coord, LineString, Polygon};

/// Ring coordinates without the closing repeat.
pub fn open_ring(ring: &LineString<f64>) -> &[Coord<f64>] {
    let coords = &ring.0;
    if coords.len() > 1 && coords.first() == coords.last() {
        &coords[..coords.len() - 1]
    } else {
        coords
    }
}

/// Close a ring, dropping consecutive repeated coordinates.
pub fn close_ring(coords: impl IntoIterator<Item = Coord<f64>>) -> LineString<f64> {
    let mut out: Vec<Coord<f64>> = Vec::new();
    for c in coords {
        if out.last() != Some(&c) {
            out.push(c);
        }
    }
    while out.len() > 1 && out.first() == out.last() {
        out.pop();
    }
    if let Some(&first) = out.first() {
        out.push(first);
    }
    LineString::new(out)
}

/// Vertices of a ring as points, optionally tagged with a class id.
pub fn ring_points(ring: &LineString<f64>, class_id: Option<usize>) -> Vec<Point2D> {
    open_ring(ring)
        .iter()
        .map(|&c| {
            let mut p = Point2D::from(c);
            p.class_id = class_id;
            p
        })
        .collect()
}

/// The polygon's closed exterior ring with any holes dropped.
pub fn exterior_only(polygon: &Polygon<f64>) -> Polygon<f64> {
    Polygon::new(polygon.exterior().clone(), vec![])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_ring() {
        let closed = LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        assert_eq!(open_ring(&closed).len(), 3);
        let open = LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        assert_eq!(open_ring(&open).len(), 3);
    }

    #[test]
    fn test_close_ring_dedups() {
        let ring = close_ring(vec![
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 1.0, y: 0.0 },
            Coord { x: 1.0, y: 0.0 },
            Coord { x: 1.0, y: 1.0 },
            Coord { x: 0.0, y: 0.0 },
        ]);
        assert_eq!(ring.0.len(), 4);
        assert_eq!(ring.0.first(), ring.0.last());
    }

    #[test]
    fn test_ring_points_tagged() {
        let ring = LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        let pts = ring_points(&ring, Some(4));
        assert_eq!(pts.len(), 3);
        assert!(pts.iter().all(|p| p.class_id == Some(4)));
    }

    #[test]
    fn test_exterior_only_drops_holes() {
        let poly = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]),
            vec![LineString::from(vec![(2.0, 2.0), (4.0, 2.0), (4.0, 4.0), (2.0, 2.0)])],
        );
        let out = exterior_only(&poly);
        assert!(out.interiors().is_empty());
        assert_eq!(out.exterior().0.len(), 5);
        assert_eq!(out.exterior().0.first(), out.exterior().0.last());
    }
}
