//! Set operations over the member polygons of a cluster

use delinea_core::Envelope;
use geo::{Area, BooleanOps, BoundingRect, ConvexHull, MultiPoint, MultiPolygon, Point, Polygon};

/// Convex hull of every exterior vertex of `polygons`.
pub fn convex_hull(polygons: &[Polygon<f64>]) -> Polygon<f64> {
    let points: Vec<Point<f64>> = polygons
        .iter()
        .flat_map(|p| p.exterior().0.iter().map(|&c| Point::from(c)))
        .collect();
    MultiPoint::from(points).convex_hull()
}

/// Envelope of a polygon set, `None` when it has no coordinates.
pub fn envelope_of(polygons: &[Polygon<f64>]) -> Option<Envelope> {
    polygons
        .iter()
        .filter_map(|p| p.bounding_rect())
        .map(Envelope::from)
        .reduce(|mut acc, e| {
            acc.merge(&e);
            acc
        })
}

/// Union of a polygon set.
///
/// Polygons are merged pairwise in rounds so each boolean operation works on
/// inputs of similar size. Polygons without a ring are skipped.
pub fn union_all<'a>(polygons: impl IntoIterator<Item = &'a Polygon<f64>>) -> MultiPolygon<f64> {
    let mut level: Vec<MultiPolygon<f64>> = polygons
        .into_iter()
        .filter(|p| p.exterior().0.len() >= 3)
        .map(|p| MultiPolygon::new(vec![p.clone()]))
        .collect();
    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len() / 2 + 1);
        let mut pairs = level.chunks_exact(2);
        for pair in &mut pairs {
            next.push(pair[0].union(&pair[1]));
        }
        next.extend(pairs.remainder().iter().cloned());
        level = next;
    }
    level.pop().unwrap_or_else(|| MultiPolygon::new(vec![]))
}

/// Largest part of `merged` with its share of the total area.
pub fn dominant_part(merged: &MultiPolygon<f64>) -> Option<(Polygon<f64>, f64)> {
    let total = merged.unsigned_area();
    let largest = merged
        .0
        .iter()
        .max_by(|a, b| a.unsigned_area().total_cmp(&b.unsigned_area()))?;
    let share = if total > 0.0 {
        largest.unsigned_area() / total
    } else {
        0.0
    };
    Some((largest.clone(), share))
}

#[cfg(test)]
mod tests {
    use super::*;
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

    #[test]
    fn test_convex_hull_of_set() {
        let hull = convex_hull(&[square(0.0, 0.0, 1.0), square(4.0, 4.0, 1.0)]);
        // hull of (0,0)..(5,5) minus the two clipped corners
        assert!((hull.unsigned_area() - 17.0).abs() < 1e-9);
    }

    #[test]
    fn test_envelope_of() {
        let env = envelope_of(&[square(0.0, 0.0, 1.0), square(4.0, 2.0, 1.0)]).unwrap();
        assert_eq!(env, Envelope::new(0.0, 0.0, 5.0, 3.0));
        assert!(envelope_of(&[]).is_none());
    }

    #[test]
    fn test_union_overlapping() {
        let merged = union_all(&[square(0.0, 0.0, 2.0), square(1.0, 0.0, 2.0)]);
        assert_eq!(merged.0.len(), 1);
        assert!((merged.unsigned_area() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_union_disjoint_and_dominance() {
        let merged = union_all(&[square(0.0, 0.0, 3.0), square(10.0, 0.0, 1.0)]);
        assert_eq!(merged.0.len(), 2);
        let (part, share) = dominant_part(&merged).unwrap();
        assert!((part.unsigned_area() - 9.0).abs() < 1e-9);
        assert!((share - 0.9).abs() < 1e-9);
    }
}
