//! Geometric measurements: area, perimeter

use geo::{Area, Euclidean, Length, Polygon};

/// Unsigned area of a polygon (holes subtracted).
pub fn area(polygon: &Polygon<f64>) -> f64 {
    polygon.unsigned_area()
}

/// Summed area of a polygon set. Overlaps are counted once per polygon.
pub fn total_area(polygons: &[Polygon<f64>]) -> f64 {
    polygons.iter().map(Area::unsigned_area).sum()
}

/// Length of the exterior and interior rings.
pub fn perimeter(polygon: &Polygon<f64>) -> f64 {
    let ext = polygon.exterior().length::<Euclidean>();
    let int: f64 = polygon.interiors().iter().map(|r| r.length::<Euclidean>()).sum();
    ext + int
}
