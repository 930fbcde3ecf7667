//! Two-dimensional point with graph and class bookkeeping

use std::cmp::Ordering;

use geo_types::Coord;

/// A 2D point, optionally carrying an elevation.
///
/// Besides its coordinates a point carries scratch state used by the
/// algorithms: `index` is the graph vertex id assigned during triangulation
/// and clustering, `class_id` tags the cluster or source polygon the point
/// belongs to, `touched` is free for any single pass to use.
///
/// Equality and ordering only look at `x` and `y`. The order is by `y`, then
/// by `x`, which is the canonical order used for sorting and duplicate
/// detection.
#[derive(Debug, Clone, Copy, Default)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
    pub index: Option<usize>,
    pub class_id: Option<usize>,
    pub touched: bool,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Default::default()
        }
    }

    pub fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z: Some(z),
            ..Default::default()
        }
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_class(mut self, class_id: usize) -> Self {
        self.class_id = Some(class_id);
        self
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Squared Euclidean distance
    #[inline]
    pub fn distance_sq(&self, other: &Point2D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance
    #[inline]
    pub fn distance(&self, other: &Point2D) -> f64 {
        self.distance_sq(other).sqrt()
    }

    /// Bearing from `self` to `other` in radians, in `(-PI, PI]`.
    #[inline]
    pub fn bearing_to(&self, other: &Point2D) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Exact coordinate equality (same as `==`).
    pub fn equals(&self, other: &Point2D) -> bool {
        self == other
    }

    pub fn coord(&self) -> Coord<f64> {
        Coord { x: self.x, y: self.y }
    }
}

impl PartialEq for Point2D {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Point2D {}

impl PartialOrd for Point2D {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point2D {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y
            .total_cmp(&other.y)
            .then_with(|| self.x.total_cmp(&other.x))
    }
}

impl From<Coord<f64>> for Point2D {
    fn from(c: Coord<f64>) -> Self {
        Point2D::new(c.x, c.y)
    }
}

impl From<geo_types::Point<f64>> for Point2D {
    fn from(p: geo_types::Point<f64>) -> Self {
        Point2D::new(p.x(), p.y())
    }
}

impl From<Point2D> for Coord<f64> {
    fn from(p: Point2D) -> Self {
        p.coord()
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Point2D::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(3.0, 4.0);
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(a.distance_sq(&b), 25.0);
    }

    #[test]
    fn test_order_is_y_then_x() {
        let mut pts = vec![
            Point2D::new(5.0, 1.0),
            Point2D::new(0.0, 2.0),
            Point2D::new(-1.0, 1.0),
        ];
        pts.sort();
        assert_eq!(pts[0], Point2D::new(-1.0, 1.0));
        assert_eq!(pts[1], Point2D::new(5.0, 1.0));
        assert_eq!(pts[2], Point2D::new(0.0, 2.0));
    }

    #[test]
    fn test_equality_ignores_bookkeeping() {
        let a = Point2D::with_z(1.0, 2.0, 9.0).with_index(3).with_class(7);
        let b = Point2D::new(1.0, 2.0);
        assert!(a.equals(&b));
        assert_ne!(a, Point2D::new(1.0, 2.000001));
    }

    #[test]
    fn test_bearing() {
        let o = Point2D::new(0.0, 0.0);
        assert!((o.bearing_to(&Point2D::new(0.0, 1.0)) - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!((o.bearing_to(&Point2D::new(-1.0, 0.0)) - std::f64::consts::PI).abs() < 1e-12);
    }
}
