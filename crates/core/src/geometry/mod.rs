//! Geometry primitives: points, circles, triangles and envelopes.
//!
//! These are small value types with the predicates the triangulator and the
//! reconstruction strategies need. Conversions to and from `geo_types` live
//! next to each type so the algorithms crate can move between the two freely.

mod circle;
mod envelope;
mod point;
mod triangle;

pub use circle::Circle;
pub use envelope::Envelope;
pub use point::Point2D;
pub use triangle::Triangle;

/// Twice the signed area of triangle `(a, b, c)`.
///
/// Positive when the points turn counter-clockwise, negative when clockwise,
/// zero when collinear.
#[inline]
pub fn orientation(a: &Point2D, b: &Point2D, c: &Point2D) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Largest squared side length of triangle `(a, b, c)`; used to scale
/// collinearity tolerances.
#[inline]
pub fn max_side_sq(a: &Point2D, b: &Point2D, c: &Point2D) -> f64 {
    a.distance_sq(b).max(b.distance_sq(c)).max(c.distance_sq(a))
}

/// Distance from `p` to the segment `a`-`b`.
pub fn segment_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (qx, qy) = (a.0 + t * dx, a.1 + t * dy);
    ((p.0 - qx).powi(2) + (p.1 - qy).powi(2)).sqrt()
}

/// Perpendicular distance from `p` to the infinite line through `a` along `dir`.
pub fn line_distance(p: (f64, f64), a: (f64, f64), dir: (f64, f64)) -> f64 {
    let len = (dir.0 * dir.0 + dir.1 * dir.1).sqrt();
    if len == 0.0 {
        return ((p.0 - a.0).powi(2) + (p.1 - a.1).powi(2)).sqrt();
    }
    ((p.0 - a.0) * dir.1 - (p.1 - a.1) * dir.0).abs() / len
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_orientation_sign() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(1.0, 0.0);
        assert!(orientation(&a, &b, &Point2D::new(0.0, 1.0)) > 0.0);
        assert!(orientation(&a, &b, &Point2D::new(0.0, -1.0)) < 0.0);
        assert_eq!(orientation(&a, &b, &Point2D::new(5.0, 0.0)), 0.0);
    }

    #[test]
    fn test_segment_distance_clamps_to_endpoints() {
        assert_relative_eq!(segment_distance((5.0, 3.0), (0.0, 0.0), (10.0, 0.0)), 3.0);
        assert_relative_eq!(segment_distance((13.0, 4.0), (0.0, 0.0), (10.0, 0.0)), 5.0);
        assert_relative_eq!(segment_distance((1.0, 1.0), (0.0, 0.0), (0.0, 0.0)), 2f64.sqrt());
    }

    #[test]
    fn test_line_distance_is_unbounded() {
        assert_relative_eq!(line_distance((100.0, 2.0), (0.0, 0.0), (1.0, 0.0)), 2.0);
    }
}
