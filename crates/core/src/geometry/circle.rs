//! Circles and circumcircles

use crate::error::GeometryError;

use super::{max_side_sq, Envelope, Point2D};

/// Relative threshold on the circumcenter denominator below which three
/// points are treated as collinear.
const DEGENERATE_EPS: f64 = 1e-12;

/// A circle given by its center and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    center: Point2D,
    radius: f64,
}

impl Circle {
    pub fn new(center: Point2D, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Circumcircle of three points.
    ///
    /// Fails with [`GeometryError::Collinear`] when the points span no area,
    /// since the circumcenter denominator vanishes.
    pub fn circumscribing(a: &Point2D, b: &Point2D, c: &Point2D) -> Result<Self, GeometryError> {
        // Work relative to `a` to keep precision at large map coordinates.
        let (bx, by) = (b.x - a.x, b.y - a.y);
        let (cx, cy) = (c.x - a.x, c.y - a.y);
        let d = 2.0 * (bx * cy - by * cx);
        let scale = max_side_sq(a, b, c);
        if scale == 0.0 || d.abs() <= DEGENERATE_EPS * scale {
            return Err(GeometryError::Collinear { context: "circumcircle" });
        }

        let b2 = bx * bx + by * by;
        let c2 = cx * cx + cy * cy;
        let ux = (cy * b2 - by * c2) / d;
        let uy = (bx * c2 - cx * b2) / d;
        if !ux.is_finite() || !uy.is_finite() {
            return Err(GeometryError::ZeroDenominator);
        }

        let center = Point2D::new(a.x + ux, a.y + uy);
        let radius = (ux * ux + uy * uy).sqrt();
        Ok(Self { center, radius })
    }

    pub fn center(&self) -> &Point2D {
        &self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Strict containment: points on the circle are outside.
    pub fn contains(&self, pt: &Point2D) -> bool {
        self.center.distance(pt) < self.radius
    }

    pub fn envelope(&self) -> Envelope {
        Envelope::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.center.x + self.radius,
            self.center.y + self.radius,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_circumcircle_right_triangle() {
        let c = Circle::circumscribing(
            &Point2D::new(0.0, 0.0),
            &Point2D::new(4.0, 0.0),
            &Point2D::new(0.0, 3.0),
        )
        .unwrap();
        assert_relative_eq!(c.center().x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(c.center().y, 1.5, epsilon = 1e-12);
        assert_relative_eq!(c.radius(), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_contains_is_strict() {
        let c = Circle::new(Point2D::new(0.0, 0.0), 1.0);
        assert!(c.contains(&Point2D::new(0.5, 0.5)));
        assert!(!c.contains(&Point2D::new(1.0, 0.0)));
        assert!(!c.contains(&Point2D::new(2.0, 0.0)));
    }

    #[test]
    fn test_collinear_fails() {
        let err = Circle::circumscribing(
            &Point2D::new(0.0, 0.0),
            &Point2D::new(1.0, 1.0),
            &Point2D::new(2.0, 2.0),
        )
        .unwrap_err();
        assert!(matches!(err, GeometryError::Collinear { .. }));
    }

    #[test]
    fn test_envelope() {
        let env = Circle::new(Point2D::new(1.0, 1.0), 2.0).envelope();
        assert_eq!(env, Envelope::new(-1.0, -1.0, 3.0, 3.0));
    }
}
