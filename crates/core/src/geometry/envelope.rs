//! Axis-aligned bounding box

use geo_types::{Coord, Rect};

use super::Point2D;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Envelope {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// An inverted envelope that any point expands.
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Envelope of a set of points, `None` when the iterator is empty.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point2D>,
    {
        let mut env = Envelope::empty();
        for p in points {
            env.expand_to_include(p.x, p.y);
        }
        (!env.is_empty()).then_some(env)
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn expand_to_include(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub fn merge(&mut self, other: &Envelope) {
        if other.is_empty() {
            return;
        }
        self.expand_to_include(other.min_x, other.min_y);
        self.expand_to_include(other.max_x, other.max_y);
    }

    /// Grow by `margin` on every side.
    pub fn buffer(&self, margin: f64) -> Envelope {
        Envelope::new(
            self.min_x - margin,
            self.min_y - margin,
            self.max_x + margin,
            self.max_y + margin,
        )
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn diagonal(&self) -> f64 {
        (self.width().powi(2) + self.height().powi(2)).sqrt()
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    /// Inclusive containment
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    pub fn intersects(&self, other: &Envelope) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            Coord { x: self.min_x, y: self.min_y },
            Coord { x: self.max_x, y: self.max_y },
        )
    }
}

impl From<Rect<f64>> for Envelope {
    fn from(r: Rect<f64>) -> Self {
        Envelope::new(r.min().x, r.min().y, r.max().x, r.max().y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let pts = [Point2D::new(1.0, 5.0), Point2D::new(-2.0, 3.0), Point2D::new(4.0, 0.0)];
        let env = Envelope::from_points(&pts).unwrap();
        assert_eq!(env, Envelope::new(-2.0, 0.0, 4.0, 5.0));
        assert!(Envelope::from_points(&Vec::<Point2D>::new()).is_none());
    }

    #[test]
    fn test_buffer_and_contains() {
        let env = Envelope::new(0.0, 0.0, 10.0, 10.0).buffer(2.0);
        assert!(env.contains(-2.0, 12.0));
        assert!(!env.contains(-2.1, 5.0));
        assert_eq!(env.width(), 14.0);
    }

    #[test]
    fn test_intersects() {
        let a = Envelope::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Envelope::new(5.0, 5.0, 15.0, 15.0)));
        assert!(!a.intersects(&Envelope::new(20.0, 20.0, 30.0, 30.0)));
    }
}
