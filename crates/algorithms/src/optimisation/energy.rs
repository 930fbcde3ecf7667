//! Active-contour energy over a distance field

use delinea_core::{Raster, Point2D};
use delinea_core::geometry::line_distance;
use geo::Coord;
use serde::{Deserialize, Serialize};

use super::ContourEnergy;

/// Weights of the snake energy terms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnakeWeights {
    /// Elasticity (squared segment length)
    pub alpha: f64,
    /// Stiffness (squared discrete curvature)
    pub beta: f64,
    /// External field
    pub gamma: f64,
    /// Distance to the vertex's anchor line
    pub delta: f64,
}

impl Default for SnakeWeights {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            beta: 0.1,
            gamma: 1.0,
            delta: 0.5,
        }
    }
}

/// Infinite line a contour vertex is tied to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorLine {
    pub origin: Coord<f64>,
    /// Unit direction
    pub direction: Coord<f64>,
}

impl AnchorLine {
    /// Line through `origin` along `direction`; `None` for a zero direction.
    pub fn new(origin: Coord<f64>, direction: Coord<f64>) -> Option<Self> {
        let len = direction.x.hypot(direction.y);
        if len == 0.0 || !len.is_finite() {
            return None;
        }
        Some(Self {
            origin,
            direction: Coord {
                x: direction.x / len,
                y: direction.y / len,
            },
        })
    }

    pub fn distance(&self, c: Coord<f64>) -> f64 {
        line_distance(
            (c.x, c.y),
            (self.origin.x, self.origin.y),
            (self.direction.x, self.direction.y),
        )
    }
}

/// Snake energy: `gamma * field + alpha * elasticity + beta * stiffness
/// [+ delta * anchor distance]`.
///
/// Field values and anchor distances are divided by the resolution, the
/// squared elasticity and curvature terms by its square, so the weights do
/// not depend on map units. Positions outside the field have infinite
/// energy.
#[derive(Debug, Clone)]
pub struct SnakeEnergy<'a> {
    field: &'a Raster<f64>,
    weights: SnakeWeights,
    resolution: f64,
    anchors: Option<&'a [Option<AnchorLine>]>,
}

impl<'a> SnakeEnergy<'a> {
    pub fn new(field: &'a Raster<f64>, weights: SnakeWeights, resolution: f64) -> Self {
        Self {
            field,
            weights,
            resolution,
            anchors: None,
        }
    }

    /// Tie vertex `i` to `anchors[i]`.
    pub fn with_anchors(mut self, anchors: &'a [Option<AnchorLine>]) -> Self {
        self.anchors = Some(anchors);
        self
    }

    fn external(&self, c: Coord<f64>) -> f64 {
        match self.field.sample(c.x, c.y) {
            Some(v) => self.weights.gamma * v / self.resolution,
            _ => f64::INFINITY,
        }
    }

    fn elasticity(&self, a: Coord<f64>, b: Coord<f64>) -> f64 {
        let d = Point2D::from(a).distance_sq(&Point2D::from(b));
        self.weights.alpha * d / (self.resolution * self.resolution)
    }

    fn stiffness(&self, prev: Coord<f64>, c: Coord<f64>, next: Coord<f64>) -> f64 {
        let kx = prev.x - 2.0 * c.x + next.x;
        let ky = prev.y - 2.0 * c.y + next.y;
        self.weights.beta * (kx * kx + ky * ky) / (self.resolution * self.resolution)
    }

    fn anchor(&self, contour: &[Coord<f64>], i: usize) -> f64 {
        match self.anchors.and_then(|a| a.get(i).copied().flatten()) {
            Some(line) => self.weights.delta * line.distance(contour[i]) / self.resolution,
            None => 0.0,
        }
    }

    fn curvature_at(&self, contour: &[Coord<f64>], i: usize) -> f64 {
        let n = contour.len();
        self.stiffness(contour[(i + n - 1) % n], contour[i], contour[(i + 1) % n])
    }
}

impl ContourEnergy for SnakeEnergy<'_> {
    fn total(&self, contour: &[Coord<f64>]) -> f64 {
        let n = contour.len();
        (0..n)
            .map(|i| {
                self.external(contour[i])
                    + self.elasticity(contour[i], contour[(i + 1) % n])
                    + self.curvature_at(contour, i)
                    + self.anchor(contour, i)
            })
            .sum()
    }

    fn local(&self, contour: &[Coord<f64>], i: usize) -> f64 {
        let n = contour.len();
        let prev = (i + n - 1) % n;
        let next = (i + 1) % n;
        self.external(contour[i])
            + self.elasticity(contour[prev], contour[i])
            + self.elasticity(contour[i], contour[next])
            + self.curvature_at(contour, prev)
            + self.curvature_at(contour, i)
            + self.curvature_at(contour, next)
            + self.anchor(contour, i)
    }
}
