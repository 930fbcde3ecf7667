//! Caller-owned geometry context.

use serde::{Deserialize, Serialize};

/// Tolerances shared by the triangulator, clusterer and reconstructors.
///
/// One context is created by the caller and passed by reference into every
/// call; nothing in the library keeps global geometry state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryContext {
    /// Points closer than this to an existing vertex are discarded on insertion (map units)
    pub duplicate_tolerance: f64,
    /// Twice-signed-area below which three points count as collinear
    pub collinear_tolerance: f64,
    /// Relative tolerance used when comparing polygon areas
    pub area_tolerance: f64,
}

impl Default for GeometryContext {
    fn default() -> Self {
        Self {
            duplicate_tolerance: 0.1,
            collinear_tolerance: 1e-12,
            area_tolerance: 1e-6,
        }
    }
}

impl GeometryContext {
    pub fn with_duplicate_tolerance(mut self, tolerance: f64) -> Self {
        self.duplicate_tolerance = tolerance;
        self
    }

    /// True when `a`, `b`, `c` span (almost) no area.
    pub fn is_collinear(&self, area2: f64, scale: f64) -> bool {
        area2.abs() <= self.collinear_tolerance * scale.max(1.0)
    }
}
