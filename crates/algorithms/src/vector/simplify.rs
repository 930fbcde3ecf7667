//! Ring simplification

use geo::{LineString, Simplify};

/// Douglas-Peucker simplification of a closed ring.
///
/// Vertices deviating less than `tolerance` from the simplified ring are
/// removed. The input is returned unchanged when simplification would leave
/// fewer than three distinct vertices.
pub fn simplify_ring(ring: &LineString<f64>, tolerance: f64) -> LineString<f64> {
    if tolerance <= 0.0 {
        return ring.clone();
    }
    let simplified = ring.simplify(&tolerance);
    if simplified.0.len() >= 4 {
        simplified
    } else {
        ring.clone()
    }
}
