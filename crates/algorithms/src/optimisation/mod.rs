//! Contour optimisation
//!
//! A contour is a closed ring of vertices. An energy functional scores a
//! contour and the [`HillClimbing`] optimiser moves one vertex at a time to
//! whichever grid-neighbour position lowers the energy most.

mod energy;
mod hill_climbing;

pub use energy::{AnchorLine, SnakeEnergy, SnakeWeights};
pub use hill_climbing::{DensityBounds, HillClimbing, Optimised};

use geo::Coord;

/// Energy functional over an open vertex list (the closing edge is implied).
pub trait ContourEnergy {
    /// Energy of the whole contour.
    fn total(&self, contour: &[Coord<f64>]) -> f64;

    /// Sum of every term that involves vertex `index`.
    ///
    /// Moving vertex `index` changes `total` by exactly the change in
    /// `local`, so the optimiser only evaluates this. The default falls back
    /// to the total energy.
    fn local(&self, contour: &[Coord<f64>], index: usize) -> f64 {
        let _ = index;
        self.total(contour)
    }
}
