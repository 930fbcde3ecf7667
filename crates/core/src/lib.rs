//! # Delinea Core
//!
//! Core types shared by the Delinea clustering and outline-reconstruction
//! crates.
//!
//! This crate provides:
//! - Geometry primitives: [`Point2D`], [`Circle`], [`Triangle`], [`Envelope`]
//! - [`GeometryContext`]: caller-owned tolerances threaded through every algorithm
//! - `Raster<T>`: in-memory grid used for distance fields and occupancy masks
//! - Vector features and the source/sink traits used to move polygons in and out
//! - The error taxonomy shared by all algorithms

pub mod context;
pub mod error;
pub mod geometry;
pub mod io;
pub mod raster;
pub mod vector;

pub use context::GeometryContext;
pub use error::{ClustererError, Error, GeometryError, OptimisationError, Result};
pub use geometry::{Circle, Envelope, Point2D, Triangle};
pub use raster::{GeoTransform, Raster, RasterElement};

/// Common imports for downstream crates
pub mod prelude {
    pub use crate::context::GeometryContext;
    pub use crate::error::{ClustererError, Error, GeometryError, OptimisationError, Result};
    pub use crate::geometry::{Circle, Envelope, Point2D, Triangle};
    pub use crate::raster::{GeoTransform, Raster, RasterElement};
    pub use crate::Algorithm;
}

/// Uniform entry point over the library's operations.
///
/// Implementors are stateless unit structs; everything that changes a run
/// travels in `Params`, so `execute_default` is the operation with its
/// documented defaults.
pub trait Algorithm {
    type Input;
    type Output;
    type Params: Default;
    type Error: std::error::Error;

    /// Short identifier, e.g. for log lines
    fn name(&self) -> &'static str;

    /// One-line summary
    fn description(&self) -> &'static str;

    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
