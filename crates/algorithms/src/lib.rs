//! # Delinea Algorithms
//!
//! Spatial clustering and non-convex outline reconstruction.
//!
//! ## Available Algorithm Categories
//!
//! - **triangulation**: incremental Delaunay triangulation
//! - **clustering**: minimum-spanning-tree clustering of points and polygons
//! - **boundary**: outline reconstruction (triangulation merge, line projection, snake)
//! - **optimisation**: hill-climbing contour optimiser and the snake energy
//! - **morphology**: binary dilation and region labelling of occupancy masks
//! - **vector**: hull, union, area and ring helpers
//! - **pipeline**: cluster-then-outline convenience entry point

pub mod boundary;
pub mod clustering;
pub mod morphology;
pub mod optimisation;
pub mod pipeline;
pub mod triangulation;
pub mod vector;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::boundary::{
        BoundaryReconstructor, BoundaryStrategy, DelaunayMerge, DelaunayMergeParams, LineProjection,
        LineProjectionParams, ReconstructBoundary, Snake, SnakeParams,
    };
    pub use crate::clustering::{ClusterParams, ClusterPoints, Clustering, GraphClusterer, ThresholdPolicy};
    pub use crate::optimisation::{ContourEnergy, DensityBounds, HillClimbing, Optimised, SnakeEnergy};
    pub use crate::pipeline::{delineate, delineate_with_progress, Delineation, DelineationParams, Outline};
    pub use crate::triangulation::{triangulate, DelaunayTriangulator, Triangulate, Triangulation};
    pub use delinea_core::prelude::*;
}
