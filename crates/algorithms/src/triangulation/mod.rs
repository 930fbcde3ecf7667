//! Incremental Delaunay triangulation
//!
//! Bowyer-Watson style insertion into a synthetic super-triangle, followed by
//! removal of every triangle that still touches the super-triangle.

mod delaunay;

pub use delaunay::{
    triangulate, DelaunayTriangulator, Discarded, Insertion, Triangulate, Triangulation,
};
