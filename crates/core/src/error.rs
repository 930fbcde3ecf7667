//! Error types for Delinea
//!
//! Algorithms fail fast: every error is returned to the immediate caller and
//! nothing is retried internally. The three algorithm families each get their
//! own enum, wrapped by the crate-wide [`Error`].

use thiserror::Error;

/// Degenerate or unusable geometry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("collinear points ({context}): zero-area geometry")]
    Collinear { context: &'static str },

    #[error("at least {required} points are required, got {found}")]
    TooFewPoints { required: usize, found: usize },

    #[error("zero denominator while computing a circumcenter")]
    ZeroDenominator,

    #[error("seed triangle is degenerate")]
    DegenerateSeed,

    #[error("cannot reconstruct an outline from an empty cluster")]
    EmptyCluster,

    #[error("no dominant polygon after {depth} merge attempts ({parts} parts remain)")]
    NoDominantPolygon { depth: usize, parts: usize },

    #[error("invalid geometry: {0}")]
    Invalid(String),
}

/// Failures of the graph clusterer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClustererError {
    #[error("cannot cluster an empty input")]
    EmptyInput,

    #[error("partition covers {assigned} items but the input has {expected}")]
    PartitionMismatch { expected: usize, assigned: usize },

    #[error("graph has {graph} vertices but the input has {expected} points")]
    VertexMismatch { expected: usize, graph: usize },
}

/// Failures of the contour optimiser.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptimisationError {
    #[error("contour vertex {index} at ({x}, {y}) lies outside the energy field")]
    OutsideField { index: usize, x: f64, y: f64 },

    #[error("contour needs at least 3 vertices, got {0}")]
    DegenerateContour(usize),
}

/// Main error type for Delinea operations
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Clusterer(#[from] ClustererError),

    #[error(transparent)]
    Optimisation(#[from] OptimisationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed vector data: {0}")]
    Format(String),

    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Format(e.to_string())
    }
}

/// Result type alias for Delinea operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_errors_keep_message() {
        let err: Error = GeometryError::EmptyCluster.into();
        assert!(matches!(err, Error::Geometry(GeometryError::EmptyCluster)));
        assert_eq!(err.to_string(), "cannot reconstruct an outline from an empty cluster");

        let err: Error = OptimisationError::OutsideField { index: 2, x: 1.0, y: -3.5 }.into();
        assert!(err.to_string().contains("vertex 2"));
    }
}
