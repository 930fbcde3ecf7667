//! Vector I/O collaborators
//!
//! The algorithms never touch files. Callers move data in and out through
//! [`VectorSource`] and [`VectorSink`]; [`GeoJsonFile`] is the reference
//! implementation used by the command-line tool.

mod geojson;

pub use geojson::GeoJsonFile;

use geo_types::Polygon;

use crate::error::Result;
use crate::geometry::Point2D;
use crate::vector::FeatureCollection;

/// Loads polygons or points from a vector layer.
pub trait VectorSource {
    /// All polygons of the layer; multi-polygons contribute one entry per part.
    fn read_polygons(&self) -> Result<Vec<Polygon<f64>>>;

    /// All points of the layer, with their feature order as `index`.
    fn read_points(&self) -> Result<Vec<Point2D>>;
}

/// Writes features, with their attribute columns, to a vector layer.
pub trait VectorSink {
    fn write_features(&self, features: &FeatureCollection) -> Result<()>;
}
