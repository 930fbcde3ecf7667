//! In-memory raster grids
//!
//! The snake strategy rasterizes a distance field and an occupancy mask over
//! the cluster envelope; both live in a [`Raster`] that can be read and
//! written row by row.

mod element;
mod geotransform;
mod grid;

pub use element::RasterElement;
pub use geotransform::GeoTransform;
pub use grid::Raster;
