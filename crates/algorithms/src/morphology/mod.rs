//! Binary morphology on occupancy masks
//!
//! Masks are `Raster<u8>` grids where non-zero cells are occupied.
//! - **Dilation**: grow occupied regions by a structuring element
//! - **Regions**: 4-connected labelling of occupied cells

mod dilate;
mod element;
mod label;

pub use dilate::{dilate, Dilate, DilateParams};
pub use element::StructuringElement;
pub use label::{count_regions, label_regions, Regions};
