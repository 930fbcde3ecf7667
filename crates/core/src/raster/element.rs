//! Cell value types

use num_traits::Zero;
use std::fmt::Debug;

/// Values a [`Raster`](super::Raster) cell can hold.
///
/// Occupancy masks use `u8`, where any non-zero value marks an occupied
/// cell. Distance fields use `f64`, where NaN marks a cell without a value.
pub trait RasterElement: Copy + Debug + PartialOrd + Zero + 'static {
    /// Whether the cell carries no usable value.
    fn is_void(&self) -> bool;
}

impl RasterElement for u8 {
    fn is_void(&self) -> bool {
        false
    }
}

impl RasterElement for f64 {
    fn is_void(&self) -> bool {
        self.is_nan()
    }
}
