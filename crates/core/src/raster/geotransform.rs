//! Placement of a grid in map space

use serde::{Deserialize, Serialize};

use crate::geometry::Envelope;

/// North-up placement of a grid with square cells.
///
/// Row 0 is the northern row: cell `(row, col)` spans
/// `origin_x + col * cell .. origin_x + (col + 1) * cell` in x and
/// `origin_y - (row + 1) * cell .. origin_y - row * cell` in y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    /// West edge of the grid
    pub origin_x: f64,
    /// North edge of the grid
    pub origin_y: f64,
    /// Side of a cell in map units
    pub cell: f64,
}

impl GeoTransform {
    pub fn new(origin_x: f64, origin_y: f64, cell: f64) -> Self {
        Self { origin_x, origin_y, cell }
    }

    /// Placement anchored at the north-west corner of `env`, plus the
    /// `(rows, cols)` needed to cover it. Always at least one cell.
    pub fn covering(env: &Envelope, cell: f64) -> (Self, usize, usize) {
        let rows = ((env.height() / cell).ceil() as usize).max(1);
        let cols = ((env.width() / cell).ceil() as usize).max(1);
        (Self::new(env.min_x, env.max_y, cell), rows, cols)
    }

    /// Map coordinates of the north-west corner of cell `(row, col)`.
    ///
    /// `row == rows` and `col == cols` address the far grid edges.
    pub fn corner(&self, row: usize, col: usize) -> (f64, f64) {
        (
            self.origin_x + col as f64 * self.cell,
            self.origin_y - row as f64 * self.cell,
        )
    }

    /// Map coordinates of the center of cell `(row, col)`.
    pub fn center(&self, row: usize, col: usize) -> (f64, f64) {
        let (x, y) = self.corner(row, col);
        (x + self.cell / 2.0, y - self.cell / 2.0)
    }

    /// Fractional `(row, col)` of a map coordinate.
    pub fn locate(&self, x: f64, y: f64) -> (f64, f64) {
        ((self.origin_y - y) / self.cell, (x - self.origin_x) / self.cell)
    }

    /// Envelope of a `rows` x `cols` grid
    pub fn bounds(&self, rows: usize, cols: usize) -> Envelope {
        let (x1, y0) = self.corner(rows, cols);
        Envelope::new(self.origin_x, y0, x1, self.origin_y)
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}
