//! Row-major grid placed in map space

use ndarray::{Array2, ArrayView1};

use crate::error::{Error, Result};
use crate::geometry::Envelope;
use crate::raster::{GeoTransform, RasterElement};

/// A 2D grid of cells indexed `(row, col)`, row 0 to the north.
#[derive(Debug, Clone)]
pub struct Raster<T: RasterElement> {
    data: Array2<T>,
    transform: GeoTransform,
}

impl<T: RasterElement> Raster<T> {
    /// Zero-filled grid with unit cells at the origin.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: Array2::zeros((rows, cols)),
            transform: GeoTransform::default(),
        }
    }

    /// Zero-filled grid covering `env` with square cells of side `cell`.
    pub fn covering(env: &Envelope, cell: f64) -> Result<Self> {
        if !(cell.is_finite() && cell > 0.0) || env.is_empty() {
            return Err(Error::InvalidParameter {
                name: "resolution",
                value: cell.to_string(),
                reason: "must be positive over a non-empty envelope".to_string(),
            });
        }
        let (transform, rows, cols) = GeoTransform::covering(env, cell);
        Ok(Self {
            data: Array2::zeros((rows, cols)),
            transform,
        })
    }

    /// Zero-filled grid with the same shape and placement, any cell type.
    pub fn zeroed_like<U: RasterElement>(&self) -> Raster<U> {
        Raster {
            data: Array2::zeros(self.data.dim()),
            transform: self.transform,
        }
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    fn out_of_bounds(&self, row: usize, col: usize) -> Error {
        Error::IndexOutOfBounds {
            row,
            col,
            rows: self.rows(),
            cols: self.cols(),
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        match self.data.get((row, col)) {
            Some(v) => Ok(*v),
            None => Err(self.out_of_bounds(row, col)),
        }
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let err = self.out_of_bounds(row, col);
        let cell = self.data.get_mut((row, col)).ok_or(err)?;
        *cell = value;
        Ok(())
    }

    pub fn row(&self, row: usize) -> Result<ArrayView1<'_, T>> {
        if row >= self.rows() {
            return Err(self.out_of_bounds(row, 0));
        }
        Ok(self.data.row(row))
    }

    /// Overwrite a whole row. `values` must hold exactly `cols()` cells.
    pub fn write_row(&mut self, row: usize, values: &[T]) -> Result<()> {
        if row >= self.rows() {
            return Err(self.out_of_bounds(row, 0));
        }
        if values.len() != self.cols() {
            return Err(Error::InvalidDimensions {
                width: values.len(),
                height: 1,
            });
        }
        self.data
            .row_mut(row)
            .iter_mut()
            .zip(values)
            .for_each(|(cell, v)| *cell = *v);
        Ok(())
    }

    pub fn data(&self) -> &Array2<T> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Array2<T> {
        &mut self.data
    }

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: GeoTransform) {
        self.transform = transform;
    }

    pub fn cell_size(&self) -> f64 {
        self.transform.cell
    }

    /// Map-space extent
    pub fn bounds(&self) -> Envelope {
        self.transform.bounds(self.rows(), self.cols())
    }

    /// Map coordinates of the center of cell `(row, col)`
    pub fn cell_center(&self, row: usize, col: usize) -> (f64, f64) {
        self.transform.center(row, col)
    }

    /// Cell holding map coordinate `(x, y)`; `None` off the grid.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        let (row, col) = self.transform.locate(x, y);
        if !(row >= 0.0 && col >= 0.0) {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        (row < self.rows() && col < self.cols()).then_some((row, col))
    }

    /// Non-void value of the cell holding `(x, y)`
    pub fn sample(&self, x: f64, y: f64) -> Option<T> {
        self.cell_at(x, y)
            .map(|cell| self.data[cell])
            .filter(|v| !v.is_void())
    }
}
