//! Binary dilation
//!
//! A cell becomes occupied when any cell under the structuring element
//! centred on it is occupied. Cells beyond the grid count as empty.

use delinea_core::raster::Raster;
use delinea_core::{Algorithm, Error, Result};

use super::element::StructuringElement;

/// Parameters for mask dilation
#[derive(Debug, Clone, Default)]
pub struct DilateParams {
    /// Structuring element shape
    pub element: StructuringElement,
}

/// Dilation algorithm
#[derive(Debug, Clone, Default)]
pub struct Dilate;

impl Algorithm for Dilate {
    type Input = Raster<u8>;
    type Output = Raster<u8>;
    type Params = DilateParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Dilate"
    }

    fn description(&self) -> &'static str {
        "Binary dilation of an occupancy mask"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        dilate(&input, &params.element)
    }
}

/// Dilate an occupancy mask.
pub fn dilate(mask: &Raster<u8>, element: &StructuringElement) -> Result<Raster<u8>> {
    element.validate()?;

    let (rows, cols) = mask.shape();
    let offsets = element.offsets();
    let data = mask.data();
    let mut output = mask.zeroed_like::<u8>();

    for ((row, col), out) in output.data_mut().indexed_iter_mut() {
        let hit = offsets.iter().any(|&(dr, dc)| {
            let nr = row as isize + dr;
            let nc = col as isize + dc;
            nr >= 0
                && nc >= 0
                && (nr as usize) < rows
                && (nc as usize) < cols
                && data[(nr as usize, nc as usize)] != 0
        });
        *out = u8::from(hit);
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(rows: usize, cols: usize, r: usize, c: usize) -> Raster<u8> {
        let mut mask = Raster::new(rows, cols);
        mask.set(r, c, 1).unwrap();
        mask
    }

    fn occupied(mask: &Raster<u8>) -> usize {
        mask.data().iter().filter(|&&v| v != 0).count()
    }

    #[test]
    fn test_square_dilation() {
        let out = dilate(&single(7, 7, 3, 3), &StructuringElement::Square(1)).unwrap();
        assert_eq!(occupied(&out), 9);
        assert_eq!(out.get(2, 2).unwrap(), 1);
        assert_eq!(out.get(1, 1).unwrap(), 0);
    }

    #[test]
    fn test_wide_square_dilation() {
        let out = dilate(&single(7, 7, 3, 3), &StructuringElement::Square(2)).unwrap();
        assert_eq!(occupied(&out), 25);
        assert_eq!(out.get(1, 1).unwrap(), 1);
        assert_eq!(out.get(0, 0).unwrap(), 0);
    }

    #[test]
    fn test_edges_clip() {
        let out = dilate(&single(4, 4, 0, 0), &StructuringElement::Square(1)).unwrap();
        assert_eq!(occupied(&out), 4);
    }

    #[test]
    fn test_zero_radius_rejected() {
        assert!(dilate(&single(3, 3, 1, 1), &StructuringElement::Square(0)).is_err());
    }

    #[test]
    fn test_algorithm_trait() {
        let out = Dilate.execute_default(single(5, 5, 2, 2)).unwrap();
        assert_eq!(occupied(&out), 9);
    }
}
