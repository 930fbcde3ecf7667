//! Structuring elements for mask dilation

use delinea_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Shape of a structuring element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuringElement {
    /// `(2r + 1)` x `(2r + 1)` block
    Square(usize),
}

impl Default for StructuringElement {
    fn default() -> Self {
        StructuringElement::Square(1)
    }
}

impl StructuringElement {
    pub fn validate(&self) -> Result<()> {
        if self.radius() == 0 {
            return Err(Error::InvalidParameter {
                name: "radius",
                value: "0".to_string(),
                reason: "an element needs a radius of one cell or more".to_string(),
            });
        }
        Ok(())
    }

    pub fn radius(&self) -> usize {
        match *self {
            StructuringElement::Square(r) => r,
        }
    }

    /// `(dr, dc)` offsets of the active cells, center included.
    pub fn offsets(&self) -> Vec<(isize, isize)> {
        let r = self.radius() as isize;
        (-r..=r).flat_map(|dr| (-r..=r).map(move |dc| (dr, dc))).collect()
    }
}
