//! 4-connected region labelling

use delinea_core::raster::Raster;
use ndarray::Array2;

/// Region label per cell; `None` for empty cells.
#[derive(Debug, Clone)]
pub struct Regions {
    pub labels: Array2<Option<usize>>,
    pub count: usize,
}

/// Label the 4-connected occupied regions of `mask` by flood fill.
///
/// Regions are numbered in row-major order of their first cell.
pub fn label_regions(mask: &Raster<u8>) -> Regions {
    let (rows, cols) = mask.shape();
    let data = mask.data();
    let mut labels = Array2::from_elem((rows, cols), None);
    let mut count = 0;

    for r in 0..rows {
        for c in 0..cols {
            if data[(r, c)] == 0 || labels[(r, c)].is_some() {
                continue;
            }
            let mut stack = vec![(r, c)];
            while let Some((cr, cc)) = stack.pop() {
                if data[(cr, cc)] == 0 || labels[(cr, cc)].is_some() {
                    continue;
                }
                labels[(cr, cc)] = Some(count);
                if cr > 0 {
                    stack.push((cr - 1, cc));
                }
                if cr + 1 < rows {
                    stack.push((cr + 1, cc));
                }
                if cc > 0 {
                    stack.push((cr, cc - 1));
                }
                if cc + 1 < cols {
                    stack.push((cr, cc + 1));
                }
            }
            count += 1;
        }
    }

    Regions { labels, count }
}

/// Number of 4-connected occupied regions.
pub fn count_regions(mask: &Raster<u8>) -> usize {
    label_regions(mask).count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(cells: &[(usize, usize)]) -> Raster<u8> {
        let mut m = Raster::new(5, 5);
        for &(r, c) in cells {
            m.set(r, c, 1).unwrap();
        }
        m
    }

    #[test]
    fn test_empty() {
        assert_eq!(count_regions(&mask(&[])), 0);
    }

    #[test]
    fn test_diagonal_cells_are_separate() {
        assert_eq!(count_regions(&mask(&[(0, 0), (1, 1)])), 2);
    }

    #[test]
    fn test_labels() {
        let regions = label_regions(&mask(&[(0, 0), (0, 1), (1, 1), (4, 4), (3, 4)]));
        assert_eq!(regions.count, 2);
        assert_eq!(regions.labels[(1, 1)], Some(0));
        assert_eq!(regions.labels[(3, 4)], Some(1));
        assert_eq!(regions.labels[(4, 4)], Some(1));
        assert_eq!(regions.labels[(2, 2)], None);
    }
}
