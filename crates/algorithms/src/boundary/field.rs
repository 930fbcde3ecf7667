//! Distance field and occupancy mask of a cluster's member outlines

use std::collections::BTreeMap;

use delinea_core::geometry::segment_distance;
use delinea_core::raster::GeoTransform;
use delinea_core::{Envelope, Error, GeometryError, Raster, Result};
use geo::{BoundingRect, Contains, Coord, Line, LineString, Point, Polygon};
use tracing::debug;

use crate::vector::{close_ring, envelope_of, simplify_ring};

/// Grids above this many cells are refused.
const MAX_CELLS: usize = 16_000_000;

/// Rasterized member outlines.
///
/// `field` holds, per cell center, the distance to the nearest member edge.
/// `mask` marks cells whose center lies inside a member or closer than half
/// a cell to one of its edges.
#[derive(Debug, Clone)]
pub struct DistanceField {
    pub field: Raster<f64>,
    pub mask: Raster<u8>,
    pub resolution: f64,
}

impl DistanceField {
    /// Rasterize `polygons` at `resolution` over their envelope grown by `margin`.
    pub fn build(polygons: &[Polygon<f64>], resolution: f64, margin: f64) -> Result<Self> {
        let env = envelope_of(polygons)
            .ok_or(GeometryError::EmptyCluster)?
            .buffer(margin);
        let (_, rows, cols) = GeoTransform::covering(&env, resolution);
        if rows.saturating_mul(cols) > MAX_CELLS {
            return Err(Error::InvalidParameter {
                name: "resolution",
                value: resolution.to_string(),
                reason: format!("grid of {rows}x{cols} cells is too large"),
            });
        }

        let mut field = Raster::<f64>::covering(&env, resolution)?;
        let mut mask = field.zeroed_like::<u8>();
        let edges: Vec<Line<f64>> = polygons.iter().flat_map(|p| p.exterior().lines()).collect();
        let boxes: Vec<_> = polygons.iter().map(|p| p.bounding_rect()).collect();
        let half = resolution / 2.0;

        let mut distances = vec![0.0; cols];
        let mut occupied = vec![0u8; cols];
        for row in 0..rows {
            for col in 0..cols {
                let (x, y) = field.cell_center(row, col);
                let d = edges
                    .iter()
                    .map(|e| segment_distance((x, y), (e.start.x, e.start.y), (e.end.x, e.end.y)))
                    .fold(f64::INFINITY, f64::min);
                let inside = polygons.iter().zip(&boxes).any(|(p, b)| {
                    b.is_some_and(|b| Envelope::from(b).contains(x, y)) && p.contains(&Point::new(x, y))
                });
                distances[col] = d;
                occupied[col] = u8::from(inside || d < half);
            }
            field.write_row(row, &distances)?;
            mask.write_row(row, &occupied)?;
        }

        debug!(rows, cols, resolution, "distance field rasterized");
        Ok(Self {
            field,
            mask,
            resolution,
        })
    }

    /// Extent covered by the grids.
    pub fn envelope(&self) -> Envelope {
        self.field.bounds()
    }
}

/// Outer outline of the occupied cells of `mask`, along cell edges.
///
/// The boundary edges of the occupied cells are chained into closed loops and
/// the loop enclosing the largest area is returned, with collinear vertices
/// removed. `None` when no cell is occupied.
pub fn mask_outline(mask: &Raster<u8>) -> Option<LineString<f64>> {
    let (rows, cols) = mask.shape();
    let data = mask.data();
    let occupied = |r: isize, c: isize| {
        r >= 0 && c >= 0 && (r as usize) < rows && (c as usize) < cols && data[(r as usize, c as usize)] != 0
    };

    // lattice corners as (col, row)
    let mut outgoing: BTreeMap<(usize, usize), Vec<(usize, usize)>> = BTreeMap::new();
    let mut link = |from: (usize, usize), to: (usize, usize)| outgoing.entry(from).or_default().push(to);
    for ((r, c), &v) in data.indexed_iter() {
        if v == 0 {
            continue;
        }
        let (ri, ci) = (r as isize, c as isize);
        if !occupied(ri - 1, ci) {
            link((c, r), (c + 1, r));
        }
        if !occupied(ri, ci + 1) {
            link((c + 1, r), (c + 1, r + 1));
        }
        if !occupied(ri + 1, ci) {
            link((c + 1, r + 1), (c, r + 1));
        }
        if !occupied(ri, ci - 1) {
            link((c, r + 1), (c, r));
        }
    }

    let mut best: Option<(f64, Vec<(usize, usize)>)> = None;
    let starts: Vec<_> = outgoing.keys().copied().collect();
    for start in starts {
        while let Some(mut current) = outgoing.get_mut(&start).and_then(Vec::pop) {
            let mut lattice = vec![start];
            while current != start {
                lattice.push(current);
                match outgoing.get_mut(&current).and_then(Vec::pop) {
                    Some(next) => current = next,
                    None => break,
                }
            }
            let area = lattice_area(&lattice);
            if best.as_ref().map_or(true, |(a, _)| area > *a) {
                best = Some((area, lattice));
            }
        }
    }

    let (_, lattice) = best?;
    let transform = mask.transform();
    let ring = close_ring(lattice.into_iter().map(|(c, r)| {
        let (x, y) = transform.corner(r, c);
        Coord { x, y }
    }));
    Some(simplify_ring(&ring, mask.cell_size() * 1e-6))
}

fn lattice_area(ring: &[(usize, usize)]) -> f64 {
    let n = ring.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let (x0, y0) = (ring[i].0 as f64, ring[i].1 as f64);
            let (x1, y1) = (ring[(i + 1) % n].0 as f64, ring[(i + 1) % n].1 as f64);
            x0 * y1 - x1 * y0
        })
        .sum();
    twice.abs() / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::Area;

    fn square(x0: f64, y0: f64, side: f64) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![
                (x0, y0),
                (x0 + side, y0),
                (x0 + side, y0 + side),
                (x0, y0 + side),
                (x0, y0),
            ]),
            vec![],
        )
    }

    fn mask(rows: usize, cols: usize, cells: &[(usize, usize)]) -> Raster<u8> {
        let mut m = Raster::new(rows, cols);
        m.set_transform(GeoTransform::new(0.0, rows as f64, 1.0));
        for &(r, c) in cells {
            m.set(r, c, 1).unwrap();
        }
        m
    }

    #[test]
    fn test_field_values() {
        let df = DistanceField::build(&[square(0.0, 0.0, 4.0)], 1.0, 2.0).unwrap();
        assert_eq!(df.field.shape(), (8, 8));
        assert_eq!(df.envelope(), Envelope::new(-2.0, -2.0, 6.0, 6.0));
        // cell center (-1.5, 5.5) is diagonal to the (0, 4) corner
        assert_relative_eq!(df.field.sample(-1.5, 5.5).unwrap(), 1.5 * 2f64.sqrt());
        assert_relative_eq!(df.field.sample(2.5, 2.5).unwrap(), 1.5);
        let occupied = df.mask.data().iter().filter(|&&v| v != 0).count();
        assert_eq!(occupied, 16);
    }

    #[test]
    fn test_field_rejects_huge_grid() {
        let err = DistanceField::build(&[square(0.0, 0.0, 1e6)], 0.01, 0.0).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));
    }

    #[test]
    fn test_outline_single_cell() {
        let ring = mask_outline(&mask(3, 3, &[(1, 1)])).unwrap();
        assert_eq!(ring.0.len(), 5);
        assert_relative_eq!(Polygon::new(ring, vec![]).unsigned_area(), 1.0);
    }

    #[test]
    fn test_outline_block_and_l() {
        let block = mask_outline(&mask(4, 4, &[(1, 1), (1, 2), (2, 1), (2, 2)])).unwrap();
        assert_eq!(block.0.len(), 5);
        assert_relative_eq!(Polygon::new(block, vec![]).unsigned_area(), 4.0);

        let l = mask_outline(&mask(4, 4, &[(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)])).unwrap();
        assert_eq!(l.0.len(), 7);
        assert_relative_eq!(Polygon::new(l, vec![]).unsigned_area(), 5.0);
    }

    #[test]
    fn test_outline_picks_largest_region() {
        let ring = mask_outline(&mask(5, 5, &[(0, 0), (3, 3), (3, 4), (4, 3), (4, 4)])).unwrap();
        assert_relative_eq!(Polygon::new(ring, vec![]).unsigned_area(), 4.0);
    }

    #[test]
    fn test_outline_empty() {
        assert!(mask_outline(&mask(3, 3, &[])).is_none());
    }
}
