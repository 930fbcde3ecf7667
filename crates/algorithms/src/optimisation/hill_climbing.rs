//! Greedy grid-neighbour hill climbing

use delinea_core::{Envelope, Error, OptimisationError, Result};
use geo::{Coord, LineString};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::ContourEnergy;
use crate::vector::{close_ring, open_ring};

/// The eight grid-neighbour directions, in units of the resolution.
const OFFSETS: [(f64, f64); 8] = [
    (-1.0, -1.0),
    (0.0, -1.0),
    (1.0, -1.0),
    (-1.0, 0.0),
    (1.0, 0.0),
    (-1.0, 1.0),
    (0.0, 1.0),
    (1.0, 1.0),
];

/// Vertex spacing kept by the adaptive optimiser.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityBounds {
    /// A vertex whose neighbours are closer than this is removed
    pub min_spacing: f64,
    /// A segment longer than this gets a midpoint
    pub max_spacing: f64,
}

/// Hill-climbing contour optimiser.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HillClimbing {
    /// Maximum number of sweeps over the contour
    pub max_iterations: usize,
    /// Resample the contour between sweeps
    pub adaptive: Option<DensityBounds>,
}

impl Default for HillClimbing {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            adaptive: None,
        }
    }
}

/// Result of an optimisation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Optimised {
    /// Closed ring
    pub contour: LineString<f64>,
    /// Sweeps performed
    pub sweeps: usize,
    /// Vertex moves made over all sweeps
    pub moves: usize,
    /// Energy of the returned contour
    pub energy: f64,
}

impl HillClimbing {
    pub fn new(max_iterations: usize) -> Self {
        Self {
            max_iterations,
            adaptive: None,
        }
    }

    pub fn with_density(mut self, bounds: DensityBounds) -> Self {
        self.adaptive = Some(bounds);
        self
    }

    /// Minimise `energy` over `contour`.
    ///
    /// Every sweep visits each vertex in order and moves it to whichever of
    /// its current position and the eight positions one `resolution` step
    /// away has strictly the lowest energy. Positions outside `envelope` are
    /// never tried. Stops after a sweep without moves or after
    /// `max_iterations` sweeps.
    pub fn optimise<E: ContourEnergy + ?Sized>(
        &self,
        contour: &LineString<f64>,
        resolution: f64,
        envelope: &Envelope,
        energy: &E,
    ) -> Result<Optimised> {
        if resolution.is_nan() || resolution <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "resolution",
                value: resolution.to_string(),
                reason: "must be positive".into(),
            });
        }
        if let Some(b) = self.adaptive {
            if !(b.min_spacing >= 0.0 && b.min_spacing < b.max_spacing) {
                return Err(Error::InvalidParameter {
                    name: "adaptive",
                    value: format!("{}..{}", b.min_spacing, b.max_spacing),
                    reason: "min_spacing must be non-negative and below max_spacing".into(),
                });
            }
        }

        let mut vertices: Vec<Coord<f64>> = open_ring(contour).to_vec();
        if vertices.len() < 3 {
            return Err(OptimisationError::DegenerateContour(vertices.len()).into());
        }
        if let Some((index, c)) = vertices
            .iter()
            .enumerate()
            .find(|(_, c)| !envelope.contains(c.x, c.y))
        {
            return Err(OptimisationError::OutsideField {
                index,
                x: c.x,
                y: c.y,
            }
            .into());
        }

        let mut sweeps = 0;
        let mut moves = 0;
        while sweeps < self.max_iterations {
            sweeps += 1;
            let moved = sweep(&mut vertices, resolution, envelope, energy);
            moves += moved;
            let resampled = match self.adaptive {
                Some(bounds) => resample(&mut vertices, bounds),
                None => false,
            };
            trace!(sweep = sweeps, moved, vertices = vertices.len(), "sweep done");
            if moved == 0 && !resampled {
                break;
            }
        }

        let energy = energy.total(&vertices);
        debug!(sweeps, moves, energy, vertices = vertices.len(), "contour optimised");
        Ok(Optimised {
            contour: close_ring(vertices),
            sweeps,
            moves,
            energy,
        })
    }
}

fn sweep<E: ContourEnergy + ?Sized>(
    vertices: &mut [Coord<f64>],
    resolution: f64,
    envelope: &Envelope,
    energy: &E,
) -> usize {
    let mut moved = 0;
    for i in 0..vertices.len() {
        let start = vertices[i];
        let mut best = start;
        let mut best_energy = energy.local(vertices, i);
        for (dx, dy) in OFFSETS {
            let candidate = Coord {
                x: start.x + dx * resolution,
                y: start.y + dy * resolution,
            };
            if !envelope.contains(candidate.x, candidate.y) {
                continue;
            }
            vertices[i] = candidate;
            let e = energy.local(vertices, i);
            if e < best_energy {
                best = candidate;
                best_energy = e;
            }
        }
        vertices[i] = best;
        if best != start {
            moved += 1;
        }
    }
    moved
}

/// Insert midpoints into long segments, then drop vertices whose neighbours
/// are too close. Returns whether the vertex list changed.
fn resample(vertices: &mut Vec<Coord<f64>>, bounds: DensityBounds) -> bool {
    let n = vertices.len();
    let mut out = Vec::with_capacity(n * 2);
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        out.push(a);
        if (b.x - a.x).hypot(b.y - a.y) > bounds.max_spacing {
            out.push(Coord {
                x: (a.x + b.x) / 2.0,
                y: (a.y + b.y) / 2.0,
            });
        }
    }

    let mut i = 0;
    while i < out.len() && out.len() > 3 {
        let len = out.len();
        let prev = out[(i + len - 1) % len];
        let next = out[(i + 1) % len];
        if (next.x - prev.x).hypot(next.y - prev.y) < bounds.min_spacing {
            out.remove(i);
        } else {
            i += 1;
        }
    }

    let changed = out != *vertices;
    *vertices = out;
    changed
}
