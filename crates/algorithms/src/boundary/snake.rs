//! Active-contour outline over a distance field

use delinea_core::{GeometryContext, Result};
use geo::{LineString, Polygon};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::field::{mask_outline, DistanceField};
use super::line_projection::sample_ring;
use super::{enclose, invalid, trivial_outline, BoundaryReconstructor};
use crate::morphology::{count_regions, dilate, StructuringElement};
use crate::optimisation::{AnchorLine, DensityBounds, HillClimbing, SnakeEnergy, SnakeWeights};
use crate::vector::{close_ring, convex_hull, open_ring, simplify_ring};

/// Parameters for the snake strategy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeParams {
    /// Cell size of the distance field and optimiser step (map units)
    pub resolution: f64,
    /// Energy term weights
    pub weights: SnakeWeights,
    /// Optimiser sweep budget
    pub max_iterations: usize,
    /// Dilation passes tried before seeding from the hull
    pub max_dilations: usize,
    /// Vertex spacing kept while optimising a mask-seeded contour
    pub density: Option<DensityBounds>,
}

impl Default for SnakeParams {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            weights: SnakeWeights::default(),
            max_iterations: 200,
            max_dilations: 10,
            density: None,
        }
    }
}

/// Seed contour and, for a hull seed, one anchor line per vertex.
struct Seed {
    contour: LineString<f64>,
    anchors: Option<Vec<Option<AnchorLine>>>,
}

/// Snake reconstructor.
///
/// The member outlines are rasterized into a distance field. The contour is
/// seeded from the outline of the occupancy mask once dilation has joined it
/// into a single region, or else from the convex hull with every vertex
/// anchored to its inward normal line, and then relaxed by hill climbing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Snake {
    params: SnakeParams,
}

impl Snake {
    pub fn new(params: SnakeParams) -> Self {
        Self { params }
    }

    fn seed(&self, field: &DistanceField, hull: &Polygon<f64>) -> Result<Seed> {
        let resolution = self.params.resolution;
        let mut mask = field.mask.clone();
        for pass in 0..=self.params.max_dilations {
            if count_regions(&mask) == 1 {
                if let Some(outline) = mask_outline(&mask) {
                    debug!(dilations = pass, "snake seeded from mask outline");
                    return Ok(Seed {
                        contour: simplify_ring(&outline, resolution / 2.0),
                        anchors: None,
                    });
                }
            }
            if pass < self.params.max_dilations {
                mask = dilate(&mask, &StructuringElement::Square(1))?;
            }
        }

        let samples = sample_ring(open_ring(hull.exterior()), 2.0 * resolution);
        debug!(vertices = samples.len(), "snake seeded from convex hull");
        let anchors = samples.iter().map(|&(c, n)| AnchorLine::new(c, n)).collect();
        Ok(Seed {
            contour: close_ring(samples.into_iter().map(|(c, _)| c)),
            anchors: Some(anchors),
        })
    }
}

impl BoundaryReconstructor for Snake {
    fn retrieve_polygon(&self, _ctx: &GeometryContext, polygons: &[Polygon<f64>]) -> Result<Polygon<f64>> {
        if let Some(outline) = trivial_outline(polygons)? {
            return Ok(outline);
        }
        let p = &self.params;
        if !(p.resolution.is_finite() && p.resolution > 0.0) {
            return Err(invalid("resolution", p.resolution, "must be positive"));
        }

        let hull = convex_hull(polygons);
        let margin = p.resolution * (p.max_dilations as f64 + 2.0);
        let field = DistanceField::build(polygons, p.resolution, margin)?;
        let seed = self.seed(&field, &hull)?;

        let energy = SnakeEnergy::new(&field.field, p.weights, p.resolution);
        let (energy, climber) = match &seed.anchors {
            Some(anchors) => (energy.with_anchors(anchors), HillClimbing::new(p.max_iterations)),
            None => (
                energy,
                HillClimbing {
                    max_iterations: p.max_iterations,
                    adaptive: p.density,
                },
            ),
        };
        let optimised = climber.optimise(&seed.contour, p.resolution, &field.envelope(), &energy)?;
        debug!(
            sweeps = optimised.sweeps,
            moves = optimised.moves,
            energy = optimised.energy,
            "snake relaxed"
        );

        Ok(enclose(&Polygon::new(optimised.contour, vec![]), polygons, &hull))
    }
}
