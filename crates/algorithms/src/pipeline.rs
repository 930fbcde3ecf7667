//! Cluster-then-outline pipeline

use delinea_core::Result;
use geo::Polygon;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::boundary::{BoundaryReconstructor, BoundaryStrategy};
use crate::clustering::{ClusterParams, Clustering, GraphClusterer};
use crate::vector::{area, perimeter};

/// Parameters for [`delineate`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelineationParams {
    pub cluster: ClusterParams,
    pub strategy: BoundaryStrategy,
}

/// Reconstructed outline of one cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    /// Cluster id
    pub cluster: usize,
    /// Indices of the member polygons
    pub members: Vec<usize>,
    pub polygon: Polygon<f64>,
    pub area: f64,
    pub perimeter: f64,
}

/// Clustering plus one outline result per cluster, in cluster order.
#[derive(Debug)]
pub struct Delineation {
    pub clustering: Clustering,
    pub outlines: Vec<Result<Outline>>,
}

impl Delineation {
    /// Outlines that were reconstructed successfully.
    pub fn successful(&self) -> impl Iterator<Item = &Outline> {
        self.outlines.iter().filter_map(|o| o.as_ref().ok())
    }

    pub fn failures(&self) -> usize {
        self.outlines.iter().filter(|o| o.is_err()).count()
    }
}

/// Cluster `polygons` and reconstruct one outline per cluster.
///
/// A failing cluster yields an `Err` in its slot and does not stop the
/// others.
pub fn delineate(polygons: &[Polygon<f64>], params: &DelineationParams) -> Result<Delineation> {
    delineate_with_progress(polygons, params, |_, _| {})
}

/// [`delineate`], calling `progress(done, total)` after every cluster.
pub fn delineate_with_progress<F>(
    polygons: &[Polygon<f64>],
    params: &DelineationParams,
    mut progress: F,
) -> Result<Delineation>
where
    F: FnMut(usize, usize),
{
    let clustering = GraphClusterer::from_params(&params.cluster).cluster_polygons(polygons)?;
    let ctx = params.cluster.context;
    let total = clustering.num_clusters();
    debug!(clusters = total, strategy = params.strategy.name(), "reconstructing outlines");

    let mut outlines = Vec::with_capacity(total);
    for (id, members) in clustering.clusters.iter().enumerate() {
        let cluster_polygons: Vec<Polygon<f64>> = members.iter().map(|&i| polygons[i].clone()).collect();
        let outline = params
            .strategy
            .retrieve_polygon(&ctx, &cluster_polygons)
            .map(|polygon| Outline {
                cluster: id,
                members: members.clone(),
                area: area(&polygon),
                perimeter: perimeter(&polygon),
                polygon,
            });
        if let Err(e) = &outline {
            debug!(cluster = id, members = members.len(), "outline failed: {e}");
        }
        outlines.push(outline);
        progress(id + 1, total);
    }

    Ok(Delineation {
        clustering,
        outlines,
    })
}
