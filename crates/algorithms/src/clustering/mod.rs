//! Graph-based spatial clustering
//!
//! Points are triangulated, the triangulation edges reduced to a minimum
//! spanning tree and every tree edge longer than the threshold is cut. The
//! remaining connected components are the clusters.

mod graph;
mod threshold;

pub use graph::ClusterGraph;
pub use threshold::ThresholdPolicy;

use delinea_core::{Algorithm, ClustererError, Error, GeometryContext, Point2D, Result};
use geo::{BoundingRect, Intersects, Polygon};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::vector::ring_points;
use graph::component_labels;

/// Parameters for graph clustering
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterParams {
    /// Edge-removal policy
    pub threshold: ThresholdPolicy,
    /// Tolerances used while triangulating
    pub context: GeometryContext,
}

/// Partition of the input into clusters.
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    /// Input indices per cluster, ascending, clusters ordered by their smallest member
    pub clusters: Vec<Vec<usize>>,
    /// Threshold that was applied to the tree edges
    pub threshold: f64,
}

impl Clustering {
    pub fn num_clusters(&self) -> usize {
        self.clusters.len()
    }

    /// Number of clustered inputs.
    pub fn len(&self) -> usize {
        self.clusters.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Cluster id of every input, by input index.
    pub fn labels(&self) -> Vec<usize> {
        let mut labels = vec![0; self.len()];
        for (id, members) in self.clusters.iter().enumerate() {
            for &m in members {
                labels[m] = id;
            }
        }
        labels
    }

    pub fn largest_cluster_len(&self) -> usize {
        self.clusters.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Write each point's cluster id into its `class_id`.
    pub fn tag(&self, points: &mut [Point2D]) {
        for (id, members) in self.clusters.iter().enumerate() {
            for &m in members {
                if let Some(p) = points.get_mut(m) {
                    p.class_id = Some(id);
                }
            }
        }
    }

    fn from_labels(labels: &[usize], threshold: f64) -> Result<Self> {
        let count = labels.iter().max().map_or(0, |m| m + 1);
        let mut clusters = vec![Vec::new(); count];
        for (i, &label) in labels.iter().enumerate() {
            clusters[label].push(i);
        }
        let assigned: usize = clusters.iter().map(Vec::len).sum();
        if assigned != labels.len() || clusters.iter().any(Vec::is_empty) {
            return Err(ClustererError::PartitionMismatch {
                expected: labels.len(),
                assigned,
            }
            .into());
        }
        Ok(Self { clusters, threshold })
    }
}

/// MST clusterer over points or polygons.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphClusterer {
    policy: ThresholdPolicy,
    ctx: GeometryContext,
}

impl GraphClusterer {
    pub fn new(policy: ThresholdPolicy) -> Self {
        Self {
            policy,
            ctx: GeometryContext::default(),
        }
    }

    pub fn from_params(params: &ClusterParams) -> Self {
        Self {
            policy: params.threshold,
            ctx: params.context,
        }
    }

    pub fn with_context(mut self, ctx: GeometryContext) -> Self {
        self.ctx = ctx;
        self
    }

    pub fn policy(&self) -> &ThresholdPolicy {
        &self.policy
    }

    fn validate(&self) -> Result<()> {
        match self.policy {
            ThresholdPolicy::Fixed { length } if length.is_nan() || length < 0.0 => {
                Err(Error::InvalidParameter {
                    name: "threshold",
                    value: length.to_string(),
                    reason: "must be a non-negative length".into(),
                })
            }
            ThresholdPolicy::StdDev { k, .. } if !k.is_finite() => Err(Error::InvalidParameter {
                name: "k",
                value: k.to_string(),
                reason: "must be finite".into(),
            }),
            _ => Ok(()),
        }
    }

    /// Cluster points by cutting long spanning-tree edges.
    ///
    /// Cluster members are indices into `points`.
    pub fn cluster_points(&self, points: &[Point2D]) -> Result<Clustering> {
        if points.is_empty() {
            return Err(ClustererError::EmptyInput.into());
        }
        self.validate()?;

        let graph = ClusterGraph::from_points(points, &self.ctx)?;
        let mst = graph.minimum_spanning_tree();
        let lengths: Vec<f64> = mst.iter().map(|&(_, _, w)| w).collect();
        let threshold = self.policy.resolve(&lengths);

        let kept = mst
            .iter()
            .filter(|&&(_, _, w)| w <= threshold)
            .map(|&(a, b, _)| (a, b));
        let labels = component_labels(points.len(), kept);
        let clustering = Clustering::from_labels(&labels, threshold)?;

        debug!(
            points = points.len(),
            graph_edges = graph.edge_count(),
            tree_edges = mst.len(),
            threshold,
            clusters = clustering.num_clusters(),
            "points clustered"
        );
        Ok(clustering)
    }

    /// Cluster polygons through their exterior vertices.
    ///
    /// Two polygons land in the same cluster when any of their vertices end
    /// up in a common vertex cluster, or when the polygons intersect. A
    /// polygon without vertices forms its own cluster.
    pub fn cluster_polygons(&self, polygons: &[Polygon<f64>]) -> Result<Clustering> {
        let mut vertices = Vec::new();
        let mut owner = Vec::new();
        for (i, polygon) in polygons.iter().enumerate() {
            let ring = ring_points(polygon.exterior(), Some(i));
            owner.extend(std::iter::repeat(i).take(ring.len()));
            vertices.extend(ring);
        }
        if vertices.is_empty() {
            return Err(ClustererError::EmptyInput.into());
        }

        let by_vertex = self.cluster_points(&vertices)?;
        let owner = &owner;
        let links = by_vertex.clusters.iter().flat_map(|members| {
            let first = owner[members[0]];
            members.iter().map(move |&m| (first, owner[m]))
        });
        let overlaps = intersecting_pairs(polygons);
        let labels = component_labels(
            polygons.len(),
            links.chain(overlaps.iter().copied()).collect::<Vec<_>>(),
        );
        let clustering = Clustering::from_labels(&labels, by_vertex.threshold)?;

        debug!(
            polygons = polygons.len(),
            vertices = vertices.len(),
            overlaps = overlaps.len(),
            clusters = clustering.num_clusters(),
            "polygons clustered"
        );
        Ok(clustering)
    }
}

/// Index pairs of intersecting polygons.
///
/// Bounding boxes are swept along x so only boxes that overlap reach the
/// exact test.
fn intersecting_pairs(polygons: &[Polygon<f64>]) -> Vec<(usize, usize)> {
    let mut boxes: Vec<_> = polygons
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.bounding_rect().map(|r| (i, r)))
        .collect();
    boxes.sort_by(|a, b| a.1.min().x.total_cmp(&b.1.min().x));

    let mut pairs = Vec::new();
    for (k, (i, a)) in boxes.iter().enumerate() {
        for (j, b) in &boxes[k + 1..] {
            if b.min().x > a.max().x {
                break;
            }
            let boxes_meet = b.min().y <= a.max().y && a.min().y <= b.max().y;
            if boxes_meet && polygons[*i].intersects(&polygons[*j]) {
                pairs.push((*i, *j));
            }
        }
    }
    pairs
}

/// Point clustering algorithm
#[derive(Debug, Clone, Default)]
pub struct ClusterPoints;

impl Algorithm for ClusterPoints {
    type Input = Vec<Point2D>;
    type Output = Clustering;
    type Params = ClusterParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "ClusterPoints"
    }

    fn description(&self) -> &'static str {
        "Minimum-spanning-tree clustering over the Delaunay triangulation"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        GraphClusterer::from_params(&params).cluster_points(&input)
    }
}
