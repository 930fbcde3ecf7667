//! Weighted proximity graph over the triangulation edges

use delinea_core::{ClustererError, Error, GeometryContext, GeometryError, Point2D, Result};
use petgraph::algo::min_spanning_tree;
use petgraph::data::Element;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
use tracing::debug;

use crate::triangulation::triangulate;

/// Undirected graph with one node per input point and one edge per unique
/// triangulation edge, weighted by Euclidean length.
#[derive(Debug, Clone)]
pub struct ClusterGraph {
    graph: UnGraph<(), f64>,
}

impl ClusterGraph {
    /// Build the proximity graph for `points`.
    ///
    /// Node `i` is `points[i]`. Points the triangulator drops as
    /// near-duplicates are linked to the vertex they duplicate. When the
    /// points cannot be triangulated because they are collinear (or fewer
    /// than three), the graph is the chain of points in `(y, x)` order, which
    /// is the exact spanning tree of a collinear set.
    pub fn from_points(points: &[Point2D], ctx: &GeometryContext) -> Result<Self> {
        let n = points.len();
        let mut graph = UnGraph::<(), f64>::with_capacity(n, 3 * n);
        for _ in 0..n {
            graph.add_node(());
        }

        let chain = match triangulate(points, ctx) {
            Ok(tin) if !tin.is_empty() => {
                for (a, b) in tin.edges() {
                    graph.add_edge(NodeIndex::new(a), NodeIndex::new(b), points[a].distance(&points[b]));
                }
                for d in tin.discarded() {
                    graph.add_edge(
                        NodeIndex::new(d.index),
                        NodeIndex::new(d.of),
                        points[d.index].distance(&points[d.of]),
                    );
                }
                false
            }
            Ok(_) => true,
            Err(GeometryError::Collinear { .. }) | Err(GeometryError::TooFewPoints { .. }) => true,
            Err(e) => return Err(e.into()),
        };

        if chain && n > 1 {
            debug!(points = n, "input not triangulable, linking points as a chain");
            let mut order: Vec<usize> = (0..n).collect();
            order.sort_by(|&a, &b| points[a].cmp(&points[b]).then(a.cmp(&b)));
            for w in order.windows(2) {
                graph.add_edge(
                    NodeIndex::new(w[0]),
                    NodeIndex::new(w[1]),
                    points[w[0]].distance(&points[w[1]]),
                );
            }
        }

        if graph.node_count() != n {
            return Err(Error::Clusterer(ClustererError::VertexMismatch {
                expected: n,
                graph: graph.node_count(),
            }));
        }
        Ok(Self { graph })
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All edges as `(a, b, length)` with `a < b`.
    pub fn edges(&self) -> Vec<(usize, usize, f64)> {
        self.graph
            .raw_edges()
            .iter()
            .map(|e| {
                let (a, b) = (e.source().index(), e.target().index());
                (a.min(b), a.max(b), e.weight)
            })
            .collect()
    }

    /// Kruskal minimum spanning forest as `(a, b, length)` edges.
    pub fn minimum_spanning_tree(&self) -> Vec<(usize, usize, f64)> {
        min_spanning_tree(&self.graph)
            .filter_map(|element| match element {
                Element::Edge { source, target, weight, .. } => {
                    Some((source.min(target), source.max(target), weight))
                }
                Element::Node { .. } => None,
            })
            .collect()
    }
}

/// Connected-component labels of `n` vertices joined by `edges`.
///
/// Labels are dense and numbered by each component's smallest vertex.
pub(crate) fn component_labels(n: usize, edges: impl IntoIterator<Item = (usize, usize)>) -> Vec<usize> {
    let mut uf = UnionFind::<usize>::new(n);
    for (a, b) in edges {
        uf.union(a, b);
    }
    let mut root_label: Vec<Option<usize>> = vec![None; n];
    let mut next = 0;
    (0..n)
        .map(|i| {
            let root = uf.find(i);
            *root_label[root].get_or_insert_with(|| {
                next += 1;
                next - 1
            })
        })
        .collect()
}
