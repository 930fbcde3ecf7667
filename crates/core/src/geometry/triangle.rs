//! Triangles with cached circumcircle and envelope

use std::cmp::Ordering;

use crate::error::GeometryError;

use super::{orientation, Circle, Envelope, Point2D};

/// A non-degenerate triangle.
///
/// Vertices are stored in canonical order: the apex is the vertex with the
/// largest `y`, then `right` is the remaining vertex with the larger `x`, and
/// `left` is the last one. The circumcircle and envelope are derived from the
/// vertices and recomputed whenever they change.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    vertices: [Point2D; 3],
    circle: Circle,
    envelope: Envelope,
}

impl Triangle {
    /// Build a triangle, failing with [`GeometryError::Collinear`] for zero-area input.
    pub fn new(a: Point2D, b: Point2D, c: Point2D) -> Result<Self, GeometryError> {
        let vertices = canonical_order([a, b, c]);
        let circle = Circle::circumscribing(&vertices[0], &vertices[1], &vertices[2])
            .map_err(|_| GeometryError::Collinear { context: "triangle" })?;
        let envelope = Envelope::from_points(&vertices).unwrap_or_else(Envelope::empty);
        Ok(Self { vertices, circle, envelope })
    }

    /// Replace all three vertices and refresh the derived data.
    ///
    /// On failure the triangle is left unchanged.
    pub fn set_vertices(&mut self, a: Point2D, b: Point2D, c: Point2D) -> Result<(), GeometryError> {
        *self = Triangle::new(a, b, c)?;
        Ok(())
    }

    pub fn apex(&self) -> &Point2D {
        &self.vertices[0]
    }

    pub fn right(&self) -> &Point2D {
        &self.vertices[1]
    }

    pub fn left(&self) -> &Point2D {
        &self.vertices[2]
    }

    pub fn vertices(&self) -> &[Point2D; 3] {
        &self.vertices
    }

    pub fn circumcircle(&self) -> &Circle {
        &self.circle
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// The three edges as vertex pairs.
    pub fn edges(&self) -> [(Point2D, Point2D); 3] {
        let [a, b, c] = self.vertices;
        [(a, b), (b, c), (c, a)]
    }

    pub fn area(&self) -> f64 {
        orientation(&self.vertices[0], &self.vertices[1], &self.vertices[2]).abs() / 2.0
    }

    /// Whether any vertex carries the given graph index.
    pub fn has_vertex_index(&self, index: usize) -> bool {
        self.vertices.iter().any(|v| v.index == Some(index))
    }

    /// Whether the two triangles have a vertex in common (by coordinates).
    pub fn shares_vertex(&self, other: &Triangle) -> bool {
        self.vertices
            .iter()
            .any(|a| other.vertices.iter().any(|b| a.equals(b)))
    }

    /// Vertex graph indices, if all three vertices have one.
    pub fn vertex_indices(&self) -> Option<[usize; 3]> {
        Some([
            self.vertices[0].index?,
            self.vertices[1].index?,
            self.vertices[2].index?,
        ])
    }

    /// Strict interior test using barycentric coordinates.
    ///
    /// Points on an edge or on a vertex are not contained.
    pub fn contains(&self, pt: &Point2D) -> bool {
        let [p0, p1, p2] = &self.vertices;
        let v0 = (p1.x - p0.x, p1.y - p0.y);
        let v1 = (p2.x - p0.x, p2.y - p0.y);
        let v2 = (pt.x - p0.x, pt.y - p0.y);

        let dot00 = v0.0 * v0.0 + v0.1 * v0.1;
        let dot01 = v0.0 * v1.0 + v0.1 * v1.1;
        let dot02 = v0.0 * v2.0 + v0.1 * v2.1;
        let dot11 = v1.0 * v1.0 + v1.1 * v1.1;
        let dot12 = v1.0 * v2.0 + v1.1 * v2.1;

        let inv_denom = 1.0 / (dot00 * dot11 - dot01 * dot01);
        let u = (dot11 * dot02 - dot01 * dot12) * inv_denom;
        let v = (dot00 * dot12 - dot01 * dot02) * inv_denom;

        u > 0.0 && v > 0.0 && u + v < 1.0
    }
}

fn canonical_order(mut pts: [Point2D; 3]) -> [Point2D; 3] {
    // Apex: largest y (ties broken by x).
    let apex = (0..3).max_by(|&i, &j| pts[i].cmp(&pts[j])).unwrap_or(0);
    pts.swap(0, apex);
    let right_first = match pts[1].x.total_cmp(&pts[2].x) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => pts[1].y >= pts[2].y,
    };
    if !right_first {
        pts.swap(1, 2);
    }
    pts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri() -> Triangle {
        Triangle::new(
            Point2D::new(0.0, 0.0),
            Point2D::new(2.0, 4.0),
            Point2D::new(4.0, 0.0),
        )
        .unwrap()
    }

    #[test]
    fn test_canonical_order() {
        let t = tri();
        assert_eq!(*t.apex(), Point2D::new(2.0, 4.0));
        assert_eq!(*t.right(), Point2D::new(4.0, 0.0));
        assert_eq!(*t.left(), Point2D::new(0.0, 0.0));
    }

    #[test]
    fn test_contains_strict_interior() {
        let t = tri();
        assert!(t.contains(&Point2D::new(2.0, 1.0)));
        assert!(!t.contains(&Point2D::new(2.0, 0.0)), "edge point");
        assert!(!t.contains(&Point2D::new(0.0, 0.0)), "vertex");
        assert!(!t.contains(&Point2D::new(5.0, 5.0)));
    }

    #[test]
    fn test_shares_vertex() {
        let t = tri();
        let neighbour = Triangle::new(
            Point2D::new(4.0, 0.0),
            Point2D::new(2.0, 4.0),
            Point2D::new(6.0, 4.0),
        )
        .unwrap();
        let far = Triangle::new(
            Point2D::new(10.0, 0.0),
            Point2D::new(11.0, 0.0),
            Point2D::new(10.0, 1.0),
        )
        .unwrap();
        assert!(t.shares_vertex(&neighbour));
        assert!(!t.shares_vertex(&far));
    }

    #[test]
    fn test_collinear_rejected() {
        let r = Triangle::new(
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 0.0),
            Point2D::new(3.0, 0.0),
        );
        assert!(matches!(r, Err(GeometryError::Collinear { .. })));
    }

    #[test]
    fn test_set_vertices_recomputes() {
        let mut t = tri();
        t.set_vertices(
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 0.0),
            Point2D::new(0.0, 1.0),
        )
        .unwrap();
        assert_eq!(t.area(), 0.5);
        assert_eq!(*t.envelope(), Envelope::new(0.0, 0.0, 1.0, 1.0));
        assert!(t.circumcircle().contains(&Point2D::new(0.5, 0.5)));

        let before = t.clone();
        assert!(t
            .set_vertices(Point2D::new(0.0, 0.0), Point2D::new(1.0, 1.0), Point2D::new(2.0, 2.0))
            .is_err());
        assert_eq!(t, before);
    }

    #[test]
    fn test_vertex_indices() {
        let t = Triangle::new(
            Point2D::new(0.0, 0.0).with_index(4),
            Point2D::new(1.0, 0.0).with_index(9),
            Point2D::new(0.0, 1.0).with_index(2),
        )
        .unwrap();
        let mut idx = t.vertex_indices().unwrap();
        idx.sort();
        assert_eq!(idx, [2, 4, 9]);
        assert!(t.has_vertex_index(9));
        assert!(!t.has_vertex_index(1));
    }
}
