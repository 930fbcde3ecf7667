//! Bowyer-Watson triangulator over an owned triangle list.
//!
//! Triangles reference their vertices through `Point2D::index`. Inserted
//! points are numbered `0..n` in insertion order; the three super-triangle
//! vertices use the indices `SEED_BASE..SEED_BASE + 3`, which can never
//! collide with an input index.
//!
//! The seed vertices are stored at finite positions, but every in-circle test
//! and cavity ordering treats them as points at infinity along fixed
//! directions. A circle through a seed vertex then degenerates to a half-plane
//! and the triangles left after stripping the seed cover the convex hull
//! exactly, however thin the input is.

use delinea_core::geometry::{max_side_sq, orientation};
use delinea_core::{Algorithm, Envelope, GeometryContext, GeometryError, Point2D, Triangle};
use tracing::{debug, trace};

/// First index used for the synthetic seed vertices.
const SEED_BASE: usize = usize::MAX - 2;

/// Radius of the stored seed triangle, in multiples of the envelope's larger
/// side. Only used for storage; predicates take the seed at infinity.
const SEED_SCALE: f64 = 10.0;

/// Angle of the first seed direction. Off the axes and diagonals so that no
/// grid-aligned edge runs parallel to a seed direction.
const SEED_ANGLE: f64 = 0.3;

/// Outcome of a single insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// The point became vertex `index`.
    Inserted { index: usize },
    /// The point lay within the duplicate tolerance of vertex `of` and was dropped.
    Duplicate { index: usize, of: usize },
}

/// A point dropped as a near-duplicate of an existing vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discarded {
    /// Insertion index of the dropped point
    pub index: usize,
    /// Vertex it duplicated
    pub of: usize,
}

/// Triangulator in its seeded/inserting state.
///
/// Call [`insert`](Self::insert) for every point, then
/// [`finalize`](Self::finalize) to strip the seed triangle and obtain the
/// [`Triangulation`].
#[derive(Debug)]
pub struct DelaunayTriangulator {
    ctx: GeometryContext,
    bounds: Envelope,
    seed: [Point2D; 3],
    directions: [(f64, f64); 3],
    points: Vec<Point2D>,
    triangles: Vec<Triangle>,
    discarded: Vec<Discarded>,
}

impl DelaunayTriangulator {
    /// Seed a triangulation that can hold every point of `points`.
    ///
    /// The points are only used to size the seed triangle; nothing is
    /// inserted yet. Fails when fewer than three points are given, when the
    /// points are all collinear (or coincident), or when a coordinate is not
    /// finite.
    pub fn seeded(points: &[Point2D], ctx: &GeometryContext) -> Result<Self, GeometryError> {
        if points.len() < 3 {
            return Err(GeometryError::TooFewPoints {
                required: 3,
                found: points.len(),
            });
        }
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(GeometryError::Invalid("non-finite coordinate".into()));
        }
        if all_collinear(points, ctx) {
            return Err(GeometryError::Collinear { context: "triangulation input" });
        }

        let bounds = Envelope::from_points(points).ok_or(GeometryError::DegenerateSeed)?;
        let dx = bounds.width();
        let dy = bounds.height();
        let delta = dx.max(dy);
        if !(delta > 0.0) {
            return Err(GeometryError::DegenerateSeed);
        }

        let directions: [(f64, f64); 3] = std::array::from_fn(|k| {
            let angle = SEED_ANGLE + k as f64 * std::f64::consts::TAU / 3.0;
            (angle.cos(), angle.sin())
        });
        let (cx, cy) = (bounds.min_x + 0.5 * dx, bounds.min_y + 0.5 * dy);
        let seed: [Point2D; 3] = std::array::from_fn(|k| {
            let (ux, uy) = directions[k];
            Point2D::new(cx + SEED_SCALE * delta * ux, cy + SEED_SCALE * delta * uy)
                .with_index(SEED_BASE + k)
        });
        let root = Triangle::new(seed[0], seed[1], seed[2])
            .map_err(|_| GeometryError::DegenerateSeed)?;

        Ok(Self {
            ctx: *ctx,
            bounds,
            seed,
            directions,
            points: Vec::with_capacity(points.len()),
            triangles: vec![root],
            discarded: Vec::new(),
        })
    }

    /// Number of points passed to `insert` so far, including discarded ones.
    pub fn inserted(&self) -> usize {
        self.points.len()
    }

    /// Current triangles, seed-touching ones included.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// The three synthetic seed vertices.
    pub fn seed(&self) -> &[Point2D; 3] {
        &self.seed
    }

    /// Insert one point; it receives the next insertion index.
    ///
    /// A point within `duplicate_tolerance` of a vertex of the cavity it would
    /// open is dropped and reported as [`Insertion::Duplicate`]; the
    /// triangulation is left untouched.
    pub fn insert(&mut self, point: Point2D) -> Result<Insertion, GeometryError> {
        if !self.bounds.contains(point.x, point.y) {
            return Err(GeometryError::Invalid(format!(
                "point ({}, {}) lies outside the seeded envelope",
                point.x, point.y
            )));
        }

        let index = self.points.len();
        let p = point.with_index(index);
        self.points.push(p);

        // Collect first, erase afterwards.
        let bad: Vec<bool> = self
            .triangles
            .iter()
            .map(|t| self.in_circumcircle(t, &p))
            .collect();

        let mut cavity: Vec<Point2D> = Vec::new();
        for (t, _) in self.triangles.iter().zip(&bad).filter(|(_, &b)| b) {
            for v in t.vertices() {
                if !cavity.iter().any(|c| c.index == v.index) {
                    cavity.push(*v);
                }
            }
        }

        let tol = self.ctx.duplicate_tolerance;
        let duplicate_of = if cavity.is_empty() {
            // Only a point sitting exactly on a vertex opens no cavity.
            self.nearest_vertex(&p)
        } else {
            cavity
                .iter()
                .filter(|v| v.distance(&p) < tol)
                .min_by(|a, b| a.distance(&p).total_cmp(&b.distance(&p)))
                .and_then(|v| v.index)
        };

        if let Some(of) = duplicate_of {
            debug!(index, of, x = p.x, y = p.y, "discarding near-duplicate point");
            self.discarded.push(Discarded { index, of });
            return Ok(Insertion::Duplicate { index, of });
        }

        let mut flags = bad.into_iter();
        self.triangles.retain(|_| !flags.next().unwrap_or(false));

        cavity.sort_by(|a, b| {
            self.bearing(&p, a)
                .total_cmp(&self.bearing(&p, b))
                .then_with(|| p.distance_sq(a).total_cmp(&p.distance_sq(b)))
        });

        let n = cavity.len();
        let mut created = 0usize;
        for i in 0..n {
            let a = cavity[i];
            let b = cavity[(i + 1) % n];
            // a triangle with a seed vertex is never flat
            let real = seed_slot(&a).is_none() && seed_slot(&b).is_none();
            if real && self.ctx.is_collinear(orientation(&a, &b, &p), max_side_sq(&a, &b, &p)) {
                continue;
            }
            match Triangle::new(a, b, p) {
                Ok(t) => {
                    self.triangles.push(t);
                    created += 1;
                }
                Err(_) => continue,
            }
        }
        trace!(index, cavity = n, created, "inserted point");

        Ok(Insertion::Inserted { index })
    }

    /// Strict in-circle test with the seed vertices at infinity.
    ///
    /// One seed vertex turns the circle into the open half-plane on the seed
    /// side of the two real vertices, plus the open segment between them. Two
    /// seed vertices turn it into a half-plane bounded by the line through the
    /// real vertex parallel to the chord between the seed directions.
    fn in_circumcircle(&self, t: &Triangle, p: &Point2D) -> bool {
        let mut real: Vec<&Point2D> = Vec::with_capacity(3);
        let mut seeds: Vec<(f64, f64)> = Vec::with_capacity(3);
        for v in t.vertices() {
            match seed_slot(v) {
                Some(k) => seeds.push(self.directions[k]),
                None => real.push(v),
            }
        }

        match (real.as_slice(), seeds.as_slice()) {
            (_, []) => t.circumcircle().contains(p),
            ([a, b], [d]) => {
                let side = orientation(a, b, p);
                let toward = cross((b.x - a.x, b.y - a.y), *d);
                if side == 0.0 {
                    (a.x - p.x) * (b.x - p.x) + (a.y - p.y) * (b.y - p.y) < 0.0
                } else if toward == 0.0 {
                    // edge parallel to the seed direction
                    t.circumcircle().contains(p)
                } else {
                    side.signum() == toward.signum()
                }
            }
            ([a], [d1, d2]) => {
                let lead = cross((a.x - p.x, a.y - p.y), (d1.0 - d2.0, d1.1 - d2.1));
                lead * cross(*d1, *d2) > 0.0
            }
            _ => true,
        }
    }

    /// Bearing from `p` to `v`, taking a seed vertex's direction at infinity.
    fn bearing(&self, p: &Point2D, v: &Point2D) -> f64 {
        match seed_slot(v) {
            Some(k) => {
                let (ux, uy) = self.directions[k];
                uy.atan2(ux)
            }
            None => p.bearing_to(v),
        }
    }

    fn nearest_vertex(&self, p: &Point2D) -> Option<usize> {
        self.triangles
            .iter()
            .flat_map(|t| t.vertices().iter())
            .filter(|v| v.index.is_some_and(|i| i < SEED_BASE))
            .min_by(|a, b| a.distance(p).total_cmp(&b.distance(p)))
            .and_then(|v| v.index)
    }

    /// Strip every triangle touching a seed vertex.
    pub fn finalize(self) -> Triangulation {
        let mut triangles = self.triangles;
        triangles.retain(|t| !(0..3).any(|k| t.has_vertex_index(SEED_BASE + k)));

        let mut envelope = Envelope::empty();
        for t in &triangles {
            envelope.merge(t.envelope());
        }

        debug!(
            triangles = triangles.len(),
            points = self.points.len(),
            discarded = self.discarded.len(),
            "triangulation finalized"
        );

        Triangulation {
            points: self.points,
            triangles,
            discarded: self.discarded,
            seed: self.seed,
            envelope,
        }
    }
}

/// Position of `v` among the seed vertices, if it is one.
fn seed_slot(v: &Point2D) -> Option<usize> {
    v.index
        .and_then(|i| i.checked_sub(SEED_BASE))
        .filter(|&k| k < 3)
}

#[inline]
fn cross(u: (f64, f64), v: (f64, f64)) -> f64 {
    u.0 * v.1 - u.1 * v.0
}

fn all_collinear(points: &[Point2D], ctx: &GeometryContext) -> bool {
    let a = points[0];
    let Some(b) = points.iter().find(|p| p.distance_sq(&a) > 0.0) else {
        return true;
    };
    !points
        .iter()
        .any(|c| !ctx.is_collinear(orientation(&a, b, c), max_side_sq(&a, b, c)))
}

/// A finalized Delaunay triangulation.
#[derive(Debug, Clone)]
pub struct Triangulation {
    points: Vec<Point2D>,
    triangles: Vec<Triangle>,
    discarded: Vec<Discarded>,
    seed: [Point2D; 3],
    envelope: Envelope,
}

impl Triangulation {
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Every inserted point by insertion index, discarded ones included.
    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    /// Points that are vertices of the triangulation, in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &Point2D> + '_ {
        self.points
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.discarded.iter().any(|d| d.index == *i))
            .map(|(_, p)| p)
    }

    pub fn point(&self, index: usize) -> Option<&Point2D> {
        self.points.get(index)
    }

    /// Points dropped as near-duplicates
    pub fn discarded(&self) -> &[Discarded] {
        &self.discarded
    }

    /// Seed vertices used while building (no longer referenced by any triangle).
    pub fn seed(&self) -> &[Point2D; 3] {
        &self.seed
    }

    /// Envelope of the remaining triangles
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Unique edges as `(min, max)` vertex-index pairs, sorted.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut edges: Vec<(usize, usize)> = self
            .triangles
            .iter()
            .filter_map(Triangle::vertex_indices)
            .flat_map(|[a, b, c]| [(a, b), (b, c), (c, a)])
            .map(|(a, b)| (a.min(b), a.max(b)))
            .collect();
        edges.sort_unstable();
        edges.dedup();
        edges
    }
}

/// Triangulate `points`, inserting them in order.
///
/// Vertex `i` of the result is `points[i]`.
pub fn triangulate(points: &[Point2D], ctx: &GeometryContext) -> Result<Triangulation, GeometryError> {
    let mut triangulator = DelaunayTriangulator::seeded(points, ctx)?;
    for p in points {
        triangulator.insert(*p)?;
    }
    Ok(triangulator.finalize())
}

/// Delaunay triangulation algorithm
#[derive(Debug, Clone, Default)]
pub struct Triangulate;

impl Algorithm for Triangulate {
    type Input = Vec<Point2D>;
    type Output = Triangulation;
    type Params = GeometryContext;
    type Error = GeometryError;

    fn name(&self) -> &'static str {
        "Triangulate"
    }

    fn description(&self) -> &'static str {
        "Incremental Delaunay triangulation with near-duplicate removal"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output, Self::Error> {
        triangulate(&input, &params)
    }
}
