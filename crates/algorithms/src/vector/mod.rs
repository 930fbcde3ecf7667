//! Vector helpers shared by the clusterer and the reconstructors
//!
//! - Rings: opening, closing and tagging polygon rings
//! - Convex hull, envelope and union of polygon sets
//! - Area / perimeter
//! - Ring simplification (Douglas-Peucker)

mod measurements;
mod ring;
mod simplify;
mod spatial;

pub use measurements::{area, perimeter, total_area};
pub use ring::{close_ring, exterior_only, open_ring, ring_points};
pub use simplify::simplify_ring;
pub use spatial::{convex_hull, dominant_part, envelope_of, union_all};
