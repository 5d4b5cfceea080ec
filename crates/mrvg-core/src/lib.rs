//! Geometry kernel for reduced visibility graphs.
//!
//! This crate is intentionally small and purely geometric. It knows about
//! axis-aligned rectangles, the four quadrants around a point and the
//! occlusion predicates a visibility graph is built from. It holds no state.
//!
//! ## Quickstart
//!
//! ```
//! use mrvg_core::{segment_crosses_rect, Rect};
//! use nalgebra::Point2;
//!
//! let wall = Rect::new(1.0, 2.0, 4.0, 5.0);
//! assert!(segment_crosses_rect(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0), &wall));
//! // Grazing a corner does not count as crossing.
//! assert!(!segment_crosses_rect(Point2::new(0.0, 3.0), Point2::new(2.0, 1.0), &wall));
//! ```

mod logger;
mod predicates;
mod quadrant;
mod rect;

pub use predicates::{
    clip_segment, corner_is_reflex, occupancy_at, segment_crosses_rect, segment_splits_seam,
    segments_intersect, EPSILON,
};
pub use quadrant::{Quadrant, QuadrantMask};
pub use rect::{Corner, Rect};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
