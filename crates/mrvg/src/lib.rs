//! Shortest paths around axis-aligned rectangles, with obstacles added and
//! removed one at a time.
//!
//! The [`Graph`] facade keeps a reduced visibility graph (only corners a
//! shortest path can turn at, and the sightlines between them) up to date
//! under every mutation and answers path queries against it.
//!
//! ## Quickstart
//!
//! ```
//! use mrvg::Graph;
//! use nalgebra::Point2;
//!
//! # fn main() -> Result<(), mrvg::GraphError> {
//! let mut graph = Graph::default();
//! graph.add_obstacle(1.0, 2.0, 4.0, 5.0)?;
//! graph.add_obstacle(0.0, 7.0, 9.0, 9.0)?;
//!
//! let path = graph
//!     .find(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0))
//!     .expect("open plane");
//! assert!(path.length() > 200f64.sqrt());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `mrvg::core`: rectangles, quadrant occupancy, occlusion predicates, logger.
//! - `mrvg::visibility`: obstacle store and the incremental visibility graph.
//! - `mrvg::pathfinding`: cost functions and the best-first search.
//! - [`Graph`]: everything above behind one mutable handle.

pub use mrvg_core as core;
pub use mrvg_graph as visibility;
pub use mrvg_path as pathfinding;

mod graph;
mod params;
mod snapshot;

pub use graph::{Graph, GraphError};
pub use params::GraphParams;
pub use snapshot::{GraphSnapshot, NodeView, ObstacleView};

pub use mrvg_core::{init_with_level, Rect};
pub use mrvg_graph::{Edge, NodeId, Obstacle, ObstacleError, ObstacleId, VisibilityParams};
pub use mrvg_path::{AxisWeighted, CostFn, Euclidean, Path, Pathfinder, PathfinderParams};
