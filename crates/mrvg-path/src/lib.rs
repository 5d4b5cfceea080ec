//! Best-first path search over a [`mrvg_graph::VisibilityGraph`].
//!
//! A query never touches the graph: the start and goal points live in a
//! per-call overlay next to the borrowed graph, so any number of queries may
//! run at once against the same graph.
//!
//! ```
//! use mrvg_core::Rect;
//! use mrvg_graph::{ObstacleStore, VisibilityGraph, VisibilityParams};
//! use mrvg_path::Pathfinder;
//! use nalgebra::Point2;
//!
//! let mut store = ObstacleStore::default();
//! let mut graph = VisibilityGraph::new(VisibilityParams::default());
//! let id = store.add(Rect::new(1.0, -1.0, 2.0, 1.0)).unwrap();
//! graph.insert_obstacle(&store, id);
//!
//! let path = Pathfinder::new(&graph, &store)
//!     .find(Point2::new(0.0, 0.0), Point2::new(3.0, 0.0))
//!     .unwrap();
//! assert_eq!(path.points.len(), 4);
//! assert!(path.cost > 3.0);
//! ```

mod cost;
mod overlay;
mod params;
mod path;
mod search;

pub use cost::{AxisWeighted, CostFn, Euclidean};
pub use params::PathfinderParams;
pub use path::Path;
pub use search::Pathfinder;
