//! Obstacle bookkeeping and an incrementally maintained visibility graph.
//!
//! The [`ObstacleStore`] owns live obstacles and answers occlusion queries
//! through a growable quad tree. The [`VisibilityGraph`] owns the useful
//! obstacle corners and the sightlines between them, and is patched one
//! obstacle at a time:
//!
//! 1. Insertion re-evaluates the nodes the new footprint touches, adds its
//!    corners, cuts existing edges that now pass through it and links every
//!    node whose state changed against all active nodes.
//! 2. Removal drops the corners only that obstacle owned, restores edges that
//!    only it was blocking and relinks nodes whose state changed.
//!
//! Neither operation rebuilds the graph. Both leave it equal to what a fresh
//! build over the same obstacles would produce (node ids aside).
//!
//! ```
//! use mrvg_core::Rect;
//! use mrvg_graph::{ObstacleStore, VisibilityGraph, VisibilityParams};
//!
//! let params = VisibilityParams::default();
//! let mut store = ObstacleStore::new(params.quadtree);
//! let mut graph = VisibilityGraph::new(params);
//!
//! let id = store.add(Rect::new(0.0, 0.0, 1.0, 1.0)).unwrap();
//! graph.insert_obstacle(&store, id);
//! assert_eq!(graph.node_count(), 4);
//! assert_eq!(graph.edge_count(), 4);
//! ```

mod error;
mod node;
mod obstacle;
mod params;
mod quadtree;
mod store;
mod visibility;

pub use error::ObstacleError;
pub use node::{Edge, Node, NodeId};
pub use obstacle::{Obstacle, ObstacleId};
pub use params::{QuadTreeParams, VisibilityParams};
pub use store::ObstacleStore;
pub use visibility::{GraphDelta, VisibilityGraph};
