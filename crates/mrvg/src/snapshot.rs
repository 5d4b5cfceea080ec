//! Plain-data view of a graph for visualizers and debug dumps.

use mrvg_core::Rect;
use mrvg_graph::{Edge, NodeId, ObstacleId};
use mrvg_path::Path;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::Graph;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ObstacleView {
    pub id: ObstacleId,
    pub rect: Rect,
    pub buffer: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct NodeView {
    pub id: NodeId,
    pub position: Point2<f64>,
    pub owners: Vec<ObstacleId>,
}

/// Everything needed to draw the scene.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct GraphSnapshot {
    pub obstacles: Vec<ObstacleView>,
    /// Active nodes.
    pub nodes: Vec<NodeView>,
    /// Corners that are tracked but cannot be turning points.
    pub pruned: Vec<Point2<f64>>,
    pub edges: Vec<Edge>,
    pub path: Option<Path>,
}

impl GraphSnapshot {
    pub(crate) fn capture(graph: &Graph) -> Self {
        let visibility = graph.visibility();
        Self {
            obstacles: graph
                .obstacles()
                .map(|(id, o)| ObstacleView {
                    id,
                    rect: o.rect(),
                    buffer: o.buffer(),
                })
                .collect(),
            nodes: visibility
                .nodes()
                .map(|n| NodeView {
                    id: n.id(),
                    position: n.position(),
                    owners: n.owners().to_vec(),
                })
                .collect(),
            pruned: visibility
                .corners()
                .filter(|n| !n.is_active())
                .map(|n| n.position())
                .collect(),
            edges: visibility.edges().collect(),
            path: graph.last_path().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Graph;
    use nalgebra::Point2;

    #[test]
    fn snapshot_lists_scene_and_last_path() {
        let mut graph = Graph::default();
        graph.add_obstacle(0.0, 0.0, 1.0, 1.0).unwrap();
        graph.add_obstacle(1.0, 0.0, 2.0, 1.0).unwrap();
        graph.find(Point2::new(-1.0, 0.5), Point2::new(3.0, 0.5));

        let snap = graph.snapshot();
        assert_eq!(snap.obstacles.len(), 2);
        assert_eq!(snap.nodes.len(), 4);
        assert_eq!(snap.pruned.len(), 2);
        assert_eq!(snap.edges.len(), 4);
        assert!(snap.path.is_some());

        let json = serde_json::to_string(&snap).unwrap();
        let back: crate::GraphSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
