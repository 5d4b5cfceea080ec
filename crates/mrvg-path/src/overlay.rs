//! Per-query start and goal nodes layered over the persistent graph.

use mrvg_graph::{NodeId, ObstacleStore, VisibilityGraph};
use nalgebra::Point2;

/// Dense search index: graph nodes keep their slot index, the start and
/// goal sit right after the last slot.
pub(crate) struct QueryOverlay<'a> {
    graph: &'a VisibilityGraph,
    start: Point2<f64>,
    goal: Point2<f64>,
    slots: usize,
    from_start: Vec<usize>,
    to_goal: Vec<bool>,
    direct: bool,
}

impl<'a> QueryOverlay<'a> {
    pub fn new(
        graph: &'a VisibilityGraph,
        store: &ObstacleStore,
        start: Point2<f64>,
        goal: Point2<f64>,
    ) -> Self {
        let slots = graph.slot_count();
        let mut from_start = Vec::new();
        let mut to_goal = vec![false; slots];

        for node in graph.nodes() {
            let p = node.position();
            let id = node.id();
            if graph.admits(id, start) && !store.segment_blocked_relaxed(start, p, &[start]) {
                from_start.push(id.index());
            }
            if graph.admits(id, goal) && !store.segment_blocked_relaxed(p, goal, &[goal]) {
                to_goal[id.index()] = true;
            }
        }
        let direct = !store.segment_blocked_relaxed(start, goal, &[start, goal]);

        Self {
            graph,
            start,
            goal,
            slots,
            from_start,
            to_goal,
            direct,
        }
    }

    pub fn len(&self) -> usize {
        self.slots + 2
    }

    pub fn start(&self) -> usize {
        self.slots
    }

    pub fn goal(&self) -> usize {
        self.slots + 1
    }

    pub fn position(&self, idx: usize) -> Option<Point2<f64>> {
        if idx == self.start() {
            Some(self.start)
        } else if idx == self.goal() {
            Some(self.goal)
        } else {
            self.graph.position(NodeId::from_index(idx))
        }
    }

    /// Replace `out` with the successors of `idx`.
    pub fn successors(&self, idx: usize, out: &mut Vec<usize>) {
        out.clear();
        if idx == self.start() {
            out.extend_from_slice(&self.from_start);
            if self.direct {
                out.push(self.goal());
            }
        } else if idx < self.slots {
            out.extend(
                self.graph
                    .neighbors(NodeId::from_index(idx))
                    .map(|(n, _)| n.index()),
            );
            if self.to_goal[idx] {
                out.push(self.goal());
            }
        }
    }
}
