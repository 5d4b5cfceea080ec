//! Incrementally maintained reduced visibility graph.

use std::collections::{BTreeSet, HashMap};

use log::{debug, trace, warn};
use mrvg_core::{clip_segment, Rect};
use nalgebra::Point2;
use serde::Serialize;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::node::NodeEntry;
use crate::{Edge, Node, NodeId, Obstacle, ObstacleId, ObstacleStore, VisibilityParams};

type PositionKey = (u64, u64);

/// Exact position key; `-0.0` and `0.0` map to the same node.
fn position_key(p: Point2<f64>) -> PositionKey {
    ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())
}

/// What one incremental update changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GraphDelta {
    pub nodes_created: usize,
    pub nodes_deleted: usize,
    pub nodes_activated: usize,
    pub nodes_deactivated: usize,
    pub edges_added: usize,
    pub edges_removed: usize,
}

/// Corner nodes of the obstacle silhouette and the sightlines between them.
///
/// Every obstacle corner is tracked as a node, but only corners that can be
/// turning points of a shortest path are *active*. Two active nodes are
/// joined iff the segment between them avoids every footprint interior (and,
/// with tangent pruning, is tangent to the silhouette at both ends).
#[derive(Debug, Default)]
pub struct VisibilityGraph {
    params: VisibilityParams,
    slots: Vec<Option<NodeEntry>>,
    free: Vec<usize>,
    by_position: HashMap<PositionKey, NodeId>,
    active_count: usize,
    edge_count: usize,
}

impl VisibilityGraph {
    pub fn new(params: VisibilityParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// Graph over every obstacle in `store`, inserted in handle order.
    pub fn from_store(params: VisibilityParams, store: &ObstacleStore) -> Self {
        let mut graph = Self::new(params);
        for (id, _) in store.iter() {
            graph.insert_obstacle(store, id);
        }
        graph
    }

    pub fn params(&self) -> &VisibilityParams {
        &self.params
    }

    /// Number of active nodes.
    pub fn node_count(&self) -> usize {
        self.active_count
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.active_count == 0
    }

    /// Upper bound on [`NodeId::index`], for callers keeping dense per-node
    /// arrays.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn entry(&self, id: NodeId) -> Option<&NodeEntry> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    fn entry_mut(&mut self, id: NodeId) -> Option<&mut NodeEntry> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn node(&self, id: NodeId) -> Option<Node<'_>> {
        self.entry(id).map(|entry| Node { id, entry })
    }

    pub fn node_at(&self, p: Point2<f64>) -> Option<NodeId> {
        self.by_position.get(&position_key(p)).copied()
    }

    pub fn position(&self, id: NodeId) -> Option<Point2<f64>> {
        self.entry(id).map(|e| e.position)
    }

    /// Every tracked corner, active or not.
    pub fn corners(&self) -> impl Iterator<Item = Node<'_>> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| {
                slot.as_ref().map(|entry| Node {
                    id: NodeId::from_index(idx),
                    entry,
                })
            })
    }

    /// Active nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = Node<'_>> + '_ {
        self.corners().filter(|n| n.is_active())
    }

    /// Each undirected edge once, `a < b`.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.nodes().flat_map(|node| {
            let a = node.id();
            node.neighbors()
                .filter(move |(b, _)| a < *b)
                .map(move |(b, weight)| Edge { a, b, weight })
        })
    }

    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.entry(id)
            .into_iter()
            .flat_map(|e| e.edges.iter().map(|(n, w)| (*n, *w)))
    }

    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.entry(a).is_some_and(|e| e.edges.contains_key(&b))
    }

    /// Whether a segment from node `id` toward `toward` may be used as a
    /// path leg turning at the node.
    ///
    /// Always true without tangent pruning. With pruning, legs whose line
    /// would cut into the silhouette at the node are refused.
    pub fn admits(&self, id: NodeId, toward: Point2<f64>) -> bool {
        self.entry(id).is_some_and(|e| self.tangent_ok(e, toward))
    }

    fn tangent_ok(&self, entry: &NodeEntry, toward: Point2<f64>) -> bool {
        !self.params.tangent_pruning || !entry.occupancy.line_enters(toward - entry.position)
    }

    /// Edge rule between two active nodes against the current obstacles.
    pub fn can_link(&self, store: &ObstacleStore, a: NodeId, b: NodeId) -> bool {
        let (Some(ea), Some(eb)) = (self.entry(a), self.entry(b)) else {
            return false;
        };
        a != b
            && ea.active
            && eb.active
            && self.tangent_ok(ea, eb.position)
            && self.tangent_ok(eb, ea.position)
            && !store.segment_blocked(ea.position, eb.position)
    }

    fn active_ids(&self) -> Vec<NodeId> {
        self.nodes().map(|n| n.id()).collect()
    }

    /// Tracked corners inside the closed rectangle.
    fn corners_in(&self, rect: &Rect) -> Vec<NodeId> {
        self.corners()
            .filter(|n| rect.contains(n.position()))
            .map(|n| n.id())
            .collect()
    }

    fn node_for(&mut self, p: Point2<f64>, delta: &mut GraphDelta) -> NodeId {
        if let Some(id) = self.node_at(p) {
            return id;
        }
        let entry = NodeEntry::new(p);
        let id = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(entry);
                NodeId::from_index(idx)
            }
            None => {
                self.slots.push(Some(entry));
                NodeId::from_index(self.slots.len() - 1)
            }
        };
        self.by_position.insert(position_key(p), id);
        delta.nodes_created += 1;
        id
    }

    fn delete_node(&mut self, id: NodeId, delta: &mut GraphDelta) {
        self.isolate(id, delta);
        let Some(entry) = self.slots.get_mut(id.index()).and_then(Option::take) else {
            return;
        };
        if entry.active {
            self.active_count -= 1;
        }
        self.by_position.remove(&position_key(entry.position));
        self.free.push(id.index());
        delta.nodes_deleted += 1;
        trace!("deleted node {id} at ({}, {})", entry.position.x, entry.position.y);
    }

    fn connect(&mut self, a: NodeId, b: NodeId, delta: &mut GraphDelta) {
        let (Some(pa), Some(pb)) = (self.position(a), self.position(b)) else {
            return;
        };
        let weight = (pb - pa).norm();
        let fresh = self
            .entry_mut(a)
            .is_some_and(|e| e.edges.insert(b, weight).is_none());
        if let Some(e) = self.entry_mut(b) {
            e.edges.insert(a, weight);
        }
        if fresh {
            self.edge_count += 1;
            delta.edges_added += 1;
            trace!("edge {a} <-> {b} ({weight:.3})");
        }
    }

    fn disconnect(&mut self, a: NodeId, b: NodeId, delta: &mut GraphDelta) {
        let existed = self
            .entry_mut(a)
            .is_some_and(|e| e.edges.remove(&b).is_some());
        if let Some(e) = self.entry_mut(b) {
            e.edges.remove(&a);
        }
        if existed {
            self.edge_count -= 1;
            delta.edges_removed += 1;
        }
    }

    fn isolate(&mut self, id: NodeId, delta: &mut GraphDelta) {
        let neighbors: Vec<NodeId> = self.neighbors(id).map(|(n, _)| n).collect();
        for n in neighbors {
            self.disconnect(id, n, delta);
        }
    }

    /// Recompute occupancy and activity of a node. Returns true if either
    /// changed, in which case the node's edges must be recomputed.
    fn refresh(&mut self, store: &ObstacleStore, id: NodeId, delta: &mut GraphDelta) -> bool {
        let Some(position) = self.position(id) else {
            return false;
        };
        let occupancy = store.occupancy_at(position);
        let active = occupancy.is_turning_point();
        let Some(entry) = self.entry_mut(id) else {
            return false;
        };
        let was_active = entry.active;
        if entry.occupancy == occupancy && was_active == active {
            return false;
        }
        entry.occupancy = occupancy;
        entry.active = active;

        match (was_active, active) {
            (true, false) => {
                self.isolate(id, delta);
                self.active_count -= 1;
                delta.nodes_deactivated += 1;
            }
            (false, true) => {
                self.active_count += 1;
                delta.nodes_activated += 1;
            }
            _ => {}
        }
        true
    }

    /// Drop and recompute every edge of the `dirty` nodes.
    fn relink(&mut self, store: &ObstacleStore, dirty: &BTreeSet<NodeId>, delta: &mut GraphDelta) {
        for &id in dirty {
            self.isolate(id, delta);
        }
        let active = self.active_ids();
        for &a in dirty {
            if !self.entry(a).is_some_and(|e| e.active) {
                continue;
            }
            for &b in &active {
                // Dirty pairs are handled from their smaller end.
                if a == b || (b < a && dirty.contains(&b)) {
                    continue;
                }
                if self.can_link(store, a, b) {
                    self.connect(a, b, delta);
                }
            }
        }
    }

    /// Cut edges that a new `footprint` blocks, through its interior or by
    /// closing a seam with a neighbour.
    fn cut_through(&mut self, store: &ObstacleStore, footprint: &Rect, delta: &mut GraphDelta) {
        let doomed: Vec<(NodeId, NodeId)> = self
            .edges()
            .filter(|e| match (self.position(e.a), self.position(e.b)) {
                (Some(pa), Some(pb)) => {
                    clip_segment(pa, pb, footprint).is_some() && store.segment_blocked(pa, pb)
                }
                _ => false,
            })
            .map(|e| (e.a, e.b))
            .collect();
        for (a, b) in doomed {
            trace!("edge {a} <-> {b} now blocked");
            self.disconnect(a, b, delta);
        }
    }

    /// Re-test unlinked pairs of settled nodes whose segment shares a stretch
    /// of positive length with a vanished `footprint`, inside or along its
    /// boundary.
    fn restore_through(
        &mut self,
        store: &ObstacleStore,
        footprint: &Rect,
        dirty: &BTreeSet<NodeId>,
        delta: &mut GraphDelta,
    ) {
        let settled: Vec<(NodeId, Point2<f64>)> = self
            .nodes()
            .filter(|n| !dirty.contains(&n.id()))
            .map(|n| (n.id(), n.position()))
            .collect();

        for (i, &(a, pa)) in settled.iter().enumerate() {
            for &(b, pb) in &settled[i + 1..] {
                if !Rect::segment_bounds(pa, pb).intersects(footprint)
                    || self.has_edge(a, b)
                    || !clip_segment(pa, pb, footprint).is_some_and(|(t0, t1)| t1 > t0)
                {
                    continue;
                }
                if self.can_link(store, a, b) {
                    self.connect(a, b, delta);
                }
            }
        }
    }

    /// Fold obstacle `id`, already present in `store`, into the graph.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, store), fields(obstacle = %id))
    )]
    pub fn insert_obstacle(&mut self, store: &ObstacleStore, id: ObstacleId) -> GraphDelta {
        let mut delta = GraphDelta::default();
        let Some(obstacle) = store.get(id) else {
            warn!("insert of obstacle {id} not present in the store ignored");
            return delta;
        };
        let footprint = obstacle.footprint();

        let mut touched: BTreeSet<NodeId> = self.corners_in(&footprint).into_iter().collect();
        for (_, corner) in footprint.corners() {
            let node = self.node_for(corner, &mut delta);
            if let Some(entry) = self.entry_mut(node) {
                if !entry.owners.contains(&id) {
                    entry.owners.push(id);
                }
            }
            touched.insert(node);
        }

        let mut dirty = BTreeSet::new();
        for node in touched {
            if self.refresh(store, node, &mut delta) {
                dirty.insert(node);
            }
        }

        self.cut_through(store, &footprint, &mut delta);
        self.relink(store, &dirty, &mut delta);

        debug!(
            "inserted obstacle {id}: {} nodes, {} edges ({delta:?})",
            self.active_count, self.edge_count
        );
        delta
    }

    /// Take obstacle `id` out of the graph.
    ///
    /// `store` must no longer contain `id`; `removed` is the obstacle it
    /// held.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, store, removed), fields(obstacle = %id))
    )]
    pub fn remove_obstacle(
        &mut self,
        store: &ObstacleStore,
        id: ObstacleId,
        removed: &Obstacle,
    ) -> GraphDelta {
        let mut delta = GraphDelta::default();
        if store.contains(id) {
            warn!("obstacle {id} is still stored; removal ignored");
            return delta;
        }
        let footprint = removed.footprint();

        let mut dirty = BTreeSet::new();
        for node in self.corners_in(&footprint) {
            let orphaned = match self.entry_mut(node) {
                Some(entry) => {
                    entry.owners.retain(|o| *o != id);
                    entry.owners.is_empty()
                }
                None => continue,
            };
            if orphaned {
                self.delete_node(node, &mut delta);
            } else if self.refresh(store, node, &mut delta) {
                dirty.insert(node);
            }
        }

        self.restore_through(store, &footprint, &dirty, &mut delta);
        self.relink(store, &dirty, &mut delta);

        debug!(
            "removed obstacle {id}: {} nodes, {} edges ({delta:?})",
            self.active_count, self.edge_count
        );
        delta
    }

    /// Drop every node and edge.
    pub fn clear(&mut self) {
        let params = std::mem::take(&mut self.params);
        *self = Self::new(params);
    }
}
