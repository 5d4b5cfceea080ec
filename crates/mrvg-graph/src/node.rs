use std::collections::BTreeMap;
use std::fmt;

use mrvg_core::QuadrantMask;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::ObstacleId;

/// Stable index of a graph node.
///
/// Valid until the node is deleted; the slot may then be recycled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Id for a dense index. Lookups with an index that holds no node
    /// return `None`.
    pub fn from_index(idx: usize) -> Self {
        Self(idx as u32)
    }

    /// Dense index, below [`crate::VisibilityGraph::slot_count`].
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct NodeEntry {
    pub position: Point2<f64>,
    /// Obstacles contributing this corner. Coincident corners share a node.
    pub owners: Vec<ObstacleId>,
    pub occupancy: QuadrantMask,
    pub active: bool,
    pub edges: BTreeMap<NodeId, f64>,
}

impl NodeEntry {
    pub fn new(position: Point2<f64>) -> Self {
        Self {
            position,
            owners: Vec::new(),
            occupancy: QuadrantMask::EMPTY,
            active: false,
            edges: BTreeMap::new(),
        }
    }
}

/// Borrowed view of a node.
#[derive(Clone, Copy, Debug)]
pub struct Node<'a> {
    pub(crate) id: NodeId,
    pub(crate) entry: &'a NodeEntry,
}

impl<'a> Node<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn position(&self) -> Point2<f64> {
        self.entry.position
    }

    pub fn owners(&self) -> &'a [ObstacleId] {
        &self.entry.owners
    }

    /// Quadrants filled by obstacles around the node.
    pub fn occupancy(&self) -> QuadrantMask {
        self.entry.occupancy
    }

    /// Inactive nodes are corners that are reflex, buried or lie on a
    /// straight boundary of the merged silhouette. They carry no edges.
    pub fn is_active(&self) -> bool {
        self.entry.active
    }

    pub fn degree(&self) -> usize {
        self.entry.edges.len()
    }

    pub fn neighbors(&self) -> impl Iterator<Item = (NodeId, f64)> + 'a {
        self.entry.edges.iter().map(|(id, w)| (*id, *w))
    }
}

/// Undirected edge, reported with `a < b`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct Edge {
    pub a: NodeId,
    pub b: NodeId,
    /// Euclidean length.
    pub weight: f64,
}
