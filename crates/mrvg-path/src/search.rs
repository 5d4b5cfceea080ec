use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::{debug, warn};
use mrvg_graph::{ObstacleStore, VisibilityGraph};
use nalgebra::Point2;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::overlay::QueryOverlay;
use crate::{CostFn, Euclidean, Path, PathfinderParams};

/// Priority queue entry.
#[derive(Clone, Copy, Debug)]
struct Frontier {
    /// Cost so far plus heuristic.
    priority: f64,
    cost: f64,
    node: usize,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap; index breaks ties deterministically.
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest-path queries against a borrowed graph.
///
/// Holds only shared borrows, so it is cheap to create per query and safe
/// to use from several threads at once.
#[derive(Clone, Copy, Debug)]
pub struct Pathfinder<'a> {
    graph: &'a VisibilityGraph,
    store: &'a ObstacleStore,
    params: PathfinderParams,
}

impl<'a> Pathfinder<'a> {
    pub fn new(graph: &'a VisibilityGraph, store: &'a ObstacleStore) -> Self {
        Self {
            graph,
            store,
            params: PathfinderParams::default(),
        }
    }

    pub fn with_params(mut self, params: PathfinderParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &PathfinderParams {
        &self.params
    }

    /// Shortest Euclidean path from `start` to `goal`.
    pub fn find(&self, start: Point2<f64>, goal: Point2<f64>) -> Option<Path> {
        self.find_with(start, goal, &Euclidean)
    }

    /// Cheapest path under `cost`, or `None` if the goal is unreachable or
    /// the expansion limit ran out first.
    ///
    /// `cost` is evaluated once per directed edge the search relaxes and
    /// must be non-negative.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, cost), fields(nodes = self.graph.node_count()))
    )]
    pub fn find_with<C>(
        &self,
        start: Point2<f64>,
        goal: Point2<f64>,
        cost: &C,
    ) -> Option<Path>
    where
        C: CostFn + ?Sized,
    {
        let finite = |q: Point2<f64>| q.x.is_finite() && q.y.is_finite();
        if !finite(start) || !finite(goal) {
            warn!("path query with non-finite endpoint ignored");
            return None;
        }
        if start == goal {
            return Some(Path {
                points: vec![start],
                cost: 0.0,
            });
        }

        let overlay = QueryOverlay::new(self.graph, self.store, start, goal);
        let path = self.search(&overlay, cost);
        match &path {
            Some(p) => debug!(
                "path ({}, {}) -> ({}, {}): {} points, cost {:.3}",
                start.x,
                start.y,
                goal.x,
                goal.y,
                p.points.len(),
                p.cost
            ),
            None => debug!(
                "no path ({}, {}) -> ({}, {})",
                start.x, start.y, goal.x, goal.y
            ),
        }
        path
    }

    fn search<C>(&self, overlay: &QueryOverlay<'_>, cost: &C) -> Option<Path>
    where
        C: CostFn + ?Sized,
    {
        let n = overlay.len();
        let start = overlay.start();
        let goal = overlay.goal();
        let goal_pos = overlay.position(goal)?;

        let scale = if self.params.use_heuristic {
            cost.euclidean_lower_bound().filter(|k| *k > 0.0 && k.is_finite())
        } else {
            None
        };
        let heuristic =
            |p: Point2<f64>| scale.map_or(0.0, |k| k * nalgebra::distance(&p, &goal_pos));

        let mut dist = vec![f64::INFINITY; n];
        let mut prev: Vec<Option<usize>> = vec![None; n];
        let mut closed = vec![false; n];
        let mut successors = Vec::new();
        let mut expansions = 0usize;
        let mut warned_negative = false;

        dist[start] = 0.0;
        let mut heap = BinaryHeap::new();
        heap.push(Frontier {
            priority: heuristic(overlay.position(start)?),
            cost: 0.0,
            node: start,
        });

        while let Some(Frontier { cost: so_far, node, .. }) = heap.pop() {
            if closed[node] || so_far > dist[node] {
                continue;
            }
            closed[node] = true;

            if node == goal {
                return Some(Path {
                    points: reconstruct(overlay, &prev, start, goal)?,
                    cost: so_far,
                });
            }

            expansions += 1;
            if self.params.max_expansions.is_some_and(|max| expansions > max) {
                debug!("search gave up after {} expansions", expansions - 1);
                return None;
            }

            let here = overlay.position(node)?;
            overlay.successors(node, &mut successors);
            for &next in &successors {
                if closed[next] {
                    continue;
                }
                let Some(there) = overlay.position(next) else {
                    continue;
                };
                let step = cost.cost(here, there);
                if step < 0.0 && !warned_negative {
                    warn!("negative edge cost {step}; result may not be minimal");
                    warned_negative = true;
                }
                let candidate = so_far + step;
                if candidate < dist[next] {
                    dist[next] = candidate;
                    prev[next] = Some(node);
                    heap.push(Frontier {
                        priority: candidate + heuristic(there),
                        cost: candidate,
                        node: next,
                    });
                }
            }
        }

        None
    }
}

fn reconstruct(
    overlay: &QueryOverlay<'_>,
    prev: &[Option<usize>],
    start: usize,
    goal: usize,
) -> Option<Vec<Point2<f64>>> {
    let mut points = Vec::new();
    let mut current = goal;
    while current != start {
        points.push(overlay.position(current)?);
        current = prev[current]?;
    }
    points.push(overlay.position(start)?);
    points.reverse();
    Some(points)
}
