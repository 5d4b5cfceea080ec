use log::debug;
use mrvg_core::Rect;
use mrvg_graph::{Edge, Node, Obstacle, ObstacleError, ObstacleId, ObstacleStore, VisibilityGraph};
use mrvg_path::{CostFn, Path, Pathfinder};
use nalgebra::Point2;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{GraphParams, GraphSnapshot};

/// Errors produced by [`Graph`] mutations.
///
/// A failed call leaves the graph exactly as it was.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error(transparent)]
    Obstacle(#[from] ObstacleError),
}

/// Obstacles, their visibility graph and the last path found.
///
/// Mutations need `&mut self`. For concurrent read-only queries take a
/// [`Pathfinder`] from [`Graph::pathfinder`] and share it across threads.
#[derive(Debug)]
pub struct Graph {
    params: GraphParams,
    obstacles: ObstacleStore,
    visibility: VisibilityGraph,
    last_path: Option<Path>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new(GraphParams::default())
    }
}

impl Graph {
    pub fn new(params: GraphParams) -> Self {
        Self {
            obstacles: ObstacleStore::new(params.visibility.quadtree),
            visibility: VisibilityGraph::new(params.visibility.clone()),
            params,
            last_path: None,
        }
    }

    pub fn params(&self) -> &GraphParams {
        &self.params
    }

    /// Add the rectangle spanned by two opposite corners, given in any
    /// order.
    pub fn add_obstacle(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    ) -> Result<ObstacleId, GraphError> {
        self.add_obstacle_rect(Rect::new(x1, y1, x2, y2))
    }

    pub fn add_obstacle_rect(&mut self, rect: Rect) -> Result<ObstacleId, GraphError> {
        let obstacle = Obstacle::new(rect)?;
        Ok(self.insert(obstacle))
    }

    /// Add an obstacle whose footprint is inflated by a clearance `buffer`.
    pub fn add_buffered(&mut self, rect: Rect, buffer: f64) -> Result<ObstacleId, GraphError> {
        let obstacle = Obstacle::with_buffer(rect, buffer)?;
        Ok(self.insert(obstacle))
    }

    /// Add several obstacles. Either all are added or, if any is invalid,
    /// none is.
    pub fn extend<I>(&mut self, rects: I) -> Result<Vec<ObstacleId>, GraphError>
    where
        I: IntoIterator<Item = Rect>,
    {
        let obstacles = rects
            .into_iter()
            .map(Obstacle::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(obstacles.into_iter().map(|o| self.insert(o)).collect())
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self), fields(obstacles = self.obstacles.len()))
    )]
    fn insert(&mut self, obstacle: Obstacle) -> ObstacleId {
        let id = self.obstacles.insert(obstacle);
        self.visibility.insert_obstacle(&self.obstacles, id);
        id
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self), fields(obstacle = %id))
    )]
    pub fn remove_obstacle(&mut self, id: ObstacleId) -> Result<Obstacle, GraphError> {
        let obstacle = self.obstacles.remove(id)?;
        self.visibility.remove_obstacle(&self.obstacles, id, &obstacle);
        Ok(obstacle)
    }

    /// Drop every obstacle, node, edge and the last path in one go.
    pub fn clear(&mut self) {
        debug!("clearing {} obstacles", self.obstacles.len());
        self.obstacles.clear();
        self.visibility.clear();
        self.last_path = None;
    }

    /// Read-only query handle using the configured search parameters.
    pub fn pathfinder(&self) -> Pathfinder<'_> {
        Pathfinder::new(&self.visibility, &self.obstacles).with_params(self.params.pathfinder)
    }

    /// Shortest Euclidean path, remembered as the last path.
    pub fn find(&mut self, start: Point2<f64>, goal: Point2<f64>) -> Option<Path> {
        let path = self.pathfinder().find(start, goal);
        self.last_path.clone_from(&path);
        path
    }

    /// Cheapest path under `cost`, remembered as the last path.
    pub fn find_with<C>(
        &mut self,
        start: Point2<f64>,
        goal: Point2<f64>,
        cost: &C,
    ) -> Option<Path>
    where
        C: CostFn + ?Sized,
    {
        let path = self.pathfinder().find_with(start, goal, cost);
        self.last_path.clone_from(&path);
        path
    }

    pub fn last_path(&self) -> Option<&Path> {
        self.last_path.as_ref()
    }

    pub fn obstacle(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.get(id)
    }

    /// Live obstacles in insertion order.
    pub fn obstacles(&self) -> impl Iterator<Item = (ObstacleId, &Obstacle)> + '_ {
        self.obstacles.iter()
    }

    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    pub fn obstacle_store(&self) -> &ObstacleStore {
        &self.obstacles
    }

    pub fn visibility(&self) -> &VisibilityGraph {
        &self.visibility
    }

    /// Active nodes.
    pub fn nodes(&self) -> impl Iterator<Item = Node<'_>> + '_ {
        self.visibility.nodes()
    }

    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.visibility.edges()
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot::capture(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn failed_add_changes_nothing() {
        let mut graph = Graph::default();
        graph.add_obstacle(0.0, 0.0, 1.0, 1.0).unwrap();
        let edges: Vec<_> = graph.edges().collect();

        let err = graph.add_obstacle(2.0, 2.0, 5.0, 2.0).unwrap_err();
        assert!(matches!(
            err,
            GraphError::Obstacle(ObstacleError::InvalidGeometry { .. })
        ));
        assert_eq!(graph.obstacle_count(), 1);
        assert_eq!(graph.edges().collect::<Vec<_>>(), edges);
    }

    #[test]
    fn extend_is_all_or_nothing() {
        let mut graph = Graph::default();
        let err = graph.extend([
            Rect::new(0.0, 0.0, 1.0, 1.0),
            Rect::new(3.0, 3.0, 3.0, 3.0),
        ]);
        assert!(err.is_err());
        assert_eq!(graph.obstacle_count(), 0);

        let ids = graph
            .extend([Rect::new(0.0, 0.0, 1.0, 1.0), Rect::new(3.0, 3.0, 4.0, 4.0)])
            .unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(graph.nodes().count(), 8);
    }

    #[test]
    fn last_path_tracks_latest_query() {
        let mut graph = Graph::default();
        graph.add_obstacle(1.0, -1.0, 2.0, 1.0).unwrap();
        assert!(graph.last_path().is_none());

        let path = graph
            .find(Point2::new(0.0, 0.0), Point2::new(3.0, 0.0))
            .unwrap();
        assert_relative_eq!(graph.last_path().unwrap().cost, path.cost);

        graph.clear();
        assert!(graph.last_path().is_none());
        assert_eq!(graph.nodes().count(), 0);
    }

    #[test]
    fn remove_unknown_is_not_found() {
        let mut graph = Graph::default();
        let id = graph.add_obstacle(0.0, 0.0, 1.0, 1.0).unwrap();
        graph.remove_obstacle(id).unwrap();
        assert_eq!(
            graph.remove_obstacle(id).unwrap_err(),
            GraphError::Obstacle(ObstacleError::NotFound(id))
        );
    }
}
