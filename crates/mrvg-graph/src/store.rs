use std::collections::BTreeMap;

use log::debug;
use mrvg_core::{segment_crosses_rect, segment_splits_seam, QuadrantMask, Rect};
use nalgebra::Point2;

use crate::quadtree::QuadTree;
use crate::{Obstacle, ObstacleError, ObstacleId, QuadTreeParams};

/// Live obstacles, indexed for occlusion queries.
#[derive(Debug)]
pub struct ObstacleStore {
    obstacles: BTreeMap<ObstacleId, Obstacle>,
    index: QuadTree,
    next_id: u64,
}

impl Default for ObstacleStore {
    fn default() -> Self {
        Self::new(QuadTreeParams::default())
    }
}

impl ObstacleStore {
    pub fn new(params: QuadTreeParams) -> Self {
        Self {
            obstacles: BTreeMap::new(),
            index: QuadTree::new(params),
            next_id: 0,
        }
    }

    pub fn add(&mut self, rect: Rect) -> Result<ObstacleId, ObstacleError> {
        Ok(self.insert(Obstacle::new(rect)?))
    }

    pub fn add_buffered(&mut self, rect: Rect, buffer: f64) -> Result<ObstacleId, ObstacleError> {
        Ok(self.insert(Obstacle::with_buffer(rect, buffer)?))
    }

    /// Store an already validated obstacle under a fresh handle.
    pub fn insert(&mut self, obstacle: Obstacle) -> ObstacleId {
        let id = ObstacleId::new(self.next_id);
        self.next_id += 1;
        let footprint = obstacle.footprint();
        self.index.insert(id, footprint);
        self.obstacles.insert(id, obstacle);
        debug!(
            "stored obstacle {id}: {footprint:?}; index holds {} under {:?}",
            self.index.len(),
            self.index.bounds()
        );
        id
    }

    pub fn remove(&mut self, id: ObstacleId) -> Result<Obstacle, ObstacleError> {
        let obstacle = self
            .obstacles
            .remove(&id)
            .ok_or(ObstacleError::NotFound(id))?;
        self.index.remove(id);
        debug!("dropped obstacle {id}");
        Ok(obstacle)
    }

    /// Forget every obstacle. Handles already issued stay retired.
    pub fn clear(&mut self) {
        self.obstacles = BTreeMap::new();
        self.index.clear();
    }

    pub fn get(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.get(&id)
    }

    pub fn contains(&self, id: ObstacleId) -> bool {
        self.obstacles.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Obstacles in handle (insertion) order.
    pub fn iter(&self) -> impl Iterator<Item = (ObstacleId, &Obstacle)> + '_ {
        self.obstacles.iter().map(|(id, o)| (*id, o))
    }

    /// Bounding box of all footprints.
    pub fn extent(&self) -> Option<Rect> {
        self.obstacles
            .values()
            .map(Obstacle::footprint)
            .reduce(|a, b| a.union(&b))
    }

    /// Obstacles whose closed footprint contains `p`.
    pub fn at_point(&self, p: Point2<f64>) -> Vec<ObstacleId> {
        let mut ids = self.index.at_point(p);
        ids.sort_unstable();
        ids
    }

    /// Obstacles whose closed footprint intersects `rect`.
    pub fn in_rect(&self, rect: &Rect) -> Vec<ObstacleId> {
        let mut ids = self.index.in_rect(rect);
        ids.sort_unstable();
        ids
    }

    /// Quadrants around `p` filled by the merged footprints.
    pub fn occupancy_at(&self, p: Point2<f64>) -> QuadrantMask {
        self.index
            .at_point(p)
            .into_iter()
            .filter_map(|id| self.obstacles.get(&id))
            .fold(QuadrantMask::EMPTY, |acc, o| {
                acc.union(QuadrantMask::of_rect_at(&o.footprint(), p))
            })
    }

    /// True if `p` lies strictly inside some footprint.
    pub fn is_buried(&self, p: Point2<f64>) -> bool {
        self.occupancy_at(p) == QuadrantMask::FULL
    }

    /// True if the segment passes through the interior of any footprint or
    /// squeezes between two that touch.
    pub fn segment_blocked(&self, a: Point2<f64>, b: Point2<f64>) -> bool {
        self.first_blocker(a, b, &[]).is_some()
    }

    /// Like [`Self::segment_blocked`], but an obstacle whose buffer zone
    /// holds one of the `relaxed` points only blocks with its core rectangle.
    pub fn segment_blocked_relaxed(
        &self,
        a: Point2<f64>,
        b: Point2<f64>,
        relaxed: &[Point2<f64>],
    ) -> bool {
        self.first_blocker(a, b, relaxed).is_some()
    }

    /// Some obstacle blocking the segment, if any.
    ///
    /// An obstacle blocks when the segment crosses its interior, or when it
    /// closes a seam along the segment together with an obstacle seen
    /// earlier.
    pub fn first_blocker(
        &self,
        a: Point2<f64>,
        b: Point2<f64>,
        relaxed: &[Point2<f64>],
    ) -> Option<ObstacleId> {
        let mut grazed: Vec<Rect> = Vec::new();
        let mut found = None;
        self.index.any_on_segment(a, b, |id| {
            let Some(rect) = self.obstacles.get(&id).map(|o| o.occluder(relaxed)) else {
                return false;
            };
            let blocked = segment_crosses_rect(a, b, &rect)
                || grazed
                    .iter()
                    .any(|other| segment_splits_seam(a, b, &rect, other));
            if blocked {
                found = Some(id);
            } else {
                grazed.push(rect);
            }
            blocked
        });
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_never_reused() {
        let mut store = ObstacleStore::default();
        let a = store.add(Rect::new(0.0, 0.0, 1.0, 1.0)).unwrap();
        store.remove(a).unwrap();
        let b = store.add(Rect::new(0.0, 0.0, 1.0, 1.0)).unwrap();
        store.clear();
        let c = store.add(Rect::new(0.0, 0.0, 1.0, 1.0)).unwrap();
        assert!(a < b && b < c);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_unknown_is_not_found() {
        let mut store = ObstacleStore::default();
        let a = store.add(Rect::new(0.0, 0.0, 1.0, 1.0)).unwrap();
        store.remove(a).unwrap();
        assert_eq!(store.remove(a), Err(ObstacleError::NotFound(a)));
    }

    #[test]
    fn failed_add_leaves_store_untouched() {
        let mut store = ObstacleStore::default();
        store.add(Rect::new(0.0, 0.0, 1.0, 1.0)).unwrap();
        assert!(store.add(Rect::new(3.0, 3.0, 3.0, 4.0)).is_err());
        assert!(store.add_buffered(Rect::new(3.0, 3.0, 4.0, 4.0), -1.0).is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn merged_footprints_fill_quadrants() {
        let mut store = ObstacleStore::default();
        store.add(Rect::new(0.0, 0.0, 1.0, 1.0)).unwrap();
        store.add(Rect::new(1.0, 0.0, 2.0, 1.0)).unwrap();

        // Shared top corner of two side-by-side boxes is a straight boundary.
        let shared = store.occupancy_at(Point2::new(1.0, 1.0));
        assert_eq!(shared.len(), 2);
        assert!(!shared.is_turning_point());

        assert!(store.occupancy_at(Point2::new(2.0, 1.0)).is_turning_point());
        assert!(store.is_buried(Point2::new(1.0, 0.5)));
        assert!(!store.is_buried(Point2::new(1.0, 1.0)));
    }

    #[test]
    fn blocking_ignores_grazing_segments() {
        let mut store = ObstacleStore::default();
        let wall = store.add(Rect::new(1.0, 2.0, 4.0, 5.0)).unwrap();

        assert_eq!(
            store.first_blocker(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0), &[]),
            Some(wall)
        );
        assert!(!store.segment_blocked(Point2::new(1.0, 0.0), Point2::new(1.0, 9.0)));
        assert!(!store.segment_blocked(Point2::new(0.0, 3.0), Point2::new(2.0, 1.0)));
    }

    #[test]
    fn touching_obstacles_block_their_seam() {
        let mut store = ObstacleStore::default();
        store.add(Rect::new(0.0, 1.0, 1.0, 3.0)).unwrap();
        let upper = store.add(Rect::new(0.0, 3.0, 1.0, 5.0)).unwrap();

        let along_seam = (Point2::new(-2.0, 3.0), Point2::new(3.0, 3.0));
        assert!(store.segment_blocked(along_seam.0, along_seam.1));
        assert!(store.first_blocker(along_seam.0, along_seam.1, &[]).is_some());
        // The outer face of the pair stays open.
        assert!(!store.segment_blocked(Point2::new(1.0, 0.0), Point2::new(1.0, 6.0)));

        store.remove(upper).unwrap();
        assert!(!store.segment_blocked(along_seam.0, along_seam.1));
    }

    #[test]
    fn relaxed_endpoint_escapes_buffer() {
        let mut store = ObstacleStore::default();
        store
            .add_buffered(Rect::new(0.0, 0.0, 2.0, 2.0), 1.0)
            .unwrap();
        let stuck = Point2::new(-0.5, 1.0);
        let away = Point2::new(-5.0, 1.0);

        assert!(store.segment_blocked(stuck, away));
        assert!(!store.segment_blocked_relaxed(stuck, away, &[stuck]));
        // Still cannot pass through the core rectangle.
        assert!(store.segment_blocked_relaxed(stuck, Point2::new(5.0, 1.0), &[stuck]));
    }
}
