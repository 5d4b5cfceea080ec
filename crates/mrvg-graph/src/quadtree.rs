//! Growable region quad tree over obstacle footprints.
//!
//! Each item lives in the smallest cell that fully contains it. The root
//! doubles toward items that fall outside it, and cells left without items
//! or children are pruned on removal, so the tree follows the scene instead
//! of a fixed world box.

use std::collections::HashMap;

use mrvg_core::{clip_segment, Quadrant, Rect};
use nalgebra::Point2;

use crate::{ObstacleId, QuadTreeParams};

#[derive(Debug)]
struct Cell {
    bounds: Rect,
    parent: Option<usize>,
    children: [Option<usize>; 4],
    items: Vec<(ObstacleId, Rect)>,
}

impl Cell {
    fn new(bounds: Rect, parent: Option<usize>) -> Self {
        Self {
            bounds,
            parent,
            children: [None; 4],
            items: Vec::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty() && self.children.iter().all(Option::is_none)
    }
}

fn slot(q: Quadrant) -> usize {
    match q {
        Quadrant::PosPos => 0,
        Quadrant::NegPos => 1,
        Quadrant::NegNeg => 2,
        Quadrant::PosNeg => 3,
    }
}

fn child_bounds(bounds: &Rect, q: Quadrant) -> Rect {
    let c = bounds.center();
    let (sx, sy) = q.signs();
    let x = if sx > 0.0 { bounds.max.x } else { bounds.min.x };
    let y = if sy > 0.0 { bounds.max.y } else { bounds.min.y };
    Rect::new(c.x, c.y, x, y)
}

/// Child quadrant of `bounds` that fully contains `rect`, if any.
fn child_quadrant(bounds: &Rect, rect: &Rect) -> Option<Quadrant> {
    let c = bounds.center();
    let right = if rect.min.x >= c.x {
        true
    } else if rect.max.x <= c.x {
        false
    } else {
        return None;
    };
    let above = if rect.min.y >= c.y {
        true
    } else if rect.max.y <= c.y {
        false
    } else {
        return None;
    };
    Some(match (right, above) {
        (true, true) => Quadrant::PosPos,
        (false, true) => Quadrant::NegPos,
        (false, false) => Quadrant::NegNeg,
        (true, false) => Quadrant::PosNeg,
    })
}

#[derive(Debug)]
pub(crate) struct QuadTree {
    params: QuadTreeParams,
    cells: Vec<Cell>,
    free: Vec<usize>,
    root: Option<usize>,
    homes: HashMap<ObstacleId, usize>,
}

impl QuadTree {
    pub fn new(params: QuadTreeParams) -> Self {
        Self {
            params,
            cells: Vec::new(),
            free: Vec::new(),
            root: None,
            homes: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.homes.len()
    }

    /// Bounds of the root cell, if the tree holds anything.
    pub fn bounds(&self) -> Option<Rect> {
        self.root.map(|r| self.cells[r].bounds)
    }

    fn min_cell_size(&self) -> f64 {
        if self.params.min_cell_size.is_finite() && self.params.min_cell_size > 0.0 {
            self.params.min_cell_size
        } else {
            QuadTreeParams::default().min_cell_size
        }
    }

    fn alloc(&mut self, cell: Cell) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.cells[idx] = cell;
                idx
            }
            None => {
                self.cells.push(cell);
                self.cells.len() - 1
            }
        }
    }

    fn release(&mut self, idx: usize) {
        self.cells[idx].items.clear();
        self.cells[idx].children = [None; 4];
        self.cells[idx].parent = None;
        self.free.push(idx);
    }

    /// Root cell, grown until it covers `rect`.
    fn root_covering(&mut self, rect: &Rect) -> usize {
        let mut root = match self.root {
            Some(root) => root,
            None => {
                let side = rect.width().max(rect.height()).max(self.min_cell_size());
                let root = self.alloc(Cell::new(Rect::square(rect.center(), side * 0.5), None));
                self.root = Some(root);
                root
            }
        };

        while !self.cells[root].bounds.contains_rect(rect) {
            let old = self.cells[root].bounds;
            let side = old.width();
            let grow_left = rect.min.x < old.min.x;
            let grow_down = rect.min.y < old.min.y;
            let dx = if grow_left { -side } else { side };
            let dy = if grow_down { -side } else { side };
            let shifted = Rect::new(old.min.x + dx, old.min.y + dy, old.max.x + dx, old.max.y + dy);

            // The old root sits on the side away from the growth direction.
            let q = match (grow_left, grow_down) {
                (true, true) => Quadrant::PosPos,
                (false, true) => Quadrant::NegPos,
                (false, false) => Quadrant::NegNeg,
                (true, false) => Quadrant::PosNeg,
            };

            let mut grown = Cell::new(old.union(&shifted), None);
            grown.children[slot(q)] = Some(root);
            let new_root = self.alloc(grown);
            self.cells[root].parent = Some(new_root);
            root = new_root;
        }

        self.root = Some(root);
        root
    }

    pub fn insert(&mut self, id: ObstacleId, rect: Rect) {
        if self.homes.contains_key(&id) {
            self.remove(id);
        }

        let mut cell = self.root_covering(&rect);
        let min_size = self.min_cell_size();
        loop {
            let bounds = self.cells[cell].bounds;
            if bounds.width() * 0.5 < min_size {
                break;
            }
            let Some(q) = child_quadrant(&bounds, &rect) else {
                break;
            };
            cell = match self.cells[cell].children[slot(q)] {
                Some(child) => child,
                None => {
                    let child = self.alloc(Cell::new(child_bounds(&bounds, q), Some(cell)));
                    self.cells[cell].children[slot(q)] = Some(child);
                    child
                }
            };
        }

        self.cells[cell].items.push((id, rect));
        self.homes.insert(id, cell);
    }

    pub fn remove(&mut self, id: ObstacleId) -> bool {
        let Some(mut cell) = self.homes.remove(&id) else {
            return false;
        };
        self.cells[cell].items.retain(|(other, _)| *other != id);

        while self.cells[cell].is_empty() {
            let Some(parent) = self.cells[cell].parent else {
                // Empty root: drop the whole arena.
                self.clear();
                break;
            };
            for child in self.cells[parent].children.iter_mut() {
                if *child == Some(cell) {
                    *child = None;
                }
            }
            self.release(cell);
            cell = parent;
        }
        true
    }

    pub fn clear(&mut self) {
        *self = Self::new(self.params);
    }

    /// Visit items whose bounds pass `hit`, descending only into cells whose
    /// bounds pass it as well. Stops as soon as `visit` returns true.
    fn search<H, V>(&self, hit: H, mut visit: V) -> bool
    where
        H: Fn(&Rect) -> bool,
        V: FnMut(ObstacleId, &Rect) -> bool,
    {
        let Some(root) = self.root else {
            return false;
        };
        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            let cell = &self.cells[idx];
            if !hit(&cell.bounds) {
                continue;
            }
            for (id, rect) in &cell.items {
                if hit(rect) && visit(*id, rect) {
                    return true;
                }
            }
            stack.extend(cell.children.iter().flatten());
        }
        false
    }

    /// True if `pred` holds for any item whose bounds touch the segment.
    pub fn any_on_segment<P>(&self, a: Point2<f64>, b: Point2<f64>, mut pred: P) -> bool
    where
        P: FnMut(ObstacleId) -> bool,
    {
        self.search(|r| clip_segment(a, b, r).is_some(), |id, _| pred(id))
    }

    /// Items whose closed bounds contain `p`.
    pub fn at_point(&self, p: Point2<f64>) -> Vec<ObstacleId> {
        let mut out = Vec::new();
        self.search(
            |r| r.contains(p),
            |id, _| {
                out.push(id);
                false
            },
        );
        out
    }

    /// Items whose closed bounds intersect `rect`.
    pub fn in_rect(&self, rect: &Rect) -> Vec<ObstacleId> {
        let mut out = Vec::new();
        self.search(
            |r| r.intersects(rect),
            |id, _| {
                out.push(id);
                false
            },
        );
        out
    }

    #[cfg(test)]
    fn depth_of(&self, id: ObstacleId) -> Option<usize> {
        let mut cell = *self.homes.get(&id)?;
        let mut depth = 0;
        while let Some(parent) = self.cells[cell].parent {
            cell = parent;
            depth += 1;
        }
        Some(depth)
    }

    #[cfg(test)]
    fn live_cells(&self) -> usize {
        self.cells.len() - self.free.len()
    }
}
