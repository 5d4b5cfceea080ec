//! The four open quadrants around a point and sets of them.
//!
//! A rectangle that contains a point (closed) fills some of the quadrants
//! around it: one when the point is a corner, two when it lies on an edge,
//! all four when it is interior. Summing the fills of every obstacle at a
//! point describes the merged obstacle silhouette there, which is all the
//! visibility graph needs to decide if the point can be a turning point.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::Rect;

/// Open quadrant around a point, named by the signs of its axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    PosPos,
    NegPos,
    NegNeg,
    PosNeg,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::PosPos,
        Quadrant::NegPos,
        Quadrant::NegNeg,
        Quadrant::PosNeg,
    ];

    /// Unit signs `(sx, sy)` of the quadrant.
    pub fn signs(self) -> (f64, f64) {
        match self {
            Quadrant::PosPos => (1.0, 1.0),
            Quadrant::NegPos => (-1.0, 1.0),
            Quadrant::NegNeg => (-1.0, -1.0),
            Quadrant::PosNeg => (1.0, -1.0),
        }
    }

    pub fn opposite(self) -> Quadrant {
        match self {
            Quadrant::PosPos => Quadrant::NegNeg,
            Quadrant::NegPos => Quadrant::PosNeg,
            Quadrant::NegNeg => Quadrant::PosPos,
            Quadrant::PosNeg => Quadrant::NegPos,
        }
    }

    #[inline]
    fn bit(self) -> u8 {
        match self {
            Quadrant::PosPos => 0b0001,
            Quadrant::NegPos => 0b0010,
            Quadrant::NegNeg => 0b0100,
            Quadrant::PosNeg => 0b1000,
        }
    }

    /// True if `d` points strictly into the open quadrant.
    ///
    /// Directions parallel to an axis belong to no quadrant.
    pub fn contains_direction(self, d: Vector2<f64>) -> bool {
        let (sx, sy) = self.signs();
        d.x * sx > 0.0 && d.y * sy > 0.0
    }
}

/// Set of filled quadrants around a point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuadrantMask(u8);

impl QuadrantMask {
    pub const EMPTY: QuadrantMask = QuadrantMask(0);
    pub const FULL: QuadrantMask = QuadrantMask(0b1111);

    pub fn single(q: Quadrant) -> Self {
        QuadrantMask(q.bit())
    }

    /// Quadrants around `p` that the interior of `rect` reaches into.
    ///
    /// Empty when `p` is outside the closed rectangle.
    pub fn of_rect_at(rect: &Rect, p: Point2<f64>) -> Self {
        if !rect.contains(p) {
            return Self::EMPTY;
        }
        let left = rect.min.x < p.x;
        let right = rect.max.x > p.x;
        let below = rect.min.y < p.y;
        let above = rect.max.y > p.y;

        let mut mask = Self::EMPTY;
        if right && above {
            mask.insert(Quadrant::PosPos);
        }
        if left && above {
            mask.insert(Quadrant::NegPos);
        }
        if left && below {
            mask.insert(Quadrant::NegNeg);
        }
        if right && below {
            mask.insert(Quadrant::PosNeg);
        }
        mask
    }

    #[inline]
    pub fn insert(&mut self, q: Quadrant) {
        self.0 |= q.bit();
    }

    #[inline]
    pub fn contains(self, q: Quadrant) -> bool {
        self.0 & q.bit() != 0
    }

    #[inline]
    pub fn union(self, other: QuadrantMask) -> QuadrantMask {
        QuadrantMask(self.0 | other.0)
    }

    #[inline]
    pub fn len(self) -> u32 {
        self.0.count_ones()
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Quadrant> {
        Quadrant::ALL.into_iter().filter(move |q| self.contains(*q))
    }

    /// Whether a point with this occupancy can be a turning point of a
    /// shortest path.
    ///
    /// True for a lone filled quadrant (convex corner) and for two
    /// diagonally opposite filled quadrants (two obstacles pinching at one
    /// point). A point on a straight boundary, a reflex corner, an interior
    /// point and a point with no obstacle at all are never turning points.
    pub fn is_turning_point(self) -> bool {
        match self.len() {
            1 => true,
            2 => self
                .iter()
                .next()
                .is_some_and(|q| self.contains(q.opposite())),
            _ => false,
        }
    }

    /// True if the infinite line through the point with direction `d`
    /// enters a filled quadrant on either side of the point.
    ///
    /// An edge of a shortest path that turns at this point is always
    /// tangent to the silhouette, so such lines are never useful.
    pub fn line_enters(self, d: Vector2<f64>) -> bool {
        self.iter()
            .any(|q| q.contains_direction(d) || q.contains_direction(-d))
    }
}

impl FromIterator<Quadrant> for QuadrantMask {
    fn from_iter<I: IntoIterator<Item = Quadrant>>(iter: I) -> Self {
        let mut mask = QuadrantMask::EMPTY;
        for q in iter {
            mask.insert(q);
        }
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_fill_depends_on_where_the_point_sits() {
        let r = Rect::new(0.0, 0.0, 2.0, 2.0);
        assert_eq!(
            QuadrantMask::of_rect_at(&r, Point2::new(0.0, 0.0)),
            QuadrantMask::single(Quadrant::PosPos)
        );
        assert_eq!(QuadrantMask::of_rect_at(&r, Point2::new(1.0, 0.0)).len(), 2);
        assert_eq!(
            QuadrantMask::of_rect_at(&r, Point2::new(1.0, 1.0)),
            QuadrantMask::FULL
        );
        assert!(QuadrantMask::of_rect_at(&r, Point2::new(3.0, 1.0)).is_empty());
    }

    #[test]
    fn turning_points() {
        let single = QuadrantMask::single(Quadrant::NegPos);
        assert!(single.is_turning_point());

        let pinch: QuadrantMask = [Quadrant::PosPos, Quadrant::NegNeg].into_iter().collect();
        assert!(pinch.is_turning_point());

        let straight: QuadrantMask = [Quadrant::PosPos, Quadrant::NegPos].into_iter().collect();
        assert!(!straight.is_turning_point());

        let reflex: QuadrantMask = [Quadrant::PosPos, Quadrant::NegPos, Quadrant::NegNeg]
            .into_iter()
            .collect();
        assert!(!reflex.is_turning_point());
        assert!(!QuadrantMask::FULL.is_turning_point());
        assert!(!QuadrantMask::EMPTY.is_turning_point());
    }

    #[test]
    fn tangent_lines_do_not_enter() {
        // Bottom-left corner of a rectangle: the rectangle fills (+, +).
        let mask = QuadrantMask::single(Quadrant::PosPos);
        // Along the edges.
        assert!(!mask.line_enters(Vector2::new(1.0, 0.0)));
        assert!(!mask.line_enters(Vector2::new(0.0, -1.0)));
        // Grazing diagonally away from the rectangle on both sides.
        assert!(!mask.line_enters(Vector2::new(1.0, -1.0)));
        // Pointing into the rectangle, or leaving it straight backwards.
        assert!(mask.line_enters(Vector2::new(1.0, 1.0)));
        assert!(mask.line_enters(Vector2::new(-2.0, -1.0)));
    }
}
