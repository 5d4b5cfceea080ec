use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::Quadrant;

/// Corner of an axis-aligned rectangle.
///
/// `ALL` lists the corners counter-clockwise starting at the minimum corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    BottomLeft,
    BottomRight,
    TopRight,
    TopLeft,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::BottomLeft,
        Corner::BottomRight,
        Corner::TopRight,
        Corner::TopLeft,
    ];

    /// Quadrant around the corner point that the rectangle itself fills.
    pub fn interior_quadrant(self) -> Quadrant {
        match self {
            Corner::BottomLeft => Quadrant::PosPos,
            Corner::BottomRight => Quadrant::NegPos,
            Corner::TopRight => Quadrant::NegNeg,
            Corner::TopLeft => Quadrant::PosNeg,
        }
    }

    /// Quadrant diagonally away from the rectangle.
    #[inline]
    pub fn exterior_quadrant(self) -> Quadrant {
        self.interior_quadrant().opposite()
    }
}

/// Axis-aligned rectangle, `min <= max` on both axes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Point2<f64>,
    pub max: Point2<f64>,
}

impl Rect {
    /// Build a rectangle from two opposite corners given in any order.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let (min_x, max_x) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let (min_y, max_y) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
        Self {
            min: Point2::new(min_x, min_y),
            max: Point2::new(max_x, max_y),
        }
    }

    #[inline]
    pub fn from_points(a: Point2<f64>, b: Point2<f64>) -> Self {
        Self::new(a.x, a.y, b.x, b.y)
    }

    /// Bounding box of the closed segment `a..b`.
    #[inline]
    pub fn segment_bounds(a: Point2<f64>, b: Point2<f64>) -> Self {
        Self::from_points(a, b)
    }

    /// Square of side `2 * half` centred on `center`.
    pub fn square(center: Point2<f64>, half: f64) -> Self {
        let h = half.abs();
        Self::new(center.x - h, center.y - h, center.x + h, center.y + h)
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Point2<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    #[inline]
    pub fn extent(&self) -> Vector2<f64> {
        self.max - self.min
    }

    pub fn is_finite(&self) -> bool {
        self.min.x.is_finite()
            && self.min.y.is_finite()
            && self.max.x.is_finite()
            && self.max.y.is_finite()
    }

    /// False for zero-width, zero-height and NaN rectangles.
    #[inline]
    pub fn has_positive_area(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    pub fn corner(&self, corner: Corner) -> Point2<f64> {
        match corner {
            Corner::BottomLeft => self.min,
            Corner::BottomRight => Point2::new(self.max.x, self.min.y),
            Corner::TopRight => self.max,
            Corner::TopLeft => Point2::new(self.min.x, self.max.y),
        }
    }

    pub fn corners(&self) -> [(Corner, Point2<f64>); 4] {
        Corner::ALL.map(|c| (c, self.corner(c)))
    }

    /// Closed containment: points on the boundary are inside.
    #[inline]
    pub fn contains(&self, p: Point2<f64>) -> bool {
        self.min.x <= p.x && p.x <= self.max.x && self.min.y <= p.y && p.y <= self.max.y
    }

    /// Open containment: only interior points.
    #[inline]
    pub fn contains_strict(&self, p: Point2<f64>) -> bool {
        self.min.x < p.x && p.x < self.max.x && self.min.y < p.y && p.y < self.max.y
    }

    /// Interior containment keeping `margin.x` off the vertical edges and
    /// `margin.y` off the horizontal ones.
    #[inline]
    pub fn contains_deep(&self, p: Point2<f64>, margin: Vector2<f64>) -> bool {
        self.min.x + margin.x < p.x
            && p.x < self.max.x - margin.x
            && self.min.y + margin.y < p.y
            && p.y < self.max.y - margin.y
    }

    #[inline]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        self.contains(other.min) && self.contains(other.max)
    }

    /// Closed overlap: rectangles sharing only an edge or a corner intersect.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// Open overlap: the interiors share area.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Grow every side by `margin`.
    pub fn inflate(&self, margin: f64) -> Rect {
        Rect {
            min: Point2::new(self.min.x - margin, self.min.y - margin),
            max: Point2::new(self.max.x + margin, self.max.y + margin),
        }
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min: Point2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }
}

impl From<[f64; 4]> for Rect {
    fn from([x1, y1, x2, y2]: [f64; 4]) -> Self {
        Rect::new(x1, y1, x2, y2)
    }
}

impl From<(f64, f64, f64, f64)> for Rect {
    fn from((x1, y1, x2, y2): (f64, f64, f64, f64)) -> Self {
        Rect::new(x1, y1, x2, y2)
    }
}
