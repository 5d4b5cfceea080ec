//! Pure occlusion predicates.
//!
//! All predicates are total over finite inputs. Touching a single rectangle
//! is never blocking: a segment may run along an obstacle edge or pass
//! through its corner. A segment squeezed along the seam between two
//! rectangles that touch on opposite sides of it is blocked by the pair.

use nalgebra::{Point2, Vector2};

use crate::{QuadrantMask, Rect};

/// Relative tolerance used to tell "inside" from "on the boundary".
pub const EPSILON: f64 = 1e-9;

/// Boundary margin on one axis of a rectangle spanning `lo..hi`.
///
/// Scales with the coordinate magnitude and never exceeds a quarter of the
/// side, so thin rectangles keep an interior.
#[inline]
fn margin(lo: f64, hi: f64) -> f64 {
    (EPSILON * lo.abs().max(hi.abs()).max(1.0)).min(0.25 * (hi - lo))
}

#[inline]
fn lerp(a: Point2<f64>, b: Point2<f64>, t: f64) -> Point2<f64> {
    a + (b - a) * t
}

#[inline]
fn orient(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> f64 {
    (b - a).perp(&(c - a))
}

/// True iff the two segments properly cross.
///
/// Shared endpoints, an endpoint lying on the other segment and collinear
/// overlap are not crossings.
pub fn segments_intersect(
    a1: Point2<f64>,
    a2: Point2<f64>,
    b1: Point2<f64>,
    b2: Point2<f64>,
) -> bool {
    let d1 = orient(b1, b2, a1);
    let d2 = orient(b1, b2, a2);
    let d3 = orient(a1, a2, b1);
    let d4 = orient(a1, a2, b2);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}

/// Clip the segment `a..b` against the closed rectangle (Liang-Barsky).
///
/// Returns the parameter interval `[t0, t1]` (with `0 <= t0 <= t1 <= 1`) of
/// the part of the segment inside `rect`, or `None` when they are disjoint.
pub fn clip_segment(a: Point2<f64>, b: Point2<f64>, rect: &Rect) -> Option<(f64, f64)> {
    let d = b - a;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    let slabs = [
        (-d.x, a.x - rect.min.x),
        (d.x, rect.max.x - a.x),
        (-d.y, a.y - rect.min.y),
        (d.y, rect.max.y - a.y),
    ];

    for (p, q) in slabs {
        if p == 0.0 {
            // Parallel to this slab: either fully outside or irrelevant.
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    Some((t0, t1))
}

/// True iff the segment `a..b` passes through the interior of `rect`.
///
/// The clipped chord of a convex region has an interior midpoint unless the
/// chord degenerates to a point or runs along the boundary, which are
/// exactly the grazing cases that must not block.
pub fn segment_crosses_rect(a: Point2<f64>, b: Point2<f64>, rect: &Rect) -> bool {
    let Some((t0, t1)) = clip_segment(a, b, rect) else {
        return false;
    };
    let mid = lerp(a, b, 0.5 * (t0 + t1));
    let within = Vector2::new(
        margin(rect.min.x, rect.max.x),
        margin(rect.min.y, rect.max.y),
    );
    rect.contains_deep(mid, within)
}

/// True iff `a..b` runs along a stretch of positive length where `r1` and
/// `r2` touch from opposite sides.
///
/// Each rectangle alone only grazes the segment, but together they close
/// the gap, so the segment is as blocked as if it crossed their union.
pub fn segment_splits_seam(a: Point2<f64>, b: Point2<f64>, r1: &Rect, r2: &Rect) -> bool {
    let (Some((s0, s1)), Some((t0, t1))) = (clip_segment(a, b, r1), clip_segment(a, b, r2)) else {
        return false;
    };
    let lo = s0.max(t0);
    let hi = s1.min(t1);
    if hi - lo <= EPSILON {
        return false;
    }
    let mid = lerp(a, b, 0.5 * (lo + hi));
    occupancy_at(mid, [r1, r2]) == QuadrantMask::FULL
}

/// Merged quadrant occupancy at `p` over every footprint that contains it.
pub fn occupancy_at<'a, I>(p: Point2<f64>, footprints: I) -> QuadrantMask
where
    I: IntoIterator<Item = &'a Rect>,
{
    footprints
        .into_iter()
        .fold(QuadrantMask::EMPTY, |mask, r| {
            mask.union(QuadrantMask::of_rect_at(r, p))
        })
}

/// True iff `corner` can never be a useful turning point given every
/// obstacle footprint near it.
///
/// A lone rectangle corner fills one quadrant and is convex. Neighbours that
/// fill another quadrant next to it turn it into a straight-boundary or
/// reflex point of the merged silhouette, and a neighbour that covers it
/// makes it interior.
pub fn corner_is_reflex<'a, I>(corner: Point2<f64>, footprints: I) -> bool
where
    I: IntoIterator<Item = &'a Rect>,
{
    !occupancy_at(corner, footprints).is_turning_point()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2<f64> {
        Point2::new(x, y)
    }

    #[test]
    fn proper_crossings_only() {
        assert!(segments_intersect(p(0.0, 0.0), p(2.0, 2.0), p(0.0, 2.0), p(2.0, 0.0)));
        // Shared endpoint.
        assert!(!segments_intersect(p(0.0, 0.0), p(1.0, 1.0), p(1.0, 1.0), p(2.0, 0.0)));
        // T-junction.
        assert!(!segments_intersect(p(0.0, 0.0), p(2.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)));
        // Collinear overlap.
        assert!(!segments_intersect(p(0.0, 0.0), p(2.0, 0.0), p(1.0, 0.0), p(3.0, 0.0)));
        // Disjoint.
        assert!(!segments_intersect(p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0), p(1.0, 1.0)));
    }

    #[test]
    fn clipping_reports_entry_and_exit() {
        let r = Rect::new(1.0, -1.0, 3.0, 1.0);
        let (t0, t1) = clip_segment(p(0.0, 0.0), p(4.0, 0.0), &r).unwrap();
        assert!((t0 - 0.25).abs() < 1e-12);
        assert!((t1 - 0.75).abs() < 1e-12);
        assert!(clip_segment(p(0.0, 2.0), p(4.0, 2.0), &r).is_none());
    }

    #[test]
    fn diagonal_through_rect_is_blocked() {
        let r = Rect::new(1.0, 2.0, 4.0, 5.0);
        assert!(segment_crosses_rect(p(0.0, 0.0), p(10.0, 10.0), &r));
    }

    #[test]
    fn grazing_is_not_blocking() {
        let r = Rect::new(0.0, 0.0, 2.0, 2.0);
        // Along the bottom edge, and beyond it.
        assert!(!segment_crosses_rect(p(-1.0, 0.0), p(3.0, 0.0), &r));
        // Corner to corner along an edge.
        assert!(!segment_crosses_rect(p(0.0, 0.0), p(2.0, 0.0), &r));
        // Through a single corner.
        assert!(!segment_crosses_rect(p(-1.0, 1.0), p(1.0, -1.0), &r));
        // Ending on the boundary from outside.
        assert!(!segment_crosses_rect(p(-1.0, 1.0), p(0.0, 1.0), &r));
    }

    #[test]
    fn own_diagonal_and_entering_from_a_corner_block() {
        let r = Rect::new(0.0, 0.0, 2.0, 2.0);
        assert!(segment_crosses_rect(p(0.0, 0.0), p(2.0, 2.0), &r));
        assert!(segment_crosses_rect(p(0.0, 0.0), p(1.0, 0.5), &r));
    }

    #[test]
    fn degenerate_segment_blocks_only_inside() {
        let r = Rect::new(0.0, 0.0, 2.0, 2.0);
        assert!(segment_crosses_rect(p(1.0, 1.0), p(1.0, 1.0), &r));
        assert!(!segment_crosses_rect(p(2.0, 1.0), p(2.0, 1.0), &r));
    }

    #[test]
    fn thin_and_far_rects_keep_their_interior() {
        let sliver = Rect::new(0.0, 0.0, 1e-10, 1.0);
        assert!(segment_crosses_rect(p(-1.0, 0.5), p(1.0, 0.5), &sliver));
        assert!(!segment_crosses_rect(p(0.0, -1.0), p(0.0, 2.0), &sliver));

        let far = Rect::new(1e9, 1e9, 1e9 + 2.0, 1e9 + 2.0);
        assert!(!segment_crosses_rect(p(1e9 - 1.0, 1e9), p(1e9 + 3.0, 1e9), &far));
        assert!(segment_crosses_rect(p(1e9 - 1.0, 1e9 + 1.0), p(1e9 + 3.0, 1e9 + 1.0), &far));
    }

    #[test]
    fn seam_between_touching_rects_blocks() {
        // Two halves of a wall split at y = 3.
        let lower = Rect::new(0.0, 1.0, 1.0, 3.0);
        let upper = Rect::new(0.0, 3.0, 1.0, 5.0);
        assert!(!segment_crosses_rect(p(-2.0, 3.0), p(3.0, 3.0), &lower));
        assert!(!segment_crosses_rect(p(-2.0, 3.0), p(3.0, 3.0), &upper));
        assert!(segment_splits_seam(p(-2.0, 3.0), p(3.0, 3.0), &lower, &upper));
        // Running along the outer face of both is fine.
        assert!(!segment_splits_seam(p(1.0, 0.0), p(1.0, 6.0), &lower, &upper));
        // Only touching the seam at its end.
        assert!(!segment_splits_seam(p(1.0, 3.0), p(3.0, 3.0), &lower, &upper));
        // Side by side cells touch along x = 1 over 1 <= y <= 2 only.
        let left = Rect::new(0.0, 0.0, 1.0, 2.0);
        let right = Rect::new(1.0, 1.0, 2.0, 4.0);
        assert!(segment_splits_seam(p(1.0, -1.0), p(1.0, 5.0), &left, &right));
        assert!(!segment_splits_seam(p(1.0, -1.0), p(1.0, 1.0), &left, &right));
    }

    #[test]
    fn isolated_corner_is_convex() {
        let r = Rect::new(0.0, 0.0, 1.0, 1.0);
        for (_, c) in r.corners() {
            assert!(!corner_is_reflex(c, [&r]));
        }
    }

    #[test]
    fn side_by_side_rects_merge_their_shared_corners() {
        // Two unit cells sharing the edge x = 1.
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        let b = Rect::new(1.0, 0.0, 2.0, 1.0);
        // Shared corners lie on the merged straight boundary.
        assert!(corner_is_reflex(p(1.0, 0.0), [&a, &b]));
        assert!(corner_is_reflex(p(1.0, 1.0), [&a, &b]));
        // Outer corners stay convex.
        assert!(!corner_is_reflex(p(0.0, 0.0), [&a, &b]));
        assert!(!corner_is_reflex(p(2.0, 1.0), [&a, &b]));
    }

    #[test]
    fn l_shape_inner_corner_is_reflex() {
        let a = Rect::new(0.0, 0.0, 2.0, 1.0);
        let b = Rect::new(0.0, 1.0, 1.0, 2.0);
        // (1, 1) has three filled quadrants.
        assert!(corner_is_reflex(p(1.0, 1.0), [&a, &b]));
    }

    #[test]
    fn diagonal_pinch_stays_usable() {
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        let b = Rect::new(1.0, 1.0, 2.0, 2.0);
        assert!(!corner_is_reflex(p(1.0, 1.0), [&a, &b]));
    }

    #[test]
    fn covered_corner_is_reflex() {
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        let big = Rect::new(-1.0, -1.0, 0.5, 0.5);
        assert!(corner_is_reflex(p(0.0, 0.0), [&a, &big]));
    }
}
