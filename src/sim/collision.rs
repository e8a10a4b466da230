//! Axis-aligned bounding-box collision
//!
//! Boxes that only share an edge do not overlap.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Test two boxes given as `(x, y, width, height)` for overlap.
///
/// Disjoint along either axis, including edge-touching, is a miss.
#[allow(clippy::too_many_arguments)]
pub fn overlaps(ax: f32, ay: f32, aw: f32, ah: f32, bx: f32, by: f32, bw: f32, bh: f32) -> bool {
    if ax >= bx && ax >= bx + bw {
        return false;
    }
    if ax <= bx && ax + aw <= bx {
        return false;
    }
    if ay >= by && ay >= by + bh {
        return false;
    }
    if ay <= by && ay + ah <= by {
        return false;
    }
    true
}

/// A positioned box (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        overlaps(
            self.origin.x,
            self.origin.y,
            self.size.x,
            self.size.y,
            other.origin.x,
            other.origin.y,
            other.size.x,
            other.size.y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_identical_boxes_overlap() {
        assert!(overlaps(100.0, 100.0, 60.0, 60.0, 100.0, 100.0, 60.0, 60.0));
    }

    #[test]
    fn test_contained_box_overlaps() {
        assert!(overlaps(0.0, 0.0, 100.0, 100.0, 40.0, 40.0, 6.0, 18.0));
        assert!(overlaps(40.0, 40.0, 6.0, 18.0, 0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn test_edge_touching_is_miss() {
        // A.x + A.w == B.x
        assert!(!overlaps(0.0, 0.0, 10.0, 10.0, 10.0, 0.0, 10.0, 10.0));
        assert!(!overlaps(10.0, 0.0, 10.0, 10.0, 0.0, 0.0, 10.0, 10.0));
        // A.y + A.h == B.y
        assert!(!overlaps(0.0, 0.0, 10.0, 10.0, 0.0, 10.0, 10.0, 10.0));
        assert!(!overlaps(0.0, 10.0, 10.0, 10.0, 0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_disjoint_on_one_axis_is_miss() {
        // Overlapping columns, separated rows
        assert!(!overlaps(0.0, 0.0, 10.0, 10.0, 5.0, 50.0, 10.0, 10.0));
        // Overlapping rows, separated columns
        assert!(!overlaps(0.0, 0.0, 10.0, 10.0, 50.0, 5.0, 10.0, 10.0));
    }

    #[test]
    fn test_rect_wrapper() {
        let a = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Rect::new(Vec2::new(9.0, 9.0), Vec2::new(10.0, 10.0));
        let c = Rect::new(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    fn boxes() -> impl Strategy<Value = (f32, f32, f32, f32)> {
        (-500.0f32..500.0, -500.0f32..500.0, 1.0f32..200.0, 1.0f32..200.0)
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(a in boxes(), b in boxes()) {
            prop_assert_eq!(
                overlaps(a.0, a.1, a.2, a.3, b.0, b.1, b.2, b.3),
                overlaps(b.0, b.1, b.2, b.3, a.0, a.1, a.2, a.3)
            );
        }

        #[test]
        fn prop_touching_right_edge_never_overlaps(a in boxes(), by in -500.0f32..500.0, bw in 1.0f32..200.0, bh in 1.0f32..200.0) {
            let bx = a.0 + a.2;
            prop_assert!(!overlaps(a.0, a.1, a.2, a.3, bx, by, bw, bh));
            prop_assert!(!overlaps(bx, by, bw, bh, a.0, a.1, a.2, a.3));
        }
    }
}
