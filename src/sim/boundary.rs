//! Axis-aligned bounding boxes
//!
//! Screen-style coordinates: `top` is the smaller y, `bottom` the larger.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle `{left, right, top, bottom}`
///
/// Zero-area boxes are legal. Width, height and center are derived.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Boundary {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Boundary {
    pub fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        debug_assert!(left <= right && top <= bottom, "inverted boundary");
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Zero-area box at the origin
    pub const fn empty() -> Self {
        Self {
            left: 0.0,
            right: 0.0,
            top: 0.0,
            bottom: 0.0,
        }
    }

    /// Box of the given size centered on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self::new(
            center.x - half.x,
            center.x + half.x,
            center.y - half.y,
            center.y + half.y,
        )
    }

    /// Tight box around a set of points (empty box when there are none)
    pub fn from_points<I: IntoIterator<Item = Vec2>>(points: I) -> Self {
        let mut points = points.into_iter();
        let Some(first) = points.next() else {
            return Self::empty();
        };
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Self::new(min.x, max.x, min.y, max.y)
    }

    /// Union of a set of boxes (empty box when there are none)
    pub fn union_of<I: IntoIterator<Item = Boundary>>(boxes: I) -> Self {
        let mut boxes = boxes.into_iter();
        let Some(first) = boxes.next() else {
            return Self::empty();
        };
        boxes.fold(first, |acc, b| acc.union(&b))
    }

    /// Overwrite all four edges in place
    pub fn update(&mut self, left: f32, right: f32, top: f32, bottom: f32) -> &mut Self {
        debug_assert!(left <= right && top <= bottom, "inverted boundary");
        self.left = left;
        self.right = right;
        self.top = top;
        self.bottom = bottom;
        self
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.left + self.width() / 2.0,
            self.top + self.height() / 2.0,
        )
    }

    /// Half-open point containment: `left <= x < right`, `top <= y < bottom`
    #[inline]
    pub fn includes(&self, point: Vec2) -> bool {
        self.left <= point.x && point.x < self.right && self.top <= point.y && point.y < self.bottom
    }

    /// True when the two boxes overlap or touch
    #[inline]
    pub fn overlaps(&self, other: &Boundary) -> bool {
        self.right >= other.left
            && self.left <= other.right
            && self.bottom >= other.top
            && self.top <= other.bottom
    }

    /// True when `inner` lies within this box (edges may coincide)
    #[inline]
    pub fn contains(&self, inner: &Boundary) -> bool {
        self.left <= inner.left
            && inner.right <= self.right
            && self.top <= inner.top
            && inner.bottom <= self.bottom
    }

    /// Smallest box covering both
    pub fn union(&self, other: &Boundary) -> Boundary {
        Boundary {
            left: self.left.min(other.left),
            right: self.right.max(other.right),
            top: self.top.min(other.top),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Grow each side by the given margins
    pub fn expanded(&self, margin_x: f32, margin_y: f32) -> Boundary {
        Boundary {
            left: self.left - margin_x,
            right: self.right + margin_x,
            top: self.top - margin_y,
            bottom: self.bottom + margin_y,
        }
    }

    /// Largest absolute coordinate over the four edges
    pub fn max_extent(&self) -> f32 {
        self.left
            .abs()
            .max(self.right.abs())
            .max(self.top.abs())
            .max(self.bottom.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_dimensions() {
        let b = Boundary::new(-10.0, 30.0, 5.0, 15.0);
        assert_eq!(b.width(), 40.0);
        assert_eq!(b.height(), 10.0);
        assert_eq!(b.center(), Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_includes_is_half_open() {
        let b = Boundary::new(0.0, 10.0, 0.0, 10.0);
        assert!(b.includes(Vec2::new(0.0, 0.0)));
        assert!(b.includes(Vec2::new(9.99, 5.0)));
        assert!(!b.includes(Vec2::new(10.0, 5.0)));
        assert!(!b.includes(Vec2::new(5.0, 10.0)));
        assert!(!b.includes(Vec2::new(-0.01, 5.0)));
    }

    #[test]
    fn test_overlaps_touching_edges() {
        let a = Boundary::new(0.0, 10.0, 0.0, 10.0);
        let touching = Boundary::new(10.0, 20.0, 0.0, 10.0);
        let apart = Boundary::new(10.5, 20.0, 0.0, 10.0);
        assert!(a.overlaps(&touching));
        assert!(touching.overlaps(&a));
        assert!(!a.overlaps(&apart));
    }

    #[test]
    fn test_contains_and_union() {
        let a = Boundary::new(0.0, 10.0, 0.0, 10.0);
        let b = Boundary::new(5.0, 20.0, -5.0, 5.0);
        let u = a.union(&b);
        assert_eq!(u, Boundary::new(0.0, 20.0, -5.0, 10.0));
        assert!(u.contains(&a));
        assert!(u.contains(&b));
        assert!(a.contains(&a));
        assert!(!a.contains(&b));
    }

    #[test]
    fn test_from_points_and_empty_union() {
        let b = Boundary::from_points([Vec2::new(3.0, -1.0), Vec2::new(-2.0, 4.0)]);
        assert_eq!(b, Boundary::new(-2.0, 3.0, -1.0, 4.0));
        assert_eq!(Boundary::union_of(std::iter::empty()), Boundary::empty());
        assert_eq!(Boundary::from_points(std::iter::empty()), Boundary::empty());
    }

    #[test]
    fn test_update_in_place() {
        let mut b = Boundary::empty();
        b.update(1.0, 2.0, 3.0, 5.0);
        assert_eq!(b.size(), Vec2::new(1.0, 2.0));
    }
}
