#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Coordinates are integer pixels in the host surface's frame (origin at
//! top-left). Touch hosts report sub-pixel positions rarely enough that the
//! integer grid is what every threshold is expressed in.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// A point on the host surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct Point {
    /// Horizontal offset in pixels.
    pub x: i32,
    /// Vertical offset in pixels.
    pub y: i32,
}

impl Point {
    /// Create a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`, truncated to whole pixels.
    ///
    /// Thresholds compare against this value, so `distance < threshold`
    /// means "strictly closer than `threshold` whole pixels".
    #[must_use]
    pub fn distance(self, other: Self) -> i32 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        // Float-to-int `as` saturates, so huge spans clamp to i32::MAX.
        dx.hypot(dy) as i32
    }

    /// Offset from `origin` to `self`.
    #[inline]
    #[must_use]
    pub const fn delta_from(self, origin: Self) -> (i32, i32) {
        (
            self.x.saturating_sub(origin.x),
            self.y.saturating_sub(origin.y),
        )
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle, used for menu bounds and test fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Check if a point is inside the rectangle (left/top inclusive).
    #[inline]
    #[must_use]
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Check if a point lies strictly inside the rectangle, borders excluded.
    ///
    /// Context menus draw their border on the edge pixels, which never
    /// belong to an entry.
    #[inline]
    #[must_use]
    pub const fn contains_strict(&self, point: Point) -> bool {
        point.x > self.x && point.x < self.right() && point.y > self.y && point.y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_truncates() {
        let a = Point::new(100, 100);
        assert_eq!(a.distance(Point::new(100, 130)), 30);
        assert_eq!(a.distance(Point::new(100, 140)), 40);
        // sqrt(2) * 10 = 14.14...
        assert_eq!(a.distance(Point::new(110, 110)), 14);
        assert_eq!(a.distance(a), 0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Point::new(-5, 12);
        let b = Point::new(7, -3);
        assert_eq!(a.distance(b), b.distance(a));
    }

    #[test]
    fn distance_extreme_coordinates_do_not_overflow() {
        let a = Point::new(i32::MIN, i32::MIN);
        let b = Point::new(i32::MAX, i32::MAX);
        assert!(a.distance(b) > 0);
    }

    #[test]
    fn delta_from_origin() {
        let origin = Point::new(10, 10);
        assert_eq!(Point::new(4, 18).delta_from(origin), (-6, 8));
    }

    #[test]
    fn rect_contains_edges() {
        let r = Rect::new(10, 10, 5, 5);
        assert!(r.contains(Point::new(10, 10)));
        assert!(r.contains(Point::new(14, 14)));
        assert!(!r.contains(Point::new(15, 14)));
        assert!(!r.contains(Point::new(9, 12)));
    }

    #[test]
    fn rect_contains_strict_excludes_border() {
        let r = Rect::new(10, 10, 5, 5);
        assert!(!r.contains_strict(Point::new(10, 12)));
        assert!(r.contains_strict(Point::new(11, 11)));
        assert!(!r.contains_strict(Point::new(15, 12)));
    }

    #[test]
    fn rect_empty() {
        assert!(Rect::new(0, 0, 0, 5).is_empty());
        assert!(!Rect::new(0, 0, 1, 1).is_empty());
    }
}
