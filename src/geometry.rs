// Plane geometry used by the cost function: points, axis-aligned
// rectangles and closed-interval overlap.

use crate::error::{PlacementError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in the plane.
///
/// Serialized as a two-element `[x, y]` array so problem files stay terse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns this point moved by `(dx, dy)`.
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance_to(self, other: Point) -> f64 {
        self.distance_squared_to(other).sqrt()
    }

    /// Squared Euclidean distance, the fidelity term of the cost.
    pub fn distance_squared_to(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for [f64; 2] {
    fn from(point: Point) -> Self {
        [point.x, point.y]
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Overlap of the closed intervals `[a, b]` and `[c, d]`: the smaller of
/// `b - c` and `d - a`, floored at zero.
///
/// For partially overlapping intervals this is the shared length. When one
/// interval contains the other it is the distance the inner one must travel
/// to clear the outer along the shorter way out, so `overlap(0, 10, 2, 8)`
/// is 8.
///
/// Fails with [`PlacementError::InvalidInterval`] when either interval is
/// reversed.
pub fn overlap(a: f64, b: f64, c: f64, d: f64) -> Result<f64> {
    // NaN bounds fail here too, since every comparison with NaN is false.
    if !(a <= b && c <= d) {
        return Err(PlacementError::InvalidInterval { a, b, c, d });
    }
    Ok((b - c).min(d - a).max(0.0))
}

/// An axis-aligned rectangle.
///
/// A rectangle whose `bottom_left` lies right of or above its `top_right`
/// is empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub bottom_left: Point,
    pub top_right: Point,
}

impl Rectangle {
    pub const fn new(bottom_left: Point, top_right: Point) -> Self {
        Self {
            bottom_left,
            top_right,
        }
    }

    /// The rectangle of size `width x height` centred on `center`.
    pub fn centered(center: Point, width: f64, height: f64) -> Self {
        let half_w = width / 2.0;
        let half_h = height / 2.0;
        Self::new(
            center.translated(-half_w, -half_h),
            center.translated(half_w, half_h),
        )
    }

    /// The identity element of [`Rectangle::union`].
    pub const fn empty() -> Self {
        Self::new(
            Point::new(f64::INFINITY, f64::INFINITY),
            Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        )
    }

    pub fn is_empty(&self) -> bool {
        !(self.bottom_left.x <= self.top_right.x && self.bottom_left.y <= self.top_right.y)
    }

    pub fn width(&self) -> f64 {
        (self.top_right.x - self.bottom_left.x).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.top_right.y - self.bottom_left.y).max(0.0)
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.bottom_left.x + self.top_right.x) / 2.0,
            (self.bottom_left.y + self.top_right.y) / 2.0,
        )
    }

    /// Penetration depth between two rectangles: the smaller of the x and y
    /// interval overlaps, so rectangles separated along either axis score 0.
    pub fn overlap_with(&self, other: &Rectangle) -> Result<f64> {
        let x = overlap(
            self.bottom_left.x,
            self.top_right.x,
            other.bottom_left.x,
            other.top_right.x,
        )?;
        let y = overlap(
            self.bottom_left.y,
            self.top_right.y,
            other.bottom_left.y,
            other.top_right.y,
        )?;
        Ok(x.min(y))
    }

    /// Smallest rectangle containing both inputs. An empty input contributes
    /// nothing.
    pub fn union(&self, other: &Rectangle) -> Rectangle {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Rectangle::new(
            Point::new(
                self.bottom_left.x.min(other.bottom_left.x),
                self.bottom_left.y.min(other.bottom_left.y),
            ),
            Point::new(
                self.top_right.x.max(other.top_right.x),
                self.top_right.y.max(other.top_right.y),
            ),
        )
    }
}

impl Default for Rectangle {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "Rectangle(empty)");
        }
        write!(
            f,
            "Rectangle(bottom_left={}, top_right={})",
            self.bottom_left, self.top_right
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_literal_cases() {
        assert_eq!(overlap(0.0, 1.0, 2.0, 3.0).unwrap(), 0.0);
        assert_eq!(overlap(0.0, 2.0, 1.0, 3.0).unwrap(), 1.0);
        assert_eq!(overlap(0.0, 10.0, 8.0, 10.0).unwrap(), 2.0);
        assert_eq!(overlap(0.0, 10.0, 8.0, 14.0).unwrap(), 2.0);
        assert_eq!(overlap(0.0, 10.0, 2.0, 8.0).unwrap(), 8.0);
    }

    #[test]
    fn contained_interval_measures_escape_distance() {
        assert_eq!(overlap(2.0, 8.0, 0.0, 10.0).unwrap(), 8.0);
        assert_eq!(overlap(0.0, 10.0, 4.0, 5.0).unwrap(), 5.0);
        assert_eq!(overlap(0.0, 10.0, 1.0, 3.0).unwrap(), 3.0);
    }

    #[test]
    fn overlap_identical_intervals_is_full_length() {
        assert_eq!(overlap(-1.5, 2.5, -1.5, 2.5).unwrap(), 4.0);
    }

    #[test]
    fn overlap_touching_intervals_is_zero() {
        assert_eq!(overlap(0.0, 1.0, 1.0, 2.0).unwrap(), 0.0);
    }

    #[test]
    fn overlap_rejects_reversed_interval() {
        let err = overlap(1.0, 0.0, 0.0, 1.0).unwrap_err();
        assert!(matches!(err, PlacementError::InvalidInterval { .. }));
        assert!(overlap(0.0, 1.0, 3.0, 2.0).is_err());
        assert!(overlap(f64::NAN, 1.0, 0.0, 1.0).is_err());
    }

    #[test]
    fn rectangle_overlap_uses_narrowest_axis() {
        let a = Rectangle::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        let b = Rectangle::new(Point::new(8.0, 5.0), Point::new(20.0, 20.0));
        // x overlap 2, y overlap 5
        assert_eq!(a.overlap_with(&b).unwrap(), 2.0);
        assert_eq!(b.overlap_with(&a).unwrap(), 2.0);
    }

    #[test]
    fn nested_rectangle_overlap_counts_escape_distance() {
        let outer = Rectangle::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        let inner = Rectangle::new(Point::new(2.0, 1.0), Point::new(8.0, 4.0));
        // x: min(10 - 2, 8 - 0) = 8, y: min(10 - 1, 4 - 0) = 4
        assert_eq!(outer.overlap_with(&inner).unwrap(), 4.0);
        assert_eq!(inner.overlap_with(&outer).unwrap(), 4.0);
    }

    #[test]
    fn identical_unit_squares_overlap_by_side() {
        let a = Rectangle::centered(Point::new(3.0, -2.0), 1.0, 1.0);
        assert_eq!(a.overlap_with(&a).unwrap(), 1.0);
    }

    #[test]
    fn disjoint_on_one_axis_is_zero() {
        let a = Rectangle::centered(Point::new(0.0, 0.0), 4.0, 1.0);
        let b = Rectangle::centered(Point::new(0.5, 3.0), 4.0, 1.0);
        assert_eq!(a.overlap_with(&b).unwrap(), 0.0);
    }

    #[test]
    fn empty_rectangle_measures_zero() {
        let r = Rectangle::new(Point::new(2.0, 2.0), Point::new(1.0, 3.0));
        assert!(r.is_empty());
        assert_eq!(r.width(), 0.0);
        assert_eq!(r.height(), 1.0);
        assert!(Rectangle::empty().is_empty());
    }

    #[test]
    fn union_skips_empty_side() {
        let r = Rectangle::new(Point::new(0.0, 0.0), Point::new(1.0, 2.0));
        assert_eq!(Rectangle::empty().union(&r), r);
        assert_eq!(r.union(&Rectangle::empty()), r);
    }

    #[test]
    fn union_spans_both() {
        let a = Rectangle::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        let b = Rectangle::new(Point::new(-2.0, 0.5), Point::new(0.5, 3.0));
        let u = a.union(&b);
        assert_eq!(u.bottom_left, Point::new(-2.0, 0.0));
        assert_eq!(u.top_right, Point::new(1.0, 3.0));
    }

    #[test]
    fn point_distance() {
        let a = Point::new(1.0, 1.0);
        assert_eq!(a.distance_to(Point::new(4.0, 5.0)), 5.0);
        assert_eq!(a.translated(1.0, -1.0), Point::new(2.0, 0.0));
    }

    #[test]
    fn point_serializes_as_pair() {
        let json = serde_json::to_string(&Point::new(1.5, -2.0)).unwrap();
        assert_eq!(json, "[1.5,-2.0]");
        let back: Point = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Point::new(1.5, -2.0));
    }
}
