// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned rectangles, on the grid and in fine (continuous) space.

use crate::grid::GridFine;
use crate::line::OrderedLine;
use crate::point::{Point, PointFine};

/// An axis-aligned rectangle on the grid, with `p0 <= p1` componentwise.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    p0: Point,
    p1: Point,
}

impl Rect {
    /// Creates a rectangle from two corners in any order.
    #[must_use]
    pub fn new(a: Point, b: Point) -> Self {
        Self {
            p0: Point::new(a.x.min(b.x), a.y.min(b.y)),
            p1: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Returns the lower-left corner.
    #[must_use]
    pub const fn p0(self) -> Point {
        self.p0
    }

    /// Returns the upper-right corner.
    #[must_use]
    pub const fn p1(self) -> Point {
        self.p1
    }

    /// Returns `true` if `point` is within this rectangle, inclusive.
    #[must_use]
    pub fn contains_point(self, point: Point) -> bool {
        self.p0.x <= point.x && point.x <= self.p1.x && self.p0.y <= point.y && point.y <= self.p1.y
    }

    /// Returns `true` if `self` and `other` overlap (touching edges count).
    #[must_use]
    pub fn intersects(self, other: Self) -> bool {
        self.p0.x <= other.p1.x
            && other.p0.x <= self.p1.x
            && self.p0.y <= other.p1.y
            && other.p0.y <= self.p1.y
    }

    /// Returns the smallest rectangle containing both `self` and `other`.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self::new(
            Point::new(self.p0.x.min(other.p0.x), self.p0.y.min(other.p0.y)),
            Point::new(self.p1.x.max(other.p1.x), self.p1.y.max(other.p1.y)),
        )
    }

    /// Returns the smallest rectangle containing both `self` and `line`.
    #[must_use]
    pub fn enclosing_line(self, line: OrderedLine) -> Self {
        self.union(Self::new(line.p0(), line.p1()))
    }

    /// Returns `true` if `line` intersects this rectangle.
    #[must_use]
    pub fn intersects_line(self, line: OrderedLine) -> bool {
        self.intersects(Self::new(line.p0(), line.p1()))
    }
}

/// An axis-aligned rectangle in fine (continuous) space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RectFine {
    p0: PointFine,
    p1: PointFine,
}

impl RectFine {
    /// Creates a fine rectangle from two corners in any order.
    #[must_use]
    pub fn new(a: PointFine, b: PointFine) -> Self {
        let min_x = a.x.value().min(b.x.value());
        let max_x = a.x.value().max(b.x.value());
        let min_y = a.y.value().min(b.y.value());
        let max_y = a.y.value().max(b.y.value());
        Self {
            p0: PointFine::new(GridFine::new(min_x), GridFine::new(min_y)),
            p1: PointFine::new(GridFine::new(max_x), GridFine::new(max_y)),
        }
    }

    /// Returns the lower-left corner.
    #[must_use]
    pub const fn p0(self) -> PointFine {
        self.p0
    }

    /// Returns the upper-right corner.
    #[must_use]
    pub const fn p1(self) -> PointFine {
        self.p1
    }

    /// Returns a rectangle centered on `center` with the given side length.
    #[must_use]
    pub fn centered(center: PointFine, size: GridFine) -> Self {
        let half = size.value() / 2.0;
        Self::new(
            PointFine::new(
                GridFine::new(center.x.value() - half),
                GridFine::new(center.y.value() - half),
            ),
            PointFine::new(
                GridFine::new(center.x.value() + half),
                GridFine::new(center.y.value() + half),
            ),
        )
    }

    /// Returns the rectangle's center point.
    #[must_use]
    pub fn center(self) -> PointFine {
        PointFine::new(
            GridFine::new((self.p0.x.value() + self.p1.x.value()) / 2.0),
            GridFine::new((self.p0.y.value() + self.p1.y.value()) / 2.0),
        )
    }

    /// Returns `true` if `point` is within this rectangle, inclusive.
    #[must_use]
    pub fn contains_point(self, point: PointFine) -> bool {
        self.p0.x.value() <= point.x.value()
            && point.x.value() <= self.p1.x.value()
            && self.p0.y.value() <= point.y.value()
            && point.y.value() <= self.p1.y.value()
    }

    /// Returns the smallest grid-aligned [`Rect`] enclosing this rectangle.
    #[must_use]
    pub fn enclosing_rect(self) -> Option<Rect> {
        Some(Rect::new(
            Point::new(self.p0.x.to_floored()?, self.p0.y.to_floored()?),
            Point::new(self.p1.x.to_ceiled()?, self.p1.y.to_ceiled()?),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    fn p(x: i32, y: i32) -> Point {
        Point::new(Grid::new(x).unwrap(), Grid::new(y).unwrap())
    }

    #[test]
    fn rect_normalizes_corners() {
        let r = Rect::new(p(5, 5), p(0, 0));
        assert_eq!(r.p0(), p(0, 0));
        assert_eq!(r.p1(), p(5, 5));
    }

    #[test]
    fn intersects_touching_edges() {
        let a = Rect::new(p(0, 0), p(5, 5));
        let b = Rect::new(p(5, 0), p(10, 5));
        assert!(a.intersects(b));
        let c = Rect::new(p(6, 0), p(10, 5));
        assert!(!a.intersects(c));
    }

    #[test]
    fn union_covers_both() {
        let a = Rect::new(p(0, 0), p(5, 5));
        let b = Rect::new(p(3, 3), p(10, 10));
        let u = a.union(b);
        assert_eq!(u.p0(), p(0, 0));
        assert_eq!(u.p1(), p(10, 10));
    }
}
