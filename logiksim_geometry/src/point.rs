// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid points and fine (continuous) points.

use crate::grid::{Grid, GridFine};

/// A point on the grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: Grid,
    /// Vertical coordinate.
    pub y: Grid,
}

impl Point {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: Grid, y: Grid) -> Self {
        Self { x, y }
    }

    /// Returns `true` if this point can be translated by `(dx, dy)` without
    /// leaving the representable grid range.
    #[must_use]
    pub fn is_representable(self, dx: i32, dy: i32) -> bool {
        Grid::is_representable(self.x, self.y, dx, dy)
    }

    /// Translates the point by `(dx, dy)`, returning `None` if the result
    /// would not be representable.
    #[must_use]
    pub fn checked_translate(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }

    /// Translates the point by `(dx, dy)` without checking bounds.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the result would not be representable;
    /// callers must have already checked [`Point::is_representable`].
    #[must_use]
    pub fn translate_unchecked(self, dx: i32, dy: i32) -> Self {
        let result = self.checked_translate(dx, dy);
        debug_assert!(result.is_some(), "translate_unchecked left the grid range");
        result.unwrap_or(self)
    }
}

/// A continuous (sub-grid) point, used for mouse positions and view math.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PointFine {
    /// Horizontal coordinate.
    pub x: GridFine,
    /// Vertical coordinate.
    pub y: GridFine,
}

impl PointFine {
    /// Creates a fine point.
    #[must_use]
    pub const fn new(x: GridFine, y: GridFine) -> Self {
        Self { x, y }
    }

    /// Rounds both coordinates to the grid, returning `None` if either axis
    /// falls outside the representable range.
    #[must_use]
    pub fn to_grid(self) -> Option<Point> {
        Some(Point::new(self.x.to_rounded()?, self.y.to_rounded()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn g(v: i32) -> Grid {
        Grid::new(v).unwrap()
    }

    #[test]
    fn translate_within_range() {
        let p = Point::new(g(0), g(0));
        assert_eq!(p.checked_translate(5, -3), Some(Point::new(g(5), g(-3))));
    }

    #[test]
    fn translate_out_of_range_is_none() {
        let p = Point::new(Grid::MAX, Grid::ZERO);
        assert_eq!(p.checked_translate(1, 0), None);
    }

    #[test]
    fn point_fine_rounds_to_grid() {
        let p = PointFine::new(GridFine::new(1.6), GridFine::new(-1.6));
        assert_eq!(p.to_grid(), Some(Point::new(g(2), g(-2))));
    }
}
