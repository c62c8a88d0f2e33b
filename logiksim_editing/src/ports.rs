// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-pin port positions for a logic-item.
//!
//! Nothing in this codebase computes a logic-item's real rendered footprint
//! (glyph layout, pin spacing, body size) -- that lives in a rendering/
//! layout-info component this workspace does not carry. The convention
//! below is a deliberately simple stand-in: a logic-item's inputs sit on its
//! anchor point, stacked one grid unit apart along the axis perpendicular to
//! its facing direction, and its outputs sit one grid unit further along the
//! facing direction, stacked the same way. It is enough to drive collision
//! detection and wire-endpoint conversion, not a faithful rendering.

use logiksim_geometry::{Grid, Orientation, Point};

/// Returns the `(dx, dy)` unit vector a logic-item with `orientation` faces.
/// [`Orientation::Undirected`] (decorations) has no facing direction.
#[must_use]
fn facing_delta(orientation: Orientation) -> (i32, i32) {
    match orientation {
        Orientation::Right => (1, 0),
        Orientation::Left => (-1, 0),
        Orientation::Up => (0, -1),
        Orientation::Down => (0, 1),
        Orientation::Undirected => (0, 0),
    }
}

fn stack_point(origin: Point, orientation: Orientation, facing: (i32, i32), index: usize) -> Option<Point> {
    let index = i32::try_from(index).ok()?;
    let (perp_dx, perp_dy) = (facing.1, facing.0);
    let x = Grid::new(origin.x.value().checked_add(perp_dx.checked_mul(index)?)?)?;
    let y = Grid::new(origin.y.value().checked_add(perp_dy.checked_mul(index)?)?)?;
    Some(Point::new(x, y))
}

/// Returns the grid position of input port `index` (0-based) of a logic-item
/// anchored at `position` with the given `orientation`, or `None` if the
/// computed position would overflow the grid.
#[must_use]
pub fn input_port_position(position: Point, orientation: Orientation, index: usize) -> Option<Point> {
    let facing = facing_delta(orientation);
    stack_point(position, orientation, facing, index)
}

/// Returns the grid position of output port `index` (0-based), one grid step
/// further along the facing direction than the inputs.
#[must_use]
pub fn output_port_position(position: Point, orientation: Orientation, index: usize) -> Option<Point> {
    let (dx, dy) = facing_delta(orientation);
    let origin = Point::new(Grid::new(position.x.value().checked_add(dx)?)?, Grid::new(position.y.value().checked_add(dy)?)?);
    stack_point(origin, orientation, (dx, dy), index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use logiksim_geometry::Grid;

    fn p(x: i32, y: i32) -> Point {
        Point::new(Grid::new(x).unwrap(), Grid::new(y).unwrap())
    }

    #[test]
    fn inputs_stack_perpendicular_to_facing() {
        let position = p(5, 5);
        assert_eq!(input_port_position(position, Orientation::Right, 0), Some(p(5, 5)));
        assert_eq!(input_port_position(position, Orientation::Right, 1), Some(p(5, 6)));
    }

    #[test]
    fn outputs_sit_one_step_along_facing() {
        let position = p(5, 5);
        assert_eq!(output_port_position(position, Orientation::Right, 0), Some(p(6, 5)));
        assert_eq!(output_port_position(position, Orientation::Down, 0), Some(p(5, 6)));
    }
}
