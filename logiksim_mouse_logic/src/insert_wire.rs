// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag-to-draw state machine for a single two-leg wire.

use logiksim_editing::{
    add_wire_segment, change_wire_insertion_mode, delete_temporary_segment, CircuitData,
    InsertionHint, InsertionMode,
};
use logiksim_geometry::{OrderedLine, Point, Segment};

/// Which leg of the L-shape is drawn first, fixing the corner point between
/// the horizontal and vertical run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LineInsertionType {
    /// Horizontal run from `p0`, then vertical run to the current point.
    #[default]
    HorizontalFirst,
    /// Vertical run from `p0`, then horizontal run to the current point.
    VerticalFirst,
}

#[derive(Debug)]
struct Tracked {
    p0: Point,
    current: Point,
    legs: Vec<Segment>,
}

/// Draws a wire as an L-shape between a press point and the current pointer
/// position: up to two orthogonal temporary legs are kept alive and
/// recreated on every move, then committed together on release.
#[derive(Debug, Default)]
pub struct InsertWireLogic {
    tracked: Option<Tracked>,
    line_insertion_type: LineInsertionType,
}

fn corner_point(p0: Point, p1: Point, kind: LineInsertionType) -> Point {
    match kind {
        LineInsertionType::HorizontalFirst => Point::new(p1.x, p0.y),
        LineInsertionType::VerticalFirst => Point::new(p0.x, p1.y),
    }
}

fn legs_for(p0: Point, p1: Point, kind: LineInsertionType) -> Vec<OrderedLine> {
    let corner = corner_point(p0, p1, kind);
    let mut legs = Vec::new();
    if let Some(line) = OrderedLine::new(p0, corner) {
        legs.push(line);
    }
    if let Some(line) = OrderedLine::new(corner, p1) {
        legs.push(line);
    }
    legs
}

impl InsertWireLogic {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.tracked.is_some()
    }

    /// Switches which leg is drawn first, re-laying out the in-flight
    /// legs against the current pointer position if a drag is active.
    pub fn set_line_insertion_type(&mut self, circuit: &mut CircuitData, kind: LineInsertionType) {
        self.line_insertion_type = kind;
        if let Some(tracked) = &self.tracked {
            let (p0, current) = (tracked.p0, tracked.current);
            self.rebuild_legs(circuit, p0, current);
        }
    }

    fn clear_legs(&mut self, circuit: &mut CircuitData) {
        if let Some(tracked) = &mut self.tracked {
            for mut segment in std::mem::take(&mut tracked.legs) {
                change_wire_insertion_mode(circuit, &mut segment, InsertionMode::Temporary, InsertionHint::NoHint);
                delete_temporary_segment(circuit, &mut segment);
            }
        }
    }

    fn rebuild_legs(&mut self, circuit: &mut CircuitData, p0: Point, current: Point) {
        self.clear_legs(circuit);
        let legs = legs_for(p0, current, self.line_insertion_type)
            .into_iter()
            .map(|line| add_wire_segment(circuit, line, InsertionMode::Temporary, None))
            .collect();
        self.tracked = Some(Tracked { p0, current, legs });
    }

    /// Starts drawing from `position`, discarding any drag already in
    /// flight.
    pub fn mouse_press(&mut self, circuit: &mut CircuitData, position: Point) {
        self.cancel(circuit);
        self.tracked = Some(Tracked { p0: position, current: position, legs: Vec::new() });
    }

    /// Redraws the in-flight L-shape to end at `position`. A no-op if no
    /// drag is active.
    pub fn mouse_move(&mut self, circuit: &mut CircuitData, position: Point) {
        let Some(tracked) = &self.tracked else { return };
        if tracked.current == position {
            return;
        }
        let p0 = tracked.p0;
        self.rebuild_legs(circuit, p0, position);
    }

    /// Commits both legs of the in-flight L-shape.
    pub fn mouse_release(&mut self, circuit: &mut CircuitData) {
        if let Some(mut tracked) = self.tracked.take() {
            for segment in &mut tracked.legs {
                change_wire_insertion_mode(circuit, segment, InsertionMode::InsertOrDiscard, InsertionHint::NoHint);
            }
        }
    }

    fn cancel(&mut self, circuit: &mut CircuitData) {
        self.clear_legs(circuit);
        self.tracked = None;
    }

    /// Leaves no temporary artifact behind, regardless of which callback ran
    /// last.
    pub fn finalize(&mut self, circuit: &mut CircuitData) {
        self.cancel(circuit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logiksim_geometry::Grid;

    fn p(x: i32, y: i32) -> Point {
        Point::new(Grid::new(x).unwrap(), Grid::new(y).unwrap())
    }

    #[test]
    fn press_then_move_draws_two_orthogonal_legs() {
        let mut circuit = CircuitData::new();
        let mut logic = InsertWireLogic::new();
        logic.mouse_press(&mut circuit, p(0, 0));
        logic.mouse_move(&mut circuit, p(5, 3));
        assert_eq!(logic.tracked.as_ref().unwrap().legs.len(), 2);
    }

    #[test]
    fn release_commits_both_legs() {
        let mut circuit = CircuitData::new();
        let mut logic = InsertWireLogic::new();
        logic.mouse_press(&mut circuit, p(0, 0));
        logic.mouse_move(&mut circuit, p(5, 3));
        logic.mouse_release(&mut circuit);
        assert!(!logic.is_active());
        assert!(!circuit.index.spatial().is_empty());
    }

    #[test]
    fn axis_aligned_drag_draws_a_single_leg() {
        let mut circuit = CircuitData::new();
        let mut logic = InsertWireLogic::new();
        logic.mouse_press(&mut circuit, p(0, 0));
        logic.mouse_move(&mut circuit, p(5, 0));
        assert_eq!(logic.tracked.as_ref().unwrap().legs.len(), 1);
    }

    #[test]
    fn finalize_leaves_no_temporary_artifact() {
        let mut circuit = CircuitData::new();
        let mut logic = InsertWireLogic::new();
        logic.mouse_press(&mut circuit, p(0, 0));
        logic.mouse_move(&mut circuit, p(5, 3));
        logic.finalize(&mut circuit);
        assert!(!logic.is_active());
        assert!(circuit.layout.wires().segment_tree(logiksim_geometry::WireId::TEMPORARY).is_empty());
    }
}
