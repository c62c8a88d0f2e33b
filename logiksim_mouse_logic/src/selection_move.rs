// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag-to-move state machine for an already-placed selection.

use logiksim_editing::{
    change_decoration_insertion_mode, change_logicitem_insertion_mode, change_wire_insertion_mode,
    delete_temporary_decoration, delete_temporary_logicitem, delete_temporary_segment,
    is_decoration_position_representable, is_logicitem_position_representable,
    is_wire_position_representable, move_or_delete_temporary_decoration,
    move_or_delete_temporary_logicitem, move_or_delete_temporary_segment, CircuitData,
    InsertionHint, InsertionMode,
};
use logiksim_geometry::{DecorationId, LogicItemId, MoveDelta, Offset, Part, Point, Segment};
use logiksim_selection::{anything_colliding, Selection};

#[must_use]
fn delta_between(from: Point, to: Point) -> MoveDelta {
    MoveDelta::new(to.x.value() - from.x.value(), to.y.value() - from.y.value())
}

fn relocate_logicitem(circuit: &mut CircuitData, id: &mut LogicItemId, delta: MoveDelta, target: InsertionMode) -> bool {
    if delta.is_zero() {
        change_logicitem_insertion_mode(circuit, id, target, InsertionHint::NoHint);
        return true;
    }
    let representable = is_logicitem_position_representable(&circuit.layout, *id, delta);
    change_logicitem_insertion_mode(circuit, id, InsertionMode::Temporary, InsertionHint::NoHint);
    move_or_delete_temporary_logicitem(circuit, id, delta);
    if representable {
        change_logicitem_insertion_mode(circuit, id, target, InsertionHint::NoHint);
    }
    representable
}

fn relocate_decoration(circuit: &mut CircuitData, id: &mut DecorationId, delta: MoveDelta, target: InsertionMode) -> bool {
    if delta.is_zero() {
        change_decoration_insertion_mode(circuit, id, target, InsertionHint::NoHint);
        return true;
    }
    let representable = is_decoration_position_representable(&circuit.layout, *id, delta);
    change_decoration_insertion_mode(circuit, id, InsertionMode::Temporary, InsertionHint::NoHint);
    move_or_delete_temporary_decoration(circuit, id, delta);
    if representable {
        change_decoration_insertion_mode(circuit, id, target, InsertionHint::NoHint);
    }
    representable
}

fn relocate_segment(circuit: &mut CircuitData, segment: &mut Segment, delta: MoveDelta, target: InsertionMode) -> bool {
    if delta.is_zero() {
        change_wire_insertion_mode(circuit, segment, target, InsertionHint::NoHint);
        return true;
    }
    let representable = is_wire_position_representable(&circuit.layout, *segment, delta);
    change_wire_insertion_mode(circuit, segment, InsertionMode::Temporary, InsertionHint::NoHint);
    move_or_delete_temporary_segment(circuit, segment, delta);
    if representable {
        change_wire_insertion_mode(circuit, segment, target, InsertionHint::NoHint);
    }
    representable
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
enum State {
    #[default]
    WaitingForFirstClick,
    MoveSelection,
    WaitingForConfirmation,
    Finished,
    FinishedConfirmed,
}

#[derive(Debug)]
struct Tracked {
    start_position: Point,
    last_position: Point,
    logicitems: Vec<LogicItemId>,
    decorations: Vec<DecorationId>,
    segments: Vec<Segment>,
}

impl Tracked {
    fn collision_probe(&self) -> Selection {
        let mut selection = Selection::new();
        for &id in &self.logicitems {
            selection.add_logicitem(id);
        }
        for &id in &self.decorations {
            selection.add_decoration(id);
        }
        selection
    }
}

/// Moves the currently selected logic-items, decorations and fully-selected
/// wire segments together as a rigid body while a drag is in flight.
///
/// Elements are kept in `collisions` mode between moves, the same way
/// [`super::insert_logicitem::InsertLogicItemLogic`] keeps its placement
/// live: moving requires `temporary` state, so every step briefly demotes,
/// moves, then promotes back. A segment only moves as a whole; a segment
/// with only part of its length selected is left untouched (no partial-wire
/// dragging).
#[derive(Debug, Default)]
pub struct SelectionMoveLogic {
    state: State,
    delete_on_cancel: bool,
    tracked: Option<Tracked>,
}

fn commit(circuit: &mut CircuitData, tracked: &Tracked, hint: InsertionHint) {
    for &id in &tracked.logicitems {
        let mut id = id;
        change_logicitem_insertion_mode(circuit, &mut id, InsertionMode::InsertOrDiscard, hint);
    }
    for &id in &tracked.decorations {
        let mut id = id;
        change_decoration_insertion_mode(circuit, &mut id, InsertionMode::InsertOrDiscard, hint);
    }
    for &segment in &tracked.segments {
        let mut segment = segment;
        change_wire_insertion_mode(circuit, &mut segment, InsertionMode::InsertOrDiscard, InsertionHint::NoHint);
    }
}

fn restore(circuit: &mut CircuitData, tracked: &Tracked) {
    let delta = delta_between(tracked.last_position, tracked.start_position);
    for &id in &tracked.logicitems {
        let mut id = id;
        relocate_logicitem(circuit, &mut id, delta, InsertionMode::InsertOrDiscard);
    }
    for &id in &tracked.decorations {
        let mut id = id;
        relocate_decoration(circuit, &mut id, delta, InsertionMode::InsertOrDiscard);
    }
    for &segment in &tracked.segments {
        let mut segment = segment;
        relocate_segment(circuit, &mut segment, delta, InsertionMode::InsertOrDiscard);
    }
}

fn delete_all(circuit: &mut CircuitData, tracked: &Tracked) {
    for &id in &tracked.logicitems {
        let mut id = id;
        change_logicitem_insertion_mode(circuit, &mut id, InsertionMode::Temporary, InsertionHint::NoHint);
        delete_temporary_logicitem(circuit, &mut id);
    }
    for &id in &tracked.decorations {
        let mut id = id;
        change_decoration_insertion_mode(circuit, &mut id, InsertionMode::Temporary, InsertionHint::NoHint);
        delete_temporary_decoration(circuit, &mut id);
    }
    for &segment in &tracked.segments {
        let mut segment = segment;
        change_wire_insertion_mode(circuit, &mut segment, InsertionMode::Temporary, InsertionHint::NoHint);
        delete_temporary_segment(circuit, &mut segment);
    }
}

impl SelectionMoveLogic {
    #[must_use]
    pub fn new(delete_on_cancel: bool) -> Self {
        Self { state: State::default(), delete_on_cancel, tracked: None }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.tracked.is_some()
    }

    /// `true` once the drag has committed or discarded, either directly or
    /// via [`Self::confirm`].
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.state, State::Finished | State::FinishedConfirmed)
    }

    /// `true` while release is waiting on a [`Self::confirm`] call because
    /// the moved selection still overlaps something.
    #[must_use]
    pub fn is_waiting_for_confirmation(&self) -> bool {
        self.state == State::WaitingForConfirmation
    }

    /// Snapshots the currently visible selection and lifts it into
    /// `collisions` mode, ready to be dragged. A no-op outside the initial
    /// state.
    pub fn mouse_press(&mut self, circuit: &mut CircuitData, position: Point) {
        if self.state != State::WaitingForFirstClick {
            return;
        }
        let selection = circuit.visible_selection.selection(&circuit.layout, &circuit.index).clone();

        let mut logicitems: Vec<LogicItemId> = selection.selected_logicitems().collect();
        let mut decorations: Vec<DecorationId> = selection.selected_decorations().collect();
        let mut segments: Vec<Segment> = selection
            .selected_segments()
            .filter_map(|(segment, parts)| {
                let line = logiksim_layout::get_line(segment, &circuit.layout);
                let whole = Part::new(Offset::ZERO, Offset::new(line.length()))
                    .expect("a real segment is never zero-length");
                let mut iter = parts.iter();
                let only = iter.next()?;
                (iter.next().is_none() && only == whole).then_some(segment)
            })
            .collect();

        for id in &mut logicitems {
            change_logicitem_insertion_mode(circuit, id, InsertionMode::Collisions, InsertionHint::NoHint);
        }
        for id in &mut decorations {
            change_decoration_insertion_mode(circuit, id, InsertionMode::Collisions, InsertionHint::NoHint);
        }
        for segment in &mut segments {
            change_wire_insertion_mode(circuit, segment, InsertionMode::Collisions, InsertionHint::NoHint);
        }

        self.tracked = Some(Tracked { start_position: position, last_position: position, logicitems, decorations, segments });
        self.state = State::MoveSelection;
    }

    /// Drags the selection to `position`. A no-op outside `move_selection`.
    pub fn mouse_move(&mut self, circuit: &mut CircuitData, position: Point) {
        if self.state != State::MoveSelection {
            return;
        }
        let Some(tracked) = &mut self.tracked else { return };
        if tracked.last_position == position {
            return;
        }
        let delta = delta_between(tracked.last_position, position);
        tracked.logicitems.retain_mut(|id| relocate_logicitem(circuit, id, delta, InsertionMode::Collisions));
        tracked.decorations.retain_mut(|id| relocate_decoration(circuit, id, delta, InsertionMode::Collisions));
        tracked.segments.retain_mut(|segment| relocate_segment(circuit, segment, delta, InsertionMode::Collisions));
        tracked.last_position = position;
    }

    /// Commits the move if nothing collides, otherwise waits for
    /// [`Self::confirm`].
    pub fn mouse_release(&mut self, circuit: &mut CircuitData) {
        if self.state != State::MoveSelection {
            return;
        }
        let Some(tracked) = self.tracked.take() else { return };
        if anything_colliding(&tracked.collision_probe(), &circuit.layout) {
            self.tracked = Some(tracked);
            self.state = State::WaitingForConfirmation;
            return;
        }
        commit(circuit, &tracked, InsertionHint::ExpectValid);
        self.state = State::Finished;
    }

    /// Commits a move that is still colliding, discarding whichever
    /// elements still overlap something.
    pub fn confirm(&mut self, circuit: &mut CircuitData) {
        if self.state != State::WaitingForConfirmation {
            return;
        }
        let Some(tracked) = self.tracked.take() else { return };
        commit(circuit, &tracked, InsertionHint::NoHint);
        self.state = State::FinishedConfirmed;
    }

    /// Leaves no temporary artifact behind, regardless of which callback ran
    /// last: already-finished moves are untouched, an in-flight or
    /// unconfirmed move is restored to its starting position (or deleted,
    /// if `delete_on_cancel`).
    pub fn finalize(&mut self, circuit: &mut CircuitData) {
        let Some(tracked) = self.tracked.take() else { return };
        if self.delete_on_cancel {
            delete_all(circuit, &tracked);
        } else {
            restore(circuit, &tracked);
        }
        self.state = State::Finished;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logiksim_geometry::{Grid, Orientation};
    use logiksim_layout::{DisplayState, LogicItemDefinition, LogicItemType};

    fn p(x: i32, y: i32) -> Point {
        Point::new(Grid::new(x).unwrap(), Grid::new(y).unwrap())
    }

    fn sample_definition() -> LogicItemDefinition {
        LogicItemDefinition {
            logicitem_type: LogicItemType::And,
            input_count: 2,
            output_count: 1,
            orientation: Orientation::Right,
            sub_circuit_id: -1,
            input_inverters: Default::default(),
            output_inverters: Default::default(),
            attrs_clock_generator: None,
        }
    }

    fn place_item(circuit: &mut CircuitData, position: Point) -> LogicItemId {
        logiksim_editing::add_logicitem(circuit, sample_definition(), position, InsertionMode::InsertOrDiscard, None)
    }

    fn select(circuit: &mut CircuitData, id: LogicItemId) {
        circuit.visible_selection.modify_initial_selection(|selection| selection.add_logicitem(id));
    }

    #[test]
    fn press_lifts_the_selection_into_collisions_mode() {
        let mut circuit = CircuitData::new();
        let id = place_item(&mut circuit, p(0, 0));
        select(&mut circuit, id);

        let mut logic = SelectionMoveLogic::new(false);
        logic.mouse_press(&mut circuit, p(0, 0));
        assert!(logic.is_active());
    }

    #[test]
    fn release_without_collision_commits_immediately() {
        let mut circuit = CircuitData::new();
        let id = place_item(&mut circuit, p(0, 0));
        select(&mut circuit, id);

        let mut logic = SelectionMoveLogic::new(false);
        logic.mouse_press(&mut circuit, p(0, 0));
        logic.mouse_move(&mut circuit, p(5, 5));
        logic.mouse_release(&mut circuit);

        assert!(logic.is_finished());
        assert!(!logic.is_waiting_for_confirmation());
    }

    #[test]
    fn release_onto_a_collision_waits_for_confirmation_then_discards() {
        let mut circuit = CircuitData::new();
        let moving = place_item(&mut circuit, p(0, 0));
        let obstacle = place_item(&mut circuit, p(5, 5));
        select(&mut circuit, moving);

        let mut logic = SelectionMoveLogic::new(false);
        logic.mouse_press(&mut circuit, p(0, 0));
        logic.mouse_move(&mut circuit, p(5, 5));
        logic.mouse_release(&mut circuit);

        assert!(logic.is_waiting_for_confirmation());
        logic.confirm(&mut circuit);
        assert!(logic.is_finished());

        assert_eq!(circuit.layout.logicitems().display_state(obstacle), DisplayState::Normal);
    }

    #[test]
    fn finalize_restores_the_original_position_when_not_confirmed() {
        let mut circuit = CircuitData::new();
        let id = place_item(&mut circuit, p(0, 0));
        select(&mut circuit, id);

        let mut logic = SelectionMoveLogic::new(false);
        logic.mouse_press(&mut circuit, p(0, 0));
        logic.mouse_move(&mut circuit, p(5, 5));
        logic.finalize(&mut circuit);

        assert!(!logic.is_active());
        assert_eq!(circuit.layout.logicitems().position(id), p(0, 0));
        assert_eq!(circuit.layout.logicitems().display_state(id), DisplayState::Normal);
    }

    #[test]
    fn finalize_deletes_the_selection_when_delete_on_cancel() {
        let mut circuit = CircuitData::new();
        let id = place_item(&mut circuit, p(0, 0));
        select(&mut circuit, id);

        let mut logic = SelectionMoveLogic::new(true);
        logic.mouse_press(&mut circuit, p(0, 0));
        logic.mouse_move(&mut circuit, p(5, 5));
        logic.finalize(&mut circuit);

        assert!(!logic.is_active());
        assert_eq!(circuit.layout.logicitems().size(), 0);
    }
}
