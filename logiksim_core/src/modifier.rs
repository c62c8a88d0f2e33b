// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`Circuit`]: the owned aggregate of one editable circuit's state.
//! [`Modifier`]: the borrowing handle through which every edit happens,
//! translating caller-facing arguments into the single-id primitives
//! `logiksim_editing` provides and turning a primitive's own panic-worthy
//! preconditions into a typed [`StateViolation`] in release builds.

use logiksim_editing::{
    add_decoration, add_decoration_to_visible_selection, add_logicitem, add_logicitem_to_visible_selection,
    add_segment_to_visible_selection, add_wire_segment, change_decoration_insertion_mode, change_logicitem_insertion_mode,
    change_wire_insertion_mode, decoration_colliding_to_insert, decoration_colliding_to_temporary,
    decoration_insert_to_colliding, decoration_temporary_to_colliding, delete_temporary_decoration,
    delete_temporary_logicitem, delete_temporary_segment, logicitem_colliding_to_insert, logicitem_colliding_to_temporary,
    logicitem_insert_to_colliding, logicitem_temporary_to_colliding, move_or_delete_temporary_decoration,
    move_or_delete_temporary_logicitem, move_or_delete_temporary_segment, regularize_temporary_selection as regularize_segments,
    remove_decoration_from_visible_selection, remove_logicitem_from_visible_selection, remove_segment_from_visible_selection,
    segment_colliding_to_insert, segment_colliding_to_temporary, segment_insert_to_colliding, segment_temporary_to_colliding,
    set_attributes_decoration, set_attributes_logicitem, split_temporary_before_insert as split_segment,
    CircuitData, InsertionHint, InsertionMode,
};
use logiksim_geometry::{DecorationId, LogicItemId, MoveDelta, OrderedLine, Point, Segment, SegmentPointType, SelectionId, WireId};
use logiksim_history::{DecorationRecord, LogicItemRecord, Record, SegmentRecord};
use logiksim_layout::{ClockGeneratorAttributes, DecorationDefinition, Layout, LogicItemDefinition, TextElementAttributes};
use logiksim_messages::Key;
use logiksim_selection::Selection;

use crate::error::{EditError, StateViolation};
use crate::format::{is_clock_timing_in_range, CLOCK_NAME_MAX_LEN, TEXT_ELEMENT_MAX_LEN};
use crate::selection_registry::SelectionRegistry;

/// One editable circuit: the layout, its indices, its undo/redo history and
/// named selections. Owns everything a [`Modifier`] borrows to make an edit.
#[derive(Clone, Debug, Default)]
pub struct Circuit {
    data: CircuitData,
    selections: SelectionRegistry,
}

impl Circuit {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.data.layout
    }

    /// Materializes and returns the currently visible selection: the base
    /// selection plus whatever rubber-band operations have been applied on
    /// top of it.
    pub fn visible_selection(&mut self) -> &Selection {
        self.data.visible_selection.selection(&self.data.layout, &self.data.index)
    }

    #[must_use]
    pub fn is_history_enabled(&self) -> bool {
        self.data.history.is_enabled()
    }

    /// Borrows a [`Modifier`] through which to make edits.
    pub fn modifier(&mut self) -> Modifier<'_> {
        Modifier { data: &mut self.data, selections: &mut self.selections }
    }

    /// Borrows the underlying [`CircuitData`] directly, bypassing
    /// [`Modifier`]'s selection-aware batch operations and validation.
    ///
    /// A mouse-logic drag state machine (`InsertLogicItemLogic`,
    /// `InsertWireLogic`, `SelectionMoveLogic`) drives its own single-id
    /// `logiksim_editing` calls through a live drag and only needs the
    /// `Modifier` facade once the drag is confirmed and its own history
    /// group should be closed; this accessor is how it gets at the data in
    /// between without `logiksim_core` having to depend on the tool crate.
    pub fn data_mut(&mut self) -> &mut CircuitData {
        &mut self.data
    }
}

/// The borrowing facade every edit goes through. Batch operations
/// (`change_insertion_mode`, `delete_all`, `move_or_delete_temporary`, ...)
/// take a [`SelectionId`] and dispatch to the single-id primitives for every
/// logic-item, decoration and segment part it names.
pub struct Modifier<'a> {
    data: &'a mut CircuitData,
    selections: &'a mut SelectionRegistry,
}

impl Modifier<'_> {
    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.data.layout
    }

    pub fn create_selection(&mut self) -> SelectionId {
        self.selections.create()
    }

    pub fn destroy_selection(&mut self, id: SelectionId) {
        self.selections.destroy(id);
    }

    #[must_use]
    pub fn selection_exists(&self, id: SelectionId) -> bool {
        self.selections.exists(id)
    }

    pub fn selection(&self, id: SelectionId) -> Result<&Selection, EditError> {
        self.selections.get(id).ok_or(EditError::UnknownSelection)
    }

    /// Replaces the base state of `id`'s selection wholesale.
    pub fn set_selection(&mut self, id: SelectionId, selection: Selection) -> Result<(), EditError> {
        *self.selections.get_mut(id).ok_or(EditError::UnknownSelection)? = selection;
        Ok(())
    }

    /// Replaces the currently visible selection's base state.
    pub fn set_visible_selection(&mut self, selection: Selection) {
        self.data.visible_selection.set_initial_selection(selection);
    }

    pub fn add_logicitem_to_visible_selection(&mut self, id: LogicItemId) {
        add_logicitem_to_visible_selection(self.data, id);
    }

    pub fn remove_logicitem_from_visible_selection(&mut self, id: LogicItemId) {
        remove_logicitem_from_visible_selection(self.data, id);
    }

    pub fn add_decoration_to_visible_selection(&mut self, id: DecorationId) {
        add_decoration_to_visible_selection(self.data, id);
    }

    pub fn remove_decoration_from_visible_selection(&mut self, id: DecorationId) {
        remove_decoration_from_visible_selection(self.data, id);
    }

    pub fn add_segment_to_visible_selection(&mut self, segment: Segment, part: logiksim_geometry::Part) {
        add_segment_to_visible_selection(self.data, segment, part);
    }

    pub fn remove_segment_from_visible_selection(&mut self, segment: Segment, part: logiksim_geometry::Part) {
        remove_segment_from_visible_selection(self.data, segment, part);
    }

    /// Places a fresh logic-item, rejecting a structurally inconsistent
    /// definition before it ever reaches the layout.
    pub fn add_logicitem(
        &mut self,
        definition: LogicItemDefinition,
        position: Point,
        insertion_mode: InsertionMode,
    ) -> Result<LogicItemId, EditError> {
        validate_inverter_count(definition.input_count.into(), definition.input_inverters.len())?;
        validate_inverter_count(definition.output_count.into(), definition.output_inverters.len())?;
        if let Some(attrs) = &definition.attrs_clock_generator {
            validate_clock_generator_attrs(attrs)?;
        }
        Ok(add_logicitem(self.data, definition, position, insertion_mode, None))
    }

    pub fn add_decoration(
        &mut self,
        definition: DecorationDefinition,
        position: Point,
        insertion_mode: InsertionMode,
    ) -> Result<DecorationId, EditError> {
        if let Some(attrs) = &definition.attrs_text_element {
            validate_text_element_attrs(attrs)?;
        }
        Ok(add_decoration(self.data, definition, position, insertion_mode, None))
    }

    /// Places a fresh wire segment between `p0` and `p1`, rejecting a
    /// diagonal or zero-length line before it ever reaches the layout.
    pub fn add_wire_segment(&mut self, p0: Point, p1: Point, insertion_mode: InsertionMode) -> Result<Segment, EditError> {
        let line = OrderedLine::new(p0, p1).ok_or(EditError::NonOrthogonalLine)?;
        Ok(add_wire_segment(self.data, line, insertion_mode, None))
    }

    pub fn toggle_inverter(&mut self, point: Point) {
        logiksim_editing::toggle_inverter(self.data, point);
    }

    pub fn set_attributes_logicitem(&mut self, id: LogicItemId, attrs: ClockGeneratorAttributes) -> Result<(), EditError> {
        validate_clock_generator_attrs(&attrs)?;
        set_attributes_logicitem(self.data, id, attrs);
        Ok(())
    }

    pub fn set_attributes_decoration(&mut self, id: DecorationId, attrs: TextElementAttributes) -> Result<(), EditError> {
        validate_text_element_attrs(&attrs)?;
        set_attributes_decoration(self.data, id, attrs);
        Ok(())
    }

    /// Drives every entity named by `selection_id` to `mode`, following the
    /// usual `temporary -> colliding -> insert` chain.
    pub fn change_insertion_mode(&mut self, selection_id: SelectionId, mode: InsertionMode) -> Result<(), EditError> {
        let (logicitems, decorations, segments) = self.selection_members(selection_id)?;

        for mut id in logicitems {
            change_logicitem_insertion_mode(self.data, &mut id, mode, InsertionHint::NoHint);
        }
        for mut id in decorations {
            change_decoration_insertion_mode(self.data, &mut id, mode, InsertionHint::NoHint);
        }
        for mut segment in segments {
            change_wire_insertion_mode(self.data, &mut segment, mode, InsertionHint::NoHint);
        }
        Ok(())
    }

    /// Deletes every entity named by `selection_id`, driving each to
    /// `Temporary` state first if it isn't already there.
    pub fn delete_all(&mut self, selection_id: SelectionId) -> Result<(), EditError> {
        let (logicitems, decorations, segments) = self.selection_members(selection_id)?;

        for mut id in logicitems {
            change_logicitem_insertion_mode(self.data, &mut id, InsertionMode::Temporary, InsertionHint::NoHint);
            delete_temporary_logicitem(self.data, &mut id);
        }
        for mut id in decorations {
            change_decoration_insertion_mode(self.data, &mut id, InsertionMode::Temporary, InsertionHint::NoHint);
            delete_temporary_decoration(self.data, &mut id);
        }
        for mut segment in segments {
            change_wire_insertion_mode(self.data, &mut segment, InsertionMode::Temporary, InsertionHint::NoHint);
            delete_temporary_segment(self.data, &mut segment);
        }
        Ok(())
    }

    /// Translates every temporary entity named by `selection_id` by `delta`,
    /// deleting whichever ones `delta` would carry off the representable
    /// grid. Non-temporary members are left untouched.
    pub fn move_or_delete_temporary(&mut self, selection_id: SelectionId, delta: MoveDelta) -> Result<(), EditError> {
        let (logicitems, decorations, segments) = self.selection_members(selection_id)?;

        for mut id in logicitems {
            if self.data.layout.logicitems().display_state(id) == logiksim_layout::DisplayState::Temporary {
                move_or_delete_temporary_logicitem(self.data, &mut id, delta);
            }
        }
        for mut id in decorations {
            if self.data.layout.decorations().display_state(id) == logiksim_layout::DisplayState::Temporary {
                move_or_delete_temporary_decoration(self.data, &mut id, delta);
            }
        }
        for mut segment in segments {
            if segment.wire_id == WireId::TEMPORARY {
                move_or_delete_temporary_segment(self.data, &mut segment, delta);
            }
        }
        Ok(())
    }

    /// Reclassifies the endpoints of every inserted segment named by
    /// `selection_id` based on how many other inserted segments meet there,
    /// returning the points that became a cross-point as a result.
    pub fn regularize_temporary_selection(&mut self, selection_id: SelectionId) -> Result<Vec<Point>, EditError> {
        let (_, _, segments) = self.selection_members(selection_id)?;
        regularize_segments(self.data, &segments);

        let mut cross_points = Vec::new();
        for segment in segments {
            if !segment.wire_id.is_inserted() {
                continue;
            }
            let info = self.data.layout.wires().segment_tree(segment.wire_id).segment_info(segment.segment_index);
            for (point, point_type) in [(info.line().p0(), info.p0_type()), (info.line().p1(), info.p1_type())] {
                if point_type == SegmentPointType::CrossPoint && !cross_points.contains(&point) {
                    cross_points.push(point);
                }
            }
        }
        Ok(cross_points)
    }

    /// Splits every temporary segment named by `selection_id` at the points
    /// where an already-inserted wire's endpoint lies strictly on its
    /// interior, so the later insert pass lands a proper T-junction there
    /// instead of two wires crossing without connecting.
    pub fn split_temporary_before_insert(&mut self, selection_id: SelectionId) -> Result<Vec<Segment>, EditError> {
        let (_, _, segments) = self.selection_members(selection_id)?;
        let mut created = Vec::new();

        for segment in segments {
            if segment.wire_id != WireId::TEMPORARY {
                continue;
            }
            let line = self.data.layout.wires().segment_tree(WireId::TEMPORARY).segment_info(segment.segment_index).line();
            for point in t_junction_points(self.data, line) {
                if let Some(second) = split_segment(self.data, segment, point) {
                    created.push(second);
                }
            }
        }
        Ok(created)
    }

    pub fn begin_group(&mut self) {
        if let Some(stack) = self.data.history.get_stack_mut() {
            stack.begin_group();
        }
    }

    pub fn end_group(&mut self) {
        if let Some(stack) = self.data.history.get_stack_mut() {
            stack.end_group();
        }
    }

    pub fn enable_history(&mut self) {
        self.data.history.enable();
    }

    pub fn disable_history(&mut self) {
        self.data.history.disable();
    }

    /// Pops and replays the most recent undo group, in reverse order.
    ///
    /// # Errors
    ///
    /// Returns [`StateViolation`] if there is nothing to undo.
    pub fn undo_group(&mut self) -> Result<(), StateViolation> {
        let Some(stack) = self.data.history.get_stack_mut() else {
            return Err(StateViolation("history is disabled"));
        };
        let Some(group) = stack.pop_undo_group() else {
            return Err(StateViolation("nothing to undo"));
        };
        self.replay_group(group);
        Ok(())
    }

    /// Pops and replays the most recent redo group, in reverse order.
    ///
    /// # Errors
    ///
    /// Returns [`StateViolation`] if there is nothing to redo.
    pub fn redo_group(&mut self) -> Result<(), StateViolation> {
        let Some(stack) = self.data.history.get_stack_mut() else {
            return Err(StateViolation("history is disabled"));
        };
        let Some(group) = stack.pop_redo_group() else {
            return Err(StateViolation("nothing to redo"));
        };
        self.replay_group(group);
        Ok(())
    }

    /// Applies every record in `group`, latest-first: a group records the
    /// forward edit's steps in the order they happened, so undoing it has
    /// to run its inverses back to front to invert the composition
    /// correctly.
    fn replay_group(&mut self, group: Vec<Record>) {
        if let Some(stack) = self.data.history.get_stack_mut() {
            stack.begin_group();
        }
        for record in group.into_iter().rev() {
            self.replay_record(record);
        }
        if let Some(stack) = self.data.history.get_stack_mut() {
            stack.end_group();
            stack.finish_replay();
        }
    }

    fn replay_record(&mut self, record: Record) {
        match record {
            Record::LogicItem(key, record) => self.replay_logicitem_record(key, record),
            Record::Decoration(key, record) => self.replay_decoration_record(key, record),
            Record::Segment(key, record) => self.replay_segment_record(key, record),
        }
    }

    fn replay_logicitem_record(&mut self, key: Key, record: LogicItemRecord) {
        match record {
            LogicItemRecord::AddToVisibleSelection => {
                if let Some(id) = self.data.logicitem_id_for_key(key) {
                    add_logicitem_to_visible_selection(self.data, id);
                }
            }
            LogicItemRecord::RemoveFromVisibleSelection => {
                if let Some(id) = self.data.logicitem_id_for_key(key) {
                    remove_logicitem_from_visible_selection(self.data, id);
                }
            }
            LogicItemRecord::CreateTemporary(placed) => {
                add_logicitem(self.data, placed.definition, placed.position, InsertionMode::Temporary, Some(key));
            }
            LogicItemRecord::DeleteTemporary => {
                if let Some(mut id) = self.data.logicitem_id_for_key(key) {
                    delete_temporary_logicitem(self.data, &mut id);
                }
            }
            LogicItemRecord::MoveTemporary(delta) => {
                if let Some(id) = self.data.logicitem_id_for_key(key) {
                    logiksim_editing::move_temporary_logicitem_unchecked(self.data, id, delta);
                }
            }
            LogicItemRecord::CollidingToTemporary => {
                if let Some(id) = self.data.logicitem_id_for_key(key) {
                    logicitem_colliding_to_temporary(self.data, id);
                }
            }
            LogicItemRecord::TemporaryToCollidingExpectValid => {
                if let Some(id) = self.data.logicitem_id_for_key(key) {
                    logicitem_temporary_to_colliding(self.data, id, InsertionHint::ExpectValid);
                }
            }
            LogicItemRecord::TemporaryToCollidingAssumeColliding => {
                if let Some(id) = self.data.logicitem_id_for_key(key) {
                    logicitem_temporary_to_colliding(self.data, id, InsertionHint::AssumeColliding);
                }
            }
            LogicItemRecord::InsertToCollidingExpectValid => {
                if let Some(id) = self.data.logicitem_id_for_key(key) {
                    logicitem_insert_to_colliding(self.data, id);
                }
            }
            LogicItemRecord::CollidingToInsert => {
                if let Some(id) = self.data.logicitem_id_for_key(key) {
                    logicitem_colliding_to_insert(self.data, id, InsertionHint::NoHint);
                }
            }
            LogicItemRecord::ChangeAttributes(attrs) => {
                if let Some(id) = self.data.logicitem_id_for_key(key) {
                    set_attributes_logicitem(self.data, id, attrs);
                }
            }
        }
    }

    fn replay_decoration_record(&mut self, key: Key, record: DecorationRecord) {
        match record {
            DecorationRecord::AddToVisibleSelection => {
                if let Some(id) = self.data.decoration_id_for_key(key) {
                    add_decoration_to_visible_selection(self.data, id);
                }
            }
            DecorationRecord::RemoveFromVisibleSelection => {
                if let Some(id) = self.data.decoration_id_for_key(key) {
                    remove_decoration_from_visible_selection(self.data, id);
                }
            }
            DecorationRecord::CreateTemporary(placed) => {
                add_decoration(self.data, placed.definition, placed.position, InsertionMode::Temporary, Some(key));
            }
            DecorationRecord::DeleteTemporary => {
                if let Some(mut id) = self.data.decoration_id_for_key(key) {
                    delete_temporary_decoration(self.data, &mut id);
                }
            }
            DecorationRecord::MoveTemporary(delta) => {
                if let Some(id) = self.data.decoration_id_for_key(key) {
                    logiksim_editing::move_temporary_decoration_unchecked(self.data, id, delta);
                }
            }
            DecorationRecord::CollidingToTemporary => {
                if let Some(id) = self.data.decoration_id_for_key(key) {
                    decoration_colliding_to_temporary(self.data, id);
                }
            }
            DecorationRecord::TemporaryToCollidingExpectValid => {
                if let Some(id) = self.data.decoration_id_for_key(key) {
                    decoration_temporary_to_colliding(self.data, id, InsertionHint::ExpectValid);
                }
            }
            DecorationRecord::TemporaryToCollidingAssumeColliding => {
                if let Some(id) = self.data.decoration_id_for_key(key) {
                    decoration_temporary_to_colliding(self.data, id, InsertionHint::AssumeColliding);
                }
            }
            DecorationRecord::InsertToCollidingExpectValid => {
                if let Some(id) = self.data.decoration_id_for_key(key) {
                    decoration_insert_to_colliding(self.data, id);
                }
            }
            DecorationRecord::CollidingToInsert => {
                if let Some(id) = self.data.decoration_id_for_key(key) {
                    decoration_colliding_to_insert(self.data, id);
                }
            }
            DecorationRecord::ChangeAttributes(attrs) => {
                if let Some(id) = self.data.decoration_id_for_key(key) {
                    set_attributes_decoration(self.data, id, attrs);
                }
            }
        }
    }

    fn replay_segment_record(&mut self, key: Key, record: SegmentRecord) {
        match record {
            SegmentRecord::AddToVisibleSelection(part) => {
                if let Some(segment) = self.data.segment_id_for_key(key) {
                    add_segment_to_visible_selection(self.data, segment, part);
                }
            }
            SegmentRecord::RemoveFromVisibleSelection(part) => {
                if let Some(segment) = self.data.segment_id_for_key(key) {
                    remove_segment_from_visible_selection(self.data, segment, part);
                }
            }
            SegmentRecord::CreateTemporary(line) => {
                add_wire_segment(self.data, line, InsertionMode::Temporary, Some(key));
            }
            SegmentRecord::DeleteTemporary => {
                if let Some(mut segment) = self.data.segment_id_for_key(key) {
                    delete_temporary_segment(self.data, &mut segment);
                }
            }
            SegmentRecord::MoveTemporary(delta) => {
                if let Some(segment) = self.data.segment_id_for_key(key) {
                    logiksim_editing::move_temporary_segment_unchecked(self.data, segment, delta);
                }
            }
            SegmentRecord::CollidingToTemporary => {
                if let Some(mut segment) = self.data.segment_id_for_key(key) {
                    segment_colliding_to_temporary(self.data, &mut segment);
                }
            }
            SegmentRecord::TemporaryToCollidingExpectValid => {
                if let Some(mut segment) = self.data.segment_id_for_key(key) {
                    segment_temporary_to_colliding(self.data, &mut segment, InsertionHint::ExpectValid);
                }
            }
            SegmentRecord::TemporaryToCollidingAssumeColliding => {
                if let Some(mut segment) = self.data.segment_id_for_key(key) {
                    segment_temporary_to_colliding(self.data, &mut segment, InsertionHint::AssumeColliding);
                }
            }
            SegmentRecord::InsertToCollidingExpectValid => {
                if let Some(mut segment) = self.data.segment_id_for_key(key) {
                    segment_insert_to_colliding(self.data, &mut segment);
                }
            }
            SegmentRecord::CollidingToInsert => {
                if let Some(mut segment) = self.data.segment_id_for_key(key) {
                    segment_colliding_to_insert(self.data, &mut segment);
                }
            }
        }
    }

    /// Snapshots `selection_id`'s current members as owned vectors, so the
    /// caller can mutate `self.data` freely afterward without holding a
    /// borrow of `self.selections`.
    #[allow(clippy::type_complexity)]
    fn selection_members(
        &self,
        selection_id: SelectionId,
    ) -> Result<(Vec<LogicItemId>, Vec<DecorationId>, Vec<Segment>), EditError> {
        let selection = self.selections.get(selection_id).ok_or(EditError::UnknownSelection)?;
        Ok((
            selection.selected_logicitems().collect(),
            selection.selected_decorations().collect(),
            // Drops the per-segment `PartSelection`: every batch operation below
            // drives a whole segment's insertion mode at once. A selection that
            // covers only part of a segment is rounded up to the whole thing;
            // see `change_wire_insertion_mode`'s doc for the consequence.
            selection.selected_segments().map(|(segment, _)| segment).collect(),
        ))
    }
}

fn validate_inverter_count(expected: usize, found: usize) -> Result<(), EditError> {
    if found != 0 && found != expected {
        return Err(EditError::InverterCountMismatch { expected, found });
    }
    Ok(())
}

fn validate_clock_generator_attrs(attrs: &ClockGeneratorAttributes) -> Result<(), EditError> {
    if attrs.name.len() > CLOCK_NAME_MAX_LEN {
        return Err(EditError::ClockGeneratorNameTooLong { found: attrs.name.len() });
    }
    for (field, value) in [
        ("time_symmetric_ns", attrs.time_symmetric_ns),
        ("time_on_ns", attrs.time_on_ns),
        ("time_off_ns", attrs.time_off_ns),
    ] {
        if !is_clock_timing_in_range(value) {
            return Err(EditError::ClockTimingOutOfRange { field });
        }
    }
    Ok(())
}

fn validate_text_element_attrs(attrs: &TextElementAttributes) -> Result<(), EditError> {
    if attrs.text.len() > TEXT_ELEMENT_MAX_LEN {
        return Err(EditError::TextTooLong { found: attrs.text.len() });
    }
    Ok(())
}

/// Finds every point where an already-inserted wire's endpoint lies
/// strictly on the interior of `line`: the places a later insert should
/// split `line` at to land a proper T-junction.
fn t_junction_points(data: &CircuitData, line: OrderedLine) -> Vec<Point> {
    let mut points = Vec::new();
    let first = WireId::FIRST_INSERTED.index();
    for wire_id in (first..data.layout.wires().size()).map(WireId::new) {
        for (_, info) in data.layout.wires().segment_tree(wire_id).iter() {
            for point in [info.line().p0(), info.line().p1()] {
                if point != line.p0() && point != line.p1() && line.contains_point(point) && !points.contains(&point) {
                    points.push(point);
                }
            }
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use logiksim_geometry::{Grid, Orientation};
    use logiksim_layout::LogicItemType;
    use smallvec::SmallVec;

    fn p(x: i32, y: i32) -> Point {
        Point::new(Grid::new(x).unwrap(), Grid::new(y).unwrap())
    }

    fn sample_definition() -> LogicItemDefinition {
        LogicItemDefinition {
            logicitem_type: LogicItemType::And,
            input_count: 2,
            output_count: 1,
            orientation: Orientation::Right,
            sub_circuit_id: 0,
            input_inverters: SmallVec::new(),
            output_inverters: SmallVec::new(),
            attrs_clock_generator: None,
        }
    }

    #[test]
    fn add_logicitem_rejects_a_mismatched_inverter_count() {
        let mut circuit = Circuit::new();
        let mut definition = sample_definition();
        definition.input_inverters = SmallVec::from_vec(vec![true]);
        let err = circuit.modifier().add_logicitem(definition, p(0, 0), InsertionMode::Temporary).unwrap_err();
        assert_eq!(err, EditError::InverterCountMismatch { expected: 2, found: 1 });
    }

    #[test]
    fn add_wire_segment_rejects_a_diagonal_line() {
        let mut circuit = Circuit::new();
        let err = circuit.modifier().add_wire_segment(p(0, 0), p(1, 1), InsertionMode::Temporary).unwrap_err();
        assert_eq!(err, EditError::NonOrthogonalLine);
    }

    #[test]
    fn delete_all_removes_every_selected_member() {
        let mut circuit = Circuit::new();
        let mut modifier = circuit.modifier();
        let selection_id = modifier.create_selection();
        let id = modifier.add_logicitem(sample_definition(), p(0, 0), InsertionMode::InsertOrDiscard).unwrap();
        modifier.set_selection(selection_id, {
            let mut selection = Selection::new();
            selection.add_logicitem(id);
            selection
        }).unwrap();

        modifier.delete_all(selection_id).unwrap();
        assert_eq!(modifier.layout().logicitems().size(), 0);
    }

    #[test]
    fn undo_after_add_removes_it_and_redo_restores_it() {
        let mut circuit = Circuit::new();
        let mut modifier = circuit.modifier();
        modifier.enable_history();
        let id = modifier.add_logicitem(sample_definition(), p(1, 1), InsertionMode::Temporary).unwrap();
        assert_eq!(modifier.layout().logicitems().size(), 1);

        modifier.undo_group().unwrap();
        assert_eq!(modifier.layout().logicitems().size(), 0);

        modifier.redo_group().unwrap();
        assert_eq!(modifier.layout().logicitems().size(), 1);
        let _ = id;
    }

    #[test]
    fn undo_with_nothing_recorded_is_a_state_violation() {
        let mut circuit = Circuit::new();
        let mut modifier = circuit.modifier();
        modifier.enable_history();
        assert!(modifier.undo_group().is_err());
    }

    #[test]
    fn set_attributes_logicitem_rejects_an_out_of_range_timing() {
        let mut circuit = Circuit::new();
        let mut modifier = circuit.modifier();
        let mut definition = sample_definition();
        definition.logicitem_type = LogicItemType::ClockGenerator;
        definition.input_count = 0;
        let id = modifier.add_logicitem(definition, p(0, 0), InsertionMode::Temporary).unwrap();

        let attrs = ClockGeneratorAttributes {
            name: "clk".into(),
            time_symmetric_ns: 0,
            time_on_ns: 1,
            time_off_ns: 1,
            is_symmetric: true,
            show_simulation_controls: false,
        };
        let err = modifier.set_attributes_logicitem(id, attrs).unwrap_err();
        assert_eq!(err, EditError::ClockTimingOutOfRange { field: "time_symmetric_ns" });
    }
}
