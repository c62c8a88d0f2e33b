// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Insertion-mode transitions, placement, and attribute/inverter edits for
//! logic-items.

use logiksim_geometry::{LogicItemId, MoveDelta, Orientation, Point};
use logiksim_index::ConnectionEntry;
use logiksim_layout::{ClockGeneratorAttributes, DisplayState, LogicItemDefinition};
use logiksim_messages::{Key, LayoutMessage, SegmentInfoSnapshot};
use logiksim_selection::Selection;

use crate::insertion::{InsertionHint, InsertionMode};
use crate::{logicitem_insert_data, ports, CircuitData};

fn is_registered_in_index(state: DisplayState) -> bool {
    matches!(state, DisplayState::Valid | DisplayState::Normal)
}

fn store_history_add_visible_selection(circuit: &mut CircuitData, id: LogicItemId) {
    let selected = circuit.visible_selection.initial_selection().is_logicitem_selected(id);
    if selected {
        let key = circuit.logicitem_key(id);
        if let Some(stack) = circuit.history.get_stack_mut() {
            stack.push_logicitem_add_visible_selection(key);
        }
    }
}

fn store_history_remove_visible_selection(circuit: &mut CircuitData, id: LogicItemId) {
    let selected = circuit.visible_selection.initial_selection().is_logicitem_selected(id);
    if !selected {
        let key = circuit.logicitem_key(id);
        if let Some(stack) = circuit.history.get_stack_mut() {
            stack.push_logicitem_remove_visible_selection(key);
        }
    }
}

fn register_connections(circuit: &mut CircuitData, id: LogicItemId) {
    let layout = &circuit.layout;
    let position = layout.logicitems().position(id);
    let orientation = layout.logicitems().orientation(id);
    let input_count = layout.logicitems().input_count(id);
    let output_count = layout.logicitems().output_count(id);
    let connection = circuit.index.connection_mut();
    for i in 0..input_count as usize {
        if let Some(point) = ports::input_port_position(position, orientation, i) {
            connection.insert_logicitem_input(
                point,
                ConnectionEntry { id, connection_id: logiksim_geometry::ConnectionId::new(i), orientation },
            );
        }
    }
    for i in 0..output_count as usize {
        if let Some(point) = ports::output_port_position(position, orientation, i) {
            connection.insert_logicitem_output(
                point,
                ConnectionEntry { id, connection_id: logiksim_geometry::ConnectionId::new(i), orientation },
            );
        }
    }
}

fn unregister_connections(circuit: &mut CircuitData, id: LogicItemId) {
    let layout = &circuit.layout;
    let position = layout.logicitems().position(id);
    let orientation = layout.logicitems().orientation(id);
    let input_count = layout.logicitems().input_count(id);
    let output_count = layout.logicitems().output_count(id);
    let connection = circuit.index.connection_mut();
    for i in 0..input_count as usize {
        if let Some(point) = ports::input_port_position(position, orientation, i) {
            connection.remove_logicitem_input(point);
        }
    }
    for i in 0..output_count as usize {
        if let Some(point) = ports::output_port_position(position, orientation, i) {
            connection.remove_logicitem_output(point);
        }
    }
}

/// Returns `true` if `id`, currently in `Temporary` or `Colliding` state,
/// would collide with something if inserted: its bounding rect overlaps an
/// already-inserted element, or one of its ports coincides with an
/// incompatible connection.
///
/// This is a scoped-down version of the original connectivity check: it
/// does not consider port-orientation compatibility of a coincident wire
/// endpoint, only plain point occupancy.
#[must_use]
fn is_logicitem_colliding(circuit: &CircuitData, id: LogicItemId) -> bool {
    let layout = &circuit.layout;
    let rect = layout.logicitems().bounding_rect(id);
    if !circuit.index.spatial().query_selection(rect).is_empty() {
        return true;
    }

    let position = layout.logicitems().position(id);
    let orientation = layout.logicitems().orientation(id);
    let connection = circuit.index.connection();

    for i in 0..layout.logicitems().input_count(id) as usize {
        let Some(point) = ports::input_port_position(position, orientation, i) else {
            return true;
        };
        if connection.logicitem_input_at(point).is_some() || connection.logicitem_output_at(point).is_some() {
            return true;
        }
    }
    for i in 0..layout.logicitems().output_count(id) as usize {
        let Some(point) = ports::output_port_position(position, orientation, i) else {
            return true;
        };
        if connection.logicitem_output_at(point).is_some() || connection.wire_output_at(point).is_some() {
            return true;
        }
    }
    false
}

fn segment_info_snapshot(info: logiksim_segment_tree::SegmentInfo) -> SegmentInfoSnapshot {
    SegmentInfoSnapshot { line: info.line(), p0_type: info.p0_type(), p1_type: info.p1_type() }
}

/// Reclassifies the wire endpoint at `point`, if any, from `from` to `to`,
/// updating the segment tree, the connection index and announcing an
/// `InsertedEndPointsUpdated` message.
fn reclassify_wire_endpoint(
    circuit: &mut CircuitData,
    point: Point,
    from: logiksim_geometry::SegmentPointType,
    to: logiksim_geometry::SegmentPointType,
) {
    let Some(entry) = (if from == logiksim_geometry::SegmentPointType::Output {
        circuit.index.connection().wire_output_at(point)
    } else {
        circuit.index.connection().wire_input_at(point)
    }) else {
        return;
    };
    let segment = entry.id;
    let tree = circuit.layout.wires_mut().segment_tree_mut(segment.wire_id);
    let old_info = tree.segment_info(segment.segment_index);
    tree.set_point_type(segment.segment_index, point, to);
    let new_info = tree.segment_info(segment.segment_index);

    let connection = circuit.index.connection_mut();
    if from == logiksim_geometry::SegmentPointType::Output {
        connection.remove_wire_output(point);
        connection.insert_wire_input(point, ConnectionEntry { id: segment, connection_id: entry.connection_id, orientation: entry.orientation });
    } else {
        connection.remove_wire_input(point);
        connection.insert_wire_output(point, ConnectionEntry { id: segment, connection_id: entry.connection_id, orientation: entry.orientation });
    }

    circuit.submit(LayoutMessage::InsertedEndPointsUpdated {
        segment,
        old_segment_info: segment_info_snapshot(old_info),
        new_segment_info: segment_info_snapshot(new_info),
    });
}

/// Reclassifies every wire endpoint sitting on one of `id`'s output ports
/// from `Output` to `Input`: once a logic-item output drives that point, the
/// wire there is no longer the thing supplying it.
fn convert_wires_at_outputs_to_inputs(circuit: &mut CircuitData, id: LogicItemId) {
    let layout = &circuit.layout;
    let position = layout.logicitems().position(id);
    let orientation = layout.logicitems().orientation(id);
    let output_count = layout.logicitems().output_count(id);
    let points: Vec<Point> =
        (0..output_count as usize).filter_map(|i| ports::output_port_position(position, orientation, i)).collect();
    for point in points {
        reclassify_wire_endpoint(
            circuit,
            point,
            logiksim_geometry::SegmentPointType::Output,
            logiksim_geometry::SegmentPointType::Input,
        );
    }
}

/// The inverse of [`convert_wires_at_outputs_to_inputs`], run when `id`
/// leaves the inserted state and no longer drives those points.
fn convert_wires_at_outputs_to_outputs(circuit: &mut CircuitData, id: LogicItemId) {
    let layout = &circuit.layout;
    let position = layout.logicitems().position(id);
    let orientation = layout.logicitems().orientation(id);
    let output_count = layout.logicitems().output_count(id);
    let points: Vec<Point> =
        (0..output_count as usize).filter_map(|i| ports::output_port_position(position, orientation, i)).collect();
    for point in points {
        reclassify_wire_endpoint(
            circuit,
            point,
            logiksim_geometry::SegmentPointType::Input,
            logiksim_geometry::SegmentPointType::Output,
        );
    }
}

/// Deletes `id`, which must be in `Temporary` state. Updates `id` in place
/// if the swap-and-last eviction renumbered a different item into its slot.
///
/// # Panics
///
/// Panics if `id` is not currently temporary.
pub fn delete_temporary_logicitem(circuit: &mut CircuitData, id: &mut LogicItemId) {
    assert_eq!(
        circuit.layout.logicitems().display_state(*id),
        DisplayState::Temporary,
        "delete_temporary_logicitem requires a temporary item"
    );

    let key = circuit.logicitem_key(*id);
    let (placed, last_id) = circuit.layout.logicitems_mut().swap_and_delete(*id);

    let selected = circuit.visible_selection.initial_selection().is_logicitem_selected(*id);
    if let Some(stack) = circuit.history.get_stack_mut() {
        stack.push_logicitem_create_temporary(key, placed);
        if selected {
            stack.push_logicitem_add_visible_selection(key);
        }
    }

    circuit.submit(LayoutMessage::LogicItemDeleted { logicitem_id: *id });

    if last_id != *id && last_id.is_valid() {
        circuit.submit(LayoutMessage::LogicItemIdUpdated { old_logicitem_id: last_id, new_logicitem_id: *id });
        if is_registered_in_index(circuit.layout.logicitems().display_state(*id)) {
            let data = logicitem_insert_data(&circuit.layout, *id);
            circuit.submit(LayoutMessage::InsertedLogicItemIdUpdated {
                old_logicitem_id: last_id,
                new_logicitem_id: *id,
                data,
            });
        }
    }
}

/// Returns `true` if translating `id` by `delta` would keep both its anchor
/// point and its computed footprint on the representable grid.
#[must_use]
pub fn is_logicitem_position_representable(
    layout: &logiksim_layout::Layout,
    id: LogicItemId,
    delta: MoveDelta,
) -> bool {
    let position = layout.logicitems().position(id);
    if position.checked_translate(delta.dx, delta.dy).is_none() {
        return false;
    }
    let rect = layout.logicitems().bounding_rect(id);
    rect.p0().checked_translate(delta.dx, delta.dy).is_some() && rect.p1().checked_translate(delta.dx, delta.dy).is_some()
}

/// Returns `true` if every selected logic-item in `selection` would remain
/// representable after translating by `delta`.
#[must_use]
pub fn are_logicitem_positions_representable(
    layout: &logiksim_layout::Layout,
    selection: &Selection,
    delta: MoveDelta,
) -> bool {
    selection.selected_logicitems().all(|id| is_logicitem_position_representable(layout, id, delta))
}

/// Translates a temporary item by `delta`, recording the inverse move.
///
/// # Panics
///
/// Panics if `id` is not temporary, or if the move is not representable.
pub fn move_temporary_logicitem_unchecked(circuit: &mut CircuitData, id: LogicItemId, delta: MoveDelta) {
    assert_eq!(
        circuit.layout.logicitems().display_state(id),
        DisplayState::Temporary,
        "move_temporary_logicitem_unchecked requires a temporary item"
    );
    assert!(
        is_logicitem_position_representable(&circuit.layout, id, delta),
        "move_temporary_logicitem_unchecked requires a representable delta"
    );

    let key = circuit.logicitem_key(id);
    if let Some(stack) = circuit.history.get_stack_mut() {
        stack.push_logicitem_move_temporary(key, delta.inverse());
    }

    let position = circuit.layout.logicitems().position(id);
    let new_position = position.translate_unchecked(delta.dx, delta.dy);
    circuit.layout.logicitems_mut().set_position(id, new_position);
}

/// Translates a temporary item by `delta`, deleting it instead if the result
/// would not be representable. A zero delta is a no-op.
///
/// # Panics
///
/// Panics if `id` is not temporary.
pub fn move_or_delete_temporary_logicitem(circuit: &mut CircuitData, id: &mut LogicItemId, delta: MoveDelta) {
    assert_eq!(
        circuit.layout.logicitems().display_state(*id),
        DisplayState::Temporary,
        "move_or_delete_temporary_logicitem requires a temporary item"
    );
    if delta.is_zero() {
        return;
    }
    if !is_logicitem_position_representable(&circuit.layout, *id, delta) {
        delete_temporary_logicitem(circuit, id);
        return;
    }
    move_temporary_logicitem_unchecked(circuit, *id, delta);
}

pub fn element_change_temporary_to_colliding(circuit: &mut CircuitData, id: LogicItemId, hint: InsertionHint) {
    assert_eq!(circuit.layout.logicitems().display_state(id), DisplayState::Temporary);

    let colliding = is_logicitem_colliding(circuit, id);
    assert!(
        !(colliding && hint == InsertionHint::ExpectValid),
        "expected a valid (non-colliding) placement, but it collides"
    );

    let key = circuit.logicitem_key(id);
    if let Some(stack) = circuit.history.get_stack_mut() {
        stack.push_logicitem_colliding_to_temporary(key);
    }

    if colliding || hint == InsertionHint::AssumeColliding {
        circuit.layout.logicitems_mut().set_display_state(id, DisplayState::Colliding);
    } else {
        convert_wires_at_outputs_to_inputs(circuit, id);
        circuit.layout.logicitems_mut().set_display_state(id, DisplayState::Valid);
        register_connections(circuit, id);
        let data = logicitem_insert_data(&circuit.layout, id);
        circuit.submit(LayoutMessage::LogicItemInserted { logicitem_id: id, data });
    }
}

pub fn element_change_colliding_to_insert(circuit: &mut CircuitData, id: LogicItemId, hint: InsertionHint) {
    let state = circuit.layout.logicitems().display_state(id);
    match state {
        DisplayState::Valid => {
            let key = circuit.logicitem_key(id);
            if let Some(stack) = circuit.history.get_stack_mut() {
                stack.push_logicitem_insert_to_colliding_expect_valid(key);
            }
            circuit.layout.logicitems_mut().set_display_state(id, DisplayState::Normal);
        }
        DisplayState::Colliding => {
            element_change_colliding_to_temporary(circuit, id);
            let mut id = id;
            delete_temporary_logicitem(circuit, &mut id);
        }
        _ => panic!("element_change_colliding_to_insert requires valid or colliding state, hint={hint:?}"),
    }
}

pub fn element_change_insert_to_colliding(circuit: &mut CircuitData, id: LogicItemId) {
    assert_eq!(circuit.layout.logicitems().display_state(id), DisplayState::Normal);
    let key = circuit.logicitem_key(id);
    if let Some(stack) = circuit.history.get_stack_mut() {
        stack.push_logicitem_colliding_to_insert(key);
    }
    circuit.layout.logicitems_mut().set_display_state(id, DisplayState::Valid);
}

pub fn element_change_colliding_to_temporary(circuit: &mut CircuitData, id: LogicItemId) {
    let state = circuit.layout.logicitems().display_state(id);
    let key = circuit.logicitem_key(id);
    match state {
        DisplayState::Valid => {
            if let Some(stack) = circuit.history.get_stack_mut() {
                stack.push_logicitem_temporary_to_colliding_expect_valid(key);
            }
            let data = logicitem_insert_data(&circuit.layout, id);
            circuit.submit(LayoutMessage::LogicItemUninserted { logicitem_id: id, data });
            unregister_connections(circuit, id);
            circuit.layout.logicitems_mut().set_display_state(id, DisplayState::Temporary);
            convert_wires_at_outputs_to_outputs(circuit, id);
        }
        DisplayState::Colliding => {
            if let Some(stack) = circuit.history.get_stack_mut() {
                stack.push_logicitem_temporary_to_colliding_assume_colliding(key);
            }
            circuit.layout.logicitems_mut().set_display_state(id, DisplayState::Temporary);
        }
        _ => panic!("element_change_colliding_to_temporary requires valid or colliding state"),
    }
}

/// Drives `id` from its current insertion mode to `new_mode`, following the
/// same `temporary -> colliding -> insert` chain (and back) the layout's
/// display state always moves through.
///
/// # Panics
///
/// Panics if `hint` is not legal for `new_mode`, or if a transition's own
/// preconditions are violated.
pub fn change_logicitem_insertion_mode(
    circuit: &mut CircuitData,
    id: &mut LogicItemId,
    new_mode: InsertionMode,
    hint: InsertionHint,
) {
    assert!(hint.is_valid_for(new_mode), "insertion hint {hint:?} is not valid for mode {new_mode:?}");

    let old_mode = InsertionMode::from_display_state(circuit.layout.logicitems().display_state(*id));
    if old_mode == new_mode {
        return;
    }

    if old_mode == InsertionMode::Temporary {
        element_change_temporary_to_colliding(circuit, *id, hint);
    }
    if new_mode == InsertionMode::InsertOrDiscard {
        element_change_colliding_to_insert(circuit, *id, hint);
    }
    if old_mode == InsertionMode::InsertOrDiscard {
        element_change_insert_to_colliding(circuit, *id);
    }
    if new_mode == InsertionMode::Temporary {
        element_change_colliding_to_temporary(circuit, *id);
    }
}

/// Places a fresh logic-item at `position` in `Temporary` state, then drives
/// it to `insertion_mode`. Returns `LogicItemId::NULL` if `position` is not
/// representable.
///
/// `key`, if given, rebinds the new id to that stable key instead of the
/// fresh one history bookkeeping would otherwise assign. Undo/redo replay
/// uses this to recreate a deleted item under the exact key earlier records
/// in the same group still address it by; ordinary callers pass `None`.
pub fn add_logicitem(
    circuit: &mut CircuitData,
    definition: LogicItemDefinition,
    position: Point,
    insertion_mode: InsertionMode,
    key: Option<Key>,
) -> LogicItemId {
    let Some(mut id) = circuit.layout.logicitems_mut().add(definition, position, DisplayState::Temporary) else {
        return LogicItemId::NULL;
    };

    circuit.submit(LayoutMessage::LogicItemCreated { logicitem_id: id });
    if let Some(key) = key {
        circuit.rebind_logicitem_key(id, key);
    }
    let key = circuit.logicitem_key(id);
    if let Some(stack) = circuit.history.get_stack_mut() {
        stack.push_logicitem_delete_temporary(key);
    }

    change_logicitem_insertion_mode(circuit, &mut id, insertion_mode, InsertionHint::NoHint);
    id
}

/// Returns the `(logicitem id, input index)` of the single toggleable input
/// at `point`, if one exists: a directed input port not already fed by
/// anything else.
fn toggleable_input_at(circuit: &CircuitData, point: Point) -> Option<(LogicItemId, usize)> {
    let entry = circuit.index.connection().logicitem_input_at(point)?;
    if entry.orientation == Orientation::Undirected {
        return None;
    }
    let input = circuit.layout.logicitems().input_count(entry.id) as usize;
    (0..input).find(|&i| ports::input_port_position(circuit.layout.logicitems().position(entry.id), entry.orientation, i) == Some(point)).map(|i| (entry.id, i))
}

fn toggleable_output_at(circuit: &CircuitData, point: Point) -> Option<(LogicItemId, usize)> {
    let entry = circuit.index.connection().logicitem_output_at(point)?;
    if entry.orientation == Orientation::Undirected {
        return None;
    }
    let output = circuit.layout.logicitems().output_count(entry.id) as usize;
    (0..output).find(|&i| ports::output_port_position(circuit.layout.logicitems().position(entry.id), entry.orientation, i) == Some(point)).map(|i| (entry.id, i))
}

/// Flips the inverter flag of whichever directed input or output port sits
/// at `point`. A no-op if `point` has no toggleable port.
pub fn toggle_inverter(circuit: &mut CircuitData, point: Point) {
    if let Some((id, index)) = toggleable_input_at(circuit, point) {
        let value = !circuit.layout.logicitems().input_inverted(id, index);
        circuit.layout.logicitems_mut().set_input_inverter(id, index, value);
    } else if let Some((id, index)) = toggleable_output_at(circuit, point) {
        let value = !circuit.layout.logicitems().output_inverted(id, index);
        circuit.layout.logicitems_mut().set_output_inverter(id, index, value);
    }
}

/// Replaces `id`'s clock-generator attributes, recording the previous value
/// as the inverse history step.
///
/// # Panics
///
/// Panics if `id`'s type doesn't carry clock-generator attributes.
pub fn set_attributes_logicitem(circuit: &mut CircuitData, id: LogicItemId, attrs: ClockGeneratorAttributes) {
    assert!(
        circuit.layout.logicitems().logicitem_type(id).has_clock_generator_attributes(),
        "set_attributes_logicitem called on a type with no clock-generator attributes"
    );
    let old = circuit.layout.logicitems().attrs_clock_generator(id).cloned().unwrap_or_default();
    let key = circuit.logicitem_key(id);
    if let Some(stack) = circuit.history.get_stack_mut() {
        stack.push_logicitem_change_attributes(key, old);
    }
    circuit.layout.logicitems_mut().set_attrs_clock_generator(id, attrs);
}

/// Adds `id` to the currently visible selection's base state.
pub fn add_logicitem_to_visible_selection(circuit: &mut CircuitData, id: LogicItemId) {
    store_history_remove_visible_selection(circuit, id);
    circuit.visible_selection.modify_initial_selection(|selection| selection.add_logicitem(id));
}

/// Removes `id` from the currently visible selection's base state.
pub fn remove_logicitem_from_visible_selection(circuit: &mut CircuitData, id: LogicItemId) {
    store_history_add_visible_selection(circuit, id);
    circuit.visible_selection.modify_initial_selection(|selection| selection.remove_logicitem(id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use logiksim_geometry::Grid;
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
    fn add_logicitem_as_temporary_is_not_in_the_spatial_index() {
        let mut circuit = CircuitData::new();
        let id = add_logicitem(&mut circuit, sample_definition(), p(0, 0), InsertionMode::Temporary, None);
        assert!(id.is_valid());
        assert!(circuit.index.spatial().is_empty());
        assert_eq!(circuit.layout.logicitems().display_state(id), DisplayState::Temporary);
    }

    #[test]
    fn add_logicitem_to_insert_or_discard_inserts_into_the_spatial_index() {
        let mut circuit = CircuitData::new();
        let id = add_logicitem(&mut circuit, sample_definition(), p(0, 0), InsertionMode::InsertOrDiscard, None);
        assert_eq!(circuit.layout.logicitems().display_state(id), DisplayState::Normal);
        assert!(!circuit.index.spatial().is_empty());
    }

    #[test]
    fn move_or_delete_temporary_deletes_when_not_representable() {
        let mut circuit = CircuitData::new();
        let mut id = add_logicitem(&mut circuit, sample_definition(), p(0, 0), InsertionMode::Temporary, None);
        let huge_delta = MoveDelta::new(Grid::MAX.value(), 0);
        move_or_delete_temporary_logicitem(&mut circuit, &mut id, huge_delta);
        assert!(circuit.layout.logicitems().size() == 0);
    }

    #[test]
    fn delete_temporary_then_undo_recreates_it() {
        let mut circuit = CircuitData::new();
        circuit.history.enable();
        let mut id = add_logicitem(&mut circuit, sample_definition(), p(2, 2), InsertionMode::Temporary, None);
        assert_eq!(circuit.layout.logicitems().size(), 1);

        delete_temporary_logicitem(&mut circuit, &mut id);
        assert_eq!(circuit.layout.logicitems().size(), 0);
        assert!(circuit.history.get_stack().unwrap().can_undo());
    }

    #[test]
    fn toggle_inverter_flips_a_directed_input() {
        let mut circuit = CircuitData::new();
        let id = add_logicitem(&mut circuit, sample_definition(), p(0, 0), InsertionMode::InsertOrDiscard, None);
        let point = ports::input_port_position(p(0, 0), Orientation::Right, 0).unwrap();
        assert!(!circuit.layout.logicitems().input_inverted(id, 0));
        toggle_inverter(&mut circuit, point);
        assert!(circuit.layout.logicitems().input_inverted(id, 0));
    }
}
