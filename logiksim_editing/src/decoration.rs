// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Insertion-mode transitions, placement, and attribute edits for
//! decorations.
//!
//! A direct generalization of [`crate::logicitem`]'s algorithms: decorations
//! go through the same `temporary -> colliding -> insert` chain, but carry
//! no ports, so there is nothing to register in the connection index and no
//! wire-endpoint reclassification to do on insert/uninsert.

use logiksim_geometry::{DecorationId, MoveDelta, Point};
use logiksim_layout::{DecorationDefinition, DisplayState, TextElementAttributes};
use logiksim_messages::{Key, LayoutMessage};
use logiksim_selection::Selection;

use crate::insertion::{InsertionHint, InsertionMode};
use crate::{decoration_insert_data, CircuitData};

fn store_history_add_visible_selection(circuit: &mut CircuitData, id: DecorationId) {
    let selected = circuit.visible_selection.initial_selection().is_decoration_selected(id);
    if selected {
        let key = circuit.decoration_key(id);
        if let Some(stack) = circuit.history.get_stack_mut() {
            stack.push_decoration_add_visible_selection(key);
        }
    }
}

fn store_history_remove_visible_selection(circuit: &mut CircuitData, id: DecorationId) {
    let selected = circuit.visible_selection.initial_selection().is_decoration_selected(id);
    if !selected {
        let key = circuit.decoration_key(id);
        if let Some(stack) = circuit.history.get_stack_mut() {
            stack.push_decoration_remove_visible_selection(key);
        }
    }
}

#[must_use]
fn is_decoration_colliding(circuit: &CircuitData, id: DecorationId) -> bool {
    let rect = circuit.layout.decorations().bounding_rect(id);
    !circuit.index.spatial().query_selection(rect).is_empty()
}

/// Deletes `id`, which must be in `Temporary` state.
///
/// # Panics
///
/// Panics if `id` is not currently temporary.
pub fn delete_temporary_decoration(circuit: &mut CircuitData, id: &mut DecorationId) {
    assert_eq!(
        circuit.layout.decorations().display_state(*id),
        DisplayState::Temporary,
        "delete_temporary_decoration requires a temporary decoration"
    );

    let key = circuit.decoration_key(*id);
    let (placed, last_id) = circuit.layout.decorations_mut().swap_and_delete(*id);

    let selected = circuit.visible_selection.initial_selection().is_decoration_selected(*id);
    if let Some(stack) = circuit.history.get_stack_mut() {
        stack.push_decoration_create_temporary(key, placed);
        if selected {
            stack.push_decoration_add_visible_selection(key);
        }
    }

    circuit.submit(LayoutMessage::DecorationDeleted { decoration_id: *id });

    if last_id != *id && last_id.is_valid() {
        circuit.submit(LayoutMessage::DecorationIdUpdated { old_decoration_id: last_id, new_decoration_id: *id });
        if circuit.layout.decorations().display_state(*id) == DisplayState::Normal {
            let data = decoration_insert_data(&circuit.layout, *id);
            circuit.submit(LayoutMessage::InsertedDecorationIdUpdated {
                old_decoration_id: last_id,
                new_decoration_id: *id,
                data,
            });
        }
    }
}

#[must_use]
pub fn is_decoration_position_representable(
    layout: &logiksim_layout::Layout,
    id: DecorationId,
    delta: MoveDelta,
) -> bool {
    let position = layout.decorations().position(id);
    if position.checked_translate(delta.dx, delta.dy).is_none() {
        return false;
    }
    let rect = layout.decorations().bounding_rect(id);
    rect.p0().checked_translate(delta.dx, delta.dy).is_some() && rect.p1().checked_translate(delta.dx, delta.dy).is_some()
}

#[must_use]
pub fn are_decoration_positions_representable(
    layout: &logiksim_layout::Layout,
    selection: &Selection,
    delta: MoveDelta,
) -> bool {
    selection.selected_decorations().all(|id| is_decoration_position_representable(layout, id, delta))
}

pub fn move_temporary_decoration_unchecked(circuit: &mut CircuitData, id: DecorationId, delta: MoveDelta) {
    let key = circuit.decoration_key(id);
    if let Some(stack) = circuit.history.get_stack_mut() {
        stack.push_decoration_move_temporary(key, delta.inverse());
    }
    let position = circuit.layout.decorations().position(id);
    let new_position = position.translate_unchecked(delta.dx, delta.dy);
    circuit.layout.decorations_mut().set_position(id, new_position);
}

/// Translates a temporary decoration by `delta`, deleting it instead if the
/// result would not be representable. A zero delta is a no-op.
///
/// # Panics
///
/// Panics if `id` is not temporary.
pub fn move_or_delete_temporary_decoration(circuit: &mut CircuitData, id: &mut DecorationId, delta: MoveDelta) {
    assert_eq!(
        circuit.layout.decorations().display_state(*id),
        DisplayState::Temporary,
        "move_or_delete_temporary_decoration requires a temporary decoration"
    );
    if delta.is_zero() {
        return;
    }
    if !is_decoration_position_representable(&circuit.layout, *id, delta) {
        delete_temporary_decoration(circuit, id);
        return;
    }
    move_temporary_decoration_unchecked(circuit, *id, delta);
}

pub fn element_change_temporary_to_colliding(circuit: &mut CircuitData, id: DecorationId, hint: InsertionHint) {
    assert_eq!(circuit.layout.decorations().display_state(id), DisplayState::Temporary);

    let colliding = is_decoration_colliding(circuit, id);
    assert!(
        !(colliding && hint == InsertionHint::ExpectValid),
        "expected a valid (non-colliding) placement, but it collides"
    );

    let key = circuit.decoration_key(id);
    if let Some(stack) = circuit.history.get_stack_mut() {
        stack.push_decoration_colliding_to_temporary(key);
    }

    if colliding || hint == InsertionHint::AssumeColliding {
        circuit.layout.decorations_mut().set_display_state(id, DisplayState::Colliding);
    } else {
        circuit.layout.decorations_mut().set_display_state(id, DisplayState::Valid);
        let data = decoration_insert_data(&circuit.layout, id);
        circuit.submit(LayoutMessage::DecorationInserted { decoration_id: id, data });
    }
}

pub fn element_change_colliding_to_insert(circuit: &mut CircuitData, id: DecorationId) {
    match circuit.layout.decorations().display_state(id) {
        DisplayState::Valid => {
            let key = circuit.decoration_key(id);
            if let Some(stack) = circuit.history.get_stack_mut() {
                stack.push_decoration_insert_to_colliding_expect_valid(key);
            }
            circuit.layout.decorations_mut().set_display_state(id, DisplayState::Normal);
        }
        DisplayState::Colliding => {
            element_change_colliding_to_temporary(circuit, id);
            let mut id = id;
            delete_temporary_decoration(circuit, &mut id);
        }
        _ => panic!("element_change_colliding_to_insert requires valid or colliding state"),
    }
}

pub fn element_change_insert_to_colliding(circuit: &mut CircuitData, id: DecorationId) {
    assert_eq!(circuit.layout.decorations().display_state(id), DisplayState::Normal);
    let key = circuit.decoration_key(id);
    if let Some(stack) = circuit.history.get_stack_mut() {
        stack.push_decoration_colliding_to_insert(key);
    }
    circuit.layout.decorations_mut().set_display_state(id, DisplayState::Valid);
}

pub fn element_change_colliding_to_temporary(circuit: &mut CircuitData, id: DecorationId) {
    let key = circuit.decoration_key(id);
    match circuit.layout.decorations().display_state(id) {
        DisplayState::Valid => {
            if let Some(stack) = circuit.history.get_stack_mut() {
                stack.push_decoration_temporary_to_colliding_expect_valid(key);
            }
            let data = decoration_insert_data(&circuit.layout, id);
            circuit.submit(LayoutMessage::DecorationUninserted { decoration_id: id, data });
            circuit.layout.decorations_mut().set_display_state(id, DisplayState::Temporary);
        }
        DisplayState::Colliding => {
            if let Some(stack) = circuit.history.get_stack_mut() {
                stack.push_decoration_temporary_to_colliding_assume_colliding(key);
            }
            circuit.layout.decorations_mut().set_display_state(id, DisplayState::Temporary);
        }
        _ => panic!("element_change_colliding_to_temporary requires valid or colliding state"),
    }
}

/// Drives `id` from its current insertion mode to `new_mode`.
///
/// # Panics
///
/// Panics if `hint` is not legal for `new_mode`, or if a transition's own
/// preconditions are violated.
pub fn change_decoration_insertion_mode(
    circuit: &mut CircuitData,
    id: &mut DecorationId,
    new_mode: InsertionMode,
    hint: InsertionHint,
) {
    assert!(hint.is_valid_for(new_mode), "insertion hint {hint:?} is not valid for mode {new_mode:?}");

    let old_mode = InsertionMode::from_display_state(circuit.layout.decorations().display_state(*id));
    if old_mode == new_mode {
        return;
    }

    if old_mode == InsertionMode::Temporary {
        element_change_temporary_to_colliding(circuit, *id, hint);
    }
    if new_mode == InsertionMode::InsertOrDiscard {
        element_change_colliding_to_insert(circuit, *id);
    }
    if old_mode == InsertionMode::InsertOrDiscard {
        element_change_insert_to_colliding(circuit, *id);
    }
    if new_mode == InsertionMode::Temporary {
        element_change_colliding_to_temporary(circuit, *id);
    }
}

/// Places a fresh decoration at `position` in `Temporary` state, then drives
/// it to `insertion_mode`. Returns `DecorationId::NULL` if `position` is not
/// representable.
///
/// `key`, if given, rebinds the new id to that stable key instead of the
/// fresh one history bookkeeping would otherwise assign; see
/// [`crate::logicitem::add_logicitem`]'s doc for why.
pub fn add_decoration(
    circuit: &mut CircuitData,
    definition: DecorationDefinition,
    position: Point,
    insertion_mode: InsertionMode,
    key: Option<Key>,
) -> DecorationId {
    let Some(mut id) = circuit.layout.decorations_mut().add(definition, position, DisplayState::Temporary) else {
        return DecorationId::NULL;
    };

    circuit.submit(LayoutMessage::DecorationCreated { decoration_id: id });
    if let Some(key) = key {
        circuit.rebind_decoration_key(id, key);
    }
    let key = circuit.decoration_key(id);
    if let Some(stack) = circuit.history.get_stack_mut() {
        stack.push_decoration_delete_temporary(key);
    }

    change_decoration_insertion_mode(circuit, &mut id, insertion_mode, InsertionHint::NoHint);
    id
}

/// Replaces `id`'s text attributes, recording the previous value as the
/// inverse history step.
pub fn set_attributes_decoration(circuit: &mut CircuitData, id: DecorationId, attrs: TextElementAttributes) {
    let old = circuit.layout.decorations().attrs_text_element(id).cloned().unwrap_or_default();
    let key = circuit.decoration_key(id);
    if let Some(stack) = circuit.history.get_stack_mut() {
        stack.push_decoration_change_attributes(key, old);
    }
    circuit.layout.decorations_mut().set_attrs_text_element(id, attrs);
}

/// Adds `id` to the currently visible selection's base state.
pub fn add_decoration_to_visible_selection(circuit: &mut CircuitData, id: DecorationId) {
    store_history_remove_visible_selection(circuit, id);
    circuit.visible_selection.modify_initial_selection(|selection| selection.add_decoration(id));
}

/// Removes `id` from the currently visible selection's base state.
pub fn remove_decoration_from_visible_selection(circuit: &mut CircuitData, id: DecorationId) {
    store_history_add_visible_selection(circuit, id);
    circuit.visible_selection.modify_initial_selection(|selection| selection.remove_decoration(id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use logiksim_geometry::Grid;
    use logiksim_layout::DecorationType;

    fn p(x: i32, y: i32) -> Point {
        Point::new(Grid::new(x).unwrap(), Grid::new(y).unwrap())
    }

    fn sample_definition() -> DecorationDefinition {
        DecorationDefinition {
            decoration_type: DecorationType::TextElement,
            size: p(3, 2),
            attrs_text_element: Some(TextElementAttributes { text: "hi".into(), ..Default::default() }),
        }
    }

    #[test]
    fn add_decoration_to_insert_or_discard_inserts_into_the_spatial_index() {
        let mut circuit = CircuitData::new();
        let id = add_decoration(&mut circuit, sample_definition(), p(0, 0), InsertionMode::InsertOrDiscard, None);
        assert_eq!(circuit.layout.decorations().display_state(id), DisplayState::Normal);
        assert!(!circuit.index.spatial().is_empty());
    }

    #[test]
    fn overlapping_decoration_ends_up_colliding() {
        let mut circuit = CircuitData::new();
        let _first = add_decoration(&mut circuit, sample_definition(), p(0, 0), InsertionMode::InsertOrDiscard, None);
        let second = add_decoration(&mut circuit, sample_definition(), p(1, 1), InsertionMode::InsertOrDiscard, None);
        assert_eq!(circuit.layout.decorations().display_state(second), DisplayState::Colliding);
    }

    #[test]
    fn delete_temporary_then_undo_restores_history() {
        let mut circuit = CircuitData::new();
        circuit.history.enable();
        let mut id = add_decoration(&mut circuit, sample_definition(), p(5, 5), InsertionMode::Temporary, None);
        delete_temporary_decoration(&mut circuit, &mut id);
        assert!(circuit.history.get_stack().unwrap().can_undo());
    }
}
