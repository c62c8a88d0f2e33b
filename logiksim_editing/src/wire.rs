// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Insertion-mode transitions and placement for wire segments.
//!
//! Segments don't carry a per-element [`logiksim_layout::DisplayState`] the
//! way logic-items and decorations do. Instead a segment's insertion state
//! *is* which wire owns it: [`WireId::TEMPORARY`] for a free-floating
//! segment, [`WireId::COLLIDING`] for one that can't be placed as drawn, and
//! any other wire id for an inserted one. Moving a segment between these
//! states physically relocates its [`logiksim_segment_tree::SegmentInfo`]
//! entry from one wire's tree into another's.
//!
//! A segment that finalizes (temporary/colliding -> inserted) merges into
//! whichever already-inserted wire has a dangling endpoint at either of its
//! own endpoints; if both endpoints touch two different wires, the lower
//! numbered [`WireId`] absorbs the other (see [`finalize_insert`] and
//! [`merge_wire_into`]). A freshly emptied, absorbed wire id is left as an
//! empty tree rather than reclaimed -- reclaiming it would mean whatever
//! wire later takes over that freed slot needs every one of its segments
//! renumbered, which nothing here does.
//!
//! This is still a scoped-down version of the original algorithm in one
//! respect: merging never splits a segment. The original can merge into the
//! *interior* of an existing segment, splitting it in two and reporting the
//! part that moved with [`LayoutMessage::SegmentPartMoved`]; here a merge
//! only ever happens at a segment's existing dangling end, so no split is
//! ever required and `change_wire_insertion_mode` keeps operating on whole
//! segments rather than the finer `segment_part` the original transitions
//! on. Endpoint classification beyond logic-item ports (corner points,
//! cross points) is likewise left to [`regularize_temporary_selection`], run
//! explicitly after a batch of segments has been inserted.

use logiksim_geometry::{ConnectionId, MoveDelta, Offset, OrderedLine, Orientation, Part, Point, Segment, SegmentPointType, WireId};
use logiksim_index::ConnectionEntry;
use logiksim_messages::{Key, LayoutMessage, SegmentInfoSnapshot, SegmentPart};

use crate::insertion::{InsertionHint, InsertionMode};
use crate::CircuitData;

fn segment_info_snapshot(info: logiksim_segment_tree::SegmentInfo) -> SegmentInfoSnapshot {
    SegmentInfoSnapshot { line: info.line(), p0_type: info.p0_type(), p1_type: info.p1_type() }
}

fn full_part(line: OrderedLine) -> Part {
    Part::new(Offset::ZERO, Offset::new(line.length())).expect("a segment's line is never zero-length")
}

#[must_use]
pub fn is_wire_position_representable(layout: &logiksim_layout::Layout, segment: Segment, delta: MoveDelta) -> bool {
    logiksim_layout::get_line(segment, layout).checked_translate(delta.dx, delta.dy).is_some()
}

#[must_use]
fn is_wire_colliding(circuit: &CircuitData, line: OrderedLine) -> bool {
    let rect = logiksim_geometry::Rect::new(line.p0(), line.p1());
    !circuit.index.spatial().query_selection(rect).is_empty()
}

/// Moves the segment tree entry identified by `segment` into `dest_wire_id`,
/// neither of which may be an inserted wire: this only relocates an entry
/// between the temporary and colliding trees, announcing the identity
/// change but nothing about insertion state.
fn move_uninserted_segment(circuit: &mut CircuitData, segment: &mut Segment, dest_wire_id: WireId) {
    let source_wire_id = segment.wire_id;
    let line = circuit.layout.wires().segment_tree(source_wire_id).segment_info(segment.segment_index).line();

    let dest_index = circuit.layout.wires_mut().segment_tree_mut(dest_wire_id).add_segment(line);
    let new_segment = Segment::new(dest_wire_id, dest_index);
    circuit.submit(LayoutMessage::SegmentIdUpdated { old_segment: *segment, new_segment });

    let moved_from = circuit.layout.wires_mut().segment_tree_mut(source_wire_id).swap_and_delete(segment.segment_index);
    if moved_from != segment.segment_index {
        circuit.submit(LayoutMessage::SegmentIdUpdated {
            old_segment: Segment::new(source_wire_id, moved_from),
            new_segment: Segment::new(source_wire_id, segment.segment_index),
        });
    }
    *segment = new_segment;
}

/// Classifies a freshly-inserting endpoint at `point`: driven by a
/// logic-item output becomes `Input`, anything else (including a plain
/// dangling end) becomes `Output`, per [`SegmentPointType::Output`]'s own
/// definition.
#[must_use]
fn classify_new_endpoint(circuit: &CircuitData, point: Point) -> SegmentPointType {
    if circuit.index.connection().logicitem_output_at(point).is_some() {
        SegmentPointType::Input
    } else {
        SegmentPointType::Output
    }
}

fn register_wire_endpoint(circuit: &mut CircuitData, segment: Segment, point: Point, point_type: SegmentPointType) {
    let entry = ConnectionEntry { id: segment, connection_id: ConnectionId::NULL, orientation: Orientation::Undirected };
    let connection = circuit.index.connection_mut();
    match point_type {
        SegmentPointType::Input => connection.insert_wire_input(point, entry),
        SegmentPointType::Output => connection.insert_wire_output(point, entry),
        _ => {}
    }
}

fn unregister_wire_endpoint(circuit: &mut CircuitData, point: Point, point_type: SegmentPointType) {
    let connection = circuit.index.connection_mut();
    match point_type {
        SegmentPointType::Input => connection.remove_wire_input(point),
        SegmentPointType::Output => connection.remove_wire_output(point),
        _ => {}
    }
}

/// Returns the wire id of an already-inserted wire with a dangling
/// (`Input` or `Output`) endpoint exactly at `point`, if one exists.
#[must_use]
fn touching_wire_id(circuit: &CircuitData, point: Point) -> Option<WireId> {
    circuit
        .index
        .connection()
        .wire_output_at(point)
        .map(|entry| entry.id.wire_id)
        .or_else(|| circuit.index.connection().wire_input_at(point).map(|entry| entry.id.wire_id))
}

/// Re-registers `point`'s connection-index entry (if any) from `old_segment`
/// to `new_segment`, needed whenever a segment moves to a new index without
/// otherwise changing the point it covers.
fn rebind_wire_endpoint(
    circuit: &mut CircuitData,
    old_segment: Segment,
    new_segment: Segment,
    point: Point,
    point_type: SegmentPointType,
) {
    let matches_old = match point_type {
        SegmentPointType::Input => circuit.index.connection().wire_input_at(point).is_some_and(|e| e.id == old_segment),
        SegmentPointType::Output => circuit.index.connection().wire_output_at(point).is_some_and(|e| e.id == old_segment),
        _ => false,
    };
    if matches_old {
        register_wire_endpoint(circuit, new_segment, point, point_type);
    }
}

/// Moves every segment of `absorb`'s tree into `keep`'s tree, re-registering
/// each relocated segment's connection-index entries and announcing the
/// renumbering. `absorb` is left as an empty tree; see this module's doc
/// comment for why its id isn't reclaimed.
fn merge_wire_into(circuit: &mut CircuitData, absorb: WireId, keep: WireId) {
    while circuit.layout.wires().segment_tree(absorb).segment_count() > 0 {
        let index = logiksim_geometry::SegmentIndex::new(0);
        let info = circuit.layout.wires().segment_tree(absorb).segment_info(index);
        let valid_parts: Vec<Part> = circuit.layout.wires().segment_tree(absorb).valid_parts(index).iter().collect();
        let old_segment = Segment::new(absorb, index);

        let new_index = circuit.layout.wires_mut().segment_tree_mut(keep).add_segment(info.line());
        let new_segment = Segment::new(keep, new_index);
        {
            let tree = circuit.layout.wires_mut().segment_tree_mut(keep);
            tree.set_point_type(new_index, info.line().p0(), info.p0_type());
            tree.set_point_type(new_index, info.line().p1(), info.p1_type());
            for part in valid_parts {
                tree.mark_valid(new_index, part);
            }
        }

        rebind_wire_endpoint(circuit, old_segment, new_segment, info.line().p0(), info.p0_type());
        rebind_wire_endpoint(circuit, old_segment, new_segment, info.line().p1(), info.p1_type());

        circuit.layout.wires_mut().segment_tree_mut(absorb).swap_and_delete(index);

        let new_info = circuit.layout.wires().segment_tree(keep).segment_info(new_index);
        circuit.submit(LayoutMessage::InsertedSegmentIdUpdated {
            old_segment,
            new_segment,
            segment_info: segment_info_snapshot(new_info),
        });
    }
    circuit.layout.wires_mut().recompute_bounding_rect(keep);
}

/// Moves `segment` (currently temporary or colliding) into an inserted wire:
/// one that already has a dangling endpoint touching either end of
/// `segment`'s own line, merging the lower-numbered wire id if both ends
/// touch different wires, or a brand-new wire if neither end touches
/// anything. Classifies and registers the segment's own endpoints and
/// announces the insertion.
fn finalize_insert(circuit: &mut CircuitData, segment: &mut Segment) {
    let line = circuit.layout.wires().segment_tree(segment.wire_id).segment_info(segment.segment_index).line();

    let touch_p0 = touching_wire_id(circuit, line.p0());
    let touch_p1 = touching_wire_id(circuit, line.p1());
    let new_wire_id = match (touch_p0, touch_p1) {
        (Some(a), Some(b)) if a != b => {
            let (keep, absorb) = if a < b { (a, b) } else { (b, a) };
            merge_wire_into(circuit, absorb, keep);
            keep
        }
        (Some(a), _) | (_, Some(a)) => a,
        (None, None) => circuit.layout.wires_mut().add_wire(),
    };
    move_uninserted_segment(circuit, segment, new_wire_id);

    let p0_type = classify_new_endpoint(circuit, line.p0());
    let p1_type = classify_new_endpoint(circuit, line.p1());
    {
        let tree = circuit.layout.wires_mut().segment_tree_mut(segment.wire_id);
        tree.set_point_type(segment.segment_index, line.p0(), p0_type);
        tree.set_point_type(segment.segment_index, line.p1(), p1_type);
        tree.mark_valid(segment.segment_index, full_part(line));
    }
    circuit.layout.wires_mut().recompute_bounding_rect(segment.wire_id);

    register_wire_endpoint(circuit, *segment, line.p0(), p0_type);
    register_wire_endpoint(circuit, *segment, line.p1(), p1_type);

    let info = circuit.layout.wires().segment_tree(segment.wire_id).segment_info(segment.segment_index);
    circuit.submit(LayoutMessage::SegmentInserted { segment: *segment, segment_info: segment_info_snapshot(info) });
}

/// The inverse of [`finalize_insert`]: unregisters `segment`'s endpoints and
/// moves it back into the colliding tree.
fn unfinalize_insert(circuit: &mut CircuitData, segment: &mut Segment) {
    let info = circuit.layout.wires().segment_tree(segment.wire_id).segment_info(segment.segment_index);
    circuit.submit(LayoutMessage::SegmentUninserted { segment: *segment, segment_info: segment_info_snapshot(info) });
    unregister_wire_endpoint(circuit, info.line().p0(), info.p0_type());
    unregister_wire_endpoint(circuit, info.line().p1(), info.p1_type());
    move_uninserted_segment(circuit, segment, WireId::COLLIDING);
}

pub fn element_change_temporary_to_colliding(circuit: &mut CircuitData, segment: &mut Segment, hint: InsertionHint) {
    assert_eq!(segment.wire_id, WireId::TEMPORARY, "requires a temporary segment");

    let line = circuit.layout.wires().segment_tree(WireId::TEMPORARY).segment_info(segment.segment_index).line();
    let colliding = is_wire_colliding(circuit, line);
    assert!(
        !(colliding && hint == InsertionHint::ExpectValid),
        "expected a valid (non-colliding) placement, but it collides"
    );

    let key = circuit.segment_key(*segment);
    if let Some(stack) = circuit.history.get_stack_mut() {
        stack.push_segment_colliding_to_temporary(key);
    }

    if colliding || hint == InsertionHint::AssumeColliding {
        move_uninserted_segment(circuit, segment, WireId::COLLIDING);
    } else {
        finalize_insert(circuit, segment);
    }
}

pub fn element_change_colliding_to_insert(circuit: &mut CircuitData, segment: &mut Segment) {
    assert_eq!(segment.wire_id, WireId::COLLIDING, "requires a colliding segment");
    let key = circuit.segment_key(*segment);
    if let Some(stack) = circuit.history.get_stack_mut() {
        stack.push_segment_insert_to_colliding_expect_valid(key);
    }
    finalize_insert(circuit, segment);
}

pub fn element_change_insert_to_colliding(circuit: &mut CircuitData, segment: &mut Segment) {
    assert!(segment.wire_id.is_inserted(), "requires an inserted segment");
    let key = circuit.segment_key(*segment);
    if let Some(stack) = circuit.history.get_stack_mut() {
        stack.push_segment_colliding_to_insert(key);
    }
    unfinalize_insert(circuit, segment);
}

pub fn element_change_colliding_to_temporary(circuit: &mut CircuitData, segment: &mut Segment) {
    assert_eq!(segment.wire_id, WireId::COLLIDING, "requires a colliding segment");
    let key = circuit.segment_key(*segment);
    if let Some(stack) = circuit.history.get_stack_mut() {
        stack.push_segment_temporary_to_colliding_assume_colliding(key);
    }
    move_uninserted_segment(circuit, segment, WireId::TEMPORARY);
}

/// Drives `segment` from its current insertion mode to `new_mode`.
///
/// Unlike the logic-item/decoration version, each step here re-reads
/// `segment.wire_id` rather than following a fixed four-line composition:
/// a non-colliding temporary segment finalizes directly into an inserted
/// wire in one call, skipping the intermediate "colliding" stage the
/// four-line form assumes.
///
/// # Panics
///
/// Panics if `hint` is not legal for `new_mode`, or if a transition's own
/// preconditions are violated.
pub fn change_wire_insertion_mode(
    circuit: &mut CircuitData,
    segment: &mut Segment,
    new_mode: InsertionMode,
    hint: InsertionHint,
) {
    assert!(hint.is_valid_for(new_mode), "insertion hint {hint:?} is not valid for mode {new_mode:?}");

    let old_mode = InsertionMode::from_wire_id(segment.wire_id);
    if old_mode == new_mode {
        return;
    }

    if old_mode == InsertionMode::Temporary {
        element_change_temporary_to_colliding(circuit, segment, hint);
    }
    if new_mode == InsertionMode::InsertOrDiscard && InsertionMode::from_wire_id(segment.wire_id) != InsertionMode::InsertOrDiscard {
        element_change_colliding_to_insert(circuit, segment);
    }
    if old_mode == InsertionMode::InsertOrDiscard {
        element_change_insert_to_colliding(circuit, segment);
    }
    if new_mode == InsertionMode::Temporary && InsertionMode::from_wire_id(segment.wire_id) != InsertionMode::Temporary {
        element_change_colliding_to_temporary(circuit, segment);
    }
}

/// Adds a fresh segment along `line` in `Temporary` state, then drives it to
/// `insertion_mode`.
///
/// `key`, if given, rebinds the new segment to that stable key instead of the
/// fresh one history bookkeeping would otherwise assign; see
/// [`crate::logicitem::add_logicitem`]'s doc for why.
pub fn add_wire_segment(
    circuit: &mut CircuitData,
    line: OrderedLine,
    insertion_mode: InsertionMode,
    key: Option<Key>,
) -> Segment {
    let index = circuit.layout.wires_mut().segment_tree_mut(WireId::TEMPORARY).add_segment(line);
    let mut segment = Segment::new(WireId::TEMPORARY, index);

    circuit.submit(LayoutMessage::SegmentCreated { segment, length: line.length() });
    if let Some(key) = key {
        circuit.rebind_segment_key(segment, key);
    }
    let key = circuit.segment_key(segment);
    if let Some(stack) = circuit.history.get_stack_mut() {
        stack.push_segment_delete_temporary(key);
    }

    change_wire_insertion_mode(circuit, &mut segment, insertion_mode, InsertionHint::NoHint);
    segment
}

/// Deletes `segment`, which must be temporary.
///
/// # Panics
///
/// Panics if `segment` is not currently temporary.
pub fn delete_temporary_segment(circuit: &mut CircuitData, segment: &mut Segment) {
    assert_eq!(segment.wire_id, WireId::TEMPORARY, "delete_temporary_segment requires a temporary segment");

    let line = circuit.layout.wires().segment_tree(WireId::TEMPORARY).segment_info(segment.segment_index).line();
    let key = circuit.segment_key(*segment);
    if let Some(stack) = circuit.history.get_stack_mut() {
        stack.push_segment_create_temporary(key, line);
    }

    circuit.submit(LayoutMessage::SegmentPartDeleted { segment_part: SegmentPart { segment: *segment, part: full_part(line) } });

    let moved_from = circuit.layout.wires_mut().segment_tree_mut(WireId::TEMPORARY).swap_and_delete(segment.segment_index);
    if moved_from != segment.segment_index {
        circuit.submit(LayoutMessage::SegmentIdUpdated {
            old_segment: Segment::new(WireId::TEMPORARY, moved_from),
            new_segment: Segment::new(WireId::TEMPORARY, segment.segment_index),
        });
    }
}

/// Translates a temporary segment by `delta`, recording the inverse move.
///
/// # Panics
///
/// Panics if `segment` is not temporary, or if the move is not
/// representable.
pub fn move_temporary_segment_unchecked(circuit: &mut CircuitData, segment: Segment, delta: MoveDelta) {
    assert_eq!(segment.wire_id, WireId::TEMPORARY, "requires a temporary segment");
    let line = circuit.layout.wires().segment_tree(WireId::TEMPORARY).segment_info(segment.segment_index).line();
    let new_line = line.checked_translate(delta.dx, delta.dy).expect("requires a representable delta");

    let key = circuit.segment_key(segment);
    if let Some(stack) = circuit.history.get_stack_mut() {
        stack.push_segment_move_temporary(key, delta.inverse());
    }
    circuit.layout.wires_mut().segment_tree_mut(WireId::TEMPORARY).update_segment(segment.segment_index, new_line);
}

/// Translates a temporary segment by `delta`, deleting it instead if the
/// result would not be representable. A zero delta is a no-op.
///
/// # Panics
///
/// Panics if `segment` is not temporary.
pub fn move_or_delete_temporary_segment(circuit: &mut CircuitData, segment: &mut Segment, delta: MoveDelta) {
    assert_eq!(segment.wire_id, WireId::TEMPORARY, "move_or_delete_temporary_segment requires a temporary segment");
    if delta.is_zero() {
        return;
    }
    if !is_wire_position_representable(&circuit.layout, *segment, delta) {
        delete_temporary_segment(circuit, segment);
        return;
    }
    move_temporary_segment_unchecked(circuit, *segment, delta);
}

/// Splits a temporary segment at `at`, a point strictly between its two
/// endpoints, into two adjoining segments. Returns the newly created second
/// half, or `None` if `at` is not a strictly interior point.
///
/// # Panics
///
/// Panics if `segment` is not temporary.
pub fn split_temporary_before_insert(circuit: &mut CircuitData, segment: Segment, at: Point) -> Option<Segment> {
    assert_eq!(segment.wire_id, WireId::TEMPORARY, "requires a temporary segment");
    let line = circuit.layout.wires().segment_tree(WireId::TEMPORARY).segment_info(segment.segment_index).line();
    if at == line.p0() || at == line.p1() || !line.contains_point(at) {
        return None;
    }

    let first = OrderedLine::new(line.p0(), at)?;
    let second = OrderedLine::new(at, line.p1())?;

    circuit.layout.wires_mut().segment_tree_mut(WireId::TEMPORARY).update_segment(segment.segment_index, first);

    let second_index = circuit.layout.wires_mut().segment_tree_mut(WireId::TEMPORARY).add_segment(second);
    let second_segment = Segment::new(WireId::TEMPORARY, second_index);
    circuit.submit(LayoutMessage::SegmentCreated { segment: second_segment, length: second.length() });
    let key = circuit.segment_key(second_segment);
    if let Some(stack) = circuit.history.get_stack_mut() {
        stack.push_segment_delete_temporary(key);
    }

    Some(second_segment)
}

/// Reclassifies the endpoints of every inserted segment in `segments` based
/// on how many other inserted segments currently meet there. An endpoint
/// already occupied by a logic-item port keeps its `Input`/`Output`
/// classification regardless of wire adjacency.
pub fn regularize_temporary_selection(circuit: &mut CircuitData, segments: &[Segment]) {
    for &segment in segments {
        if !segment.wire_id.is_inserted() {
            continue;
        }
        let info = circuit.layout.wires().segment_tree(segment.wire_id).segment_info(segment.segment_index);
        let new_p0 = regularized_point_type(circuit, info.line().p0(), segment, info.p0_type());
        let new_p1 = regularized_point_type(circuit, info.line().p1(), segment, info.p1_type());
        if new_p0 == info.p0_type() && new_p1 == info.p1_type() {
            continue;
        }

        let tree = circuit.layout.wires_mut().segment_tree_mut(segment.wire_id);
        tree.set_point_type(segment.segment_index, info.line().p0(), new_p0);
        tree.set_point_type(segment.segment_index, info.line().p1(), new_p1);
        let new_info = circuit.layout.wires().segment_tree(segment.wire_id).segment_info(segment.segment_index);

        circuit.submit(LayoutMessage::InsertedEndPointsUpdated {
            segment,
            old_segment_info: segment_info_snapshot(info),
            new_segment_info: segment_info_snapshot(new_info),
        });
    }
}

#[must_use]
fn regularized_point_type(
    circuit: &CircuitData,
    point: Point,
    segment: Segment,
    current: SegmentPointType,
) -> SegmentPointType {
    let at_logicitem_port = circuit.index.connection().logicitem_output_at(point).is_some()
        || circuit.index.connection().logicitem_input_at(point).is_some();
    if matches!(current, SegmentPointType::Input | SegmentPointType::Output) && at_logicitem_port {
        return current;
    }

    let neighbors = circuit.index.spatial().query_line_segments(point);
    let other_count = neighbors.iter().filter(|s| s.is_valid() && **s != segment).count();
    match other_count {
        0 => current,
        1 => SegmentPointType::CornerPoint,
        _ => SegmentPointType::CrossPoint,
    }
}

/// Adds `part` of `segment` to the currently visible selection's base state.
pub fn add_segment_to_visible_selection(circuit: &mut CircuitData, segment: Segment, part: Part) {
    let already_selected = circuit.visible_selection.initial_selection().selected_parts_of(segment).overlaps_any(part);
    if !already_selected {
        let key = circuit.segment_key(segment);
        if let Some(stack) = circuit.history.get_stack_mut() {
            stack.push_segment_remove_visible_selection(key, part);
        }
    }
    circuit
        .visible_selection
        .modify_initial_selection(|selection| selection.add_segment(SegmentPart { segment, part }));
}

/// Removes `part` of `segment` from the currently visible selection's base
/// state.
pub fn remove_segment_from_visible_selection(circuit: &mut CircuitData, segment: Segment, part: Part) {
    let already_selected = circuit.visible_selection.initial_selection().selected_parts_of(segment).overlaps_any(part);
    if already_selected {
        let key = circuit.segment_key(segment);
        if let Some(stack) = circuit.history.get_stack_mut() {
            stack.push_segment_add_visible_selection(key, part);
        }
    }
    circuit
        .visible_selection
        .modify_initial_selection(|selection| selection.remove_segment(SegmentPart { segment, part }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use logiksim_geometry::Grid;

    fn p(x: i32, y: i32) -> Point {
        Point::new(Grid::new(x).unwrap(), Grid::new(y).unwrap())
    }

    fn line(x0: i32, y0: i32, x1: i32, y1: i32) -> OrderedLine {
        OrderedLine::new(p(x0, y0), p(x1, y1)).unwrap()
    }

    #[test]
    fn add_wire_segment_as_temporary_is_not_in_the_spatial_index() {
        let mut circuit = CircuitData::new();
        let segment = add_wire_segment(&mut circuit, line(0, 0, 10, 0), InsertionMode::Temporary, None);
        assert_eq!(segment.wire_id, WireId::TEMPORARY);
        assert!(circuit.index.spatial().is_empty());
    }

    #[test]
    fn add_wire_segment_to_insert_or_discard_lands_in_its_own_wire() {
        let mut circuit = CircuitData::new();
        let segment = add_wire_segment(&mut circuit, line(0, 0, 10, 0), InsertionMode::InsertOrDiscard, None);
        assert!(segment.wire_id.is_inserted());
        assert!(!circuit.index.spatial().is_empty());
    }

    #[test]
    fn overlapping_segment_ends_up_colliding() {
        let mut circuit = CircuitData::new();
        let _first = add_wire_segment(&mut circuit, line(0, 0, 10, 0), InsertionMode::InsertOrDiscard, None);
        let second = add_wire_segment(&mut circuit, line(5, 0, 15, 0), InsertionMode::InsertOrDiscard, None);
        assert_eq!(second.wire_id, WireId::COLLIDING);
    }

    #[test]
    fn a_segment_touching_an_inserted_wires_dangling_end_merges_into_it() {
        let mut circuit = CircuitData::new();
        let first = add_wire_segment(&mut circuit, line(0, 0, 10, 0), InsertionMode::InsertOrDiscard, None);

        let mut second = add_wire_segment(&mut circuit, line(10, 0, 20, 0), InsertionMode::Temporary, None);
        finalize_insert(&mut circuit, &mut second);

        assert_eq!(second.wire_id, first.wire_id);
        let tree = circuit.layout.wires().segment_tree(first.wire_id);
        assert_eq!(tree.segment_count(), 2);
    }

    #[test]
    fn a_segment_bridging_two_inserted_wires_merges_them_into_the_lower_id() {
        let mut circuit = CircuitData::new();
        let first = add_wire_segment(&mut circuit, line(0, 0, 10, 0), InsertionMode::InsertOrDiscard, None);
        let second = add_wire_segment(&mut circuit, line(10, 5, 20, 5), InsertionMode::InsertOrDiscard, None);
        assert!(first.wire_id < second.wire_id);

        let mut bridge = add_wire_segment(&mut circuit, line(10, 0, 10, 5), InsertionMode::Temporary, None);
        finalize_insert(&mut circuit, &mut bridge);

        assert_eq!(bridge.wire_id, first.wire_id);
        assert_eq!(circuit.layout.wires().segment_tree(first.wire_id).segment_count(), 3);
        assert!(circuit.layout.wires().segment_tree(second.wire_id).is_empty());
    }

    #[test]
    fn split_temporary_before_insert_creates_two_adjoining_segments() {
        let mut circuit = CircuitData::new();
        let first = add_wire_segment(&mut circuit, line(0, 0, 10, 0), InsertionMode::Temporary, None);
        let second = split_temporary_before_insert(&mut circuit, first, p(4, 0)).unwrap();

        let tree = circuit.layout.wires().segment_tree(WireId::TEMPORARY);
        assert_eq!(tree.segment_info(first.segment_index).line(), line(0, 0, 4, 0));
        assert_eq!(tree.segment_info(second.segment_index).line(), line(4, 0, 10, 0));
    }

    #[test]
    fn split_at_an_endpoint_is_a_no_op() {
        let mut circuit = CircuitData::new();
        let segment = add_wire_segment(&mut circuit, line(0, 0, 10, 0), InsertionMode::Temporary, None);
        assert!(split_temporary_before_insert(&mut circuit, segment, p(0, 0)).is_none());
    }

    #[test]
    fn delete_temporary_then_undo_restores_history() {
        let mut circuit = CircuitData::new();
        circuit.history.enable();
        let mut segment = add_wire_segment(&mut circuit, line(0, 0, 10, 0), InsertionMode::Temporary, None);
        delete_temporary_segment(&mut circuit, &mut segment);
        assert!(circuit.history.get_stack().unwrap().can_undo());
    }
}
