// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end scenarios exercising the public `Circuit`/`Modifier` facade
//! top to bottom, one test per documented walkthrough.
//!
//! A few walkthroughs live elsewhere because they need machinery this crate
//! doesn't own: the colliding-release move scenario is covered by
//! `logiksim_mouse_logic::selection_move`'s own tests (it drives
//! `SelectionMoveLogic` directly against `CircuitData`), and the
//! copy-paste/visual-equivalence scenario is left for when a
//! selection-scoped save format exists alongside the whole-layout one in
//! `format.rs`.

use logiksim_editing::ports::input_port_position;
use logiksim_messages::SegmentPart;
use smallvec::SmallVec;

use logiksim_core::{
    Circuit, Grid, InsertionMode, LogicItemDefinition, LogicItemType, MoveDelta, Offset,
    Orientation, Part, Point, Selection, SegmentPointType, WireId,
};

fn p(x: i32, y: i32) -> Point {
    Point::new(Grid::new(x).unwrap(), Grid::new(y).unwrap())
}

fn and_gate(input_count: u8) -> LogicItemDefinition {
    LogicItemDefinition {
        logicitem_type: LogicItemType::And,
        input_count,
        output_count: 1,
        orientation: Orientation::Right,
        sub_circuit_id: 0,
        input_inverters: SmallVec::new(),
        output_inverters: SmallVec::new(),
        attrs_clock_generator: None,
    }
}

fn select_logicitem(modifier: &mut logiksim_core::Modifier<'_>, id: logiksim_core::LogicItemId) -> logiksim_core::SelectionId {
    let selection_id = modifier.create_selection();
    let mut selection = Selection::new();
    selection.add_logicitem(id);
    modifier.set_selection(selection_id, selection).unwrap();
    selection_id
}

fn select_segment(
    modifier: &mut logiksim_core::Modifier<'_>,
    segment: logiksim_core::Segment,
    length: u32,
) -> logiksim_core::SelectionId {
    let selection_id = modifier.create_selection();
    let mut selection = Selection::new();
    selection.add_segment(SegmentPart {
        segment,
        part: Part::new(Offset::new(0), Offset::new(length)).unwrap(),
    });
    modifier.set_selection(selection_id, selection).unwrap();
    selection_id
}

#[test]
fn insert_logicitem_then_delete_while_temporary_leaves_an_empty_layout() {
    let mut circuit = Circuit::new();
    let mut modifier = circuit.modifier();

    let id = modifier.add_logicitem(and_gate(3), p(2, 3), InsertionMode::Temporary).unwrap();
    assert_eq!(modifier.layout().logicitems().size(), 1);

    let selection_id = select_logicitem(&mut modifier, id);
    modifier.delete_all(selection_id).unwrap();

    assert!(modifier.layout().is_empty());
}

#[test]
fn add_wire_then_commit_promotes_it_to_an_inserted_wire() {
    let mut circuit = Circuit::new();
    let mut modifier = circuit.modifier();

    let segment = modifier.add_wire_segment(p(0, 0), p(10, 0), InsertionMode::Temporary).unwrap();
    assert_eq!(segment.wire_id, WireId::TEMPORARY);

    let selection_id = select_segment(&mut modifier, segment, 10);
    modifier.change_insertion_mode(selection_id, InsertionMode::InsertOrDiscard).unwrap();

    let layout = modifier.layout();
    let inserted_wire = logiksim_layout::wire_ids(layout)
        .find(|&id| id.raw() >= WireId::FIRST_INSERTED.raw())
        .expect("the segment should have moved to a freshly inserted wire");

    let tree = layout.wires().segment_tree(inserted_wire);
    assert_eq!(tree.segment_count(), 1);
    let (index, info) = tree.iter().next().unwrap();
    assert_eq!(info.p0_type(), SegmentPointType::Output);
    assert_eq!(info.p1_type(), SegmentPointType::Output);
    assert!(tree.valid_parts(index).is_empty());
}

#[test]
fn logicitem_placed_over_a_wire_output_reclassifies_it_as_an_input() {
    let mut circuit = Circuit::new();
    let mut modifier = circuit.modifier();

    let segment = modifier.add_wire_segment(p(0, 0), p(10, 0), InsertionMode::Temporary).unwrap();
    let wire_selection_id = select_segment(&mut modifier, segment, 10);
    modifier.change_insertion_mode(wire_selection_id, InsertionMode::InsertOrDiscard).unwrap();

    let or_position = input_port_position(p(10, 0), Orientation::Left, 0).unwrap();
    assert_eq!(or_position, p(10, 0));
    let mut or_def = and_gate(1);
    or_def.logicitem_type = LogicItemType::Or;
    or_def.orientation = Orientation::Left;
    let or_id = modifier.add_logicitem(or_def, or_position, InsertionMode::Temporary).unwrap();
    let or_selection_id = select_logicitem(&mut modifier, or_id);
    modifier.change_insertion_mode(or_selection_id, InsertionMode::InsertOrDiscard).unwrap();

    let endpoint_type = |modifier: &logiksim_core::Modifier<'_>| {
        let layout = modifier.layout();
        let inserted_wire = logiksim_layout::wire_ids(layout)
            .find(|&id| id.raw() >= WireId::FIRST_INSERTED.raw())
            .unwrap();
        let tree = layout.wires().segment_tree(inserted_wire);
        let (_, info) = tree.iter().find(|(_, info)| info.line().p1() == p(10, 0)).unwrap();
        info.p1_type()
    };

    assert_eq!(endpoint_type(&modifier), SegmentPointType::Input);

    modifier.change_insertion_mode(or_selection_id, InsertionMode::Temporary).unwrap();
    assert_eq!(endpoint_type(&modifier), SegmentPointType::Output);
}

#[test]
fn undo_then_redo_a_logicitem_move_reaches_the_same_positions() {
    let mut circuit = Circuit::new();
    let mut modifier = circuit.modifier();
    modifier.enable_history();

    let id = modifier.add_logicitem(and_gate(2), p(0, 0), InsertionMode::Temporary).unwrap();
    let selection_id = select_logicitem(&mut modifier, id);
    let delta = MoveDelta::new(10, 10);
    modifier.move_or_delete_temporary(selection_id, delta).unwrap();

    assert_eq!(modifier.layout().logicitems().position(id), p(10, 10));

    modifier.undo_group().unwrap();
    assert_eq!(modifier.layout().logicitems().position(id), p(0, 0));

    modifier.redo_group().unwrap();
    assert_eq!(modifier.layout().logicitems().position(id), p(10, 10));
}
