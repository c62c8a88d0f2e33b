// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! LogikSim Layout: the struct-of-arrays store for logic-items, decorations
//! and wires that make up one circuit's visual representation.
//!
//! [`Layout`] owns no behavior beyond storage invariants; editing semantics
//! (insertion-mode transitions, collision handling, undo) live in
//! `logiksim_editing` and `logiksim_history`, which only ever touch the
//! layout through the accessors here plus the three sub-stores'
//! `swap_and_delete`/`add` primitives.

mod decoration_store;
mod logicitem_store;
mod types;
mod wire_store;

pub use decoration_store::DecorationStore;
pub use logicitem_store::LogicItemStore;
pub use types::{
    ClockGeneratorAttributes, DecorationDefinition, DecorationType, DisplayState, ElementId,
    FontStyle, HorizontalAlignment, LogicItemDefinition, LogicItemType, PlacedDecoration,
    PlacedLogicItem, TextColor, TextElementAttributes,
};
pub use wire_store::WireStore;

use logiksim_geometry::{
    DecorationId, LogicItemId, OrderedLine, Part, Segment, SegmentPointType, WireId,
};
use logiksim_parts::PartSelection;

/// The visual representation of one circuit: logic-items, decorations and
/// wires.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
    logicitems: LogicItemStore,
    wires: WireStore,
    decorations: DecorationStore,
}

impl Layout {
    #[must_use]
    pub fn new() -> Self {
        Self {
            logicitems: LogicItemStore::new(),
            wires: WireStore::new(),
            decorations: DecorationStore::new(),
        }
    }

    #[must_use]
    pub fn logicitems(&self) -> &LogicItemStore {
        &self.logicitems
    }

    pub fn logicitems_mut(&mut self) -> &mut LogicItemStore {
        &mut self.logicitems
    }

    #[must_use]
    pub fn wires(&self) -> &WireStore {
        &self.wires
    }

    pub fn wires_mut(&mut self) -> &mut WireStore {
        &mut self.wires
    }

    #[must_use]
    pub fn decorations(&self) -> &DecorationStore {
        &self.decorations
    }

    pub fn decorations_mut(&mut self) -> &mut DecorationStore {
        &mut self.decorations
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.logicitems.is_empty() && self.decorations.is_empty() && self.wires.size() <= 2
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.logicitems.size() + self.decorations.size() + self.wires.size()
    }

    #[must_use]
    pub fn allocated_size(&self) -> usize {
        self.logicitems.allocated_size() + self.decorations.allocated_size() + self.wires.allocated_size()
    }

    /// Brings every sub-store into canonical form, so that two visually
    /// equivalent layouts compare equal regardless of edit history.
    pub fn normalize(&mut self) {
        self.logicitems.normalize();
        self.decorations.normalize();
        self.wires.normalize();
    }
}

/// Iterates the ids of all stored logic-items, `0..size()`.
pub fn logicitem_ids(layout: &Layout) -> impl Iterator<Item = LogicItemId> {
    (0..layout.logicitems().size()).map(LogicItemId::new)
}

/// Iterates the ids of all stored wires, including the reserved temporary
/// and colliding ones.
pub fn wire_ids(layout: &Layout) -> impl Iterator<Item = WireId> {
    (0..layout.wires().size()).map(WireId::new)
}

/// Iterates the ids of all stored decorations.
pub fn decoration_ids(layout: &Layout) -> impl Iterator<Item = DecorationId> {
    (0..layout.decorations().size()).map(DecorationId::new)
}

/// Iterates the ids of normally-inserted wires (excludes temporary and
/// colliding).
pub fn inserted_wire_ids(layout: &Layout) -> impl Iterator<Item = WireId> {
    (WireId::FIRST_INSERTED.index()..layout.wires().size()).map(WireId::new)
}

#[must_use]
pub fn is_logicitem_id_valid(id: LogicItemId, layout: &Layout) -> bool {
    id.is_valid() && id.index() < layout.logicitems().size()
}

#[must_use]
pub fn is_wire_id_valid(id: WireId, layout: &Layout) -> bool {
    id.is_valid() && id.index() < layout.wires().size()
}

#[must_use]
pub fn is_decoration_id_valid(id: DecorationId, layout: &Layout) -> bool {
    id.is_valid() && id.index() < layout.decorations().size()
}

#[must_use]
pub fn is_segment_valid(segment: Segment, layout: &Layout) -> bool {
    segment.is_valid()
        && is_wire_id_valid(segment.wire_id, layout)
        && segment.segment_index.index() < layout.wires().segment_tree(segment.wire_id).segment_count()
}

#[must_use]
pub fn is_inserted_logicitem(id: LogicItemId, layout: &Layout) -> bool {
    layout.logicitems().display_state(id) == DisplayState::Normal
}

#[must_use]
pub fn is_inserted_decoration(id: DecorationId, layout: &Layout) -> bool {
    layout.decorations().display_state(id) == DisplayState::Normal
}

#[must_use]
pub fn is_wire_empty(wire_id: WireId, layout: &Layout) -> bool {
    layout.wires().segment_tree(wire_id).is_empty()
}

#[must_use]
pub fn get_segment_info(segment: Segment, layout: &Layout) -> logiksim_segment_tree::SegmentInfo {
    layout.wires().segment_tree(segment.wire_id).segment_info(segment.segment_index)
}

#[must_use]
pub fn get_segment_point_type(
    segment: Segment,
    position: logiksim_geometry::Point,
    layout: &Layout,
) -> SegmentPointType {
    get_segment_info(segment, layout).point_type_at(position)
}

#[must_use]
pub fn get_segment_valid_parts<'a>(segment: Segment, layout: &'a Layout) -> &'a PartSelection {
    layout.wires().segment_tree(segment.wire_id).valid_parts(segment.segment_index)
}

#[must_use]
pub fn get_line(segment: Segment, layout: &Layout) -> OrderedLine {
    get_segment_info(segment, layout).line()
}

#[must_use]
pub fn get_part(segment: Segment, layout: &Layout) -> Part {
    let length = get_line(segment, layout).length();
    Part::new(logiksim_geometry::Offset::ZERO, logiksim_geometry::Offset::new(length))
        .expect("a segment's line always has positive length")
}

#[must_use]
pub fn has_segments(layout: &Layout) -> bool {
    wire_ids(layout).any(|id| !is_wire_empty(id, layout))
}

#[must_use]
pub fn all_normal_display_state(layout: &Layout) -> bool {
    logicitem_ids(layout).all(|id| is_inserted_logicitem(id, layout))
        && decoration_ids(layout).all(|id| is_inserted_decoration(id, layout))
        && inserted_wire_ids(layout).all(|id| !is_wire_empty(id, layout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use logiksim_geometry::{Grid, Orientation, Point};
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
    fn fresh_layout_has_only_reserved_wires() {
        let layout = Layout::new();
        assert!(layout.is_empty());
        assert_eq!(wire_ids(&layout).count(), 2);
        assert_eq!(inserted_wire_ids(&layout).count(), 0);
    }

    #[test]
    fn all_normal_display_state_requires_every_item_inserted() {
        let mut layout = Layout::new();
        let id = layout
            .logicitems_mut()
            .add(sample_definition(), p(0, 0), DisplayState::Temporary)
            .unwrap();
        assert!(!all_normal_display_state(&layout));

        layout.logicitems_mut().set_display_state(id, DisplayState::Normal);
        assert!(all_normal_display_state(&layout));
    }

    #[test]
    fn is_segment_valid_rejects_out_of_range_indices() {
        let layout = Layout::new();
        let bogus = Segment::new(WireId::FIRST_INSERTED, logiksim_geometry::SegmentIndex::new(0));
        assert!(!is_segment_valid(bogus, &layout));
    }

    #[test]
    fn normalize_is_idempotent_on_an_empty_layout() {
        let mut layout = Layout::new();
        layout.normalize();
        assert_eq!(layout, Layout::new());
    }
}
