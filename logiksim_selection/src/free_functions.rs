// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Free functions that relate a [`Selection`] to the [`Layout`] it was taken
//! from.

use logiksim_geometry::{
    Axis, DecorationId, LogicItemId, Offset, OrderedLine, Part, Point, PointFine, Segment, WireId,
};
use logiksim_layout::{DisplayState, Layout};
use logiksim_messages::SegmentPart;
use logiksim_parts::PartSelection;

use crate::display_states::DisplayStates;
use crate::selection::Selection;

/// The full length of `line` as a single [`Part`].
fn full_part(line: OrderedLine) -> Part {
    Part::new(Offset::ZERO, Offset::new(line.length())).expect("a line always has positive length")
}

/// Projects `point` onto `line`'s axis, returning its offset from `p0` if
/// the point actually lies on the line.
fn offset_on_line(line: OrderedLine, point: Point) -> Option<Offset> {
    if !line.contains_point(point) {
        return None;
    }
    let origin = line.p0();
    let raw = match line.axis() {
        Axis::Horizontal => point.x.value() - origin.x.value(),
        Axis::Vertical => point.y.value() - origin.y.value(),
    };
    Some(Offset::new(u32::try_from(raw).unwrap_or(0)))
}

/// Returns the single grid unit of `line` that `point` falls within, or
/// `None` if `point` doesn't land on the line at all.
///
/// This stands in for the original's collision-rectangle hit test, which
/// operates against continuous (fine) coordinates this crate's geometry
/// doesn't model; snapping to the nearest whole grid unit is the closest
/// equivalent available here.
fn hit_part(line: OrderedLine, point: PointFine) -> Option<Part> {
    let grid_point = point.to_grid()?;
    let offset = offset_on_line(line, grid_point)?;
    let length = line.length();
    let begin = offset.value().min(length.saturating_sub(1));
    Part::new(Offset::new(begin), Offset::new(begin + 1))
}

#[must_use]
pub fn has_logicitems(selection: &Selection) -> bool {
    selection.selected_logicitems().next().is_some()
}

#[must_use]
pub fn has_decorations(selection: &Selection) -> bool {
    selection.selected_decorations().next().is_some()
}

/// Returns `true` if every element of `selection` still resolves to a real
/// entry in `layout` (all ids in range, all segment parts within bounds).
#[must_use]
pub fn is_valid_selection(selection: &Selection, layout: &Layout) -> bool {
    selection.selected_logicitems().all(|id| logiksim_layout::is_logicitem_id_valid(id, layout))
        && selection.selected_decorations().all(|id| logiksim_layout::is_decoration_id_valid(id, layout))
        && selection.selected_segments().all(|(segment, parts)| {
            logiksim_layout::is_segment_valid(segment, layout)
                && parts.max_offset().is_none_or(|offset| {
                    offset.value() <= logiksim_layout::get_line(segment, layout).length()
                })
        })
}

/// Returns the world-space line for every selected segment part, one entry
/// per stored [`logiksim_parts::Part`] (a segment selected across several
/// disjoint ranges yields several lines).
#[must_use]
pub fn get_lines(selection: &Selection, layout: &Layout) -> Vec<OrderedLine> {
    let mut lines = Vec::new();
    for (segment, parts) in selection.selected_segments() {
        let full_line = logiksim_layout::get_line(segment, layout);
        for part in parts.iter() {
            let dx_begin = i32::try_from(part.begin().value()).unwrap_or(i32::MAX);
            let dx_end = i32::try_from(part.end().value()).unwrap_or(i32::MAX);
            let origin = full_line.p0();
            let (p0, p1) = match full_line.axis() {
                logiksim_geometry::Axis::Horizontal => (
                    Point::new(origin.x.checked_add(dx_begin).unwrap_or(origin.x), origin.y),
                    Point::new(origin.x.checked_add(dx_end).unwrap_or(origin.x), origin.y),
                ),
                logiksim_geometry::Axis::Vertical => (
                    Point::new(origin.x, origin.y.checked_add(dx_begin).unwrap_or(origin.y)),
                    Point::new(origin.x, origin.y.checked_add(dx_end).unwrap_or(origin.y)),
                ),
            };
            if let Some(line) = OrderedLine::new(p0, p1) {
                lines.push(line);
            }
        }
    }
    lines
}

#[must_use]
pub fn all_normal_display_state(selection: &Selection, layout: &Layout) -> bool {
    selection.selected_logicitems().all(|id| layout.logicitems().display_state(id) == DisplayState::Normal)
        && selection
            .selected_decorations()
            .all(|id| layout.decorations().display_state(id) == DisplayState::Normal)
}

#[must_use]
pub fn anything_colliding(selection: &Selection, layout: &Layout) -> bool {
    display_states(selection, layout).contains(DisplayStates::COLLIDING)
}

#[must_use]
pub fn anything_temporary(selection: &Selection, layout: &Layout) -> bool {
    display_states(selection, layout).contains(DisplayStates::TEMPORARY)
}

#[must_use]
pub fn anything_valid(selection: &Selection, layout: &Layout) -> bool {
    display_states(selection, layout).contains(DisplayStates::VALID)
}

/// Returns which display states appear among every selected logic-item and
/// decoration. Selected segment parts don't carry their own display state
/// (a wire's state lives on the tree, not per-part), so they're excluded.
#[must_use]
pub fn display_states(selection: &Selection, layout: &Layout) -> DisplayStates {
    let mut states = DisplayStates::empty();
    for id in selection.selected_logicitems() {
        states |= DisplayStates::from_state(layout.logicitems().display_state(id));
    }
    for id in selection.selected_decorations() {
        states |= DisplayStates::from_state(layout.decorations().display_state(id));
    }
    states
}

/// Returns `true` if `point` falls on a selected part of `segment`.
#[must_use]
pub fn is_selected(selection: &Selection, layout: &Layout, segment: Segment, point: PointFine) -> bool {
    let full_line = logiksim_layout::get_line(segment, layout);
    let Some(grid_point) = point.to_grid() else {
        return false;
    };
    if !full_line.contains_point(grid_point) {
        return false;
    }
    let Some(offset) = offset_on_line(full_line, grid_point) else {
        return false;
    };
    let probe = Part::new(offset, Offset::new(offset.value() + 1)).unwrap_or(full_part(full_line));
    selection.selected_parts_of(segment).overlaps_any(probe)
}

/// Selects all of `segment`.
pub fn add_segment(selection: &mut Selection, segment: Segment, layout: &Layout) {
    let part = full_part(logiksim_layout::get_line(segment, layout));
    selection.add_segment(SegmentPart { segment, part });
}

/// Selects every segment of the wire `wire_id`.
pub fn add_segment_tree(selection: &mut Selection, wire_id: WireId, layout: &Layout) {
    for (segment_index, _info) in layout.wires().segment_tree(wire_id).iter() {
        add_segment(selection, Segment::new(wire_id, segment_index), layout);
    }
}

/// Deselects all of `segment`.
pub fn remove_segment(selection: &mut Selection, segment: Segment, layout: &Layout) {
    let part = full_part(logiksim_layout::get_line(segment, layout));
    selection.remove_segment(SegmentPart { segment, part });
}

/// Deselects every segment of the wire `wire_id`.
pub fn remove_segment_tree(selection: &mut Selection, wire_id: WireId, layout: &Layout) {
    for (segment_index, _info) in layout.wires().segment_tree(wire_id).iter() {
        remove_segment(selection, Segment::new(wire_id, segment_index), layout);
    }
}

/// Selects the grid unit of `segment` that `point` falls within.
pub fn add_segment_part(selection: &mut Selection, layout: &Layout, segment: Segment, point: PointFine) {
    let full_line = logiksim_layout::get_line(segment, layout);
    if let Some(part) = hit_part(full_line, point) {
        selection.add_segment(SegmentPart { segment, part });
    }
}

/// Deselects the grid unit of `segment` that `point` falls within.
pub fn remove_segment_part(selection: &mut Selection, layout: &Layout, segment: Segment, point: PointFine) {
    let full_line = logiksim_layout::get_line(segment, layout);
    if let Some(part) = hit_part(full_line, point) {
        selection.remove_segment(SegmentPart { segment, part });
    }
}

/// Flips the selection state of the grid unit of `segment` that `point`
/// falls within.
pub fn toggle_segment_part(selection: &mut Selection, layout: &Layout, segment: Segment, point: PointFine) {
    let full_line = logiksim_layout::get_line(segment, layout);
    let Some(part) = hit_part(full_line, point) else {
        return;
    };
    if selection.selected_parts_of(segment).overlaps_any(part) {
        selection.remove_segment(SegmentPart { segment, part });
    } else {
        selection.add_segment(SegmentPart { segment, part });
    }
}

/// Returns the selected logic-item, if `selection` contains exactly one and
/// nothing else.
#[must_use]
pub fn get_single_logicitem(selection: &Selection) -> Option<LogicItemId> {
    let mut items = selection.selected_logicitems();
    let only = items.next()?;
    if items.next().is_some() || selection.selected_decorations().next().is_some() {
        return None;
    }
    if selection.selected_segments().next().is_some() {
        return None;
    }
    Some(only)
}

/// Returns the selected decoration, if `selection` contains exactly one and
/// nothing else.
#[must_use]
pub fn get_single_decoration(selection: &Selection) -> Option<DecorationId> {
    let mut decorations = selection.selected_decorations();
    let only = decorations.next()?;
    if decorations.next().is_some() || selection.selected_logicitems().next().is_some() {
        return None;
    }
    if selection.selected_segments().next().is_some() {
        return None;
    }
    Some(only)
}

/// Returns the selected segment and its selected parts, if `selection`
/// contains exactly one segment entry and nothing else.
#[must_use]
pub fn get_single_segment(selection: &Selection) -> Option<(Segment, PartSelection)> {
    let mut segments = selection.selected_segments();
    let (segment, parts) = segments.next()?;
    if segments.next().is_some()
        || selection.selected_logicitems().next().is_some()
        || selection.selected_decorations().next().is_some()
    {
        return None;
    }
    Some((segment, parts.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use logiksim_geometry::{Grid, Orientation, Segment, SegmentIndex, WireId};
    use logiksim_layout::{DecorationDefinition, DecorationType, LogicItemDefinition, LogicItemType};
    use logiksim_messages::SegmentPart;
    use smallvec::SmallVec;

    fn p(x: i32, y: i32) -> Point {
        Point::new(Grid::new(x).unwrap(), Grid::new(y).unwrap())
    }

    fn sample_logicitem() -> LogicItemDefinition {
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
    fn all_normal_display_state_checks_every_selected_item() {
        let mut layout = Layout::new();
        let id = layout
            .logicitems_mut()
            .add(sample_logicitem(), p(0, 0), DisplayState::Normal)
            .unwrap();
        let mut selection = Selection::new();
        selection.add_logicitem(id);
        assert!(all_normal_display_state(&selection, &layout));

        layout.logicitems_mut().set_display_state(id, DisplayState::Valid);
        assert!(!all_normal_display_state(&selection, &layout));
        assert!(anything_valid(&selection, &layout));
        assert!(!anything_colliding(&selection, &layout));
    }

    #[test]
    fn has_logicitems_and_decorations_reflect_selection_contents() {
        let mut layout = Layout::new();
        let decoration_def = DecorationDefinition {
            decoration_type: DecorationType::TextElement,
            size: p(2, 2),
            attrs_text_element: None,
        };
        let decoration_id = layout.decorations_mut().add(decoration_def, p(0, 0), DisplayState::Normal).unwrap();
        let mut selection = Selection::new();
        assert!(!has_logicitems(&selection));
        assert!(!has_decorations(&selection));

        selection.add_decoration(decoration_id);
        assert!(has_decorations(&selection));
        assert!(!has_logicitems(&selection));
    }

    #[test]
    fn is_valid_selection_rejects_out_of_range_segments() {
        let layout = Layout::new();
        let mut selection = Selection::new();
        let bogus = Segment::new(WireId::FIRST_INSERTED, SegmentIndex::new(0));
        selection.add_segment(SegmentPart {
            segment: bogus,
            part: logiksim_geometry::Part::new(logiksim_geometry::Offset::new(0), logiksim_geometry::Offset::new(1))
                .unwrap(),
        });
        assert!(!is_valid_selection(&selection, &layout));
    }

    fn layout_with_one_segment() -> (Layout, Segment) {
        let mut layout = Layout::new();
        let wire_id = layout.wires_mut().add_wire();
        let line = OrderedLine::new(p(0, 0), p(10, 0)).unwrap();
        let segment_index = layout.wires_mut().segment_tree_mut(wire_id).add_segment(line);
        (layout, Segment::new(wire_id, segment_index))
    }

    #[test]
    fn add_segment_selects_its_full_length() {
        let (layout, segment) = layout_with_one_segment();
        let mut selection = Selection::new();
        add_segment(&mut selection, segment, &layout);
        assert_eq!(selection.selected_parts_of(segment).max_offset(), Some(logiksim_geometry::Offset::new(10)));
    }

    #[test]
    fn add_segment_tree_selects_every_segment_of_the_wire() {
        let (layout, segment) = layout_with_one_segment();
        let mut selection = Selection::new();
        add_segment_tree(&mut selection, segment.wire_id, &layout);
        assert!(selection.is_segment_selected(segment));

        remove_segment_tree(&mut selection, segment.wire_id, &layout);
        assert!(!selection.is_segment_selected(segment));
    }

    #[test]
    fn is_selected_checks_the_point_against_selected_parts() {
        use logiksim_geometry::{GridFine, PointFine};

        let (layout, segment) = layout_with_one_segment();
        let mut selection = Selection::new();
        selection.add_segment(SegmentPart { segment, part: part_range(0, 5) });

        let inside = PointFine::new(GridFine::new(2.0), GridFine::new(0.0));
        let outside = PointFine::new(GridFine::new(8.0), GridFine::new(0.0));
        assert!(is_selected(&selection, &layout, segment, inside));
        assert!(!is_selected(&selection, &layout, segment, outside));
    }

    #[test]
    fn toggle_segment_part_flips_the_hit_grid_unit() {
        use logiksim_geometry::{GridFine, PointFine};

        let (layout, segment) = layout_with_one_segment();
        let mut selection = Selection::new();
        let point = PointFine::new(GridFine::new(3.0), GridFine::new(0.0));

        toggle_segment_part(&mut selection, &layout, segment, point);
        assert!(selection.is_segment_selected(segment));

        toggle_segment_part(&mut selection, &layout, segment, point);
        assert!(!selection.is_segment_selected(segment));
    }

    #[test]
    fn get_single_logicitem_requires_a_lone_selection() {
        let mut layout = Layout::new();
        let id = layout.logicitems_mut().add(sample_logicitem(), p(0, 0), DisplayState::Normal).unwrap();
        let mut selection = Selection::new();
        assert_eq!(get_single_logicitem(&selection), None);

        selection.add_logicitem(id);
        assert_eq!(get_single_logicitem(&selection), Some(id));

        let (_, segment) = layout_with_one_segment();
        selection.add_segment(SegmentPart { segment, part: part_range(0, 1) });
        assert_eq!(get_single_logicitem(&selection), None);
    }

    #[test]
    fn get_single_segment_requires_a_lone_entry() {
        let (_, segment) = layout_with_one_segment();
        let mut selection = Selection::new();
        selection.add_segment(SegmentPart { segment, part: part_range(0, 5) });
        let (found_segment, parts) = get_single_segment(&selection).unwrap();
        assert_eq!(found_segment, segment);
        assert_eq!(parts.max_offset(), Some(logiksim_geometry::Offset::new(5)));

        selection.add_logicitem(LogicItemId::new(0));
        assert_eq!(get_single_segment(&selection), None);
    }

    fn part_range(b: u32, e: u32) -> Part {
        Part::new(logiksim_geometry::Offset::new(b), logiksim_geometry::Offset::new(e)).unwrap()
    }
}
