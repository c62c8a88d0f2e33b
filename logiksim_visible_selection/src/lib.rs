// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A selection built from an initial state plus an ordered list of
//! rect/point operations, materialized against a layout and its spatial
//! index on demand and cached until something invalidates it.

use logiksim_geometry::{Axis, Offset, Part, Point, Rect};
use logiksim_index::{ElementRef, LayoutIndex};
use logiksim_layout::Layout;
use logiksim_messages::{LayoutMessage, SegmentPart};
use logiksim_selection::Selection;

/// One step applied on top of the initial selection during materialization.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Adds every element overlapping `Rect`, clipping wire segments to the
    /// sub-range that falls within it.
    AddRect(Rect),
    /// Removes every element overlapping `Rect`, clipping wire segments to
    /// the sub-range that falls within it.
    SubtractRect(Rect),
    /// Flips membership of whatever single element sits at `Point`.
    TogglePoint(Point),
}

/// Returns the sub-range of `line` that falls within `rect`, in the line's
/// own offset space, or `None` if they don't overlap.
fn clipped_part(line: logiksim_geometry::OrderedLine, rect: Rect) -> Option<Part> {
    if !rect.intersects_line(line) {
        return None;
    }
    let origin = line.p0();
    let (lo, hi) = match line.axis() {
        Axis::Horizontal => (rect.p0().x.max(origin.x), rect.p1().x.min(line.p1().x)),
        Axis::Vertical => (rect.p0().y.max(origin.y), rect.p1().y.min(line.p1().y)),
    };
    let origin_value = match line.axis() {
        Axis::Horizontal => origin.x.value(),
        Axis::Vertical => origin.y.value(),
    };
    let begin = u32::try_from(lo.value() - origin_value).ok()?;
    let end = u32::try_from(hi.value() - origin_value).ok()?;
    Part::new(Offset::new(begin), Offset::new(end))
}

/// Returns the unit part of `line` containing `point`, for [`Operation::TogglePoint`].
fn unit_part_at(line: logiksim_geometry::OrderedLine, point: Point) -> Option<Part> {
    if !line.contains_point(point) {
        return None;
    }
    let origin = line.p0();
    let offset = match line.axis() {
        Axis::Horizontal => point.x.value() - origin.x.value(),
        Axis::Vertical => point.y.value() - origin.y.value(),
    };
    let begin = u32::try_from(offset).ok()?;
    let length = line.length();
    let begin = begin.min(length.saturating_sub(1));
    Part::new(Offset::new(begin), Offset::new(begin + 1))
}

fn apply_rect(selection: &mut Selection, layout: &Layout, index: &LayoutIndex, rect: Rect, add: bool) {
    for element in index.spatial().query_selection(rect) {
        match element {
            ElementRef::LogicItem(id) => {
                if add {
                    selection.add_logicitem(id);
                } else {
                    selection.remove_logicitem(id);
                }
            }
            ElementRef::Decoration(id) => {
                if add {
                    selection.add_decoration(id);
                } else {
                    selection.remove_decoration(id);
                }
            }
            ElementRef::Segment(segment) => {
                let line = logiksim_layout::get_line(segment, layout);
                let Some(part) = clipped_part(line, rect) else { continue };
                if add {
                    selection.add_segment(SegmentPart { segment, part });
                } else {
                    selection.remove_segment(SegmentPart { segment, part });
                }
            }
        }
    }
}

fn apply_toggle_point(selection: &mut Selection, layout: &Layout, index: &LayoutIndex, point: Point) {
    let at_point = Rect::new(point, point);
    for element in index.spatial().query_selection(at_point) {
        match element {
            ElementRef::LogicItem(id) => {
                selection.toggle_logicitem(id);
                return;
            }
            ElementRef::Decoration(id) => {
                if selection.is_decoration_selected(id) {
                    selection.remove_decoration(id);
                } else {
                    selection.add_decoration(id);
                }
                return;
            }
            ElementRef::Segment(_) => continue,
        }
    }
    for segment in index.spatial().query_line_segments(point) {
        if !segment.is_valid() {
            continue;
        }
        let line = logiksim_layout::get_line(segment, layout);
        let Some(part) = unit_part_at(line, point) else { continue };
        let already_selected = selection.selected_parts_of(segment).overlaps_any(part);
        if already_selected {
            selection.remove_segment(SegmentPart { segment, part });
        } else {
            selection.add_segment(SegmentPart { segment, part });
        }
        return;
    }
}

/// A [`Selection`] expressed as an initial state plus an ordered list of
/// user-level operations, materialized lazily against a layout.
///
/// Mirrors the relationship between a mouse drag and the selection it
/// produces: each rect the user drags out, or point they click, is recorded
/// as an operation rather than immediately resolved, so the visible result
/// can be recomputed against the latest layout without replaying the drag.
#[derive(Clone, Debug, Default)]
pub struct VisibleSelection {
    initial_selection: Selection,
    operations: Vec<Operation>,
    cache: Option<Selection>,
}

impl VisibleSelection {
    #[must_use]
    pub fn new(initial_selection: Selection) -> Self {
        Self {
            initial_selection,
            operations: Vec::new(),
            cache: None,
        }
    }

    #[must_use]
    pub fn initial_selection(&self) -> &Selection {
        &self.initial_selection
    }

    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    fn invalidate(&mut self) {
        self.cache = None;
    }

    pub fn add_rect(&mut self, rect: Rect) {
        self.operations.push(Operation::AddRect(rect));
        self.invalidate();
    }

    pub fn subtract_rect(&mut self, rect: Rect) {
        self.operations.push(Operation::SubtractRect(rect));
        self.invalidate();
    }

    pub fn toggle_point(&mut self, point: Point) {
        self.operations.push(Operation::TogglePoint(point));
        self.invalidate();
    }

    /// Discards every recorded operation, leaving only the initial selection.
    pub fn clear_operations(&mut self) {
        self.operations.clear();
        self.invalidate();
    }

    /// Replaces the initial selection and discards every recorded operation.
    pub fn set_initial_selection(&mut self, selection: Selection) {
        self.initial_selection = selection;
        self.operations.clear();
        self.invalidate();
    }

    /// Applies `f` to the initial selection in place, invalidating the
    /// cache. Used by the editing primitives to add or remove a single
    /// element from the base selection a drag's rect/point operations build
    /// on top of, without touching those operations.
    pub fn modify_initial_selection(&mut self, f: impl FnOnce(&mut Selection)) {
        f(&mut self.initial_selection);
        self.invalidate();
    }

    /// Folds one layout message into the initial selection and drops the
    /// cache: an id rename or deletion can change what an already-recorded
    /// rect or point operation would resolve to, so the whole thing must be
    /// recomputed from scratch next time.
    pub fn submit(&mut self, message: &LayoutMessage) {
        self.initial_selection.submit(message);
        self.invalidate();
    }

    fn materialize(&self, layout: &Layout, index: &LayoutIndex) -> Selection {
        let mut selection = self.initial_selection.clone();
        for operation in &self.operations {
            match *operation {
                Operation::AddRect(rect) => apply_rect(&mut selection, layout, index, rect, true),
                Operation::SubtractRect(rect) => apply_rect(&mut selection, layout, index, rect, false),
                Operation::TogglePoint(point) => apply_toggle_point(&mut selection, layout, index, point),
            }
        }
        selection
    }

    /// Returns the materialized selection, recomputing and caching it if the
    /// cache was invalidated since the last call.
    pub fn selection(&mut self, layout: &Layout, index: &LayoutIndex) -> &Selection {
        if self.cache.is_none() {
            self.cache = Some(self.materialize(layout, index));
        }
        self.cache.as_ref().expect("populated just above")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logiksim_geometry::{Grid, LogicItemId, Orientation};
    use logiksim_messages::LogicItemInsertData;

    fn p(x: i32, y: i32) -> Point {
        Point::new(Grid::new(x).unwrap(), Grid::new(y).unwrap())
    }

    fn rect(a: (i32, i32), b: (i32, i32)) -> Rect {
        Rect::new(p(a.0, a.1), p(b.0, b.1))
    }

    fn indexed_logicitem(id: LogicItemId, bounds: Rect) -> LayoutIndex {
        let mut index = LayoutIndex::new();
        let data = LogicItemInsertData {
            position: bounds.p0(),
            input_count: 1,
            output_count: 1,
            orientation: Orientation::Right,
            bounding_rect: bounds,
        };
        index.submit(&LayoutMessage::LogicItemInserted { logicitem_id: id, data });
        index
    }

    #[test]
    fn add_rect_selects_overlapping_logicitems() {
        let layout = Layout::new();
        let id = LogicItemId::new(0);
        let index = indexed_logicitem(id, rect((0, 0), (2, 2)));

        let mut visible = VisibleSelection::new(Selection::new());
        visible.add_rect(rect((1, 1), (5, 5)));

        assert!(visible.selection(&layout, &index).is_logicitem_selected(id));
    }

    #[test]
    fn subtract_rect_removes_a_previously_added_logicitem() {
        let layout = Layout::new();
        let id = LogicItemId::new(0);
        let index = indexed_logicitem(id, rect((0, 0), (2, 2)));

        let mut visible = VisibleSelection::new(Selection::new());
        visible.add_rect(rect((0, 0), (5, 5)));
        visible.subtract_rect(rect((0, 0), (5, 5)));

        assert!(!visible.selection(&layout, &index).is_logicitem_selected(id));
    }

    #[test]
    fn cache_is_reused_until_invalidated() {
        let layout = Layout::new();
        let id = LogicItemId::new(0);
        let index = indexed_logicitem(id, rect((0, 0), (2, 2)));

        let mut visible = VisibleSelection::new(Selection::new());
        visible.add_rect(rect((0, 0), (5, 5)));
        assert!(visible.cache.is_none());
        visible.selection(&layout, &index);
        assert!(visible.cache.is_some());

        visible.add_rect(rect((0, 0), (1, 1)));
        assert!(visible.cache.is_none());
    }

    #[test]
    fn toggle_point_flips_a_logicitem_at_that_point() {
        let layout = Layout::new();
        let id = LogicItemId::new(0);
        let index = indexed_logicitem(id, rect((0, 0), (2, 2)));

        let mut visible = VisibleSelection::new(Selection::new());
        visible.toggle_point(p(1, 1));
        assert!(visible.selection(&layout, &index).is_logicitem_selected(id));

        visible.toggle_point(p(1, 1));
        assert!(!visible.selection(&layout, &index).is_logicitem_selected(id));
    }

    #[test]
    fn submit_invalidates_the_cache() {
        let layout = Layout::new();
        let id = LogicItemId::new(0);
        let index = indexed_logicitem(id, rect((0, 0), (2, 2)));

        let mut visible = VisibleSelection::new(Selection::new());
        visible.add_rect(rect((0, 0), (5, 5)));
        visible.selection(&layout, &index);
        assert!(visible.cache.is_some());

        visible.submit(&LayoutMessage::LogicItemDeleted { logicitem_id: id });
        assert!(visible.cache.is_none());
    }
}
