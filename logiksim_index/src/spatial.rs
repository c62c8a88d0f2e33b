// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial index over the bounding boxes of *inserted* layout elements.

use hashbrown::HashMap;

use logiksim_geometry::{DecorationId, LogicItemId, Rect, Segment, SegmentIndex, WireId};
use logiksim_layout::Layout;
use logiksim_messages::LayoutMessage;

/// Tags one inserted element tracked by the spatial index.
///
/// Mirrors `spatial_index::tree_payload_t`'s three-way discriminated id:
/// a logic-item, a decoration, or one segment of a wire's tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementRef {
    LogicItem(LogicItemId),
    Decoration(DecorationId),
    Segment(Segment),
}

/// Up to four segments meeting at a grid point, as returned by
/// [`SpatialIndex::query_line_segments`]. Unused slots hold
/// `Segment::new(WireId::NULL, SegmentIndex::NULL)`.
pub type QueriedSegments = [Segment; 4];

fn empty_queried_segments() -> QueriedSegments {
    let empty = Segment::new(WireId::NULL, SegmentIndex::NULL);
    [empty; 4]
}

/// Number of real (non-null) entries in a [`QueriedSegments`] result.
#[must_use]
pub fn get_segment_count(result: QueriedSegments) -> usize {
    result.iter().filter(|s| s.is_valid()).count()
}

/// Returns `true` if every real entry shares the same wire id.
#[must_use]
pub fn all_same_wire_id(result: QueriedSegments) -> bool {
    let mut wire_id = None;
    for segment in result.iter().filter(|s| s.is_valid()) {
        match wire_id {
            None => wire_id = Some(segment.wire_id),
            Some(id) if id != segment.wire_id => return false,
            Some(_) => {}
        }
    }
    true
}

/// Returns the single wire id shared by every real entry, if any exist and
/// they agree.
#[must_use]
pub fn get_unique_wire_id(result: QueriedSegments) -> Option<WireId> {
    if !all_same_wire_id(result) {
        return None;
    }
    result.iter().find(|s| s.is_valid()).map(|s| s.wire_id)
}

/// Efficiently tracks the bounding boxes of every inserted logic-item,
/// decoration and wire segment, rebuilt incrementally from the message
/// stream rather than by re-scanning the layout.
///
/// Backed by a flat vector with linear-scan queries, the same tradeoff a
/// tiny, frequently-mutated set calls for over a tree structure: simple,
/// cache-friendly, and correct without needing balancing.
#[derive(Clone, Debug, Default)]
pub struct SpatialIndex {
    entries: Vec<(ElementRef, Rect)>,
    positions: HashMap<ElementRef, usize>,
}

impl SpatialIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from an existing layout's current state. Construction
    /// is the only time the index reads the layout directly; afterwards it
    /// must be kept exact by feeding it every message via [`submit`](Self::submit).
    #[must_use]
    pub fn from_layout(layout: &Layout) -> Self {
        let mut index = Self::new();
        for id in logiksim_layout::logicitem_ids(layout) {
            if logiksim_layout::is_inserted_logicitem(id, layout) {
                index.insert(ElementRef::LogicItem(id), layout.logicitems().bounding_rect(id));
            }
        }
        for id in logiksim_layout::decoration_ids(layout) {
            if logiksim_layout::is_inserted_decoration(id, layout) {
                index.insert(ElementRef::Decoration(id), layout.decorations().bounding_rect(id));
            }
        }
        for wire_id in logiksim_layout::inserted_wire_ids(layout) {
            let tree = layout.wires().segment_tree(wire_id);
            for (segment_index, info) in tree.iter() {
                let segment = Segment::new(wire_id, segment_index);
                let line = info.line();
                index.insert(ElementRef::Segment(segment), Rect::new(line.p0(), line.p1()));
            }
        }
        index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, element: ElementRef, rect: Rect) {
        debug_assert!(!self.positions.contains_key(&element), "element already indexed");
        let slot = self.entries.len();
        self.entries.push((element, rect));
        self.positions.insert(element, slot);
    }

    fn update(&mut self, element: ElementRef, rect: Rect) {
        let slot = *self.positions.get(&element).expect("update of an unindexed element");
        self.entries[slot].1 = rect;
    }

    fn remove(&mut self, element: ElementRef) {
        let slot = self.positions.remove(&element).expect("remove of an unindexed element");
        self.entries.swap_remove(slot);
        if let Some((moved, _)) = self.entries.get(slot) {
            self.positions.insert(*moved, slot);
        }
    }

    fn rename(&mut self, old: ElementRef, new: ElementRef) {
        let slot = self.positions.remove(&old).expect("rename of an unindexed element");
        self.entries[slot].0 = new;
        self.positions.insert(new, slot);
    }

    /// Returns every indexed element whose bounding box intersects `rect`.
    #[must_use]
    pub fn query_selection(&self, rect: Rect) -> Vec<ElementRef> {
        self.entries
            .iter()
            .filter(|(_, r)| r.intersects(rect))
            .map(|(element, _)| *element)
            .collect()
    }

    /// Returns `true` if any indexed element's bounding box contains `point`.
    #[must_use]
    pub fn has_element(&self, point: logiksim_geometry::Point) -> bool {
        self.entries.iter().any(|(_, r)| r.contains_point(point))
    }

    /// Returns up to four wire segments whose line passes through `point`.
    ///
    /// Because a segment's bounding box is exactly its line (segments are
    /// orthogonal), containment here is equivalent to the point lying on
    /// that segment, not merely within its box.
    #[must_use]
    pub fn query_line_segments(&self, point: logiksim_geometry::Point) -> QueriedSegments {
        let mut result = empty_queried_segments();
        let mut count = 0;
        for (element, rect) in &self.entries {
            let ElementRef::Segment(segment) = element else { continue };
            if count >= result.len() {
                break;
            }
            if rect.contains_point(point) {
                result[count] = *segment;
                count += 1;
            }
        }
        result
    }

    /// Folds one layout message into the index. Messages other than the
    /// insert/uninsert/id-update trio for each entity kind are ignored: the
    /// index only ever tracks inserted geometry.
    pub fn submit(&mut self, message: &LayoutMessage) {
        match *message {
            LayoutMessage::LogicItemInserted { logicitem_id, data } => {
                self.insert(ElementRef::LogicItem(logicitem_id), data.bounding_rect);
            }
            LayoutMessage::LogicItemUninserted { logicitem_id, .. } => {
                self.remove(ElementRef::LogicItem(logicitem_id));
            }
            LayoutMessage::InsertedLogicItemIdUpdated { old_logicitem_id, new_logicitem_id, data } => {
                self.rename(ElementRef::LogicItem(old_logicitem_id), ElementRef::LogicItem(new_logicitem_id));
                self.update(ElementRef::LogicItem(new_logicitem_id), data.bounding_rect);
            }

            LayoutMessage::DecorationInserted { decoration_id, data } => {
                self.insert(ElementRef::Decoration(decoration_id), data.bounding_rect);
            }
            LayoutMessage::DecorationUninserted { decoration_id, .. } => {
                self.remove(ElementRef::Decoration(decoration_id));
            }
            LayoutMessage::InsertedDecorationIdUpdated { old_decoration_id, new_decoration_id, data } => {
                self.rename(
                    ElementRef::Decoration(old_decoration_id),
                    ElementRef::Decoration(new_decoration_id),
                );
                self.update(ElementRef::Decoration(new_decoration_id), data.bounding_rect);
            }

            LayoutMessage::SegmentInserted { segment, segment_info } => {
                let rect = Rect::new(segment_info.line.p0(), segment_info.line.p1());
                self.insert(ElementRef::Segment(segment), rect);
            }
            LayoutMessage::SegmentUninserted { segment, .. } => {
                self.remove(ElementRef::Segment(segment));
            }
            LayoutMessage::InsertedSegmentIdUpdated { old_segment, new_segment, segment_info } => {
                self.rename(ElementRef::Segment(old_segment), ElementRef::Segment(new_segment));
                let rect = Rect::new(segment_info.line.p0(), segment_info.line.p1());
                self.update(ElementRef::Segment(new_segment), rect);
            }
            LayoutMessage::InsertedEndPointsUpdated { segment, new_segment_info, .. } => {
                let rect = Rect::new(new_segment_info.line.p0(), new_segment_info.line.p1());
                self.update(ElementRef::Segment(segment), rect);
            }

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logiksim_geometry::{Grid, Orientation, Point};
    use logiksim_messages::{DecorationInsertData, LogicItemInsertData, SegmentInfoSnapshot};

    fn p(x: i32, y: i32) -> Point {
        Point::new(Grid::new(x).unwrap(), Grid::new(y).unwrap())
    }

    fn rect(a: (i32, i32), b: (i32, i32)) -> Rect {
        Rect::new(p(a.0, a.1), p(b.0, b.1))
    }

    #[test]
    fn insert_then_query_selection_finds_the_element() {
        let mut index = SpatialIndex::new();
        let id = LogicItemId::new(0);
        let data = LogicItemInsertData {
            position: p(0, 0),
            input_count: 1,
            output_count: 1,
            orientation: Orientation::Right,
            bounding_rect: rect((0, 0), (1, 1)),
        };
        index.submit(&LayoutMessage::LogicItemInserted { logicitem_id: id, data });

        let hits = index.query_selection(rect((0, 0), (2, 2)));
        assert_eq!(hits, vec![ElementRef::LogicItem(id)]);
    }

    #[test]
    fn uninserted_removes_the_element() {
        let mut index = SpatialIndex::new();
        let id = DecorationId::new(0);
        let data = DecorationInsertData { position: p(0, 0), size: p(1, 1), bounding_rect: rect((0, 0), (1, 1)) };
        index.submit(&LayoutMessage::DecorationInserted { decoration_id: id, data });
        index.submit(&LayoutMessage::DecorationUninserted { decoration_id: id, data });
        assert!(index.is_empty());
        assert!(!index.has_element(p(0, 0)));
    }

    #[test]
    fn id_updated_renames_without_losing_the_rect() {
        let mut index = SpatialIndex::new();
        let old_id = LogicItemId::new(0);
        let new_id = LogicItemId::new(1);
        let data = LogicItemInsertData {
            position: p(0, 0),
            input_count: 1,
            output_count: 1,
            orientation: Orientation::Right,
            bounding_rect: rect((0, 0), (1, 1)),
        };
        index.submit(&LayoutMessage::LogicItemInserted { logicitem_id: old_id, data });
        index.submit(&LayoutMessage::InsertedLogicItemIdUpdated {
            old_logicitem_id: old_id,
            new_logicitem_id: new_id,
            data,
        });

        let hits = index.query_selection(rect((0, 0), (1, 1)));
        assert_eq!(hits, vec![ElementRef::LogicItem(new_id)]);
    }

    #[test]
    fn query_line_segments_finds_segments_through_a_point() {
        let mut index = SpatialIndex::new();
        let wire_id = WireId::new(2);
        let segment = Segment::new(wire_id, SegmentIndex::new(0));
        let line = logiksim_geometry::OrderedLine::new(p(0, 0), p(10, 0)).unwrap();
        let snapshot = SegmentInfoSnapshot {
            line,
            p0_type: logiksim_geometry::SegmentPointType::Output,
            p1_type: logiksim_geometry::SegmentPointType::ShadowPoint,
        };
        index.submit(&LayoutMessage::SegmentInserted { segment, segment_info: snapshot });

        let result = index.query_line_segments(p(5, 0));
        assert_eq!(get_segment_count(result), 1);
        assert!(all_same_wire_id(result));
        assert_eq!(get_unique_wire_id(result), Some(wire_id));
        assert!(!index.query_line_segments(p(5, 1))[0].is_valid());
    }
}
