// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`Selection`]: a set of logic-items, decorations and wire-segment parts.

use hashbrown::{HashMap, HashSet};

use logiksim_geometry::{DecorationId, LogicItemId, Segment};
use logiksim_messages::{LayoutMessage, SegmentPart};
use logiksim_parts::PartSelection;

/// A selection of logic-items, decorations and segment parts of a layout.
///
/// Class invariants: stored ids and segments are never null; every entry in
/// the segment map has at least one part selected (an entry that would
/// become empty is removed instead of kept around empty).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    selected_logicitems: HashSet<LogicItemId>,
    selected_decorations: HashSet<DecorationId>,
    selected_segments: HashMap<Segment, PartSelection>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected_logicitems.is_empty()
            && self.selected_decorations.is_empty()
            && self.selected_segments.is_empty()
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.selected_logicitems.len() + self.selected_decorations.len() + self.selected_segments.len()
    }

    pub fn clear(&mut self) {
        self.selected_logicitems.clear();
        self.selected_decorations.clear();
        self.selected_segments.clear();
    }

    #[must_use]
    pub fn allocated_size(&self) -> usize {
        self.selected_logicitems.capacity() * size_of::<LogicItemId>()
            + self.selected_decorations.capacity() * size_of::<DecorationId>()
            + self.selected_segments.capacity() * size_of::<(Segment, PartSelection)>()
    }

    pub fn add_logicitem(&mut self, logicitem_id: LogicItemId) {
        debug_assert!(logicitem_id.is_valid(), "cannot select the null logic-item id");
        self.selected_logicitems.insert(logicitem_id);
    }

    pub fn remove_logicitem(&mut self, logicitem_id: LogicItemId) {
        self.selected_logicitems.remove(&logicitem_id);
    }

    pub fn toggle_logicitem(&mut self, logicitem_id: LogicItemId) {
        if !self.selected_logicitems.remove(&logicitem_id) {
            self.selected_logicitems.insert(logicitem_id);
        }
    }

    pub fn add_decoration(&mut self, decoration_id: DecorationId) {
        debug_assert!(decoration_id.is_valid(), "cannot select the null decoration id");
        self.selected_decorations.insert(decoration_id);
    }

    pub fn remove_decoration(&mut self, decoration_id: DecorationId) {
        self.selected_decorations.remove(&decoration_id);
    }

    /// Adds `segment_part.part` to the selected range of its segment,
    /// creating a fresh entry if none exists yet.
    pub fn add_segment(&mut self, segment_part: SegmentPart) {
        debug_assert!(segment_part.segment.is_valid(), "cannot select a part of the null segment");
        self.selected_segments
            .entry(segment_part.segment)
            .or_default()
            .add_part(segment_part.part);
    }

    /// Removes `segment_part.part` from the selected range of its segment,
    /// dropping the map entry entirely if nothing remains selected.
    pub fn remove_segment(&mut self, segment_part: SegmentPart) {
        if let Some(parts) = self.selected_segments.get_mut(&segment_part.segment) {
            parts.remove_part(segment_part.part);
            if parts.is_empty() {
                self.selected_segments.remove(&segment_part.segment);
            }
        }
    }

    /// Replaces the selected range of `segment` wholesale, removing the
    /// entry if `parts` is empty.
    pub fn set_selection(&mut self, segment: Segment, parts: PartSelection) {
        if parts.is_empty() {
            self.selected_segments.remove(&segment);
        } else {
            self.selected_segments.insert(segment, parts);
        }
    }

    #[must_use]
    pub fn is_logicitem_selected(&self, logicitem_id: LogicItemId) -> bool {
        self.selected_logicitems.contains(&logicitem_id)
    }

    #[must_use]
    pub fn is_decoration_selected(&self, decoration_id: DecorationId) -> bool {
        self.selected_decorations.contains(&decoration_id)
    }

    #[must_use]
    pub fn is_segment_selected(&self, segment: Segment) -> bool {
        self.selected_segments.contains_key(&segment)
    }

    pub fn selected_logicitems(&self) -> impl Iterator<Item = LogicItemId> + '_ {
        self.selected_logicitems.iter().copied()
    }

    pub fn selected_decorations(&self) -> impl Iterator<Item = DecorationId> + '_ {
        self.selected_decorations.iter().copied()
    }

    pub fn selected_segments(&self) -> impl Iterator<Item = (Segment, &PartSelection)> + '_ {
        self.selected_segments.iter().map(|(segment, parts)| (*segment, parts))
    }

    /// Returns the selected parts of `segment`, or an empty selection if
    /// none of it is selected.
    #[must_use]
    pub fn selected_parts_of(&self, segment: Segment) -> PartSelection {
        self.selected_segments.get(&segment).cloned().unwrap_or_default()
    }

    /// Folds one layout message into the selection, renaming or pruning
    /// entries that track a changed id.
    pub fn submit(&mut self, message: &LayoutMessage) {
        match message {
            LayoutMessage::LogicItemDeleted { logicitem_id } => {
                self.selected_logicitems.remove(logicitem_id);
            }
            LayoutMessage::LogicItemIdUpdated { old_logicitem_id, new_logicitem_id } => {
                if self.selected_logicitems.remove(old_logicitem_id) {
                    self.selected_logicitems.insert(*new_logicitem_id);
                }
            }
            LayoutMessage::DecorationDeleted { decoration_id } => {
                self.selected_decorations.remove(decoration_id);
            }
            LayoutMessage::DecorationIdUpdated { old_decoration_id, new_decoration_id } => {
                if self.selected_decorations.remove(old_decoration_id) {
                    self.selected_decorations.insert(*new_decoration_id);
                }
            }
            LayoutMessage::SegmentIdUpdated { old_segment, new_segment } => {
                if let Some(parts) = self.selected_segments.remove(old_segment) {
                    self.selected_segments.insert(*new_segment, parts);
                }
            }
            LayoutMessage::SegmentPartMoved { source, destination } => {
                if !self.selected_segments.contains_key(&source.segment) {
                    return;
                }
                if source.segment == destination.segment {
                    let mut parts = self.selected_segments.remove(&source.segment).unwrap_or_default();
                    let mut moved = PartSelection::new();
                    parts.move_parts(&mut moved, source.part, destination.part);
                    for p in moved.iter() {
                        parts.add_part(p);
                    }
                    if !parts.is_empty() {
                        self.selected_segments.insert(source.segment, parts);
                    }
                } else {
                    let mut src_parts = self.selected_segments.remove(&source.segment).unwrap_or_default();
                    let mut dst_parts =
                        self.selected_segments.remove(&destination.segment).unwrap_or_default();
                    src_parts.move_parts(&mut dst_parts, source.part, destination.part);
                    if !src_parts.is_empty() {
                        self.selected_segments.insert(source.segment, src_parts);
                    }
                    if !dst_parts.is_empty() {
                        self.selected_segments.insert(destination.segment, dst_parts);
                    }
                }
            }
            LayoutMessage::SegmentPartDeleted { segment_part } => {
                self.remove_segment(*segment_part);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logiksim_geometry::{Offset, Part, SegmentIndex, WireId};

    fn part(b: u32, e: u32) -> Part {
        Part::new(Offset::new(b), Offset::new(e)).unwrap()
    }

    fn segment(wire: usize, index: usize) -> Segment {
        Segment::new(WireId::new(wire), SegmentIndex::new(index))
    }

    #[test]
    fn toggle_logicitem_flips_membership() {
        let mut selection = Selection::new();
        let id = LogicItemId::new(0);
        selection.toggle_logicitem(id);
        assert!(selection.is_logicitem_selected(id));
        selection.toggle_logicitem(id);
        assert!(!selection.is_logicitem_selected(id));
    }

    #[test]
    fn add_segment_then_remove_drops_the_entry_when_empty() {
        let mut selection = Selection::new();
        let seg = segment(2, 0);
        selection.add_segment(SegmentPart { segment: seg, part: part(0, 10) });
        assert!(selection.is_segment_selected(seg));

        selection.remove_segment(SegmentPart { segment: seg, part: part(0, 10) });
        assert!(!selection.is_segment_selected(seg));
    }

    #[test]
    fn logicitem_id_updated_renames_the_entry() {
        let mut selection = Selection::new();
        let old_id = LogicItemId::new(0);
        let new_id = LogicItemId::new(1);
        selection.add_logicitem(old_id);

        selection.submit(&LayoutMessage::LogicItemIdUpdated {
            old_logicitem_id: old_id,
            new_logicitem_id: new_id,
        });

        assert!(!selection.is_logicitem_selected(old_id));
        assert!(selection.is_logicitem_selected(new_id));
    }

    #[test]
    fn segment_part_moved_translates_the_selected_intersection() {
        let mut selection = Selection::new();
        let src = segment(2, 0);
        let dst = segment(3, 0);
        selection.add_segment(SegmentPart { segment: src, part: part(0, 10) });

        selection.submit(&LayoutMessage::SegmentPartMoved {
            source: SegmentPart { segment: src, part: part(2, 8) },
            destination: SegmentPart { segment: dst, part: part(0, 6) },
        });

        assert!(!selection.is_segment_selected(src));
        let dst_parts = selection.selected_parts_of(dst);
        assert_eq!(dst_parts.iter().collect::<Vec<_>>(), vec![part(0, 6)]);
    }

    #[test]
    fn segment_part_deleted_shrinks_the_selection() {
        let mut selection = Selection::new();
        let seg = segment(2, 0);
        selection.add_segment(SegmentPart { segment: seg, part: part(0, 10) });

        selection.submit(&LayoutMessage::SegmentPartDeleted {
            segment_part: SegmentPart { segment: seg, part: part(3, 7) },
        });

        let parts = selection.selected_parts_of(seg);
        assert_eq!(parts.iter().collect::<Vec<_>>(), vec![part(0, 3), part(7, 10)]);
    }
}
