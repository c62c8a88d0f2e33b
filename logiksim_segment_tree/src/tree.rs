// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `SegmentTree`: the dense set of [`SegmentInfo`] belonging to one wire.

use alloc::vec::Vec;
use logiksim_geometry::{Axis, OrderedLine, Part, SegmentIndex, SegmentPointType};
use logiksim_parts::PartSelection;

use crate::info::SegmentInfo;

/// The axis coordinate of `line`'s `p0`, used as the origin for [`Part`]
/// offsets measured along the line.
fn origin(line: OrderedLine) -> i32 {
    match line.axis() {
        Axis::Horizontal => line.p0().x.value(),
        Axis::Vertical => line.p0().y.value(),
    }
}

/// Maps a [`Part`] measured from `old_line`'s `p0` into the coordinate space
/// of `new_line`, dropping it if the two lines no longer overlap and
/// clamping it to `new_line`'s extent otherwise.
///
/// This is the geometric-inclusion rule behind `SegmentTree::update_segment`:
/// a part of the old line that still falls within the new one survives
/// (possibly shortened); a part entirely outside the new line's span is
/// dropped.
fn remap_part(old_line: OrderedLine, new_line: OrderedLine, part: Part) -> Option<Part> {
    let old_origin = origin(old_line);
    let new_origin = origin(new_line);
    let new_length = i32::try_from(new_line.length()).ok()?;

    let abs_begin = old_origin + i32::try_from(part.begin().value()).ok()?;
    let abs_end = old_origin + i32::try_from(part.end().value()).ok()?;

    let clamped_begin = (abs_begin - new_origin).clamp(0, new_length);
    let clamped_end = (abs_end - new_origin).clamp(0, new_length);

    if clamped_begin >= clamped_end {
        return None;
    }
    Part::new(
        logiksim_geometry::Offset::new(u32::try_from(clamped_begin).ok()?),
        logiksim_geometry::Offset::new(u32::try_from(clamped_end).ok()?),
    )
}

/// One entry in a [`SegmentTree`]: the segment's geometry plus the part of
/// it currently marked valid (inserted and not colliding).
#[derive(Clone, Debug)]
struct Entry {
    info: SegmentInfo,
    valid_parts: PartSelection,
}

/// The dense, id-addressed collection of straight segments making up one
/// wire.
///
/// Indices are stable across `update_segment` and become invalid only on
/// `swap_and_delete`, which follows the layout store's swap-and-last
/// convention: the last entry takes over the deleted index.
#[derive(Clone, Debug, Default)]
pub struct SegmentTree {
    entries: Vec<Entry>,
}

impl SegmentTree {
    /// Creates an empty segment tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the tree stores no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends a segment, freshly classified as unknown at both endpoints.
    pub fn add_segment(&mut self, line: OrderedLine) -> SegmentIndex {
        let index = SegmentIndex::new(self.entries.len());
        self.entries.push(Entry {
            info: SegmentInfo::new(line),
            valid_parts: PartSelection::new(),
        });
        index
    }

    /// Replaces the geometry of `index`, remapping its valid parts per the
    /// contract of [`remap_part`].
    ///
    /// Endpoint classifications are *not* preserved across a geometry change
    /// that moves an endpoint: callers (the editing primitives) are
    /// responsible for reclassifying via [`SegmentTree::set_point_type`]
    /// after the line actually settles.
    pub fn update_segment(&mut self, index: SegmentIndex, new_line: OrderedLine) {
        let entry = &mut self.entries[index.index()];
        let old_line = entry.info.line();

        let mut remapped = PartSelection::new();
        for part in entry.valid_parts.iter() {
            if let Some(mapped) = remap_part(old_line, new_line, part) {
                remapped.add_part(mapped);
            }
        }

        entry.info = SegmentInfo::new(new_line);
        entry.valid_parts = remapped;
    }

    /// Reclassifies one endpoint of `index`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is not an endpoint of the segment's line.
    pub fn set_point_type(
        &mut self,
        index: SegmentIndex,
        position: logiksim_geometry::Point,
        new_type: SegmentPointType,
    ) {
        let entry = &mut self.entries[index.index()];
        entry.info = entry.info.with_point_type(position, new_type);
    }

    /// Removes `index`, moving the last entry into its place. Returns the
    /// index that used to hold the last entry, so callers can remap any
    /// external references (mirrors `logiksim_layout`'s store-wide
    /// swap-and-delete).
    pub fn swap_and_delete(&mut self, index: SegmentIndex) -> SegmentIndex {
        let last = SegmentIndex::new(self.entries.len() - 1);
        self.entries.swap_remove(index.index());
        last
    }

    /// Marks `part` of `index`'s line as valid (inserted, non-colliding).
    pub fn mark_valid(&mut self, index: SegmentIndex, part: Part) {
        self.entries[index.index()].valid_parts.add_part(part);
    }

    /// Marks `part` of `index`'s line as no longer valid.
    pub fn unmark_valid(&mut self, index: SegmentIndex, part: Part) {
        self.entries[index.index()].valid_parts.remove_part(part);
    }

    /// Returns the parts of `index` currently marked valid.
    #[must_use]
    pub fn valid_parts(&self, index: SegmentIndex) -> &PartSelection {
        &self.entries[index.index()].valid_parts
    }

    /// Returns the geometry and endpoint classification of `index`.
    #[must_use]
    pub fn segment_info(&self, index: SegmentIndex) -> SegmentInfo {
        self.entries[index.index()].info
    }

    /// Returns `true` if any stored segment has an `Input`-classified
    /// endpoint.
    #[must_use]
    pub fn has_input(&self) -> bool {
        self.entries.iter().any(|entry| {
            entry.info.p0_type() == SegmentPointType::Input
                || entry.info.p1_type() == SegmentPointType::Input
        })
    }

    /// Iterates `(index, SegmentInfo)` pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (SegmentIndex, SegmentInfo)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (SegmentIndex::new(i), entry.info))
    }

    /// Reorders segments into a canonical form (sorted by line) so that two
    /// trees covering the same wire compare equal regardless of insertion
    /// history.
    pub fn normalize(&mut self) {
        self.entries.sort_by_key(|entry| entry.info.line());
    }
}

impl PartialEq for SegmentTree {
    fn eq(&self, other: &Self) -> bool {
        let mut a = self.clone();
        let mut b = other.clone();
        a.normalize();
        b.normalize();
        a.entries.len() == b.entries.len()
            && a.entries
                .iter()
                .zip(b.entries.iter())
                .all(|(x, y)| x.info == y.info && x.valid_parts == y.valid_parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logiksim_geometry::{Grid, Offset, Point};

    fn line(x0: i32, y0: i32, x1: i32, y1: i32) -> OrderedLine {
        OrderedLine::new(
            Point::new(Grid::new(x0).unwrap(), Grid::new(y0).unwrap()),
            Point::new(Grid::new(x1).unwrap(), Grid::new(y1).unwrap()),
        )
        .unwrap()
    }

    fn part(b: u32, e: u32) -> Part {
        Part::new(Offset::new(b), Offset::new(e)).unwrap()
    }

    #[test]
    fn add_and_iterate() {
        let mut tree = SegmentTree::new();
        let idx = tree.add_segment(line(0, 0, 10, 0));
        assert_eq!(tree.segment_count(), 1);
        assert_eq!(tree.segment_info(idx).line(), line(0, 0, 10, 0));
    }

    #[test]
    fn update_segment_preserves_valid_parts_when_superset() {
        let mut tree = SegmentTree::new();
        let idx = tree.add_segment(line(0, 0, 10, 0));
        tree.mark_valid(idx, part(2, 8));

        tree.update_segment(idx, line(0, 0, 20, 0));

        let valid: Vec<_> = tree.valid_parts(idx).iter().collect();
        assert_eq!(valid, vec![part(2, 8)]);
    }

    #[test]
    fn update_segment_clips_valid_parts_when_shrinking() {
        let mut tree = SegmentTree::new();
        let idx = tree.add_segment(line(0, 0, 10, 0));
        tree.mark_valid(idx, part(2, 8));

        tree.update_segment(idx, line(0, 0, 5, 0));

        let valid: Vec<_> = tree.valid_parts(idx).iter().collect();
        assert_eq!(valid, vec![part(2, 5)]);
    }

    #[test]
    fn update_segment_drops_valid_parts_outside_new_span() {
        let mut tree = SegmentTree::new();
        let idx = tree.add_segment(line(0, 0, 10, 0));
        tree.mark_valid(idx, part(2, 8));

        // New span starts at x=12, no longer overlapping the old valid range.
        tree.update_segment(idx, line(12, 0, 20, 0));

        assert!(tree.valid_parts(idx).is_empty());
    }

    #[test]
    fn update_segment_remaps_across_a_moved_origin() {
        let mut tree = SegmentTree::new();
        let idx = tree.add_segment(line(0, 0, 10, 0));
        // Absolute valid range is world x in [2, 8).
        tree.mark_valid(idx, part(2, 8));

        // The line's p0 moves from x=0 to x=5; only world x in [5, 8) of the
        // old valid range still falls on the new line, landing at [0, 3) in
        // the new line's own offset space.
        tree.update_segment(idx, line(5, 0, 20, 0));

        let valid: Vec<_> = tree.valid_parts(idx).iter().collect();
        assert_eq!(valid, vec![part(0, 3)]);
    }

    #[test]
    fn swap_and_delete_moves_the_last_entry_into_place() {
        let mut tree = SegmentTree::new();
        let a = tree.add_segment(line(0, 0, 10, 0));
        let _b = tree.add_segment(line(0, 1, 10, 1));
        let moved_from = tree.swap_and_delete(a);

        assert_eq!(tree.segment_count(), 1);
        assert_eq!(moved_from, SegmentIndex::new(1));
        assert_eq!(tree.segment_info(a).line(), line(0, 1, 10, 1));
    }

    #[test]
    fn has_input_scans_all_segments() {
        let mut tree = SegmentTree::new();
        let idx = tree.add_segment(line(0, 0, 10, 0));
        assert!(!tree.has_input());
        tree.set_point_type(idx, Point::new(Grid::ZERO, Grid::ZERO), SegmentPointType::Input);
        assert!(tree.has_input());
    }

    #[test]
    fn normalize_orders_segments_and_equality_ignores_storage_order() {
        let mut a = SegmentTree::new();
        a.add_segment(line(10, 0, 20, 0));
        a.add_segment(line(0, 0, 5, 0));

        let mut b = SegmentTree::new();
        b.add_segment(line(0, 0, 5, 0));
        b.add_segment(line(10, 0, 20, 0));

        assert_eq!(a, b);
        a.normalize();
        assert_eq!(a.segment_info(SegmentIndex::new(0)).line(), line(0, 0, 5, 0));
    }
}
