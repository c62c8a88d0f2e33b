// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! LogikSim Part Selection: a canonical sorted set of disjoint sub-intervals
//! along a segment.
//!
//! [`PartSelection`] is the algebra behind two otherwise-unrelated concepts
//! in the editable circuit: the "valid for insertion" sub-range of an
//! inserted wire segment (segment tree, component C), and the selected
//! sub-range of a segment tracked by a [`Selection`](https://docs.rs/logiksim_selection)
//! (component H). Both reuse this crate rather than duplicating the
//! interval algebra, following a `SmallVec`-backed sorted-vector design
//! (see `understory_property`'s property store for the same pattern over a
//! different key).
//!
//! ## Invariant
//!
//! Stored parts are sorted and pairwise non-touching: for any two stored
//! parts `a < b`, `a.end() < b.begin()`. Every mutation re-establishes this
//! by merging any part that now touches or overlaps its neighbor.
//!
//! ## Minimal example
//!
//! ```
//! use logiksim_geometry::{Offset, Part};
//! use logiksim_parts::PartSelection;
//!
//! let mut parts = PartSelection::new();
//! parts.add_part(Part::new(Offset::new(0), Offset::new(5)).unwrap());
//! parts.add_part(Part::new(Offset::new(5), Offset::new(10)).unwrap());
//!
//! // The two touching parts coalesce into one.
//! assert_eq!(parts.iter().count(), 1);
//! assert_eq!(parts.max_offset(), Some(Offset::new(10)));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use logiksim_geometry::{Offset, Part};
use smallvec::SmallVec;

/// Inline capacity before a [`PartSelection`] spills to the heap.
///
/// Most segments have one or two valid/selected ranges; four covers the
/// common case (a segment split twice) without an allocation.
const INLINE_CAPACITY: usize = 4;

/// A canonical sorted set of disjoint, non-touching [`Part`]s.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PartSelection {
    parts: SmallVec<[Part; INLINE_CAPACITY]>,
}

impl PartSelection {
    /// Creates an empty part selection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parts: SmallVec::new(),
        }
    }

    /// Creates a part selection containing a single part.
    #[must_use]
    pub fn from_part(part: Part) -> Self {
        let mut selection = Self::new();
        selection.add_part(part);
        selection
    }

    /// Returns `true` if no parts are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Returns the number of disjoint parts stored (after coalescing).
    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Iterates the stored parts in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Part> + '_ {
        self.parts.iter().copied()
    }

    /// Returns the largest `end()` among stored parts, if any.
    #[must_use]
    pub fn max_offset(&self) -> Option<Offset> {
        self.parts.last().map(|p| p.end())
    }

    /// Returns `true` if any stored part touches or overlaps `part`.
    #[must_use]
    pub fn overlaps_any(&self, part: Part) -> bool {
        self.parts.iter().any(|p| p.overlaps(part))
    }

    /// Returns `true` if `self` and `other` have no overlapping interior.
    #[must_use]
    pub fn disjoint_from(&self, other: &Self) -> bool {
        !self.parts.iter().any(|&p| other.overlaps_any(p))
    }

    /// Finds the index of the first stored part whose `begin()` is
    /// `>= part.begin()`.
    fn lower_bound(&self, part: Part) -> usize {
        self.parts.partition_point(|p| p.begin() < part.begin())
    }

    /// Adds `part` to the selection, coalescing with any touching or
    /// overlapping neighbors.
    pub fn add_part(&mut self, part: Part) {
        let mut merged = part;
        let mut idx = self.lower_bound(merged);

        // Merge with the previous part if it touches or overlaps.
        if idx > 0 && self.parts[idx - 1].touches_or_overlaps(merged) {
            idx -= 1;
            merged = merged.union(self.parts[idx]);
        }

        // Merge with every following part that now touches or overlaps.
        let mut end = idx;
        while end < self.parts.len() && self.parts[end].touches_or_overlaps(merged) {
            merged = merged.union(self.parts[end]);
            end += 1;
        }

        self.parts.splice(idx..end, core::iter::once(merged));
    }

    /// Removes `part` from the selection, splitting any stored part that
    /// only partially overlaps it.
    pub fn remove_part(&mut self, part: Part) {
        let mut result: SmallVec<[Part; INLINE_CAPACITY]> = SmallVec::new();
        for &stored in &self.parts {
            if !stored.overlaps(part) {
                result.push(stored);
                continue;
            }
            if stored.begin() < part.begin()
                && let Some(left) = Part::new(stored.begin(), part.begin())
            {
                result.push(left);
            }
            if part.end() < stored.end()
                && let Some(right) = Part::new(part.end(), stored.end())
            {
                result.push(right);
            }
        }
        self.parts = result;
    }

    /// Removes all parts.
    pub fn clear(&mut self) {
        self.parts.clear();
    }

    /// Copies the intersection of `src_part` with this selection, translated
    /// into `dst`'s coordinate space anchored at `dst_part.begin()`, and
    /// inserts the translated parts into `dst`.
    ///
    /// This is the primitive behind splitting a segment in two: the part of
    /// `valid_parts`/selected-parts that falls within the moved sub-range is
    /// carried over to the new segment, translated so that `src_part.begin()`
    /// maps to `dst_part.begin()`.
    pub fn move_parts(&mut self, dst: &mut Self, src_part: Part, dst_part: Part) {
        let mut to_move: SmallVec<[Part; INLINE_CAPACITY]> = SmallVec::new();
        for &stored in &self.parts {
            if let Some(overlap) = stored.intersection(src_part) {
                to_move.push(overlap.translate(src_part, dst_part.begin()));
            }
        }
        self.remove_part(src_part);
        for part in to_move {
            dst.add_part(part);
        }
    }
}

impl FromIterator<Part> for PartSelection {
    fn from_iter<I: IntoIterator<Item = Part>>(iter: I) -> Self {
        let mut selection = Self::new();
        for part in iter {
            selection.add_part(part);
        }
        selection
    }
}

/// Returns `true` if any part of `a` overlaps any part of `b`.
#[must_use]
pub fn a_overlaps_any_of_b(a: &PartSelection, b: &PartSelection) -> bool {
    a.parts.iter().any(|&part| b.overlaps_any(part))
}

/// Returns `true` if no part of `a` overlaps any part of `b`.
#[must_use]
pub fn a_disjoint_of_b(a: &PartSelection, b: &PartSelection) -> bool {
    !a_overlaps_any_of_b(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(b: u32, e: u32) -> Part {
        Part::new(Offset::new(b), Offset::new(e)).unwrap()
    }

    #[test]
    fn add_part_coalesces_touching() {
        let mut ps = PartSelection::new();
        ps.add_part(part(0, 5));
        ps.add_part(part(5, 10));
        assert_eq!(ps.iter().collect::<Vec<_>>(), vec![part(0, 10)]);
    }

    #[test]
    fn add_part_keeps_disjoint_parts_separate() {
        let mut ps = PartSelection::new();
        ps.add_part(part(0, 5));
        ps.add_part(part(10, 15));
        assert_eq!(ps.iter().collect::<Vec<_>>(), vec![part(0, 5), part(10, 15)]);
    }

    #[test]
    fn add_part_bridges_a_gap() {
        let mut ps = PartSelection::new();
        ps.add_part(part(0, 5));
        ps.add_part(part(10, 15));
        ps.add_part(part(5, 10));
        assert_eq!(ps.iter().collect::<Vec<_>>(), vec![part(0, 15)]);
    }

    #[test]
    fn remove_part_splits_stored_interval() {
        let mut ps = PartSelection::new();
        ps.add_part(part(0, 20));
        ps.remove_part(part(5, 10));
        assert_eq!(ps.iter().collect::<Vec<_>>(), vec![part(0, 5), part(10, 20)]);
    }

    #[test]
    fn remove_part_noop_when_disjoint() {
        let mut ps = PartSelection::new();
        ps.add_part(part(0, 5));
        ps.remove_part(part(10, 15));
        assert_eq!(ps.iter().collect::<Vec<_>>(), vec![part(0, 5)]);
    }

    #[test]
    fn max_offset_tracks_largest_end() {
        let mut ps = PartSelection::new();
        assert_eq!(ps.max_offset(), None);
        ps.add_part(part(0, 5));
        ps.add_part(part(10, 15));
        assert_eq!(ps.max_offset(), Some(Offset::new(15)));
    }

    #[test]
    fn move_parts_translates_intersection() {
        let mut src = PartSelection::new();
        src.add_part(part(0, 10));
        let mut dst = PartSelection::new();

        // Move the sub-range [5, 10) of `src` to land at [0, 5) of `dst`.
        src.move_parts(&mut dst, part(5, 10), part(0, 5));

        assert_eq!(src.iter().collect::<Vec<_>>(), vec![part(0, 5)]);
        assert_eq!(dst.iter().collect::<Vec<_>>(), vec![part(0, 5)]);
    }

    #[test]
    fn move_parts_ignores_non_overlapping_source_range() {
        let mut src = PartSelection::new();
        src.add_part(part(0, 5));
        let mut dst = PartSelection::new();

        src.move_parts(&mut dst, part(5, 10), part(0, 5));

        assert_eq!(src.iter().collect::<Vec<_>>(), vec![part(0, 5)]);
        assert!(dst.is_empty());
    }

    #[test]
    fn disjoint_from_detects_overlap() {
        let mut a = PartSelection::new();
        a.add_part(part(0, 5));
        let mut b = PartSelection::new();
        b.add_part(part(3, 8));
        assert!(!a.disjoint_from(&b));

        let mut c = PartSelection::new();
        c.add_part(part(5, 8));
        assert!(a.disjoint_from(&c));
    }

    #[test]
    fn free_functions_mirror_the_methods() {
        let a: PartSelection = [part(0, 5), part(10, 15)].into_iter().collect();
        let b: PartSelection = [part(4, 6)].into_iter().collect();
        let c: PartSelection = [part(20, 25)].into_iter().collect();

        assert!(a_overlaps_any_of_b(&a, &b));
        assert!(!a_overlaps_any_of_b(&a, &c));
        assert!(a_disjoint_of_b(&a, &c));
        assert!(!a_disjoint_of_b(&a, &b));
    }
}
