// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `WireStore`: stores the wires (segment trees) of the layout.

use logiksim_geometry::{Point, Rect, WireId};
use logiksim_segment_tree::SegmentTree;

/// Stores the wires of the layout.
///
/// The first two wires always exist and have reserved meaning
/// ([`WireId::TEMPORARY`], [`WireId::COLLIDING`]); every other wire is a
/// normally-inserted one, starting at [`WireId::FIRST_INSERTED`].
///
/// Class invariants:
/// - `segment_trees` and `bounding_rects` have the same length.
/// - The temporary and colliding wires are always present.
/// - A bounding rect is `None` exactly when its tree has no segments.
#[derive(Clone, Debug)]
pub struct WireStore {
    segment_trees: Vec<SegmentTree>,
    bounding_rects: Vec<Option<Rect>>,
}

impl Default for WireStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WireStore {
    /// Creates a store pre-populated with the temporary and colliding wires.
    #[must_use]
    pub fn new() -> Self {
        Self {
            segment_trees: vec![SegmentTree::new(), SegmentTree::new()],
            bounding_rects: vec![None, None],
        }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.segment_trees.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segment_trees.is_empty()
    }

    #[must_use]
    pub fn allocated_size(&self) -> usize {
        self.segment_trees.capacity() * size_of::<SegmentTree>()
            + self.bounding_rects.capacity() * size_of::<Option<Rect>>()
    }

    /// Appends a new, empty wire and returns its id.
    pub fn add_wire(&mut self) -> WireId {
        let id = WireId::new(self.segment_trees.len());
        self.segment_trees.push(SegmentTree::new());
        self.bounding_rects.push(None);
        id
    }

    /// Removes `wire_id`, moving the last wire into its place. Panics if
    /// asked to delete the temporary or colliding wire, which are permanent.
    ///
    /// # Panics
    ///
    /// Panics if `wire_id` is the temporary or colliding wire.
    pub fn swap_and_delete(&mut self, wire_id: WireId) -> WireId {
        assert!(
            !wire_id.is_temporary_or_colliding(),
            "temporary and colliding wires cannot be deleted"
        );
        let last_id = WireId::new(self.segment_trees.len() - 1);
        self.segment_trees.swap_remove(wire_id.index());
        self.bounding_rects.swap_remove(wire_id.index());
        last_id
    }

    pub fn swap(&mut self, wire_id_1: WireId, wire_id_2: WireId) {
        self.segment_trees.swap(wire_id_1.index(), wire_id_2.index());
        self.bounding_rects.swap(wire_id_1.index(), wire_id_2.index());
    }

    #[must_use]
    pub fn segment_tree(&self, wire_id: WireId) -> &SegmentTree {
        &self.segment_trees[wire_id.index()]
    }

    /// Mutable access to a wire's segment tree. Callers that add or move
    /// segments are responsible for calling
    /// [`WireStore::recompute_bounding_rect`] afterward.
    pub fn segment_tree_mut(&mut self, wire_id: WireId) -> &mut SegmentTree {
        &mut self.segment_trees[wire_id.index()]
    }

    #[must_use]
    pub fn bounding_rect(&self, wire_id: WireId) -> Option<Rect> {
        self.bounding_rects[wire_id.index()]
    }

    /// Recomputes and caches the bounding rect of `wire_id` from its current
    /// segment tree.
    pub fn recompute_bounding_rect(&mut self, wire_id: WireId) {
        let tree = &self.segment_trees[wire_id.index()];
        let rect = tree
            .iter()
            .map(|(_, info)| {
                let line = info.line();
                Rect::new(line.p0(), line.p1())
            })
            .reduce(Rect::union);
        self.bounding_rects[wire_id.index()] = rect;
    }

    /// Reorders inserted wires (everything from `WireId::FIRST_INSERTED` on)
    /// into a canonical order so visually-equivalent layouts compare equal.
    /// The temporary and colliding wires keep their fixed positions.
    pub fn normalize(&mut self) {
        for tree in &mut self.segment_trees {
            tree.normalize();
        }

        let first = WireId::FIRST_INSERTED.index();
        if first >= self.segment_trees.len() {
            return;
        }

        let mut order: Vec<usize> = (first..self.segment_trees.len()).collect();
        order.sort_by_key(|&i| sort_key(&self.segment_trees[i]));

        let reordered_trees: Vec<SegmentTree> =
            order.iter().map(|&i| self.segment_trees[i].clone()).collect();
        let reordered_rects: Vec<Option<Rect>> =
            order.iter().map(|&i| self.bounding_rects[i]).collect();

        self.segment_trees[first..].clone_from_slice(&reordered_trees);
        self.bounding_rects[first..].clone_from_slice(&reordered_rects);
    }
}

/// A stable sort key for a normalized segment tree: its segments' lines, in
/// order. Two structurally-identical trees always produce the same key.
fn sort_key(tree: &SegmentTree) -> Vec<Point> {
    tree.iter()
        .flat_map(|(_, info)| [info.line().p0(), info.line().p1()])
        .collect()
}

impl PartialEq for WireStore {
    fn eq(&self, other: &Self) -> bool {
        self.segment_trees == other.segment_trees
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_store_has_reserved_wires() {
        let store = WireStore::new();
        assert_eq!(store.size(), 2);
        assert_eq!(store.bounding_rect(WireId::TEMPORARY), None);
        assert_eq!(store.bounding_rect(WireId::COLLIDING), None);
    }

    #[test]
    fn add_wire_assigns_the_next_inserted_id() {
        let mut store = WireStore::new();
        let id = store.add_wire();
        assert_eq!(id, WireId::FIRST_INSERTED);
    }

    #[test]
    #[should_panic(expected = "cannot be deleted")]
    fn deleting_the_temporary_wire_panics() {
        let mut store = WireStore::new();
        store.swap_and_delete(WireId::TEMPORARY);
    }

    #[test]
    fn recompute_bounding_rect_covers_all_segments() {
        use logiksim_geometry::{Grid, OrderedLine};

        let mut store = WireStore::new();
        let id = store.add_wire();
        let line = OrderedLine::new(
            Point::new(Grid::ZERO, Grid::ZERO),
            Point::new(Grid::new(5).unwrap(), Grid::ZERO),
        )
        .unwrap();
        store.segment_tree_mut(id).add_segment(line);
        store.recompute_bounding_rect(id);

        assert_eq!(
            store.bounding_rect(id),
            Some(Rect::new(Point::new(Grid::ZERO, Grid::ZERO), Point::new(Grid::new(5).unwrap(), Grid::ZERO)))
        );
    }
}
