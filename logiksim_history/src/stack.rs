// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`HistoryStack`]: grouped undo/redo storage with move-delta coalescing.

use logiksim_geometry::{MoveDelta, OrderedLine, Part};
use logiksim_layout::{ClockGeneratorAttributes, PlacedDecoration, PlacedLogicItem, TextElementAttributes};
use logiksim_messages::Key;

use crate::record::{DecorationRecord, LogicItemRecord, Record, SegmentRecord};

/// Which stack fresh records are committed to.
///
/// Normal editing records onto the undo stack and invalidates any pending
/// redo. Replaying a group during [`HistoryStack::pop_undo_group`]'s
/// caller-side application re-enters the editing primitives, whose own
/// `push_*` calls need to land on the *opposite* stack so that what was
/// just undone becomes redoable, and vice versa.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Mode {
    Recording,
    Undoing,
    Redoing,
}

/// A stack of undo groups (and their matching redo groups), each holding
/// the ordered inverse steps of one user-visible action.
///
/// Groups are built with [`begin_group`](Self::begin_group)/
/// [`end_group`](Self::end_group); a `push_*` call outside any open group
/// commits immediately as a group of one. Within an open group, repeated
/// move-temporary steps for the same key coalesce into a single summed
/// delta rather than accumulating a step per mouse-move event.
#[derive(Clone, Debug, Default)]
pub struct HistoryStack {
    undo_groups: Vec<Vec<Record>>,
    redo_groups: Vec<Vec<Record>>,
    open_group: Option<Vec<Record>>,
    mode: ModeState,
}

#[derive(Clone, Debug, Default)]
struct ModeState(Option<Mode>);

impl HistoryStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_groups.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_groups.is_empty()
    }

    pub fn begin_group(&mut self) {
        debug_assert!(self.open_group.is_none(), "begin_group called while a group is already open");
        self.open_group = Some(Vec::new());
    }

    pub fn end_group(&mut self) {
        let Some(group) = self.open_group.take() else {
            debug_assert!(false, "end_group called with no open group");
            return;
        };
        if !group.is_empty() {
            self.commit(group);
        }
    }

    fn mode(&self) -> Mode {
        self.mode.0.unwrap_or(Mode::Recording)
    }

    fn commit(&mut self, group: Vec<Record>) {
        match self.mode() {
            Mode::Recording => {
                self.undo_groups.push(group);
                self.redo_groups.clear();
            }
            Mode::Undoing => self.redo_groups.push(group),
            Mode::Redoing => self.undo_groups.push(group),
        }
    }

    fn push(&mut self, record: Record) {
        if let Some(group) = self.open_group.as_mut() {
            push_coalesced(group, record);
        } else {
            self.commit(vec![record]);
        }
    }

    /// Pops the most recent undo group, switching into [`Mode::Undoing`] so
    /// that any `push_*` calls the caller makes while applying it land on
    /// the redo stack. The caller must wrap its replay in
    /// [`begin_group`](Self::begin_group)/[`end_group`](Self::end_group) and
    /// call [`finish_undo`](Self::finish_undo) afterwards.
    pub fn pop_undo_group(&mut self) -> Option<Vec<Record>> {
        let group = self.undo_groups.pop()?;
        self.mode.0 = Some(Mode::Undoing);
        Some(group)
    }

    /// Pops the most recent redo group, switching into [`Mode::Redoing`].
    pub fn pop_redo_group(&mut self) -> Option<Vec<Record>> {
        let group = self.redo_groups.pop()?;
        self.mode.0 = Some(Mode::Redoing);
        Some(group)
    }

    /// Returns to [`Mode::Recording`] after an undo/redo replay completes.
    pub fn finish_replay(&mut self) {
        self.mode.0 = None;
    }

    pub fn push_logicitem_add_visible_selection(&mut self, key: Key) {
        self.push(Record::LogicItem(key, LogicItemRecord::AddToVisibleSelection));
    }

    pub fn push_logicitem_remove_visible_selection(&mut self, key: Key) {
        self.push(Record::LogicItem(key, LogicItemRecord::RemoveFromVisibleSelection));
    }

    pub fn push_logicitem_create_temporary(&mut self, key: Key, deleted_definition: PlacedLogicItem) {
        self.push(Record::LogicItem(key, LogicItemRecord::CreateTemporary(deleted_definition)));
    }

    pub fn push_logicitem_delete_temporary(&mut self, key: Key) {
        self.push(Record::LogicItem(key, LogicItemRecord::DeleteTemporary));
    }

    pub fn push_logicitem_move_temporary(&mut self, key: Key, delta: MoveDelta) {
        self.push(Record::LogicItem(key, LogicItemRecord::MoveTemporary(delta)));
    }

    pub fn push_logicitem_colliding_to_temporary(&mut self, key: Key) {
        self.push(Record::LogicItem(key, LogicItemRecord::CollidingToTemporary));
    }

    pub fn push_logicitem_temporary_to_colliding_expect_valid(&mut self, key: Key) {
        self.push(Record::LogicItem(key, LogicItemRecord::TemporaryToCollidingExpectValid));
    }

    pub fn push_logicitem_temporary_to_colliding_assume_colliding(&mut self, key: Key) {
        self.push(Record::LogicItem(key, LogicItemRecord::TemporaryToCollidingAssumeColliding));
    }

    pub fn push_logicitem_insert_to_colliding_expect_valid(&mut self, key: Key) {
        self.push(Record::LogicItem(key, LogicItemRecord::InsertToCollidingExpectValid));
    }

    pub fn push_logicitem_colliding_to_insert(&mut self, key: Key) {
        self.push(Record::LogicItem(key, LogicItemRecord::CollidingToInsert));
    }

    pub fn push_logicitem_change_attributes(&mut self, key: Key, attrs: ClockGeneratorAttributes) {
        self.push(Record::LogicItem(key, LogicItemRecord::ChangeAttributes(attrs)));
    }

    pub fn push_decoration_add_visible_selection(&mut self, key: Key) {
        self.push(Record::Decoration(key, DecorationRecord::AddToVisibleSelection));
    }

    pub fn push_decoration_remove_visible_selection(&mut self, key: Key) {
        self.push(Record::Decoration(key, DecorationRecord::RemoveFromVisibleSelection));
    }

    pub fn push_decoration_create_temporary(&mut self, key: Key, deleted_definition: PlacedDecoration) {
        self.push(Record::Decoration(key, DecorationRecord::CreateTemporary(deleted_definition)));
    }

    pub fn push_decoration_delete_temporary(&mut self, key: Key) {
        self.push(Record::Decoration(key, DecorationRecord::DeleteTemporary));
    }

    pub fn push_decoration_move_temporary(&mut self, key: Key, delta: MoveDelta) {
        self.push(Record::Decoration(key, DecorationRecord::MoveTemporary(delta)));
    }

    pub fn push_decoration_colliding_to_temporary(&mut self, key: Key) {
        self.push(Record::Decoration(key, DecorationRecord::CollidingToTemporary));
    }

    pub fn push_decoration_temporary_to_colliding_expect_valid(&mut self, key: Key) {
        self.push(Record::Decoration(key, DecorationRecord::TemporaryToCollidingExpectValid));
    }

    pub fn push_decoration_temporary_to_colliding_assume_colliding(&mut self, key: Key) {
        self.push(Record::Decoration(key, DecorationRecord::TemporaryToCollidingAssumeColliding));
    }

    pub fn push_decoration_insert_to_colliding_expect_valid(&mut self, key: Key) {
        self.push(Record::Decoration(key, DecorationRecord::InsertToCollidingExpectValid));
    }

    pub fn push_decoration_colliding_to_insert(&mut self, key: Key) {
        self.push(Record::Decoration(key, DecorationRecord::CollidingToInsert));
    }

    pub fn push_decoration_change_attributes(&mut self, key: Key, attrs: TextElementAttributes) {
        self.push(Record::Decoration(key, DecorationRecord::ChangeAttributes(attrs)));
    }

    pub fn push_segment_add_visible_selection(&mut self, key: Key, part: Part) {
        self.push(Record::Segment(key, SegmentRecord::AddToVisibleSelection(part)));
    }

    pub fn push_segment_remove_visible_selection(&mut self, key: Key, part: Part) {
        self.push(Record::Segment(key, SegmentRecord::RemoveFromVisibleSelection(part)));
    }

    pub fn push_segment_create_temporary(&mut self, key: Key, line: OrderedLine) {
        self.push(Record::Segment(key, SegmentRecord::CreateTemporary(line)));
    }

    pub fn push_segment_delete_temporary(&mut self, key: Key) {
        self.push(Record::Segment(key, SegmentRecord::DeleteTemporary));
    }

    pub fn push_segment_move_temporary(&mut self, key: Key, delta: MoveDelta) {
        self.push(Record::Segment(key, SegmentRecord::MoveTemporary(delta)));
    }

    pub fn push_segment_colliding_to_temporary(&mut self, key: Key) {
        self.push(Record::Segment(key, SegmentRecord::CollidingToTemporary));
    }

    pub fn push_segment_temporary_to_colliding_expect_valid(&mut self, key: Key) {
        self.push(Record::Segment(key, SegmentRecord::TemporaryToCollidingExpectValid));
    }

    pub fn push_segment_temporary_to_colliding_assume_colliding(&mut self, key: Key) {
        self.push(Record::Segment(key, SegmentRecord::TemporaryToCollidingAssumeColliding));
    }

    pub fn push_segment_insert_to_colliding_expect_valid(&mut self, key: Key) {
        self.push(Record::Segment(key, SegmentRecord::InsertToCollidingExpectValid));
    }

    pub fn push_segment_colliding_to_insert(&mut self, key: Key) {
        self.push(Record::Segment(key, SegmentRecord::CollidingToInsert));
    }
}

/// Appends `record` to `group`, combining it with a trailing move-temporary
/// record of the same key into a single summed delta. A delta that cancels
/// out entirely drops the record: there is nothing left to undo.
fn push_coalesced(group: &mut Vec<Record>, record: Record) {
    if let Some((key, delta)) = record.as_move()
        && let Some(last) = group.last()
        && let Some((last_key, last_delta)) = last.as_move()
        && last_key == key
    {
        let combined = last_delta.saturating_add(delta);
        if combined.is_zero() {
            group.pop();
        } else {
            let replacement = last.with_move_delta(combined);
            *group.last_mut().expect("checked Some above") = replacement;
        }
        return;
    }
    group.push(record);
}

#[cfg(test)]
mod tests {
    use super::*;
    use logiksim_messages::KeyIndex;

    fn key(n: u64) -> Key {
        let mut index: KeyIndex<u32> = KeyIndex::new();
        for id in 0..=n {
            index.insert(id as u32);
        }
        index.key_of(n as u32).unwrap()
    }

    #[test]
    fn push_outside_a_group_commits_immediately() {
        let mut stack = HistoryStack::new();
        stack.push_logicitem_delete_temporary(key(0));
        assert!(stack.can_undo());
        assert_eq!(stack.pop_undo_group().unwrap().len(), 1);
    }

    #[test]
    fn empty_group_is_dropped() {
        let mut stack = HistoryStack::new();
        stack.begin_group();
        stack.end_group();
        assert!(!stack.can_undo());
    }

    #[test]
    fn repeated_moves_in_one_group_coalesce() {
        let mut stack = HistoryStack::new();
        let k = key(0);
        stack.begin_group();
        stack.push_logicitem_move_temporary(k, MoveDelta::new(1, 0));
        stack.push_logicitem_move_temporary(k, MoveDelta::new(2, 0));
        stack.push_logicitem_move_temporary(k, MoveDelta::new(-1, 3));
        stack.end_group();

        let group = stack.pop_undo_group().unwrap();
        assert_eq!(group.len(), 1);
        assert_eq!(group[0], Record::LogicItem(k, LogicItemRecord::MoveTemporary(MoveDelta::new(2, 3))));
    }

    #[test]
    fn moves_that_cancel_out_leave_nothing() {
        let mut stack = HistoryStack::new();
        let k = key(0);
        stack.begin_group();
        stack.push_logicitem_move_temporary(k, MoveDelta::new(5, -2));
        stack.push_logicitem_move_temporary(k, MoveDelta::new(-5, 2));
        stack.end_group();

        assert!(!stack.can_undo());
    }

    #[test]
    fn undoing_a_group_redirects_pushes_to_redo() {
        let mut stack = HistoryStack::new();
        let k = key(0);
        stack.push_logicitem_colliding_to_temporary(k);

        let group = stack.pop_undo_group().unwrap();
        assert_eq!(group.len(), 1);
        assert!(!stack.can_undo());

        stack.begin_group();
        stack.push_logicitem_temporary_to_colliding_expect_valid(k);
        stack.end_group();
        stack.finish_replay();

        assert!(stack.can_redo());
        assert!(!stack.can_undo());
    }

    #[test]
    fn new_edit_after_undo_clears_redo() {
        let mut stack = HistoryStack::new();
        let k = key(0);
        stack.push_logicitem_delete_temporary(k);
        stack.pop_undo_group();
        stack.begin_group();
        stack.push_logicitem_colliding_to_temporary(k);
        stack.end_group();
        stack.finish_replay();
        assert!(stack.can_redo());

        stack.push_logicitem_delete_temporary(k);
        assert!(!stack.can_redo());
    }
}
