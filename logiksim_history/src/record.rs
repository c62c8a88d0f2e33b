// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The inverse-operation records a [`crate::HistoryStack`] stores.
//!
//! Each variant names the transition to *replay* on undo, not the one that
//! was originally performed: an edit that moved a logic-item from
//! `temporary` to `colliding` pushes [`LogicItemRecord::CollidingToTemporary`],
//! the step that would take it back.

use logiksim_geometry::{MoveDelta, OrderedLine, Part};
use logiksim_layout::{ClockGeneratorAttributes, PlacedDecoration, PlacedLogicItem, TextElementAttributes};
use logiksim_messages::Key;

/// Undo step for a logic-item, addressed by its stable key rather than its
/// (possibly since-renumbered) id.
#[derive(Clone, Debug, PartialEq)]
pub enum LogicItemRecord {
    AddToVisibleSelection,
    RemoveFromVisibleSelection,
    /// Re-creates a deleted temporary logic-item from its full snapshot.
    CreateTemporary(PlacedLogicItem),
    DeleteTemporary,
    MoveTemporary(MoveDelta),
    CollidingToTemporary,
    TemporaryToCollidingExpectValid,
    TemporaryToCollidingAssumeColliding,
    InsertToCollidingExpectValid,
    CollidingToInsert,
    ChangeAttributes(ClockGeneratorAttributes),
}

/// Undo step for a decoration. Mirrors [`LogicItemRecord`]; decorations go
/// through the same `temporary ↔ colliding ↔ insert` chain.
#[derive(Clone, Debug, PartialEq)]
pub enum DecorationRecord {
    AddToVisibleSelection,
    RemoveFromVisibleSelection,
    CreateTemporary(PlacedDecoration),
    DeleteTemporary,
    MoveTemporary(MoveDelta),
    CollidingToTemporary,
    TemporaryToCollidingExpectValid,
    TemporaryToCollidingAssumeColliding,
    InsertToCollidingExpectValid,
    CollidingToInsert,
    ChangeAttributes(TextElementAttributes),
}

/// Undo step for one segment of a wire tree, addressed by the segment's
/// stable key. `Part` fields record which sub-range of the segment the
/// visible-selection membership or temporary geometry applied to.
#[derive(Clone, Debug, PartialEq)]
pub enum SegmentRecord {
    AddToVisibleSelection(Part),
    RemoveFromVisibleSelection(Part),
    CreateTemporary(OrderedLine),
    DeleteTemporary,
    MoveTemporary(MoveDelta),
    CollidingToTemporary,
    TemporaryToCollidingExpectValid,
    TemporaryToCollidingAssumeColliding,
    InsertToCollidingExpectValid,
    CollidingToInsert,
}

/// One undo step, keyed by the stable key of the entity it targets.
#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    LogicItem(Key, LogicItemRecord),
    Decoration(Key, DecorationRecord),
    Segment(Key, SegmentRecord),
}

impl Record {
    /// Returns the `(key, move delta)` this record carries, if it is a
    /// move-temporary step eligible for coalescing.
    pub(crate) fn as_move(&self) -> Option<(Key, MoveDelta)> {
        match self {
            Self::LogicItem(key, LogicItemRecord::MoveTemporary(delta)) => Some((*key, *delta)),
            Self::Decoration(key, DecorationRecord::MoveTemporary(delta)) => Some((*key, *delta)),
            Self::Segment(key, SegmentRecord::MoveTemporary(delta)) => Some((*key, *delta)),
            _ => None,
        }
    }

    /// Builds a replacement move-temporary record of the same kind and key
    /// as `self`, but with `delta` instead. Panics if `self` isn't a move
    /// record; callers only call this after [`Record::as_move`] succeeded.
    pub(crate) fn with_move_delta(&self, delta: MoveDelta) -> Self {
        match self {
            Self::LogicItem(key, LogicItemRecord::MoveTemporary(_)) => {
                Self::LogicItem(*key, LogicItemRecord::MoveTemporary(delta))
            }
            Self::Decoration(key, DecorationRecord::MoveTemporary(_)) => {
                Self::Decoration(*key, DecorationRecord::MoveTemporary(delta))
            }
            Self::Segment(key, SegmentRecord::MoveTemporary(_)) => {
                Self::Segment(*key, SegmentRecord::MoveTemporary(delta))
            }
            _ => unreachable!("with_move_delta called on a non-move record"),
        }
    }
}
