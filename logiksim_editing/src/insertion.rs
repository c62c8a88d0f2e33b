// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The insertion-mode state machine every logic-item, decoration and wire
//! segment moves through as it is placed.

use logiksim_geometry::WireId;
use logiksim_layout::DisplayState;

/// The insertion state a caller asks an element to reach.
///
/// Maps onto [`DisplayState`] on the layout side: `Temporary` corresponds to
/// `DisplayState::Temporary`, `Collisions` to `Colliding`, and
/// `InsertOrDiscard` to either `Valid` or `Normal` depending on whether a
/// collision check actually succeeds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InsertionMode {
    Temporary,
    Collisions,
    InsertOrDiscard,
}

impl InsertionMode {
    /// Maps a layout's current [`DisplayState`] to the insertion mode it
    /// corresponds to.
    #[must_use]
    pub fn from_display_state(state: DisplayState) -> Self {
        match state {
            DisplayState::Temporary => Self::Temporary,
            DisplayState::Colliding => Self::Collisions,
            DisplayState::Valid | DisplayState::Normal => Self::InsertOrDiscard,
        }
    }

    /// Maps a wire segment's owning wire id to the insertion mode it
    /// corresponds to. Segments have no `Valid`/`Normal` split the way
    /// logic-items and decorations do: any normally-inserted wire counts as
    /// [`Self::InsertOrDiscard`].
    #[must_use]
    pub fn from_wire_id(wire_id: WireId) -> Self {
        if wire_id == WireId::TEMPORARY {
            Self::Temporary
        } else if wire_id == WireId::COLLIDING {
            Self::Collisions
        } else {
            Self::InsertOrDiscard
        }
    }
}

/// A caller's declaration of whether it already knows an element is free of
/// collisions, used to pick between the "assert valid" and
/// "assume colliding" variants of a temporary-to-colliding transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InsertionHint {
    /// The caller has not checked; let the transition actually test for a
    /// collision and record whichever outcome it finds.
    NoHint,
    /// The caller already knows the element is clear; panics if a collision
    /// is found anyway.
    ExpectValid,
    /// The caller already knows the element collides; skip the check.
    AssumeColliding,
}

impl InsertionHint {
    /// Returns `true` if `hint` is a legal companion to `mode`.
    ///
    /// `ExpectValid` only makes sense when asking to reach
    /// [`InsertionMode::InsertOrDiscard`]; `AssumeColliding` only when asking
    /// to reach [`InsertionMode::Collisions`].
    #[must_use]
    pub fn is_valid_for(self, mode: InsertionMode) -> bool {
        match self {
            Self::NoHint => true,
            Self::ExpectValid => mode == InsertionMode::InsertOrDiscard,
            Self::AssumeColliding => mode == InsertionMode::Collisions,
        }
    }
}
