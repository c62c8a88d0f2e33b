// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag-to-place state machine for a single logic-item.

use logiksim_editing::{
    add_logicitem, change_logicitem_insertion_mode, delete_temporary_logicitem,
    is_logicitem_position_representable, move_or_delete_temporary_logicitem, CircuitData,
    InsertionHint, InsertionMode,
};
use logiksim_geometry::{LogicItemId, MoveDelta, Point};
use logiksim_layout::LogicItemDefinition;

#[must_use]
fn delta_between(from: Point, to: Point) -> MoveDelta {
    MoveDelta::new(to.x.value() - from.x.value(), to.y.value() - from.y.value())
}

#[derive(Debug)]
struct Tracked {
    id: LogicItemId,
    last_position: Point,
}

/// Places a logic-item under the pointer as it moves, showing collisions
/// live, and commits (or discards, if still colliding) on release.
///
/// A placed item sits in `collisions` mode between moves so its display
/// reflects whether it can legally land there. Since only a `temporary`
/// element can be translated, each drag step briefly demotes it back to
/// `temporary`, moves it, then promotes it to `collisions` again.
#[derive(Debug, Default)]
pub struct InsertLogicItemLogic {
    tracked: Option<Tracked>,
}

impl InsertLogicItemLogic {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.tracked.is_some()
    }

    fn cancel_tracked(&mut self, circuit: &mut CircuitData) {
        if let Some(tracked) = self.tracked.take() {
            let mut id = tracked.id;
            change_logicitem_insertion_mode(circuit, &mut id, InsertionMode::Temporary, InsertionHint::NoHint);
            delete_temporary_logicitem(circuit, &mut id);
        }
    }

    /// Discards any placement already in flight, then starts a new one at
    /// `position`.
    pub fn mouse_press(&mut self, circuit: &mut CircuitData, definition: LogicItemDefinition, position: Point) {
        self.cancel_tracked(circuit);
        let id = add_logicitem(circuit, definition, position, InsertionMode::Collisions, None);
        if id.is_valid() {
            self.tracked = Some(Tracked { id, last_position: position });
        }
    }

    /// Drags the in-flight placement to `position`. A no-op if nothing is
    /// being placed.
    pub fn mouse_move(&mut self, circuit: &mut CircuitData, position: Point) {
        let Some(tracked) = &self.tracked else { return };
        if position == tracked.last_position {
            return;
        }
        let delta = delta_between(tracked.last_position, position);
        let mut id = tracked.id;
        let still_representable = is_logicitem_position_representable(&circuit.layout, id, delta);

        change_logicitem_insertion_mode(circuit, &mut id, InsertionMode::Temporary, InsertionHint::NoHint);
        move_or_delete_temporary_logicitem(circuit, &mut id, delta);

        if still_representable {
            change_logicitem_insertion_mode(circuit, &mut id, InsertionMode::Collisions, InsertionHint::NoHint);
            self.tracked = Some(Tracked { id, last_position: position });
        } else {
            self.tracked = None;
        }
    }

    /// Commits the in-flight placement, discarding it if it still collides.
    pub fn mouse_release(&mut self, circuit: &mut CircuitData) {
        if let Some(tracked) = self.tracked.take() {
            let mut id = tracked.id;
            change_logicitem_insertion_mode(circuit, &mut id, InsertionMode::InsertOrDiscard, InsertionHint::NoHint);
        }
    }

    /// Leaves no temporary artifact behind, regardless of which callback ran
    /// last.
    pub fn finalize(&mut self, circuit: &mut CircuitData) {
        self.cancel_tracked(circuit);
    }
}
