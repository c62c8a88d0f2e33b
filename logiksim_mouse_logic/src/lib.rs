// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-tool mouse state machines: insert a logic-item, draw a wire, move a
//! selection.
//!
//! Each tool tracks what is currently in flight and drives the editing
//! primitives in [`logiksim_editing`] directly, composing the same
//! `temporary → collisions → insert_or_discard` transitions a higher-level
//! facade would. `mouse_press`/`mouse_move`/`mouse_release` advance a tool;
//! `finalize` is the cancellation path, callable from any state, and always
//! leaves the layout with no dangling temporary artifact.

mod insert_logicitem;
mod insert_wire;
mod selection_move;

pub use insert_logicitem::InsertLogicItemLogic;
pub use insert_wire::{InsertWireLogic, LineInsertionType};
pub use selection_move::SelectionMoveLogic;
