// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! LogikSim Core: the public facade over the editable-circuit stack.
//!
//! [`Circuit`] owns one circuit's full state; [`Modifier`] is the borrowing
//! handle every edit goes through. Everything below this crate
//! (`logiksim_layout`, `logiksim_index`, `logiksim_history`,
//! `logiksim_selection`, `logiksim_visible_selection`, `logiksim_editing`)
//! is an implementation detail a caller shouldn't need to depend on
//! directly; this crate re-exports the pieces of their public API a caller
//! does need (ids, geometry, insertion modes, attribute types) so that a
//! single `logiksim_core` dependency is enough.

mod error;
mod format;
mod modifier;
mod selection_registry;

pub use error::{EditError, LoadError, StateViolation};
pub use format::{
    detect_envelope, load_from_json, Envelope, LoadedDecoration, LoadedLogicItem, SavedCircuit,
    SimulationConfig, ViewPoint, CURRENT_VERSION,
};
pub use modifier::{Circuit, Modifier};

pub use logiksim_editing::{CircuitData, InsertionHint, InsertionMode};
pub use logiksim_geometry::{
    Axis, ConnectionId, DecorationId, Grid, GridFine, Line, LogicItemId, MoveDelta, Offset,
    OrderedLine, Orientation, Part, Point, PointFine, Rect, RectFine, Segment, SegmentIndex,
    SegmentPointType, SelectionId, WireId,
};
pub use logiksim_layout::{
    ClockGeneratorAttributes, DecorationDefinition, DecorationType, DisplayState, FontStyle,
    HorizontalAlignment, Layout, LogicItemDefinition, LogicItemType, TextColor,
    TextElementAttributes,
};
pub use logiksim_selection::Selection;
