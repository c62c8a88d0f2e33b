// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! LogikSim Geometry: grid points, ordered lines, parts, offsets, ids,
//! orientations and rects, with checked arithmetic.
//!
//! This crate is the vocabulary layer every other `logiksim_*` crate builds
//! on. It owns no aggregate state: every type here is a small, `Copy`
//! value with validated construction (an invalid combination of fields is
//! unrepresentable, or construction returns `None`/panics immediately).
//!
//! - [`Grid`]/[`GridFine`]: bounded and continuous 1D coordinates.
//! - [`Point`]/[`PointFine`]: 2D points over each.
//! - [`Line`]/[`OrderedLine`]: orthogonal segments, free-form and canonical.
//! - [`Offset`]/[`Part`]: positions and sub-intervals along a line.
//! - [`Rect`]/[`RectFine`]: axis-aligned rectangles over each point type.
//! - [`Orientation`]/[`SegmentPointType`]: small closed enums used to
//!   classify logic items and wire endpoints.
//! - [`ids`]: dense, null-sentinel identifier types
//!   ([`LogicItemId`], [`DecorationId`], [`WireId`], [`SegmentIndex`],
//!   [`ConnectionId`], [`SelectionId`]) and [`Segment`].
//!
//! This crate is `no_std` and uses `alloc` only where a type needs it (none
//! currently do; it is reserved for forward compatibility with variable-size
//! vocabulary types).

#![cfg_attr(not(feature = "std"), no_std)]

mod grid;
mod ids;
mod line;
mod move_delta;
mod orientation;
mod part;
mod point;
mod rect;

pub use grid::{Grid, GridFine};
pub use ids::{ConnectionId, DecorationId, LogicItemId, Segment, SegmentIndex, SelectionId, WireId};
pub use line::{Axis, Line, OrderedLine};
pub use move_delta::MoveDelta;
pub use orientation::{Orientation, SegmentPointType};
pub use part::{Offset, Part};
pub use point::{Point, PointFine};
pub use rect::{Rect, RectFine};
