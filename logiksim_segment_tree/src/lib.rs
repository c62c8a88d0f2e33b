// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! LogikSim Segment Tree: the dense set of straight segments making up one
//! wire, with per-segment endpoint classification and valid-part tracking.
//!
//! A [`SegmentTree`] is owned by exactly one wire in the layout store
//! (`logiksim_layout`). It knows nothing about *other* wires, the spatial
//! index, or collision detection: those concerns are layered on top by the
//! editing primitives (`logiksim_editing`), which are the only code allowed
//! to reclassify an endpoint or decide which parts of a segment are
//! currently valid.
//!
//! This crate is `no_std` and uses `alloc`.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod info;
mod tree;

pub use info::SegmentInfo;
pub use tree::SegmentTree;
