// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout change messages, the stable key index, and the message-stream
//! validator.
//!
//! Every edit the layout store makes is announced as a [`LayoutMessage`].
//! Nothing downstream — the spatial/connection indices, selections, history
//! — reads the layout directly; they all reconstruct what they need from
//! this stream, which keeps them exact without coupling them to the store's
//! internal representation.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod key_index;
mod message;
mod message_validator;

pub use key_index::{Key, KeyIndex};
pub use message::{
    DecorationInsertData, LayoutMessage, LogicItemInsertData, SegmentInfoSnapshot, SegmentPart,
};
pub use message_validator::{MessageValidator, ValidationError};
