// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A grouped, coalescing undo/redo stack addressed by stable keys rather
//! than the ids a layout store may renumber underneath it.
//!
//! [`History`] is the enable/disable switch; [`HistoryStack`] is the actual
//! storage, only reachable while enabled. This mirrors checking
//! `circuit.history.get_stack()` before recording anything: when disabled,
//! every `push_*` call is simply skipped by the caller.

mod record;
mod stack;

pub use record::{DecorationRecord, LogicItemRecord, Record, SegmentRecord};
pub use stack::HistoryStack;

/// Owns an optional [`HistoryStack`]; editing primitives record onto it only
/// when [`get_stack_mut`](Self::get_stack_mut) returns `Some`.
#[derive(Clone, Debug, Default)]
pub struct History {
    stack: Option<HistoryStack>,
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a history with recording enabled from the start.
    #[must_use]
    pub fn enabled() -> Self {
        Self {
            stack: Some(HistoryStack::new()),
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.stack.is_some()
    }

    /// Enables recording. A no-op if already enabled; does not clear an
    /// existing stack.
    pub fn enable(&mut self) {
        self.stack.get_or_insert_with(HistoryStack::new);
    }

    /// Disables recording and discards every stored undo/redo group.
    pub fn disable(&mut self) {
        self.stack = None;
    }

    #[must_use]
    pub fn get_stack(&self) -> Option<&HistoryStack> {
        self.stack.as_ref()
    }

    #[must_use]
    pub fn get_stack_mut(&mut self) -> Option<&mut HistoryStack> {
        self.stack.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logiksim_messages::KeyIndex;

    #[test]
    fn disabled_by_default() {
        let history = History::new();
        assert!(!history.is_enabled());
        assert!(history.get_stack().is_none());
    }

    #[test]
    fn enable_then_disable_discards_the_stack() {
        let mut history = History::new();
        history.enable();
        let mut index: KeyIndex<u32> = KeyIndex::new();
        let key = index.insert(0);
        history.get_stack_mut().unwrap().push_logicitem_delete_temporary(key);
        assert!(history.get_stack().unwrap().can_undo());

        history.disable();
        assert!(history.get_stack().is_none());

        history.enable();
        assert!(!history.get_stack().unwrap().can_undo());
    }
}
