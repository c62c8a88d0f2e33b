// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The editing primitives: insertion-mode transitions, add/move/delete, and
//! attribute/inverter changes for logic-items, decorations and wire
//! segments.
//!
//! Everything here operates on [`CircuitData`], the aggregate of a layout,
//! its indices, its history, a message validator and the currently visible
//! selection. A primitive mutates the layout directly, announces every
//! change through [`CircuitData::submit`], and (when history is enabled)
//! pushes the inverse step that would undo it. None of this crate checks
//! caller-supplied arguments against user-facing invariants; that is the
//! public Modifier facade's job, one layer up, which is also the only place
//! allowed to translate a precondition violation into a typed error instead
//! of a panic.

mod decoration;
mod insertion;
mod logicitem;
pub mod ports;
mod wire;

pub use decoration::{
    add_decoration, add_decoration_to_visible_selection, change_decoration_insertion_mode,
    delete_temporary_decoration, element_change_colliding_to_insert as decoration_colliding_to_insert,
    element_change_colliding_to_temporary as decoration_colliding_to_temporary,
    element_change_insert_to_colliding as decoration_insert_to_colliding,
    element_change_temporary_to_colliding as decoration_temporary_to_colliding,
    is_decoration_position_representable, move_or_delete_temporary_decoration,
    move_temporary_decoration_unchecked, remove_decoration_from_visible_selection,
    set_attributes_decoration,
};
pub use insertion::{InsertionHint, InsertionMode};
pub use logicitem::{
    add_logicitem, add_logicitem_to_visible_selection, change_logicitem_insertion_mode,
    delete_temporary_logicitem, element_change_colliding_to_insert as logicitem_colliding_to_insert,
    element_change_colliding_to_temporary as logicitem_colliding_to_temporary,
    element_change_insert_to_colliding as logicitem_insert_to_colliding,
    element_change_temporary_to_colliding as logicitem_temporary_to_colliding,
    is_logicitem_position_representable, move_or_delete_temporary_logicitem,
    move_temporary_logicitem_unchecked, remove_logicitem_from_visible_selection,
    set_attributes_logicitem, toggle_inverter,
};
pub use wire::{
    add_wire_segment, add_segment_to_visible_selection, change_wire_insertion_mode,
    delete_temporary_segment, element_change_colliding_to_insert as segment_colliding_to_insert,
    element_change_colliding_to_temporary as segment_colliding_to_temporary,
    element_change_insert_to_colliding as segment_insert_to_colliding,
    element_change_temporary_to_colliding as segment_temporary_to_colliding,
    is_wire_position_representable, move_or_delete_temporary_segment,
    move_temporary_segment_unchecked, regularize_temporary_selection,
    remove_segment_from_visible_selection, split_temporary_before_insert,
};

use logiksim_history::History;
use logiksim_index::LayoutIndex;
use logiksim_layout::Layout;
use logiksim_messages::{DecorationInsertData, Key, KeyIndex, LayoutMessage, LogicItemInsertData, MessageValidator};
use logiksim_visible_selection::VisibleSelection;

/// Every piece of state one editing primitive needs: the visual layout, the
/// spatial/connection indices kept in sync with it, the undo/redo history,
/// the stable id-to-key mappings history records address, and the
/// currently visible selection. The public Modifier facade owns exactly one
/// of these.
#[derive(Clone, Debug, Default)]
pub struct CircuitData {
    pub layout: Layout,
    pub index: LayoutIndex,
    pub history: History,
    pub visible_selection: VisibleSelection,

    logicitem_keys: KeyIndex<logiksim_geometry::LogicItemId>,
    decoration_keys: KeyIndex<logiksim_geometry::DecorationId>,
    segment_keys: KeyIndex<logiksim_geometry::Segment>,

    validator: Option<MessageValidator>,
    recorded_messages: Option<Vec<LayoutMessage>>,
}

impl CircuitData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables validating every submitted message against the layout's
    /// legal state-machine transitions. Defaults off; the Modifier facade
    /// turns this on in debug builds.
    pub fn set_validate_messages(&mut self, enabled: bool) {
        self.validator = enabled.then(MessageValidator::new);
    }

    /// Enables keeping every submitted message in order, for tests that
    /// assert on the exact message stream an edit produced.
    pub fn set_store_messages(&mut self, enabled: bool) {
        self.recorded_messages = enabled.then(Vec::new);
    }

    #[must_use]
    pub fn recorded_messages(&self) -> Option<&[LayoutMessage]> {
        self.recorded_messages.as_deref()
    }

    #[must_use]
    pub fn logicitem_key(&self, id: logiksim_geometry::LogicItemId) -> Key {
        self.logicitem_keys.key_of(id).expect("every live logic-item id has a key")
    }

    #[must_use]
    pub fn decoration_key(&self, id: logiksim_geometry::DecorationId) -> Key {
        self.decoration_keys.key_of(id).expect("every live decoration id has a key")
    }

    #[must_use]
    pub fn segment_key(&self, segment: logiksim_geometry::Segment) -> Key {
        self.segment_keys.key_of(segment).expect("every live segment has a key")
    }

    /// Resolves a history key back to its current logic-item id, or `None`
    /// if the entity it named has since been permanently deleted.
    #[must_use]
    pub fn logicitem_id_for_key(&self, key: Key) -> Option<logiksim_geometry::LogicItemId> {
        self.logicitem_keys.id_of(key)
    }

    /// Resolves a history key back to its current decoration id, or `None`
    /// if the entity it named has since been permanently deleted.
    #[must_use]
    pub fn decoration_id_for_key(&self, key: Key) -> Option<logiksim_geometry::DecorationId> {
        self.decoration_keys.id_of(key)
    }

    /// Resolves a history key back to its current segment, or `None` if the
    /// entity it named has since been permanently deleted.
    #[must_use]
    pub fn segment_id_for_key(&self, key: Key) -> Option<logiksim_geometry::Segment> {
        self.segment_keys.id_of(key)
    }

    /// Rebinds `id`'s freshly-assigned key to `key`, dropping whatever key
    /// [`Self::submit`] just handed it. Used by undo/redo replay right after
    /// re-creating a deleted entity from a [`logiksim_history::Record`]
    /// snapshot, so that any other record in the same group still addresses
    /// it by its original key rather than the new one `add_*` assigned.
    pub fn rebind_logicitem_key(&mut self, id: logiksim_geometry::LogicItemId, key: Key) {
        self.logicitem_keys.insert_with_key(id, key);
    }

    /// See [`Self::rebind_logicitem_key`].
    pub fn rebind_decoration_key(&mut self, id: logiksim_geometry::DecorationId, key: Key) {
        self.decoration_keys.insert_with_key(id, key);
    }

    /// See [`Self::rebind_logicitem_key`].
    pub fn rebind_segment_key(&mut self, segment: logiksim_geometry::Segment, key: Key) {
        self.segment_keys.insert_with_key(segment, key);
    }

    /// Announces `message`: folds it into the spatial/connection index, the
    /// key bookkeeping, the validator (if enabled) and the recorded-message
    /// log (if enabled).
    ///
    /// A message that the validator rejects is a bug in the primitive that
    /// produced it, not a condition a caller could sensibly recover from.
    pub fn submit(&mut self, message: LayoutMessage) {
        match message {
            LayoutMessage::LogicItemCreated { logicitem_id } => {
                self.logicitem_keys.insert(logicitem_id);
            }
            LayoutMessage::LogicItemIdUpdated { old_logicitem_id, new_logicitem_id } => {
                self.logicitem_keys.rename(old_logicitem_id, new_logicitem_id);
            }
            LayoutMessage::LogicItemDeleted { logicitem_id } => {
                self.logicitem_keys.remove(logicitem_id);
            }
            LayoutMessage::DecorationCreated { decoration_id } => {
                self.decoration_keys.insert(decoration_id);
            }
            LayoutMessage::DecorationIdUpdated { old_decoration_id, new_decoration_id } => {
                self.decoration_keys.rename(old_decoration_id, new_decoration_id);
            }
            LayoutMessage::DecorationDeleted { decoration_id } => {
                self.decoration_keys.remove(decoration_id);
            }
            LayoutMessage::SegmentCreated { segment, .. } => {
                self.segment_keys.insert(segment);
            }
            LayoutMessage::SegmentIdUpdated { old_segment, new_segment } => {
                self.segment_keys.rename(old_segment, new_segment);
            }
            LayoutMessage::InsertedSegmentIdUpdated { old_segment, new_segment, .. } => {
                self.segment_keys.rename(old_segment, new_segment);
            }
            _ => {}
        }

        self.index.submit(&message);
        self.visible_selection.submit(&message);

        if let Some(validator) = &mut self.validator {
            validator.submit(&message).expect("editing primitive produced an invalid message stream");
        }
        if let Some(recorded) = &mut self.recorded_messages {
            recorded.push(message);
        }
    }
}

/// Builds a [`LogicItemInsertData`] snapshot for `id`, the data other
/// components need without depending on `logiksim_layout` directly.
#[must_use]
pub(crate) fn logicitem_insert_data(layout: &Layout, id: logiksim_geometry::LogicItemId) -> LogicItemInsertData {
    LogicItemInsertData {
        position: layout.logicitems().position(id),
        input_count: layout.logicitems().input_count(id),
        output_count: layout.logicitems().output_count(id),
        orientation: layout.logicitems().orientation(id),
        bounding_rect: layout.logicitems().bounding_rect(id),
    }
}

/// Builds a [`DecorationInsertData`] snapshot for `id`.
#[must_use]
pub(crate) fn decoration_insert_data(layout: &Layout, id: logiksim_geometry::DecorationId) -> DecorationInsertData {
    DecorationInsertData {
        position: layout.decorations().position(id),
        size: layout.decorations().size(id),
        bounding_rect: layout.decorations().bounding_rect(id),
    }
}
