// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Validates a stream of [`LayoutMessage`]s against the state machine every
//! legal edit must follow.
//!
//! The validator keeps its own shadow bookkeeping, independent of the layout
//! store that produced the messages: for every id it has seen it tracks a
//! `unique_id` (so an id that gets reused after a delete is never confused
//! with its predecessor) and, for inserted entities, the data the insertion
//! carried. Every message is checked against this shadow state before being
//! folded into it; a message that doesn't fit the current state is a bug in
//! whatever produced the stream, not a condition callers should recover from.

use hashbrown::HashMap;

use logiksim_geometry::{DecorationId, LogicItemId, Segment};

use crate::message::{DecorationInsertData, LogicItemInsertData, LayoutMessage, SegmentInfoSnapshot};

/// A message didn't fit the state the validator has reconstructed so far.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// The message assumed the id already existed, but it doesn't.
    UnknownId,
    /// The message assumed the id didn't exist yet, but it does.
    DuplicateId,
    /// The message assumed the entity was already inserted, but it isn't.
    NotInserted,
    /// The message assumed the entity wasn't inserted yet, but it is.
    AlreadyInserted,
    /// An `*Inserted`/`*Uninserted`/`*IdUpdated` pair's data didn't match
    /// the data recorded at insertion time.
    DataMismatch,
    /// A part-level segment message referenced a range outside the
    /// segment's recorded length.
    PartOutOfRange,
}

struct AllEntry<Data> {
    unique_id: u64,
    inserted: Option<Data>,
}

/// Shadow state machine for one `Created`/`IdUpdated`/`Deleted` +
/// `Inserted`/`InsertedIdUpdated`/`Uninserted` message group.
struct EntityMap<Id, Data> {
    entries: HashMap<Id, AllEntry<Data>>,
}

impl<Id, Data> Default for EntityMap<Id, Data> {
    fn default() -> Self {
        Self { entries: HashMap::new() }
    }
}

impl<Id, Data> EntityMap<Id, Data>
where
    Id: Copy + Eq + core::hash::Hash,
    Data: Copy + PartialEq,
{
    fn created(&mut self, id: Id, unique_id: u64) -> Result<(), ValidationError> {
        if self.entries.contains_key(&id) {
            return Err(ValidationError::DuplicateId);
        }
        self.entries.insert(id, AllEntry { unique_id, inserted: None });
        Ok(())
    }

    fn deleted(&mut self, id: Id) -> Result<(), ValidationError> {
        let entry = self.entries.get(&id).ok_or(ValidationError::UnknownId)?;
        if entry.inserted.is_some() {
            return Err(ValidationError::AlreadyInserted);
        }
        self.entries.remove(&id);
        Ok(())
    }

    fn id_updated(&mut self, old_id: Id, new_id: Id) -> Result<(), ValidationError> {
        if self.entries.contains_key(&new_id) {
            return Err(ValidationError::DuplicateId);
        }
        let entry = self.entries.remove(&old_id).ok_or(ValidationError::UnknownId)?;
        self.entries.insert(new_id, entry);
        Ok(())
    }

    fn inserted(&mut self, id: Id, data: Data) -> Result<(), ValidationError> {
        let entry = self.entries.get_mut(&id).ok_or(ValidationError::UnknownId)?;
        if entry.inserted.is_some() {
            return Err(ValidationError::AlreadyInserted);
        }
        entry.inserted = Some(data);
        Ok(())
    }

    fn inserted_id_updated(&mut self, old_id: Id, new_id: Id, data: Data) -> Result<(), ValidationError> {
        if self.entries.contains_key(&new_id) {
            return Err(ValidationError::DuplicateId);
        }
        let mut entry = self.entries.remove(&old_id).ok_or(ValidationError::UnknownId)?;
        match entry.inserted {
            Some(existing) if existing == data => {}
            Some(_) => return Err(ValidationError::DataMismatch),
            None => return Err(ValidationError::NotInserted),
        }
        entry.inserted = Some(data);
        self.entries.insert(new_id, entry);
        Ok(())
    }

    fn uninserted(&mut self, id: Id, data: Data) -> Result<(), ValidationError> {
        let entry = self.entries.get_mut(&id).ok_or(ValidationError::UnknownId)?;
        match entry.inserted {
            Some(existing) if existing == data => {}
            Some(_) => return Err(ValidationError::DataMismatch),
            None => return Err(ValidationError::NotInserted),
        }
        entry.inserted = None;
        Ok(())
    }
}

/// Shadow bookkeeping for one wire segment: its recorded length (to bound
/// part-level moves/deletes) and its current inserted snapshot, if any.
struct SegmentEntry {
    unique_id: u64,
    length: u32,
    inserted: Option<SegmentInfoSnapshot>,
}

/// Validates a [`LayoutMessage`] stream against the legal state-machine
/// transitions for logic-items, decorations and wire segments.
///
/// Construct one per editing session (or per undo/redo scope) and feed it
/// every message the layout store emits, in order, via [`submit`](Self::submit).
#[derive(Default)]
pub struct MessageValidator {
    next_unique_id: u64,
    logicitems: EntityMap<LogicItemId, LogicItemInsertData>,
    decorations: EntityMap<DecorationId, DecorationInsertData>,
    segments: HashMap<Segment, SegmentEntry>,
}

impl MessageValidator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_unique_id(&mut self) -> u64 {
        let id = self.next_unique_id;
        self.next_unique_id += 1;
        id
    }

    /// Folds one message into the validator's shadow state, rejecting it if
    /// it doesn't fit a legal transition from the current state.
    pub fn submit(&mut self, message: &LayoutMessage) -> Result<(), ValidationError> {
        match *message {
            LayoutMessage::LogicItemCreated { logicitem_id } => {
                let unique_id = self.fresh_unique_id();
                self.logicitems.created(logicitem_id, unique_id)
            }
            LayoutMessage::LogicItemIdUpdated { old_logicitem_id, new_logicitem_id } => {
                self.logicitems.id_updated(old_logicitem_id, new_logicitem_id)
            }
            LayoutMessage::LogicItemDeleted { logicitem_id } => self.logicitems.deleted(logicitem_id),
            LayoutMessage::LogicItemInserted { logicitem_id, data } => {
                self.logicitems.inserted(logicitem_id, data)
            }
            LayoutMessage::InsertedLogicItemIdUpdated { old_logicitem_id, new_logicitem_id, data } => {
                self.logicitems.inserted_id_updated(old_logicitem_id, new_logicitem_id, data)
            }
            LayoutMessage::LogicItemUninserted { logicitem_id, data } => {
                self.logicitems.uninserted(logicitem_id, data)
            }

            LayoutMessage::DecorationCreated { decoration_id } => {
                let unique_id = self.fresh_unique_id();
                self.decorations.created(decoration_id, unique_id)
            }
            LayoutMessage::DecorationIdUpdated { old_decoration_id, new_decoration_id } => {
                self.decorations.id_updated(old_decoration_id, new_decoration_id)
            }
            LayoutMessage::DecorationDeleted { decoration_id } => self.decorations.deleted(decoration_id),
            LayoutMessage::DecorationInserted { decoration_id, data } => {
                self.decorations.inserted(decoration_id, data)
            }
            LayoutMessage::InsertedDecorationIdUpdated { old_decoration_id, new_decoration_id, data } => {
                self.decorations.inserted_id_updated(old_decoration_id, new_decoration_id, data)
            }
            LayoutMessage::DecorationUninserted { decoration_id, data } => {
                self.decorations.uninserted(decoration_id, data)
            }

            LayoutMessage::SegmentCreated { segment, length } => {
                if self.segments.contains_key(&segment) {
                    return Err(ValidationError::DuplicateId);
                }
                let unique_id = self.fresh_unique_id();
                self.segments.insert(segment, SegmentEntry { unique_id, length, inserted: None });
                Ok(())
            }
            LayoutMessage::SegmentIdUpdated { old_segment, new_segment } => {
                if self.segments.contains_key(&new_segment) {
                    return Err(ValidationError::DuplicateId);
                }
                let entry = self.segments.remove(&old_segment).ok_or(ValidationError::UnknownId)?;
                self.segments.insert(new_segment, entry);
                Ok(())
            }
            LayoutMessage::SegmentPartMoved { source, destination } => {
                let source_entry =
                    self.segments.get(&source.segment).ok_or(ValidationError::UnknownId)?;
                if source.part.end().value() > source_entry.length {
                    return Err(ValidationError::PartOutOfRange);
                }
                let dest_entry =
                    self.segments.get(&destination.segment).ok_or(ValidationError::UnknownId)?;
                if destination.part.end().value() > dest_entry.length {
                    return Err(ValidationError::PartOutOfRange);
                }
                Ok(())
            }
            LayoutMessage::SegmentPartDeleted { segment_part } => {
                let entry =
                    self.segments.get(&segment_part.segment).ok_or(ValidationError::UnknownId)?;
                if segment_part.part.end().value() > entry.length {
                    return Err(ValidationError::PartOutOfRange);
                }
                Ok(())
            }

            LayoutMessage::SegmentInserted { segment, segment_info } => {
                let entry = self.segments.get_mut(&segment).ok_or(ValidationError::UnknownId)?;
                if entry.inserted.is_some() {
                    return Err(ValidationError::AlreadyInserted);
                }
                entry.inserted = Some(segment_info);
                Ok(())
            }
            LayoutMessage::InsertedSegmentIdUpdated { old_segment, new_segment, segment_info } => {
                if self.segments.contains_key(&new_segment) {
                    return Err(ValidationError::DuplicateId);
                }
                let mut entry = self.segments.remove(&old_segment).ok_or(ValidationError::UnknownId)?;
                match entry.inserted {
                    Some(existing) if existing == segment_info => {}
                    Some(_) => return Err(ValidationError::DataMismatch),
                    None => return Err(ValidationError::NotInserted),
                }
                self.segments.insert(new_segment, entry);
                Ok(())
            }
            LayoutMessage::InsertedEndPointsUpdated { segment, old_segment_info, new_segment_info } => {
                let entry = self.segments.get_mut(&segment).ok_or(ValidationError::UnknownId)?;
                match entry.inserted {
                    Some(existing) if existing == old_segment_info => {}
                    Some(_) => return Err(ValidationError::DataMismatch),
                    None => return Err(ValidationError::NotInserted),
                }
                entry.inserted = Some(new_segment_info);
                Ok(())
            }
            LayoutMessage::SegmentUninserted { segment, segment_info } => {
                let entry = self.segments.get_mut(&segment).ok_or(ValidationError::UnknownId)?;
                match entry.inserted {
                    Some(existing) if existing == segment_info => {}
                    Some(_) => return Err(ValidationError::DataMismatch),
                    None => return Err(ValidationError::NotInserted),
                }
                entry.inserted = None;
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn logicitem_count(&self) -> usize {
        self.logicitems.entries.len()
    }

    #[must_use]
    pub fn decoration_count(&self) -> usize {
        self.decorations.entries.len()
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// `unique_id`s assigned so far, across all three entity kinds. Useful
    /// for asserting no id got silently dropped and re-synthesized.
    #[must_use]
    pub fn logicitem_unique_id(&self, id: LogicItemId) -> Option<u64> {
        self.logicitems.entries.get(&id).map(|e| e.unique_id)
    }

    #[must_use]
    pub fn decoration_unique_id(&self, id: DecorationId) -> Option<u64> {
        self.decorations.entries.get(&id).map(|e| e.unique_id)
    }

    #[must_use]
    pub fn segment_unique_id(&self, segment: Segment) -> Option<u64> {
        self.segments.get(&segment).map(|e| e.unique_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logiksim_geometry::{Grid, Offset, Orientation, Part, Point, Rect, SegmentIndex, WireId};

    fn logicitem_data() -> LogicItemInsertData {
        let origin = Point::new(Grid::new(0).unwrap(), Grid::new(0).unwrap());
        let corner = Point::new(Grid::new(1).unwrap(), Grid::new(1).unwrap());
        LogicItemInsertData {
            position: origin,
            input_count: 1,
            output_count: 1,
            orientation: Orientation::Right,
            bounding_rect: Rect::new(origin, corner),
        }
    }

    #[test]
    fn create_insert_uninsert_delete_is_legal() {
        let mut v = MessageValidator::new();
        let id = LogicItemId::new(0);
        let data = logicitem_data();

        v.submit(&LayoutMessage::LogicItemCreated { logicitem_id: id }).unwrap();
        v.submit(&LayoutMessage::LogicItemInserted { logicitem_id: id, data }).unwrap();
        v.submit(&LayoutMessage::LogicItemUninserted { logicitem_id: id, data }).unwrap();
        v.submit(&LayoutMessage::LogicItemDeleted { logicitem_id: id }).unwrap();
        assert_eq!(v.logicitem_count(), 0);
    }

    #[test]
    fn deleting_before_uninserting_is_rejected() {
        let mut v = MessageValidator::new();
        let id = LogicItemId::new(0);
        let data = logicitem_data();

        v.submit(&LayoutMessage::LogicItemCreated { logicitem_id: id }).unwrap();
        v.submit(&LayoutMessage::LogicItemInserted { logicitem_id: id, data }).unwrap();
        assert_eq!(
            v.submit(&LayoutMessage::LogicItemDeleted { logicitem_id: id }),
            Err(ValidationError::AlreadyInserted)
        );
    }

    #[test]
    fn inserting_twice_is_rejected() {
        let mut v = MessageValidator::new();
        let id = LogicItemId::new(0);
        let data = logicitem_data();

        v.submit(&LayoutMessage::LogicItemCreated { logicitem_id: id }).unwrap();
        v.submit(&LayoutMessage::LogicItemInserted { logicitem_id: id, data }).unwrap();
        assert_eq!(
            v.submit(&LayoutMessage::LogicItemInserted { logicitem_id: id, data }),
            Err(ValidationError::AlreadyInserted)
        );
    }

    #[test]
    fn id_updated_moves_the_shadow_entry() {
        let mut v = MessageValidator::new();
        let old_id = LogicItemId::new(0);
        let new_id = LogicItemId::new(1);

        v.submit(&LayoutMessage::LogicItemCreated { logicitem_id: old_id }).unwrap();
        let unique_id = v.logicitem_unique_id(old_id).unwrap();
        v.submit(&LayoutMessage::LogicItemIdUpdated { old_logicitem_id: old_id, new_logicitem_id: new_id })
            .unwrap();

        assert_eq!(v.logicitem_unique_id(old_id), None);
        assert_eq!(v.logicitem_unique_id(new_id), Some(unique_id));
    }

    #[test]
    fn segment_part_move_out_of_range_is_rejected() {
        let mut v = MessageValidator::new();
        let segment = Segment::new(WireId::new(0), SegmentIndex::new(0));
        v.submit(&LayoutMessage::SegmentCreated { segment, length: 5 }).unwrap();

        let bad_part = Part::new(Offset::new(0), Offset::new(10)).unwrap();
        let result = v.submit(&LayoutMessage::SegmentPartMoved {
            source: crate::message::SegmentPart { segment, part: bad_part },
            destination: crate::message::SegmentPart { segment, part: bad_part },
        });
        assert_eq!(result, Err(ValidationError::PartOutOfRange));
    }

    #[test]
    fn uninserting_with_mismatched_data_is_rejected() {
        let mut v = MessageValidator::new();
        let id = LogicItemId::new(0);
        let data = logicitem_data();
        let mut other_data = data;
        other_data.input_count = 2;

        v.submit(&LayoutMessage::LogicItemCreated { logicitem_id: id }).unwrap();
        v.submit(&LayoutMessage::LogicItemInserted { logicitem_id: id, data }).unwrap();
        assert_eq!(
            v.submit(&LayoutMessage::LogicItemUninserted { logicitem_id: id, data: other_data }),
            Err(ValidationError::DataMismatch)
        );
    }
}
