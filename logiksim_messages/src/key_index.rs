// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `KeyIndex<Id>`: a bidirectional id ↔ stable-key map.
//!
//! Ids get renumbered whenever a store does a swap-and-delete; a `Key` never
//! changes once assigned. History records keys instead of raw ids so that an
//! undo/redo a long time later still targets the right entity even if ids
//! have been reshuffled by unrelated deletes in between.

use hashbrown::HashMap;

/// An opaque, monotonically-increasing stable identifier.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key(u64);

impl Key {
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Bidirectionally maps one entity-id type to stable [`Key`]s.
///
/// Generic over `Id` so the same implementation backs the logic-item,
/// decoration and segment key indices without duplication.
#[derive(Clone, Debug)]
pub struct KeyIndex<Id> {
    next_key: u64,
    id_to_key: HashMap<Id, Key>,
    key_to_id: HashMap<Key, Id>,
}

impl<Id> Default for KeyIndex<Id> {
    fn default() -> Self {
        Self {
            next_key: 0,
            id_to_key: HashMap::new(),
            key_to_id: HashMap::new(),
        }
    }
}

impl<Id> KeyIndex<Id>
where
    Id: Copy + Eq + core::hash::Hash,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a fresh key to a newly-created id. Call this when handling a
    /// `*Created` message.
    pub fn insert(&mut self, id: Id) -> Key {
        let key = Key(self.next_key);
        self.next_key += 1;
        self.id_to_key.insert(id, key);
        self.key_to_id.insert(key, id);
        key
    }

    /// Binds `id` to a specific `key` rather than assigning a fresh one.
    /// Used when replaying history re-creates an entity that must keep
    /// answering to the key earlier records in the same undo/redo group
    /// still reference, instead of the key `insert` would otherwise hand
    /// out. Drops any key `id` is currently bound to first.
    pub fn insert_with_key(&mut self, id: Id, key: Key) {
        if let Some(old_key) = self.id_to_key.remove(&id) {
            self.key_to_id.remove(&old_key);
        }
        self.id_to_key.insert(id, key);
        self.key_to_id.insert(key, id);
        self.next_key = self.next_key.max(key.0 + 1);
    }

    /// Renames `old_id`'s key to `new_id`, keeping the key itself stable.
    /// Call this when handling an `*IdUpdated` message.
    pub fn rename(&mut self, old_id: Id, new_id: Id) {
        if let Some(key) = self.id_to_key.remove(&old_id) {
            self.id_to_key.insert(new_id, key);
            self.key_to_id.insert(key, new_id);
        }
    }

    /// Removes `id`'s key entirely. Call this when handling a `*Deleted`
    /// message.
    pub fn remove(&mut self, id: Id) {
        if let Some(key) = self.id_to_key.remove(&id) {
            self.key_to_id.remove(&key);
        }
    }

    #[must_use]
    pub fn key_of(&self, id: Id) -> Option<Key> {
        self.id_to_key.get(&id).copied()
    }

    #[must_use]
    pub fn id_of(&self, key: Key) -> Option<Id> {
        self.key_to_id.get(&key).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.id_to_key.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id_to_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logiksim_geometry::LogicItemId;

    #[test]
    fn insert_assigns_monotonically_increasing_keys() {
        let mut index: KeyIndex<LogicItemId> = KeyIndex::new();
        let k0 = index.insert(LogicItemId::new(0));
        let k1 = index.insert(LogicItemId::new(1));
        assert!(k0.value() < k1.value());
    }

    #[test]
    fn rename_preserves_the_key_across_an_id_swap() {
        let mut index: KeyIndex<LogicItemId> = KeyIndex::new();
        let id0 = LogicItemId::new(0);
        let id1 = LogicItemId::new(1);
        let key = index.insert(id0);

        // id1's slot got swapped into id0's place (id0 was deleted elsewhere).
        index.rename(id0, id1);

        assert_eq!(index.key_of(id1), Some(key));
        assert_eq!(index.key_of(id0), None);
        assert_eq!(index.id_of(key), Some(id1));
    }

    #[test]
    fn insert_with_key_rebinds_id_to_the_given_key_instead_of_a_fresh_one() {
        let mut index: KeyIndex<LogicItemId> = KeyIndex::new();
        let deleted_key = index.insert(LogicItemId::new(0));
        index.remove(LogicItemId::new(0));

        let recreated = LogicItemId::new(0);
        index.insert_with_key(recreated, deleted_key);

        assert_eq!(index.key_of(recreated), Some(deleted_key));
        assert_eq!(index.id_of(deleted_key), Some(recreated));

        let next = index.insert(LogicItemId::new(1));
        assert!(next.value() > deleted_key.value());
    }

    #[test]
    fn remove_drops_both_directions() {
        let mut index: KeyIndex<LogicItemId> = KeyIndex::new();
        let id = LogicItemId::new(0);
        let key = index.insert(id);
        index.remove(id);
        assert_eq!(index.key_of(id), None);
        assert_eq!(index.id_of(key), None);
    }
}
