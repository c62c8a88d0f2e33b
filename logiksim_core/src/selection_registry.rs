// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A registry of named [`Selection`]s addressed by [`SelectionId`], for
//! callers that need a handle surviving across several edits rather than
//! rebuilding a selection from ids after every call. Mirrors the scoped
//! `create_selection`/`destroy_selection` handle the original mouse-logic
//! and clipboard code acquires for the duration of one operation and
//! releases on every exit path.

use hashbrown::HashMap;
use logiksim_geometry::SelectionId;
use logiksim_selection::Selection;

#[derive(Clone, Debug, Default)]
pub(crate) struct SelectionRegistry {
    next_index: usize,
    selections: HashMap<SelectionId, Selection>,
}

impl SelectionRegistry {
    pub(crate) fn create(&mut self) -> SelectionId {
        let id = SelectionId::new(self.next_index);
        self.next_index += 1;
        self.selections.insert(id, Selection::new());
        id
    }

    pub(crate) fn destroy(&mut self, id: SelectionId) {
        self.selections.remove(&id);
    }

    pub(crate) fn exists(&self, id: SelectionId) -> bool {
        self.selections.contains_key(&id)
    }

    pub(crate) fn get(&self, id: SelectionId) -> Option<&Selection> {
        self.selections.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: SelectionId) -> Option<&mut Selection> {
        self.selections.get_mut(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_selections_are_distinct_and_start_empty() {
        let mut registry = SelectionRegistry::default();
        let a = registry.create();
        let b = registry.create();
        assert_ne!(a, b);
        assert!(registry.get(a).unwrap().is_empty());
        assert!(registry.get(b).unwrap().is_empty());
    }

    #[test]
    fn destroy_makes_a_selection_unreachable() {
        let mut registry = SelectionRegistry::default();
        let id = registry.create();
        registry.destroy(id);
        assert!(!registry.exists(id));
        assert!(registry.get(id).is_none());
    }
}
