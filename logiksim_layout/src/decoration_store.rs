// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `DecorationStore`: struct-of-arrays storage for decorations.

use hashbrown::HashMap;
use logiksim_geometry::{DecorationId, Point, Rect};

use crate::types::{
    clamp_bounding_rect, DecorationDefinition, DecorationType, DisplayState, PlacedDecoration,
    TextElementAttributes,
};

/// Stores the decoration data of the layout.
///
/// Mirrors `LogicItemStore`'s shape: parallel arrays plus a sparse map for
/// the one type-specific attribute block ([`TextElementAttributes`]).
#[derive(Clone, Debug, Default)]
pub struct DecorationStore {
    types: Vec<DecorationType>,
    positions: Vec<Point>,
    sizes: Vec<Point>,
    display_states: Vec<DisplayState>,
    bounding_rects: Vec<Rect>,
    text_element_attrs: HashMap<DecorationId, TextElementAttributes>,
}

impl DecorationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    #[must_use]
    pub fn allocated_size(&self) -> usize {
        self.types.capacity()
            + self.positions.capacity() * size_of::<Point>()
            + self.sizes.capacity() * size_of::<Point>()
            + self.bounding_rects.capacity() * size_of::<Rect>()
    }

    pub fn add(
        &mut self,
        definition: DecorationDefinition,
        position: Point,
        display_state: DisplayState,
    ) -> Option<DecorationId> {
        let bounding_rect = clamp_bounding_rect(position, definition.size)?;
        let id = DecorationId::new(self.types.len());

        self.types.push(definition.decoration_type);
        self.positions.push(position);
        self.sizes.push(definition.size);
        self.display_states.push(display_state);
        self.bounding_rects.push(bounding_rect);
        if let Some(attrs) = definition.attrs_text_element {
            self.text_element_attrs.insert(id, attrs);
        }

        Some(id)
    }

    pub fn swap_and_delete(&mut self, id: DecorationId) -> (PlacedDecoration, DecorationId) {
        let last_id = DecorationId::new(self.types.len() - 1);
        let idx = id.index();

        let placed = PlacedDecoration {
            definition: DecorationDefinition {
                decoration_type: self.types[idx],
                size: self.sizes[idx],
                attrs_text_element: self.text_element_attrs.get(&id).cloned(),
            },
            position: self.positions[idx],
            display_state: self.display_states[idx],
        };

        self.types.swap_remove(idx);
        self.positions.swap_remove(idx);
        self.sizes.swap_remove(idx);
        self.display_states.swap_remove(idx);
        self.bounding_rects.swap_remove(idx);

        let moved = if id != last_id { self.text_element_attrs.remove(&last_id) } else { None };
        self.text_element_attrs.remove(&id);
        if let Some(attrs) = moved {
            self.text_element_attrs.insert(id, attrs);
        }

        (placed, last_id)
    }

    pub fn swap_items(&mut self, id1: DecorationId, id2: DecorationId) {
        let (i, j) = (id1.index(), id2.index());
        self.types.swap(i, j);
        self.positions.swap(i, j);
        self.sizes.swap(i, j);
        self.display_states.swap(i, j);
        self.bounding_rects.swap(i, j);

        let a = self.text_element_attrs.remove(&id1);
        let b = self.text_element_attrs.remove(&id2);
        if let Some(b) = b {
            self.text_element_attrs.insert(id1, b);
        }
        if let Some(a) = a {
            self.text_element_attrs.insert(id2, a);
        }
    }

    pub fn normalize(&mut self) {
        let mut order: Vec<usize> = (0..self.types.len()).collect();
        order.sort_by_key(|&i| self.positions[i]);

        let old_ids: Vec<DecorationId> = (0..self.types.len()).map(DecorationId::new).collect();
        let mut new_store = Self::new();
        for &i in &order {
            let old_id = old_ids[i];
            let id = DecorationId::new(new_store.types.len());
            new_store.types.push(self.types[i]);
            new_store.positions.push(self.positions[i]);
            new_store.sizes.push(self.sizes[i]);
            new_store.display_states.push(self.display_states[i]);
            new_store.bounding_rects.push(self.bounding_rects[i]);
            if let Some(attrs) = self.text_element_attrs.get(&old_id) {
                new_store.text_element_attrs.insert(id, attrs.clone());
            }
        }
        *self = new_store;
    }

    #[must_use]
    pub fn decoration_type(&self, id: DecorationId) -> DecorationType {
        self.types[id.index()]
    }

    #[must_use]
    pub fn position(&self, id: DecorationId) -> Point {
        self.positions[id.index()]
    }

    #[must_use]
    pub fn size(&self, id: DecorationId) -> Point {
        self.sizes[id.index()]
    }

    #[must_use]
    pub fn display_state(&self, id: DecorationId) -> DisplayState {
        self.display_states[id.index()]
    }

    #[must_use]
    pub fn bounding_rect(&self, id: DecorationId) -> Rect {
        self.bounding_rects[id.index()]
    }

    #[must_use]
    pub fn attrs_text_element(&self, id: DecorationId) -> Option<&TextElementAttributes> {
        self.text_element_attrs.get(&id)
    }

    pub fn set_position(&mut self, id: DecorationId, position: Point) -> bool {
        let Some(rect) = clamp_bounding_rect(position, self.sizes[id.index()]) else {
            return false;
        };
        let idx = id.index();
        self.positions[idx] = position;
        self.bounding_rects[idx] = rect;
        true
    }

    pub fn set_display_state(&mut self, id: DecorationId, display_state: DisplayState) {
        self.display_states[id.index()] = display_state;
    }

    pub fn set_attrs_text_element(&mut self, id: DecorationId, attrs: TextElementAttributes) {
        self.text_element_attrs.insert(id, attrs);
    }
}

impl PartialEq for DecorationStore {
    fn eq(&self, other: &Self) -> bool {
        self.types == other.types
            && self.positions == other.positions
            && self.sizes == other.sizes
            && self.display_states == other.display_states
            && self.bounding_rects == other.bounding_rects
            && self.text_element_attrs == other.text_element_attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logiksim_geometry::Grid;

    fn p(x: i32, y: i32) -> Point {
        Point::new(Grid::new(x).unwrap(), Grid::new(y).unwrap())
    }

    fn sample() -> DecorationDefinition {
        DecorationDefinition {
            decoration_type: DecorationType::TextElement,
            size: p(3, 2),
            attrs_text_element: Some(TextElementAttributes {
                text: "hello".into(),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn add_and_retrieve() {
        let mut store = DecorationStore::new();
        let id = store.add(sample(), p(0, 0), DisplayState::Temporary).unwrap();
        assert_eq!(store.attrs_text_element(id).unwrap().text, "hello");
        assert_eq!(store.bounding_rect(id), Rect::new(p(0, 0), p(3, 2)));
    }

    #[test]
    fn swap_and_delete_carries_attrs_with_the_moved_item() {
        let mut store = DecorationStore::new();
        let a = store.add(sample(), p(0, 0), DisplayState::Temporary).unwrap();
        let b = store.add(sample(), p(5, 0), DisplayState::Temporary).unwrap();

        let (_, moved_from) = store.swap_and_delete(a);
        assert_eq!(moved_from, b);
        assert_eq!(store.attrs_text_element(a).unwrap().text, "hello");
    }

    #[test]
    fn swap_and_delete_of_the_last_item_drops_its_text_attrs() {
        let mut store = DecorationStore::new();
        let a = store.add(sample(), p(0, 0), DisplayState::Temporary).unwrap();
        assert!(store.attrs_text_element(a).is_some());

        store.swap_and_delete(a);
        assert!(store.is_empty());
        assert!(store.attrs_text_element(a).is_none());
    }
}
