// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `LogicItemStore`: struct-of-arrays storage for logic-items.

use hashbrown::HashMap;
use logiksim_geometry::{LogicItemId, Orientation, Point, Rect};
use smallvec::SmallVec;

use crate::types::{
    clamp_bounding_rect, ClockGeneratorAttributes, DisplayState, LogicItemDefinition,
    LogicItemType, PlacedLogicItem,
};

/// Stores the logic-item data of the layout.
///
/// Class invariants:
/// - All data vectors have the same length (`size()`).
/// - Input/output inverter vectors have length equal to the item's
///   input/output count, or are empty (meaning "all false").
/// - All bounding rects are representable on the grid.
#[derive(Clone, Debug, Default)]
pub struct LogicItemStore {
    types: Vec<LogicItemType>,
    input_counts: Vec<u8>,
    output_counts: Vec<u8>,
    orientations: Vec<Orientation>,
    sub_circuit_ids: Vec<i32>,
    input_inverters: Vec<SmallVec<[bool; 4]>>,
    output_inverters: Vec<SmallVec<[bool; 4]>>,
    positions: Vec<Point>,
    display_states: Vec<DisplayState>,
    bounding_rects: Vec<Rect>,
    clock_generator_attrs: HashMap<LogicItemId, ClockGeneratorAttributes>,
}

/// Default footprint for a newly-placed item, pending a real size
/// calculation supplied by a rendering/layout-info crate this repo does not
/// include. One grid unit keeps every bounding rect trivially representable.
fn default_footprint() -> Point {
    Point::new(logiksim_geometry::Grid::new(1).unwrap(), logiksim_geometry::Grid::new(1).unwrap())
}

impl LogicItemStore {
    /// Creates an empty store.
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
        self.types.capacity() * size_of::<LogicItemType>()
            + self.input_counts.capacity()
            + self.output_counts.capacity()
            + self.orientations.capacity() * size_of::<Orientation>()
            + self.sub_circuit_ids.capacity() * size_of::<i32>()
            + self.positions.capacity() * size_of::<Point>()
            + self.display_states.capacity() * size_of::<DisplayState>()
            + self.bounding_rects.capacity() * size_of::<Rect>()
    }

    /// Appends a new logic-item at `position`, in `display_state`, returning
    /// its freshly assigned id. Bounding rect is computed from a placeholder
    /// footprint; callers (editing primitives) reconcile it with the real
    /// layout-info calculation when one is wired in.
    pub fn add(
        &mut self,
        definition: LogicItemDefinition,
        position: Point,
        display_state: DisplayState,
    ) -> Option<LogicItemId> {
        let bounding_rect = clamp_bounding_rect(position, default_footprint())?;
        let id = LogicItemId::new(self.types.len());

        self.types.push(definition.logicitem_type);
        self.input_counts.push(definition.input_count);
        self.output_counts.push(definition.output_count);
        self.orientations.push(definition.orientation);
        self.sub_circuit_ids.push(definition.sub_circuit_id);
        self.input_inverters.push(definition.input_inverters);
        self.output_inverters.push(definition.output_inverters);
        self.positions.push(position);
        self.display_states.push(display_state);
        self.bounding_rects.push(bounding_rect);
        if let Some(attrs) = definition.attrs_clock_generator {
            self.clock_generator_attrs.insert(id, attrs);
        }

        Some(id)
    }

    /// Removes `id`, moving the last element into its place (swap-and-last).
    /// Returns the evicted item's full snapshot, for history, and the id the
    /// moved element used to have (`last_id`), so callers can remap
    /// references via an `IdUpdated` message.
    pub fn swap_and_delete(&mut self, id: LogicItemId) -> (PlacedLogicItem, LogicItemId) {
        let last_id = LogicItemId::new(self.types.len() - 1);
        let idx = id.index();

        let placed = PlacedLogicItem {
            definition: LogicItemDefinition {
                logicitem_type: self.types[idx],
                input_count: self.input_counts[idx],
                output_count: self.output_counts[idx],
                orientation: self.orientations[idx],
                sub_circuit_id: self.sub_circuit_ids[idx],
                input_inverters: self.input_inverters[idx].clone(),
                output_inverters: self.output_inverters[idx].clone(),
                attrs_clock_generator: self.clock_generator_attrs.get(&id).cloned(),
            },
            position: self.positions[idx],
            display_state: self.display_states[idx],
        };

        self.types.swap_remove(idx);
        self.input_counts.swap_remove(idx);
        self.output_counts.swap_remove(idx);
        self.orientations.swap_remove(idx);
        self.sub_circuit_ids.swap_remove(idx);
        self.input_inverters.swap_remove(idx);
        self.output_inverters.swap_remove(idx);
        self.positions.swap_remove(idx);
        self.display_states.swap_remove(idx);
        self.bounding_rects.swap_remove(idx);

        let moved = if id != last_id { self.clock_generator_attrs.remove(&last_id) } else { None };
        self.clock_generator_attrs.remove(&id);
        if let Some(attrs) = moved {
            self.clock_generator_attrs.insert(id, attrs);
        }

        (placed, last_id)
    }

    /// Swaps the storage slots of two items, without changing either's
    /// logical identity from the caller's point of view (the caller is
    /// expected to also remap both ids).
    pub fn swap_items(&mut self, id1: LogicItemId, id2: LogicItemId) {
        let (i, j) = (id1.index(), id2.index());
        self.types.swap(i, j);
        self.input_counts.swap(i, j);
        self.output_counts.swap(i, j);
        self.orientations.swap(i, j);
        self.sub_circuit_ids.swap(i, j);
        self.input_inverters.swap(i, j);
        self.output_inverters.swap(i, j);
        self.positions.swap(i, j);
        self.display_states.swap(i, j);
        self.bounding_rects.swap(i, j);

        let a = self.clock_generator_attrs.remove(&id1);
        let b = self.clock_generator_attrs.remove(&id2);
        if let Some(b) = b {
            self.clock_generator_attrs.insert(id1, b);
        }
        if let Some(a) = a {
            self.clock_generator_attrs.insert(id2, a);
        }
    }

    /// Reorders into a canonical form (sorted by position, then type) so two
    /// visually-equivalent layouts compare equal.
    pub fn normalize(&mut self) {
        let mut order: Vec<usize> = (0..self.types.len()).collect();
        order.sort_by_key(|&i| (self.positions[i], self.types[i] as u8 as i32));

        let old_ids: Vec<LogicItemId> = (0..self.types.len()).map(LogicItemId::new).collect();
        let mut new_store = Self::new();
        for &i in &order {
            let old_id = old_ids[i];
            let id = LogicItemId::new(new_store.types.len());
            new_store.types.push(self.types[i]);
            new_store.input_counts.push(self.input_counts[i]);
            new_store.output_counts.push(self.output_counts[i]);
            new_store.orientations.push(self.orientations[i]);
            new_store.sub_circuit_ids.push(self.sub_circuit_ids[i]);
            new_store.input_inverters.push(self.input_inverters[i].clone());
            new_store.output_inverters.push(self.output_inverters[i].clone());
            new_store.positions.push(self.positions[i]);
            new_store.display_states.push(self.display_states[i]);
            new_store.bounding_rects.push(self.bounding_rects[i]);
            if let Some(attrs) = self.clock_generator_attrs.get(&old_id) {
                new_store.clock_generator_attrs.insert(id, attrs.clone());
            }
        }
        *self = new_store;
    }

    #[must_use]
    pub fn logicitem_type(&self, id: LogicItemId) -> LogicItemType {
        self.types[id.index()]
    }

    #[must_use]
    pub fn input_count(&self, id: LogicItemId) -> u8 {
        self.input_counts[id.index()]
    }

    #[must_use]
    pub fn output_count(&self, id: LogicItemId) -> u8 {
        self.output_counts[id.index()]
    }

    #[must_use]
    pub fn orientation(&self, id: LogicItemId) -> Orientation {
        self.orientations[id.index()]
    }

    #[must_use]
    pub fn sub_circuit_id(&self, id: LogicItemId) -> i32 {
        self.sub_circuit_ids[id.index()]
    }

    #[must_use]
    pub fn input_inverters(&self, id: LogicItemId) -> &[bool] {
        &self.input_inverters[id.index()]
    }

    #[must_use]
    pub fn output_inverters(&self, id: LogicItemId) -> &[bool] {
        &self.output_inverters[id.index()]
    }

    #[must_use]
    pub fn position(&self, id: LogicItemId) -> Point {
        self.positions[id.index()]
    }

    #[must_use]
    pub fn display_state(&self, id: LogicItemId) -> DisplayState {
        self.display_states[id.index()]
    }

    #[must_use]
    pub fn bounding_rect(&self, id: LogicItemId) -> Rect {
        self.bounding_rects[id.index()]
    }

    #[must_use]
    pub fn attrs_clock_generator(&self, id: LogicItemId) -> Option<&ClockGeneratorAttributes> {
        self.clock_generator_attrs.get(&id)
    }

    #[must_use]
    pub fn input_inverted(&self, id: LogicItemId, input: usize) -> bool {
        self.input_inverters[id.index()].get(input).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn output_inverted(&self, id: LogicItemId, output: usize) -> bool {
        self.output_inverters[id.index()].get(output).copied().unwrap_or(false)
    }

    /// Moves the item to `position`, recomputing its bounding rect.
    pub fn set_position(&mut self, id: LogicItemId, position: Point) -> bool {
        let Some(rect) = clamp_bounding_rect(position, default_footprint()) else {
            return false;
        };
        let idx = id.index();
        self.positions[idx] = position;
        self.bounding_rects[idx] = rect;
        true
    }

    pub fn set_display_state(&mut self, id: LogicItemId, display_state: DisplayState) {
        self.display_states[id.index()] = display_state;
    }

    pub fn set_attrs_clock_generator(&mut self, id: LogicItemId, attrs: ClockGeneratorAttributes) {
        self.clock_generator_attrs.insert(id, attrs);
    }

    pub fn set_input_inverter(&mut self, id: LogicItemId, input: usize, value: bool) {
        let vec = &mut self.input_inverters[id.index()];
        if vec.is_empty() {
            vec.resize(self.input_counts[id.index()] as usize, false);
        }
        vec[input] = value;
    }

    pub fn set_output_inverter(&mut self, id: LogicItemId, output: usize, value: bool) {
        let vec = &mut self.output_inverters[id.index()];
        if vec.is_empty() {
            vec.resize(self.output_counts[id.index()] as usize, false);
        }
        vec[output] = value;
    }
}

impl PartialEq for LogicItemStore {
    fn eq(&self, other: &Self) -> bool {
        self.types == other.types
            && self.input_counts == other.input_counts
            && self.output_counts == other.output_counts
            && self.orientations == other.orientations
            && self.sub_circuit_ids == other.sub_circuit_ids
            && self.input_inverters == other.input_inverters
            && self.output_inverters == other.output_inverters
            && self.positions == other.positions
            && self.display_states == other.display_states
            && self.bounding_rects == other.bounding_rects
            && self.clock_generator_attrs == other.clock_generator_attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logiksim_geometry::Grid;

    fn sample_definition() -> LogicItemDefinition {
        LogicItemDefinition {
            logicitem_type: LogicItemType::And,
            input_count: 2,
            output_count: 1,
            orientation: Orientation::Right,
            sub_circuit_id: 0,
            input_inverters: SmallVec::new(),
            output_inverters: SmallVec::new(),
            attrs_clock_generator: None,
        }
    }

    fn p(x: i32, y: i32) -> Point {
        Point::new(Grid::new(x).unwrap(), Grid::new(y).unwrap())
    }

    #[test]
    fn add_assigns_dense_ids() {
        let mut store = LogicItemStore::new();
        let a = store.add(sample_definition(), p(0, 0), DisplayState::Temporary).unwrap();
        let b = store.add(sample_definition(), p(5, 0), DisplayState::Temporary).unwrap();
        assert_eq!(a, LogicItemId::new(0));
        assert_eq!(b, LogicItemId::new(1));
        assert_eq!(store.size(), 2);
    }

    #[test]
    fn swap_and_delete_moves_last_item_into_freed_slot() {
        let mut store = LogicItemStore::new();
        let a = store.add(sample_definition(), p(0, 0), DisplayState::Temporary).unwrap();
        let b = store.add(sample_definition(), p(5, 0), DisplayState::Temporary).unwrap();

        let (placed, moved_from) = store.swap_and_delete(a);
        assert_eq!(moved_from, b);
        assert_eq!(placed.position, p(0, 0));
        assert_eq!(store.size(), 1);
        assert_eq!(store.position(a), p(5, 0));
    }

    #[test]
    fn clock_generator_attrs_follow_their_item_through_swap_and_delete() {
        let mut def = sample_definition();
        def.logicitem_type = LogicItemType::ClockGenerator;
        def.attrs_clock_generator = Some(ClockGeneratorAttributes {
            name: "clk".into(),
            time_symmetric_ns: 10,
            time_on_ns: 10,
            time_off_ns: 10,
            is_symmetric: true,
            show_simulation_controls: false,
        });

        let mut store = LogicItemStore::new();
        let a = store.add(sample_definition(), p(0, 0), DisplayState::Temporary).unwrap();
        let b = store.add(def, p(5, 0), DisplayState::Temporary).unwrap();

        store.swap_and_delete(a);
        assert!(store.attrs_clock_generator(a).is_some());
        let _ = b;
    }

    #[test]
    fn swap_and_delete_of_the_last_item_drops_its_clock_generator_attrs() {
        let mut def = sample_definition();
        def.logicitem_type = LogicItemType::ClockGenerator;
        def.attrs_clock_generator = Some(ClockGeneratorAttributes {
            name: "clk".into(),
            time_symmetric_ns: 10,
            time_on_ns: 10,
            time_off_ns: 10,
            is_symmetric: true,
            show_simulation_controls: false,
        });

        let mut store = LogicItemStore::new();
        let a = store.add(def, p(0, 0), DisplayState::Temporary).unwrap();
        assert!(store.attrs_clock_generator(a).is_some());

        store.swap_and_delete(a);
        assert!(store.is_empty());
        assert!(store.attrs_clock_generator(a).is_none());
    }

    #[test]
    fn input_inverter_setter_materializes_lazily() {
        let mut store = LogicItemStore::new();
        let a = store.add(sample_definition(), p(0, 0), DisplayState::Temporary).unwrap();
        assert!(store.input_inverters(a).is_empty());
        store.set_input_inverter(a, 1, true);
        assert_eq!(store.input_inverters(a), [false, true]);
    }
}
