// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Connection indices: grid point to the port or wire end that occupies it.
//!
//! Four independent maps, one per combination of (logic-item, wire) x
//! (input, output). Editing primitives consult these to detect collisions
//! and to convert a wire endpoint between `output` and `input` when a
//! logic-item is inserted or uninserted over it.

use hashbrown::HashMap;

use logiksim_geometry::{ConnectionId, LogicItemId, Orientation, Point, Segment};

/// One entry of a connection map: which element occupies a grid point, its
/// local connection index on that element, and the facing direction of the
/// port (used to check whether two connections actually line up).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ConnectionEntry<Id> {
    pub id: Id,
    pub connection_id: ConnectionId,
    pub orientation: Orientation,
}

/// The four grid-point to port/endpoint maps that make up the connection
/// index.
#[derive(Clone, Debug, Default)]
pub struct ConnectionIndex {
    logicitem_input: HashMap<Point, ConnectionEntry<LogicItemId>>,
    logicitem_output: HashMap<Point, ConnectionEntry<LogicItemId>>,
    wire_input: HashMap<Point, ConnectionEntry<Segment>>,
    wire_output: HashMap<Point, ConnectionEntry<Segment>>,
}

impl ConnectionIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_logicitem_input(&mut self, point: Point, entry: ConnectionEntry<LogicItemId>) {
        self.logicitem_input.insert(point, entry);
    }

    pub fn insert_logicitem_output(&mut self, point: Point, entry: ConnectionEntry<LogicItemId>) {
        self.logicitem_output.insert(point, entry);
    }

    pub fn insert_wire_input(&mut self, point: Point, entry: ConnectionEntry<Segment>) {
        self.wire_input.insert(point, entry);
    }

    pub fn insert_wire_output(&mut self, point: Point, entry: ConnectionEntry<Segment>) {
        self.wire_output.insert(point, entry);
    }

    pub fn remove_logicitem_input(&mut self, point: Point) {
        self.logicitem_input.remove(&point);
    }

    pub fn remove_logicitem_output(&mut self, point: Point) {
        self.logicitem_output.remove(&point);
    }

    pub fn remove_wire_input(&mut self, point: Point) {
        self.wire_input.remove(&point);
    }

    pub fn remove_wire_output(&mut self, point: Point) {
        self.wire_output.remove(&point);
    }

    #[must_use]
    pub fn logicitem_input_at(&self, point: Point) -> Option<ConnectionEntry<LogicItemId>> {
        self.logicitem_input.get(&point).copied()
    }

    #[must_use]
    pub fn logicitem_output_at(&self, point: Point) -> Option<ConnectionEntry<LogicItemId>> {
        self.logicitem_output.get(&point).copied()
    }

    #[must_use]
    pub fn wire_input_at(&self, point: Point) -> Option<ConnectionEntry<Segment>> {
        self.wire_input.get(&point).copied()
    }

    #[must_use]
    pub fn wire_output_at(&self, point: Point) -> Option<ConnectionEntry<Segment>> {
        self.wire_output.get(&point).copied()
    }

    /// Returns `true` if a logic-item input and a logic-item output
    /// currently occupy the same point, or a wire input and wire output do
    /// -- the signature of a collision that must be resolved before an
    /// insertion can complete.
    #[must_use]
    pub fn has_collision_at(&self, point: Point) -> bool {
        (self.logicitem_input.contains_key(&point) && self.logicitem_output.contains_key(&point))
            || (self.wire_input.contains_key(&point) && self.wire_output.contains_key(&point))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.logicitem_input.is_empty()
            && self.logicitem_output.is_empty()
            && self.wire_input.is_empty()
            && self.wire_output.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logiksim_geometry::{Grid, SegmentIndex, WireId};

    fn p(x: i32, y: i32) -> Point {
        Point::new(Grid::new(x).unwrap(), Grid::new(y).unwrap())
    }

    #[test]
    fn insert_and_lookup_logicitem_input() {
        let mut index = ConnectionIndex::new();
        let entry = ConnectionEntry {
            id: LogicItemId::new(3),
            connection_id: ConnectionId::new(0),
            orientation: Orientation::Left,
        };
        index.insert_logicitem_input(p(1, 1), entry);
        assert_eq!(index.logicitem_input_at(p(1, 1)), Some(entry));
        assert_eq!(index.logicitem_input_at(p(0, 0)), None);
    }

    #[test]
    fn collision_detected_when_input_and_output_share_a_point() {
        let mut index = ConnectionIndex::new();
        let logicitem_entry = ConnectionEntry {
            id: LogicItemId::new(0),
            connection_id: ConnectionId::new(0),
            orientation: Orientation::Right,
        };
        let wire_entry = ConnectionEntry {
            id: Segment::new(WireId::new(2), SegmentIndex::new(0)),
            connection_id: ConnectionId::NULL,
            orientation: Orientation::Undirected,
        };
        index.insert_logicitem_input(p(0, 0), logicitem_entry);
        assert!(!index.has_collision_at(p(0, 0)));

        index.insert_wire_input(p(0, 0), wire_entry);
        index.insert_wire_output(p(0, 0), wire_entry);
        assert!(index.has_collision_at(p(0, 0)));
    }

    #[test]
    fn remove_clears_the_entry() {
        let mut index = ConnectionIndex::new();
        let entry = ConnectionEntry {
            id: LogicItemId::new(1),
            connection_id: ConnectionId::new(2),
            orientation: Orientation::Down,
        };
        index.insert_logicitem_output(p(2, 2), entry);
        index.remove_logicitem_output(p(2, 2));
        assert!(index.is_empty());
    }
}
