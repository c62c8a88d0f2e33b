// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The closed set of layout change records.
//!
//! Every mutation the layout store makes is announced as one of these
//! variants, in the order described on [`LayoutMessage`]. Downstream
//! consumers (spatial/connection indices, selections, the message
//! validator) never read the layout directly except to bootstrap from an
//! existing one; they reconstruct everything they need from this stream.

use logiksim_geometry::{DecorationId, LogicItemId, OrderedLine, Point, Rect, Segment, SegmentPointType};

/// Snapshot of the data needed to validate/locate an inserted logic-item,
/// carried by the `*Inserted`/`*Uninserted` messages.
///
/// This is deliberately smaller than the full `LogicItemDefinition`: it is
/// the subset other components (the message validator, the spatial index)
/// need without depending on `logiksim_layout`. `bounding_rect` is the
/// layout store's own computed footprint at insertion time, so consumers
/// never have to re-derive item geometry from type/orientation themselves.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LogicItemInsertData {
    pub position: Point,
    pub input_count: u8,
    pub output_count: u8,
    pub orientation: logiksim_geometry::Orientation,
    pub bounding_rect: Rect,
}

/// Snapshot of the data needed to validate/locate an inserted decoration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DecorationInsertData {
    pub position: Point,
    pub size: Point,
    pub bounding_rect: Rect,
}

/// A segment plus the sub-interval of it a message concerns.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SegmentPart {
    pub segment: Segment,
    pub part: logiksim_geometry::Part,
}

/// A dependency-free copy of a segment's geometry and endpoint
/// classification.
///
/// Messages deliberately don't depend on `logiksim_segment_tree` (that
/// crate depends on `logiksim_parts` for valid-part tracking this stream
/// has no use for); the line and endpoint types are carried verbatim here
/// instead.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SegmentInfoSnapshot {
    pub line: OrderedLine,
    pub p0_type: SegmentPointType,
    pub p1_type: SegmentPointType,
}

/// The closed set of layout change records (spec component G).
///
/// # Ordering rules
///
/// For any one edit: a `Created` precedes the matching `Inserted`; an
/// `Uninserted` precedes the matching `Deleted`; an `EndPointsUpdated`
/// always falls between an `Inserted` and the next `Uninserted` of the same
/// segment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutMessage {
    LogicItemCreated {
        logicitem_id: LogicItemId,
    },
    LogicItemIdUpdated {
        old_logicitem_id: LogicItemId,
        new_logicitem_id: LogicItemId,
    },
    LogicItemDeleted {
        logicitem_id: LogicItemId,
    },

    LogicItemInserted {
        logicitem_id: LogicItemId,
        data: LogicItemInsertData,
    },
    InsertedLogicItemIdUpdated {
        old_logicitem_id: LogicItemId,
        new_logicitem_id: LogicItemId,
        data: LogicItemInsertData,
    },
    LogicItemUninserted {
        logicitem_id: LogicItemId,
        data: LogicItemInsertData,
    },

    DecorationCreated {
        decoration_id: DecorationId,
    },
    DecorationIdUpdated {
        old_decoration_id: DecorationId,
        new_decoration_id: DecorationId,
    },
    DecorationDeleted {
        decoration_id: DecorationId,
    },

    DecorationInserted {
        decoration_id: DecorationId,
        data: DecorationInsertData,
    },
    InsertedDecorationIdUpdated {
        old_decoration_id: DecorationId,
        new_decoration_id: DecorationId,
        data: DecorationInsertData,
    },
    DecorationUninserted {
        decoration_id: DecorationId,
        data: DecorationInsertData,
    },

    SegmentCreated {
        segment: Segment,
        /// The segment's full length at creation time, so the message
        /// validator can seed its notion of "parts that fit this segment"
        /// without depending on the segment tree.
        length: u32,
    },
    SegmentIdUpdated {
        old_segment: Segment,
        new_segment: Segment,
    },
    SegmentPartMoved {
        source: SegmentPart,
        destination: SegmentPart,
    },
    SegmentPartDeleted {
        segment_part: SegmentPart,
    },

    SegmentInserted {
        segment: Segment,
        segment_info: SegmentInfoSnapshot,
    },
    InsertedSegmentIdUpdated {
        old_segment: Segment,
        new_segment: Segment,
        segment_info: SegmentInfoSnapshot,
    },
    InsertedEndPointsUpdated {
        segment: Segment,
        old_segment_info: SegmentInfoSnapshot,
        new_segment_info: SegmentInfoSnapshot,
    },
    SegmentUninserted {
        segment: Segment,
        segment_info: SegmentInfoSnapshot,
    },
}

impl LayoutMessage {
    /// Returns the logic-item id this message concerns, if any.
    #[must_use]
    pub fn logicitem_id(&self) -> Option<LogicItemId> {
        match *self {
            Self::LogicItemCreated { logicitem_id }
            | Self::LogicItemDeleted { logicitem_id }
            | Self::LogicItemInserted { logicitem_id, .. }
            | Self::LogicItemUninserted { logicitem_id, .. } => Some(logicitem_id),
            Self::LogicItemIdUpdated { new_logicitem_id, .. }
            | Self::InsertedLogicItemIdUpdated { new_logicitem_id, .. } => Some(new_logicitem_id),
            _ => None,
        }
    }

    /// Returns the segment this message concerns, if any.
    #[must_use]
    pub fn segment(&self) -> Option<Segment> {
        match *self {
            Self::SegmentCreated { segment, .. }
            | Self::SegmentInserted { segment, .. }
            | Self::InsertedEndPointsUpdated { segment, .. }
            | Self::SegmentUninserted { segment, .. } => Some(segment),
            Self::SegmentIdUpdated { new_segment, .. }
            | Self::InsertedSegmentIdUpdated { new_segment, .. } => Some(new_segment),
            Self::SegmentPartMoved { destination, .. } => Some(destination.segment),
            Self::SegmentPartDeleted { segment_part } => Some(segment_part.segment),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logicitem_id_extracts_from_relevant_variants() {
        let id = LogicItemId::new(3);
        let msg = LayoutMessage::LogicItemCreated { logicitem_id: id };
        assert_eq!(msg.logicitem_id(), Some(id));

        let msg = LayoutMessage::DecorationCreated { decoration_id: DecorationId::new(0) };
        assert_eq!(msg.logicitem_id(), None);
    }

    #[test]
    fn segment_extracts_the_destination_of_a_part_move() {
        use logiksim_geometry::{Offset, Part, SegmentIndex, WireId};

        let src_segment = Segment::new(WireId::new(2), SegmentIndex::new(0));
        let dst_segment = Segment::new(WireId::new(3), SegmentIndex::new(1));
        let part = Part::new(Offset::new(0), Offset::new(5)).unwrap();

        let msg = LayoutMessage::SegmentPartMoved {
            source: SegmentPart { segment: src_segment, part },
            destination: SegmentPart { segment: dst_segment, part },
        };
        assert_eq!(msg.segment(), Some(dst_segment));
    }
}
