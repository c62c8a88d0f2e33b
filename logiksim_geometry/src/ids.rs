// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small-integer identifier types, each with a reserved "null" sentinel.
//!
//! Every id in this module is a thin `i32` wrapper: negative values (after
//! construction, always exactly `-1`) represent "no id", and
//! [`LogicItemId::MAX`]-style constants bound the dense id space. Unlike
//! `understory_box_tree::NodeId`, these ids carry no generation: the layout
//! store (`logiksim_layout`) renumbers on delete via swap-and-last rather
//! than reusing generational slots, and the key index
//! (`logiksim_messages::KeyIndex`) is what survives that renumbering.

/// Defines a dense, null-sentinel id type backed by `i32`.
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(i32);

        impl $name {
            /// The null id: no entity.
            pub const NULL: Self = Self(-1);

            /// Creates an id from a non-negative index.
            ///
            /// # Panics
            ///
            /// Panics if `index` does not fit in `i32`.
            #[must_use]
            pub fn new(index: usize) -> Self {
                Self(i32::try_from(index).expect("id index out of range"))
            }

            /// The largest representable id.
            #[must_use]
            pub const fn max() -> Self {
                Self(i32::MAX)
            }

            /// Returns `true` if this is not the null id.
            #[must_use]
            pub const fn is_valid(self) -> bool {
                self.0 >= 0
            }

            /// Returns the index for use with dense arrays.
            ///
            /// # Panics
            ///
            /// Panics if this is the null id.
            #[must_use]
            pub fn index(self) -> usize {
                assert!(self.is_valid(), "index() called on null id");
                self.0 as usize
            }

            /// Returns the raw value, including `-1` for null.
            #[must_use]
            pub const fn raw(self) -> i32 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", stringify!($name), self.0)
                } else {
                    write!(f, "{}(null)", stringify!($name))
                }
            }
        }
    };
}

entity_id! {
    /// Identifies a logic item in the layout store.
    LogicItemId
}
entity_id! {
    /// Identifies a decoration in the layout store.
    DecorationId
}
entity_id! {
    /// Identifies a wire (segment tree) in the layout store.
    WireId
}
entity_id! {
    /// Identifies one segment within a wire's segment tree.
    SegmentIndex
}
entity_id! {
    /// Identifies a connection point local to a logic item or wire endpoint.
    ConnectionId
}
entity_id! {
    /// Identifies a caller-owned tracked selection.
    SelectionId
}

impl WireId {
    /// Reserved id for the tree of not-yet-placed ("free floating") segments.
    pub const TEMPORARY: Self = Self(0);
    /// Reserved id for the tree of segments that currently collide.
    pub const COLLIDING: Self = Self(1);
    /// The first id available for a normally-inserted wire.
    pub const FIRST_INSERTED: Self = Self(2);

    /// Returns `true` if this id names one of the two reserved non-inserted
    /// trees ([`WireId::TEMPORARY`] or [`WireId::COLLIDING`]).
    #[must_use]
    pub const fn is_temporary_or_colliding(self) -> bool {
        self.0 == Self::TEMPORARY.0 || self.0 == Self::COLLIDING.0
    }

    /// Returns `true` if this id names a normally-inserted wire.
    #[must_use]
    pub const fn is_inserted(self) -> bool {
        self.0 >= Self::FIRST_INSERTED.0
    }
}

/// A segment: one straight piece of a wire, identified by the owning wire
/// and a dense index into its segment tree.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Segment {
    /// Owning wire.
    pub wire_id: WireId,
    /// Index within the wire's segment tree.
    pub segment_index: SegmentIndex,
}

impl Segment {
    /// Creates a segment reference.
    #[must_use]
    pub const fn new(wire_id: WireId, segment_index: SegmentIndex) -> Self {
        Self {
            wire_id,
            segment_index,
        }
    }

    /// Returns `true` if both the wire and segment index are non-null.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.wire_id.is_valid() && self.segment_index.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_invalid() {
        assert!(!LogicItemId::NULL.is_valid());
        assert!(LogicItemId::new(0).is_valid());
    }

    #[test]
    fn wire_id_reserved_roles() {
        assert!(WireId::TEMPORARY.is_temporary_or_colliding());
        assert!(WireId::COLLIDING.is_temporary_or_colliding());
        assert!(!WireId::FIRST_INSERTED.is_temporary_or_colliding());
        assert!(WireId::FIRST_INSERTED.is_inserted());
        assert!(!WireId::TEMPORARY.is_inserted());
    }

    #[test]
    fn segment_validity() {
        let s = Segment::new(WireId::new(2), SegmentIndex::new(0));
        assert!(s.is_valid());
        let s2 = Segment::new(WireId::NULL, SegmentIndex::new(0));
        assert!(!s2.is_valid());
    }
}
