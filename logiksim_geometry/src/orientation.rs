// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Logic-item orientation and per-segment-endpoint classification.

/// Orientation of a logic item, used to resolve which side its ports face.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Ports face right.
    Right,
    /// Ports face left.
    Left,
    /// Ports face up.
    Up,
    /// Ports face down.
    Down,
    /// No facing is meaningful (e.g. decorations).
    Undirected,
}

/// Classification of one endpoint of a wire segment.
///
/// Updated on insert/split/merge by the editing primitives ([J] in the
/// design); the segment tree itself never reclassifies an endpoint on its
/// own.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SegmentPointType {
    /// Connects to a logic-item input.
    Input,
    /// Connects to a logic-item output, or is a free dangling wire end.
    Output,
    /// Exactly two non-collinear segments meet here.
    CornerPoint,
    /// Three or more segments meet here.
    CrossPoint,
    /// A dangling end with no logic-item connection and no special role.
    ShadowPoint,
    /// Freshly created; not yet classified.
    NewUnknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_equality() {
        assert_eq!(Orientation::Right, Orientation::Right);
        assert_ne!(Orientation::Right, Orientation::Left);
    }
}
