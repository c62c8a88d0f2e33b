// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial and connection indices over an inserted layout.
//!
//! Both indices are kept exact purely by consuming the message stream a
//! layout store emits; they read the layout itself only once, to bootstrap
//! from a pre-existing one via [`LayoutIndex::from_layout`].

mod connection;
mod spatial;

pub use connection::{ConnectionEntry, ConnectionIndex};
pub use spatial::{
    all_same_wire_id, get_segment_count, get_unique_wire_id, ElementRef, QueriedSegments, SpatialIndex,
};

use logiksim_layout::Layout;
use logiksim_messages::LayoutMessage;

/// Bundles the spatial and connection indices that together let editing
/// primitives answer "what's here" without re-scanning the layout.
#[derive(Clone, Debug, Default)]
pub struct LayoutIndex {
    spatial: SpatialIndex,
    connection: ConnectionIndex,
}

impl LayoutIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_layout(layout: &Layout) -> Self {
        Self {
            spatial: SpatialIndex::from_layout(layout),
            connection: ConnectionIndex::new(),
        }
    }

    #[must_use]
    pub fn spatial(&self) -> &SpatialIndex {
        &self.spatial
    }

    #[must_use]
    pub fn connection(&self) -> &ConnectionIndex {
        &self.connection
    }

    pub fn connection_mut(&mut self) -> &mut ConnectionIndex {
        &mut self.connection
    }

    /// Folds one layout message into both indices.
    ///
    /// The connection index is not self-maintaining from the message stream
    /// the way the spatial index is: its entries depend on per-connection
    /// geometry (port positions derived from a logic-item's definition,
    /// endpoint roles) that the editing primitives compute and push in
    /// directly via [`connection_mut`](Self::connection_mut). `submit` only
    /// keeps the spatial index current.
    pub fn submit(&mut self, message: &LayoutMessage) {
        self.spatial.submit(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_index_is_empty() {
        let index = LayoutIndex::new();
        assert!(index.spatial().is_empty());
        assert!(index.connection().is_empty());
    }

    #[test]
    fn from_layout_bootstraps_an_empty_layout_to_an_empty_index() {
        let layout = Layout::new();
        let index = LayoutIndex::from_layout(&layout);
        assert!(index.spatial().is_empty());
    }
}
