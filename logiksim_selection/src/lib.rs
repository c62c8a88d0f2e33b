// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A selection of logic-items, decorations and wire-segment parts drawn
//! from a [`logiksim_layout::Layout`], plus the free functions that relate
//! the two.

mod display_states;
mod free_functions;
mod selection;

pub use display_states::DisplayStates;
pub use free_functions::{
    add_segment, add_segment_part, add_segment_tree, all_normal_display_state,
    anything_colliding, anything_temporary, anything_valid, display_states, get_lines,
    get_single_decoration, get_single_logicitem, get_single_segment, has_decorations,
    has_logicitems, is_selected, is_valid_selection, remove_segment, remove_segment_part,
    remove_segment_tree, toggle_segment_part,
};
pub use selection::Selection;
