// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bitset over the four [`DisplayState`] values.

use logiksim_layout::DisplayState;

bitflags::bitflags! {
    /// Which of the four display states appear among a set of elements.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DisplayStates: u8 {
        const TEMPORARY = 0b0001;
        const COLLIDING = 0b0010;
        const VALID     = 0b0100;
        const NORMAL    = 0b1000;
    }
}

impl DisplayStates {
    #[must_use]
    pub fn from_state(state: DisplayState) -> Self {
        match state {
            DisplayState::Temporary => Self::TEMPORARY,
            DisplayState::Colliding => Self::COLLIDING,
            DisplayState::Valid => Self::VALID,
            DisplayState::Normal => Self::NORMAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_state_maps_each_variant_to_its_own_bit() {
        assert_eq!(DisplayStates::from_state(DisplayState::Normal), DisplayStates::NORMAL);
        assert!(!DisplayStates::from_state(DisplayState::Normal).contains(DisplayStates::VALID));
    }

    #[test]
    fn union_combines_bits() {
        let both = DisplayStates::from_state(DisplayState::Valid) | DisplayStates::from_state(DisplayState::Normal);
        assert!(both.contains(DisplayStates::VALID));
        assert!(both.contains(DisplayStates::NORMAL));
        assert!(!both.contains(DisplayStates::TEMPORARY));
    }
}
