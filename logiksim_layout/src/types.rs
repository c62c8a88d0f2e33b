// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small value types stored by the layout: element kinds, display state, and
//! the type-specific attribute blocks carried by some logic-items and
//! decorations.

use logiksim_geometry::{DecorationId, LogicItemId, Orientation, Point, Rect};
use smallvec::SmallVec;

/// The kind of a logic-item.
///
/// Sixteen variants, matching the serialized-format's `type` enum (spec
/// §6). There is no separate inverter gate; per-pin inversion is carried
/// by `input_inverters`/`output_inverters` on every variant instead.
/// `sub_circuit` is the only variant whose behavior is defined elsewhere
/// (in the owning `sub_circuit_id`); the rest are primitive gates and
/// fixed-function elements.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LogicItemType {
    /// Passes its single input through, optionally inverted per pin.
    Buffer,
    And,
    Or,
    Xor,
    /// User-toggleable constant output source.
    Button,
    /// Displays its single input as an on/off lamp.
    Led,
    /// Displays its inputs as an unsigned number.
    DisplayNumber,
    /// Displays its inputs as ASCII text.
    DisplayAscii,
    /// Periodic output generator; see `ClockGeneratorAttributes`.
    ClockGenerator,
    FlipFlopJk,
    ShiftRegister,
    LatchD,
    FlipFlopD,
    /// Master-slave D flip-flop.
    FlipFlopMsD,
    /// A named, separately-defined sub-circuit instantiated as a black box.
    SubCircuit,
    /// Placeholder consuming a wire's output value without driving anything.
    Placeholder,
}

impl LogicItemType {
    /// Returns `true` for [`LogicItemType::ClockGenerator`], the only
    /// variant carrying [`ClockGeneratorAttributes`].
    #[must_use]
    pub const fn has_clock_generator_attributes(self) -> bool {
        matches!(self, Self::ClockGenerator)
    }
}

/// Lifecycle state of a logic-item, decoration, or (structurally, via its
/// `wire_id`) a wire.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DisplayState {
    /// Free-floating, not yet checked for collisions.
    Temporary,
    /// Placed but possibly overlapping other elements.
    Colliding,
    /// Collision-free but only a part of an inserted wire (wires only).
    Valid,
    /// Fully and validly inserted.
    Normal,
}

/// Clock-generator timing configuration (spec §6).
///
/// Each duration is nanoseconds; the load path enforces
/// `1 ns <= duration <= 500 s` and `name.len() <= 100`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ClockGeneratorAttributes {
    pub name: String,
    pub time_symmetric_ns: i64,
    pub time_on_ns: i64,
    pub time_off_ns: i64,
    pub is_symmetric: bool,
    pub show_simulation_controls: bool,
}

/// The kind of a decoration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DecorationType {
    /// A freestanding label (see `TextElementAttributes`).
    TextElement,
}

/// Text-box attribute block, carried by [`DecorationType::TextElement`]
/// decorations (spec §6 / §11).
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct TextElementAttributes {
    /// At most 10,000 chars, enforced at load time.
    pub text: String,
    pub horizontal_alignment: HorizontalAlignment,
    pub font_style: FontStyle,
    pub text_color: TextColor,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

/// 8-bit RGB color for decoration text.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct TextColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Everything needed to place a fresh logic-item, independent of any id or
/// display state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogicItemDefinition {
    pub logicitem_type: LogicItemType,
    pub input_count: u8,
    pub output_count: u8,
    pub orientation: Orientation,
    pub sub_circuit_id: i32,
    pub input_inverters: SmallVec<[bool; 4]>,
    pub output_inverters: SmallVec<[bool; 4]>,
    pub attrs_clock_generator: Option<ClockGeneratorAttributes>,
}

/// Everything needed to place a fresh decoration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecorationDefinition {
    pub decoration_type: DecorationType,
    pub size: logiksim_geometry::Point,
    pub attrs_text_element: Option<TextElementAttributes>,
}

/// A full snapshot of one logic-item's stored fields, as evicted from the
/// store by `swap_and_delete`. History keeps this so a delete can be undone
/// by re-inserting it verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacedLogicItem {
    pub definition: LogicItemDefinition,
    pub position: Point,
    pub display_state: DisplayState,
}

/// A full snapshot of one decoration's stored fields, as evicted from the
/// store by `swap_and_delete`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacedDecoration {
    pub definition: DecorationDefinition,
    pub position: Point,
    pub display_state: DisplayState,
}

/// A reference to a logic-item or decoration's bounding rect, used by the
/// free-function getters that are polymorphic over element kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ElementId {
    LogicItem(LogicItemId),
    Decoration(DecorationId),
}

pub(crate) fn clamp_bounding_rect(position: Point, size: Point) -> Option<Rect> {
    let corner = Point::new(
        logiksim_geometry::Grid::new(position.x.value() + size.x.value())?,
        logiksim_geometry::Grid::new(position.y.value() + size.y.value())?,
    );
    Some(Rect::new(position, corner))
}
