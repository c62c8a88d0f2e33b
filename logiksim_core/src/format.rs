// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The saved-circuit JSON schema, its envelope auto-detection, and the
//! conversions between it and a live [`logiksim_editing::CircuitData`].
//!
//! Loading never touches base64 or gzip itself: [`detect_envelope`] only
//! classifies the leading bytes so a caller with I/O access can pick the
//! right decoder, then hand the resulting JSON text to [`load_from_json`].

use logiksim_geometry::{Grid, Orientation, OrderedLine, Point};
use logiksim_layout::{
    ClockGeneratorAttributes, DecorationDefinition, DecorationType, FontStyle,
    HorizontalAlignment, Layout, LogicItemDefinition, LogicItemType, TextColor,
    TextElementAttributes,
};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::LoadError;

/// Current schema version. Anything older or newer is rejected with
/// [`LoadError::JsonVersion`] rather than guessed at.
pub const CURRENT_VERSION: i64 = 200;

/// The minimum version this build accepts.
const MINIMUM_SUPPORTED_VERSION: i64 = 200;

const CLOCK_TIMING_MIN_NS: i64 = 1;
const CLOCK_TIMING_MAX_NS: i64 = 500_000_000_000;
pub(crate) const CLOCK_NAME_MAX_LEN: usize = 100;
pub(crate) const TEXT_ELEMENT_MAX_LEN: usize = 10_000;

/// Whether a clock-generator timing field lies in the `[1 ns, 500 s]`
/// window spec §6 requires. Shared with the Modifier facade's own
/// attribute-setting validation so both reject the same range.
#[must_use]
pub(crate) fn is_clock_timing_in_range(value: i64) -> bool {
    (CLOCK_TIMING_MIN_NS..=CLOCK_TIMING_MAX_NS).contains(&value)
}

/// Which wire format a blob of bytes starts with, sniffed from its leading
/// bytes alone (spec §6). Actual base64/gzip decoding is left to the caller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Envelope {
    Json,
    Gzip,
    Base64Gzip,
    Unknown,
}

/// Classifies `bytes` by its leading signature: `{`/`[` for plain JSON,
/// the gzip magic number `\x1F\x8B\x08`, or the `H4sI` prefix that
/// `base64(gzip(json))` always produces.
#[must_use]
pub fn detect_envelope(bytes: &[u8]) -> Envelope {
    if bytes.starts_with(b"{") || bytes.starts_with(b"[") {
        Envelope::Json
    } else if bytes.starts_with(&[0x1F, 0x8B, 0x08]) {
        Envelope::Gzip
    } else if bytes.starts_with(b"H4sI") {
        Envelope::Base64Gzip
    } else {
        Envelope::Unknown
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerializedPoint {
    pub x: i32,
    pub y: i32,
}

impl From<Point> for SerializedPoint {
    fn from(point: Point) -> Self {
        Self { x: point.x.value(), y: point.y.value() }
    }
}

impl SerializedPoint {
    fn to_point(self) -> Result<Point, LoadError> {
        let x = Grid::new(self.x).ok_or_else(|| LoadError::JsonParse("point x out of range".into()))?;
        let y = Grid::new(self.y).ok_or_else(|| LoadError::JsonParse("point y out of range".into()))?;
        Ok(Point::new(x, y))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SerializedOrientation {
    Right,
    Left,
    Up,
    Down,
    Undirected,
}

impl From<Orientation> for SerializedOrientation {
    fn from(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Right => Self::Right,
            Orientation::Left => Self::Left,
            Orientation::Up => Self::Up,
            Orientation::Down => Self::Down,
            Orientation::Undirected => Self::Undirected,
        }
    }
}

impl From<SerializedOrientation> for Orientation {
    fn from(orientation: SerializedOrientation) -> Self {
        match orientation {
            SerializedOrientation::Right => Self::Right,
            SerializedOrientation::Left => Self::Left,
            SerializedOrientation::Up => Self::Up,
            SerializedOrientation::Down => Self::Down,
            SerializedOrientation::Undirected => Self::Undirected,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SerializedLogicItemType {
    Buffer,
    And,
    Or,
    Xor,
    Button,
    Led,
    DisplayNumber,
    DisplayAscii,
    ClockGenerator,
    FlipFlopJk,
    ShiftRegister,
    LatchD,
    FlipFlopD,
    FlipFlopMsD,
    SubCircuit,
    Placeholder,
}

impl From<LogicItemType> for SerializedLogicItemType {
    fn from(kind: LogicItemType) -> Self {
        match kind {
            LogicItemType::Buffer => Self::Buffer,
            LogicItemType::And => Self::And,
            LogicItemType::Or => Self::Or,
            LogicItemType::Xor => Self::Xor,
            LogicItemType::Button => Self::Button,
            LogicItemType::Led => Self::Led,
            LogicItemType::DisplayNumber => Self::DisplayNumber,
            LogicItemType::DisplayAscii => Self::DisplayAscii,
            LogicItemType::ClockGenerator => Self::ClockGenerator,
            LogicItemType::FlipFlopJk => Self::FlipFlopJk,
            LogicItemType::ShiftRegister => Self::ShiftRegister,
            LogicItemType::LatchD => Self::LatchD,
            LogicItemType::FlipFlopD => Self::FlipFlopD,
            LogicItemType::FlipFlopMsD => Self::FlipFlopMsD,
            LogicItemType::SubCircuit => Self::SubCircuit,
            LogicItemType::Placeholder => Self::Placeholder,
        }
    }
}

impl From<SerializedLogicItemType> for LogicItemType {
    fn from(kind: SerializedLogicItemType) -> Self {
        match kind {
            SerializedLogicItemType::Buffer => Self::Buffer,
            SerializedLogicItemType::And => Self::And,
            SerializedLogicItemType::Or => Self::Or,
            SerializedLogicItemType::Xor => Self::Xor,
            SerializedLogicItemType::Button => Self::Button,
            SerializedLogicItemType::Led => Self::Led,
            SerializedLogicItemType::DisplayNumber => Self::DisplayNumber,
            SerializedLogicItemType::DisplayAscii => Self::DisplayAscii,
            SerializedLogicItemType::ClockGenerator => Self::ClockGenerator,
            SerializedLogicItemType::FlipFlopJk => Self::FlipFlopJk,
            SerializedLogicItemType::ShiftRegister => Self::ShiftRegister,
            SerializedLogicItemType::LatchD => Self::LatchD,
            SerializedLogicItemType::FlipFlopD => Self::FlipFlopD,
            SerializedLogicItemType::FlipFlopMsD => Self::FlipFlopMsD,
            SerializedLogicItemType::SubCircuit => Self::SubCircuit,
            SerializedLogicItemType::Placeholder => Self::Placeholder,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SerializedHorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
}

impl From<HorizontalAlignment> for SerializedHorizontalAlignment {
    fn from(value: HorizontalAlignment) -> Self {
        match value {
            HorizontalAlignment::Left => Self::Left,
            HorizontalAlignment::Center => Self::Center,
            HorizontalAlignment::Right => Self::Right,
        }
    }
}

impl From<SerializedHorizontalAlignment> for HorizontalAlignment {
    fn from(value: SerializedHorizontalAlignment) -> Self {
        match value {
            SerializedHorizontalAlignment::Left => Self::Left,
            SerializedHorizontalAlignment::Center => Self::Center,
            SerializedHorizontalAlignment::Right => Self::Right,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SerializedFontStyle {
    #[default]
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl From<FontStyle> for SerializedFontStyle {
    fn from(value: FontStyle) -> Self {
        match value {
            FontStyle::Regular => Self::Regular,
            FontStyle::Bold => Self::Bold,
            FontStyle::Italic => Self::Italic,
            FontStyle::BoldItalic => Self::BoldItalic,
        }
    }
}

impl From<SerializedFontStyle> for FontStyle {
    fn from(value: SerializedFontStyle) -> Self {
        match value {
            SerializedFontStyle::Regular => Self::Regular,
            SerializedFontStyle::Bold => Self::Bold,
            SerializedFontStyle::Italic => Self::Italic,
            SerializedFontStyle::BoldItalic => Self::BoldItalic,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SerializedTextColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl From<TextColor> for SerializedTextColor {
    fn from(value: TextColor) -> Self {
        Self { r: value.r, g: value.g, b: value.b }
    }
}

impl From<SerializedTextColor> for TextColor {
    fn from(value: SerializedTextColor) -> Self {
        Self { r: value.r, g: value.g, b: value.b }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerializedClockGeneratorAttributes {
    pub name: String,
    pub time_symmetric_ns: i64,
    pub time_on_ns: i64,
    pub time_off_ns: i64,
    pub is_symmetric: bool,
    pub show_simulation_controls: bool,
}

/// Checks the `[1 ns, 500 s]` window spec §6 requires of every
/// clock-generator timing field.
fn validate_clock_timing_ns(field: &'static str, value: i64) -> Result<(), LoadError> {
    if (CLOCK_TIMING_MIN_NS..=CLOCK_TIMING_MAX_NS).contains(&value) {
        Ok(())
    } else {
        Err(LoadError::JsonParse(format!("{field} must lie in [1 ns, 500 s], found {value}")))
    }
}

impl SerializedClockGeneratorAttributes {
    fn to_attrs(&self) -> Result<ClockGeneratorAttributes, LoadError> {
        if self.name.len() > CLOCK_NAME_MAX_LEN {
            return Err(LoadError::JsonParse(format!("clock-generator name exceeds {CLOCK_NAME_MAX_LEN} characters")));
        }
        validate_clock_timing_ns("time_symmetric_ns", self.time_symmetric_ns)?;
        validate_clock_timing_ns("time_on_ns", self.time_on_ns)?;
        validate_clock_timing_ns("time_off_ns", self.time_off_ns)?;
        Ok(ClockGeneratorAttributes {
            name: self.name.clone(),
            time_symmetric_ns: self.time_symmetric_ns,
            time_on_ns: self.time_on_ns,
            time_off_ns: self.time_off_ns,
            is_symmetric: self.is_symmetric,
            show_simulation_controls: self.show_simulation_controls,
        })
    }
}

impl From<&ClockGeneratorAttributes> for SerializedClockGeneratorAttributes {
    fn from(attrs: &ClockGeneratorAttributes) -> Self {
        Self {
            name: attrs.name.clone(),
            time_symmetric_ns: attrs.time_symmetric_ns,
            time_on_ns: attrs.time_on_ns,
            time_off_ns: attrs.time_off_ns,
            is_symmetric: attrs.is_symmetric,
            show_simulation_controls: attrs.show_simulation_controls,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerializedTextElementAttributes {
    pub text: String,
    #[serde(default)]
    pub horizontal_alignment: SerializedHorizontalAlignment,
    #[serde(default)]
    pub font_style: SerializedFontStyle,
    #[serde(default)]
    pub text_color: SerializedTextColor,
}

impl SerializedTextElementAttributes {
    fn to_attrs(&self) -> Result<TextElementAttributes, LoadError> {
        if self.text.len() > TEXT_ELEMENT_MAX_LEN {
            return Err(LoadError::JsonParse(format!("text-element text exceeds {TEXT_ELEMENT_MAX_LEN} characters")));
        }
        Ok(TextElementAttributes {
            text: self.text.clone(),
            horizontal_alignment: self.horizontal_alignment.into(),
            font_style: self.font_style.into(),
            text_color: self.text_color.into(),
        })
    }
}

impl From<&TextElementAttributes> for SerializedTextElementAttributes {
    fn from(attrs: &TextElementAttributes) -> Self {
        Self {
            text: attrs.text.clone(),
            horizontal_alignment: attrs.horizontal_alignment.into(),
            font_style: attrs.font_style.into(),
            text_color: attrs.text_color.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerializedLogicItem {
    #[serde(rename = "type")]
    pub logicitem_type: SerializedLogicItemType,
    pub input_count: u8,
    pub output_count: u8,
    #[serde(default)]
    pub input_inverters: Vec<bool>,
    #[serde(default)]
    pub output_inverters: Vec<bool>,
    pub position: SerializedPoint,
    pub orientation: SerializedOrientation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes_clock_generator: Option<SerializedClockGeneratorAttributes>,
}

impl SerializedLogicItem {
    fn to_definition(&self) -> Result<LogicItemDefinition, LoadError> {
        if self.input_inverters.len() != usize::from(self.input_count) && !self.input_inverters.is_empty() {
            return Err(LoadError::JsonParse("input_inverters length does not match input_count".into()));
        }
        if self.output_inverters.len() != usize::from(self.output_count) && !self.output_inverters.is_empty() {
            return Err(LoadError::JsonParse("output_inverters length does not match output_count".into()));
        }
        let attrs_clock_generator = match &self.attributes_clock_generator {
            Some(attrs) => Some(attrs.to_attrs()?),
            None => None,
        };
        Ok(LogicItemDefinition {
            logicitem_type: self.logicitem_type.into(),
            input_count: self.input_count,
            output_count: self.output_count,
            orientation: self.orientation.into(),
            sub_circuit_id: 0,
            input_inverters: SmallVec::from_vec(self.input_inverters.clone()),
            output_inverters: SmallVec::from_vec(self.output_inverters.clone()),
            attrs_clock_generator,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerializedDecoration {
    #[serde(rename = "type")]
    pub decoration_type: SerializedDecorationType,
    pub position: SerializedPoint,
    pub size: SerializedPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes_text_element: Option<SerializedTextElementAttributes>,
}

impl SerializedDecoration {
    fn to_definition(&self) -> Result<DecorationDefinition, LoadError> {
        let attrs_text_element = match &self.attributes_text_element {
            Some(attrs) => Some(attrs.to_attrs()?),
            None => None,
        };
        Ok(DecorationDefinition {
            decoration_type: self.decoration_type.into(),
            size: self.size.to_point()?,
            attrs_text_element,
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SerializedDecorationType {
    TextElement,
}

impl From<DecorationType> for SerializedDecorationType {
    fn from(value: DecorationType) -> Self {
        match value {
            DecorationType::TextElement => Self::TextElement,
        }
    }
}

impl From<SerializedDecorationType> for DecorationType {
    fn from(value: SerializedDecorationType) -> Self {
        match value {
            SerializedDecorationType::TextElement => Self::TextElement,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewPoint {
    pub device_scale: f64,
    pub grid_offset_x: f64,
    pub grid_offset_y: f64,
}

impl Default for ViewPoint {
    fn default() -> Self {
        Self { device_scale: 1.0, grid_offset_x: 0.0, grid_offset_y: 0.0 }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub simulation_time_rate_ns: i64,
    pub use_wire_delay: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { simulation_time_rate_ns: 1, use_wire_delay: false }
    }
}

/// The full on-disk representation of a circuit (spec §6).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedCircuit {
    pub version: i64,
    pub save_position: SerializedPoint,
    pub view_point: ViewPoint,
    pub simulation_config: SimulationConfig,
    pub logicitems: Vec<SerializedLogicItem>,
    pub decorations: Vec<SerializedDecoration>,
    pub wire_segments: Vec<[SerializedPoint; 2]>,
}

impl SavedCircuit {
    /// Builds a saved-circuit record from every inserted element of
    /// `layout`; temporary and colliding elements are not part of a
    /// persisted circuit and are skipped.
    #[must_use]
    pub fn from_layout(layout: &Layout, save_position: Point, view_point: ViewPoint, simulation_config: SimulationConfig) -> Self {
        let logicitems = logicitem_store_iter(layout)
            .filter(|&id| is_persisted_logicitem(layout, id))
            .map(|id| serialize_logicitem(layout, id))
            .collect();

        let decorations = decoration_store_iter(layout)
            .filter(|&id| is_persisted_decoration(layout, id))
            .map(|id| serialize_decoration(layout, id))
            .collect();

        let wire_segments = inserted_wire_ids(layout)
            .flat_map(|wire_id| layout.wires().segment_tree(wire_id).iter().map(|(_, info)| info.line()).collect::<Vec<_>>())
            .map(|line| [SerializedPoint::from(line.p0()), SerializedPoint::from(line.p1())])
            .collect();

        Self {
            version: CURRENT_VERSION,
            save_position: SerializedPoint::from(save_position),
            view_point,
            simulation_config,
            logicitems,
            decorations,
            wire_segments,
        }
    }

    /// Serializes to the on-disk JSON text, unwrapped (no envelope).
    ///
    /// # Panics
    ///
    /// Never, barring a `serde_json` bug: every field type here is a plain
    /// value with an infallible `Serialize` impl.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("SavedCircuit fields are all plainly serializable")
    }
}

fn is_persisted_logicitem(layout: &Layout, id: logiksim_geometry::LogicItemId) -> bool {
    matches!(layout.logicitems().display_state(id), logiksim_layout::DisplayState::Normal)
}

fn is_persisted_decoration(layout: &Layout, id: logiksim_geometry::DecorationId) -> bool {
    matches!(layout.decorations().display_state(id), logiksim_layout::DisplayState::Normal)
}

fn logicitem_store_iter(layout: &Layout) -> impl Iterator<Item = logiksim_geometry::LogicItemId> + '_ {
    (0..layout.logicitems().size()).map(logiksim_geometry::LogicItemId::new)
}

fn decoration_store_iter(layout: &Layout) -> impl Iterator<Item = logiksim_geometry::DecorationId> + '_ {
    (0..layout.decorations().size()).map(logiksim_geometry::DecorationId::new)
}

fn inserted_wire_ids(layout: &Layout) -> impl Iterator<Item = logiksim_geometry::WireId> + '_ {
    let first = logiksim_geometry::WireId::FIRST_INSERTED.index();
    (first..layout.wires().size()).map(logiksim_geometry::WireId::new)
}

fn serialize_logicitem(layout: &Layout, id: logiksim_geometry::LogicItemId) -> SerializedLogicItem {
    let store = layout.logicitems();
    SerializedLogicItem {
        logicitem_type: store.logicitem_type(id).into(),
        input_count: store.input_count(id),
        output_count: store.output_count(id),
        input_inverters: store.input_inverters(id).to_vec(),
        output_inverters: store.output_inverters(id).to_vec(),
        position: store.position(id).into(),
        orientation: store.orientation(id).into(),
        attributes_clock_generator: store.attrs_clock_generator(id).map(SerializedClockGeneratorAttributes::from),
    }
}

fn serialize_decoration(layout: &Layout, id: logiksim_geometry::DecorationId) -> SerializedDecoration {
    let store = layout.decorations();
    SerializedDecoration {
        decoration_type: store.decoration_type(id).into(),
        position: store.position(id).into(),
        size: store.size(id).into(),
        attributes_text_element: store.attrs_text_element(id).map(SerializedTextElementAttributes::from),
    }
}

/// Parses already-decoded JSON text into a [`SavedCircuit`], validating its
/// version and every clock-generator/text-element field against spec §6's
/// limits. `bytes` are never base64/gzip-decoded here: the caller is
/// expected to have run [`detect_envelope`] and done that step first.
pub fn load_from_json(json: &str) -> Result<SavedCircuit, LoadError> {
    let saved: SavedCircuit = serde_json::from_str(json).map_err(|err| LoadError::JsonParse(err.to_string()))?;
    if saved.version > CURRENT_VERSION || saved.version < MINIMUM_SUPPORTED_VERSION {
        return Err(LoadError::JsonVersion { found: saved.version, minimum_required: MINIMUM_SUPPORTED_VERSION });
    }
    for item in &saved.logicitems {
        item.to_definition()?;
    }
    for decoration in &saved.decorations {
        decoration.to_definition()?;
    }
    for [p0, p1] in &saved.wire_segments {
        let p0 = p0.to_point()?;
        let p1 = p1.to_point()?;
        if OrderedLine::new(p0, p1).is_none() {
            return Err(LoadError::JsonParse("wire_segments entry is not an orthogonal, non-zero-length line".into()));
        }
    }
    Ok(saved)
}

/// The validated, ready-to-place form of one saved logic-item: a
/// definition plus the position/orientation it should be created at.
pub struct LoadedLogicItem {
    pub definition: LogicItemDefinition,
    pub position: Point,
}

/// The validated, ready-to-place form of one saved decoration.
pub struct LoadedDecoration {
    pub definition: DecorationDefinition,
    pub position: Point,
}

impl SavedCircuit {
    /// Re-validates and converts every saved logic-item into placeable
    /// form. [`load_from_json`] already checked these fields once; this is
    /// exposed separately so a caller who built a `SavedCircuit` some other
    /// way (e.g. assembled in memory for copy/paste) still gets the same
    /// checks before placement.
    pub fn placeable_logicitems(&self) -> Result<Vec<LoadedLogicItem>, LoadError> {
        self.logicitems
            .iter()
            .map(|item| Ok(LoadedLogicItem { definition: item.to_definition()?, position: item.position.to_point()? }))
            .collect()
    }

    pub fn placeable_decorations(&self) -> Result<Vec<LoadedDecoration>, LoadError> {
        self.decorations
            .iter()
            .map(|decoration| Ok(LoadedDecoration { definition: decoration.to_definition()?, position: decoration.position.to_point()? }))
            .collect()
    }

    /// Every saved wire segment as an [`OrderedLine`], re-validated.
    pub fn placeable_wire_segments(&self) -> Result<Vec<OrderedLine>, LoadError> {
        self.wire_segments
            .iter()
            .map(|[p0, p1]| {
                let p0 = p0.to_point()?;
                let p1 = p1.to_point()?;
                OrderedLine::new(p0, p1).ok_or_else(|| LoadError::JsonParse("wire segment is not orthogonal".into()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logiksim_editing::{add_logicitem, CircuitData};
    use logiksim_editing::InsertionMode;
    use logiksim_geometry::{Grid, Orientation as GeoOrientation};

    fn p(x: i32, y: i32) -> Point {
        Point::new(Grid::new(x).unwrap(), Grid::new(y).unwrap())
    }

    fn sample_definition() -> LogicItemDefinition {
        LogicItemDefinition {
            logicitem_type: LogicItemType::And,
            input_count: 2,
            output_count: 1,
            orientation: GeoOrientation::Right,
            sub_circuit_id: 0,
            input_inverters: SmallVec::new(),
            output_inverters: SmallVec::new(),
            attrs_clock_generator: None,
        }
    }

    #[test]
    fn detect_envelope_recognizes_every_signature() {
        assert_eq!(detect_envelope(b"{\"version\":200}"), Envelope::Json);
        assert_eq!(detect_envelope(b"[1,2,3]"), Envelope::Json);
        assert_eq!(detect_envelope(&[0x1F, 0x8B, 0x08, 0]), Envelope::Gzip);
        assert_eq!(detect_envelope(b"H4sIAAAAAAAA"), Envelope::Base64Gzip);
        assert_eq!(detect_envelope(b"garbage"), Envelope::Unknown);
    }

    #[test]
    fn round_trips_an_inserted_logicitem_through_json() {
        let mut circuit = CircuitData::new();
        add_logicitem(&mut circuit, sample_definition(), p(2, 3), InsertionMode::InsertOrDiscard, None);

        let saved = SavedCircuit::from_layout(&circuit.layout, p(0, 0), ViewPoint::default(), SimulationConfig::default());
        assert_eq!(saved.logicitems.len(), 1);

        let json = saved.to_json();
        let loaded = load_from_json(&json).unwrap();
        assert_eq!(loaded, saved);

        let placed = loaded.placeable_logicitems().unwrap();
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].position, p(2, 3));
        assert_eq!(placed[0].definition.logicitem_type, LogicItemType::And);
    }

    #[test]
    fn rejects_a_future_version() {
        let json = r#"{"version":999,"save_position":{"x":0,"y":0},
            "view_point":{"device_scale":1.0,"grid_offset_x":0.0,"grid_offset_y":0.0},
            "simulation_config":{"simulation_time_rate_ns":1,"use_wire_delay":false},
            "logicitems":[],"decorations":[],"wire_segments":[]}"#;
        let err = load_from_json(json).unwrap_err();
        assert!(matches!(err, LoadError::JsonVersion { found: 999, .. }));
    }

    #[test]
    fn rejects_an_out_of_range_clock_timing() {
        let json = r#"{"version":200,"save_position":{"x":0,"y":0},
            "view_point":{"device_scale":1.0,"grid_offset_x":0.0,"grid_offset_y":0.0},
            "simulation_config":{"simulation_time_rate_ns":1,"use_wire_delay":false},
            "logicitems":[{"type":"clock_generator","input_count":0,"output_count":1,
                "position":{"x":0,"y":0},"orientation":"right",
                "attributes_clock_generator":{"name":"c","time_symmetric_ns":0,
                "time_on_ns":1,"time_off_ns":1,"is_symmetric":true,
                "show_simulation_controls":false}}],
            "decorations":[],"wire_segments":[]}"#;
        let err = load_from_json(json).unwrap_err();
        assert!(matches!(err, LoadError::JsonParse(_)));
    }

    #[test]
    fn rejects_a_diagonal_wire_segment() {
        let json = r#"{"version":200,"save_position":{"x":0,"y":0},
            "view_point":{"device_scale":1.0,"grid_offset_x":0.0,"grid_offset_y":0.0},
            "simulation_config":{"simulation_time_rate_ns":1,"use_wire_delay":false},
            "logicitems":[],"decorations":[],
            "wire_segments":[[{"x":0,"y":0},{"x":1,"y":1}]]}"#;
        let err = load_from_json(json).unwrap_err();
        assert!(matches!(err, LoadError::JsonParse(_)));
    }
}
