// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The three error classes the public editing API surfaces: bad caller
//! input, a primitive's own precondition failing, and a malformed save file.

use core::fmt;

/// An invalid argument a mutator rejects before touching the layout at all.
///
/// Distinct from [`StateViolation`]: these are caller mistakes detectable
/// from the arguments alone, not a primitive's internal invariant failing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditError {
    /// A required id (logic-item, decoration, selection, ...) was null.
    NullId,
    /// A wire line was diagonal or zero-length.
    NonOrthogonalLine,
    /// An inverter vector's length didn't match the port count it describes.
    InverterCountMismatch { expected: usize, found: usize },
    /// A `SelectionId` named no selection currently held by the registry.
    UnknownSelection,
    /// A clock-generator name exceeded the 100-character limit.
    ClockGeneratorNameTooLong { found: usize },
    /// A text-element's text exceeded the 10,000-character limit.
    TextTooLong { found: usize },
    /// A clock-generator timing field fell outside `[1 ns, 500 s]`.
    ClockTimingOutOfRange { field: &'static str },
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullId => write!(f, "a required id was null"),
            Self::NonOrthogonalLine => write!(f, "a wire line must be orthogonal and non-zero-length"),
            Self::InverterCountMismatch { expected, found } => {
                write!(f, "expected {expected} inverter flags, found {found}")
            }
            Self::UnknownSelection => write!(f, "selection id names no currently-held selection"),
            Self::ClockGeneratorNameTooLong { found } => {
                write!(f, "clock-generator name is {found} characters, limit is 100")
            }
            Self::TextTooLong { found } => {
                write!(f, "text-element text is {found} characters, limit is 10000")
            }
            Self::ClockTimingOutOfRange { field } => {
                write!(f, "clock-generator field {field} must lie in [1 ns, 500 s]")
            }
        }
    }
}

impl std::error::Error for EditError {}

/// A primitive's own precondition was violated: the caller passed a
/// structurally valid argument, but the layout was not in the state the
/// operation requires (e.g. `delete_temporary` on a non-temporary item).
///
/// In debug builds the underlying primitive already panics via `assert!`
/// before this type is ever constructed; `logiksim_core` only constructs
/// and returns it in release builds, where the same condition must not
/// abort the process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateViolation(pub(crate) &'static str);

impl fmt::Display for StateViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "state violation: {}", self.0)
    }
}

impl std::error::Error for StateViolation {}

/// Why loading a saved circuit failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadError {
    /// The caller's I/O layer could not open/read the source.
    FileOpen,
    /// The `base64(gzip(json))` envelope failed to base64-decode.
    Base64Decode,
    /// The gzip envelope failed to decompress.
    GzipDecompress,
    /// The decompressed bytes were not valid JSON, or didn't match the
    /// expected schema.
    JsonParse(String),
    /// The file's `version` is newer than this build understands.
    JsonVersion { found: i64, minimum_required: i64 },
    /// The leading bytes matched none of the known envelope signatures.
    UnknownFileFormat,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileOpen => write!(f, "could not open the circuit file"),
            Self::Base64Decode => write!(f, "base64 decoding failed"),
            Self::GzipDecompress => write!(f, "gzip decompression failed"),
            Self::JsonParse(msg) => write!(f, "json parse error: {msg}"),
            Self::JsonVersion { found, minimum_required } => {
                write!(f, "file version {found} requires app version {minimum_required} or newer")
            }
            Self::UnknownFileFormat => write!(f, "leading bytes matched no known envelope"),
        }
    }
}

impl std::error::Error for LoadError {}
