//! Core types for the TRC converter library
//!
//! This module defines the record that flows from a line parser to a record
//! formatter, the per-line skip reasons, and the file-level error type.

use std::fmt;
use std::num::{ParseFloatError, ParseIntError};
use std::path::PathBuf;

/// Result type for file-level converter operations
pub type Result<T> = std::result::Result<T, ConverterError>;

/// Result type for a single input line: the parsed/rendered value or the
/// reason the line was skipped
pub type LineResult<T> = std::result::Result<T, SkipReason>;

/// Payload bytes of a frame, as found in the source log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Contiguous hex digits, e.g. `DEADBEEF` (v1.3 input)
    Contiguous(String),
    /// One hex pair per token, e.g. `["DE", "AD"]` (v2.1 input)
    Bytes(Vec<String>),
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Contiguous(data) => f.write_str(data),
            Payload::Bytes(bytes) => f.write_str(&bytes.join(" ")),
        }
    }
}

/// A CAN frame parsed from one log line
///
/// Identifiers and payload text are kept exactly as they appear in the
/// source; nothing is normalised.
#[derive(Debug, Clone, PartialEq)]
pub struct CanFrameRecord {
    /// Capture time in seconds
    pub timestamp: f64,
    /// Bus/channel label (v2.1 only)
    pub bus: Option<char>,
    /// CAN identifier, verbatim
    pub can_id: String,
    /// Payload bytes
    pub payload: Payload,
    /// Byte count written to the length column
    pub length: usize,
}

/// Why an input line produced no output record
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SkipReason {
    #[error("expected at least {required} fields, found {found}")]
    TooFewFields { found: usize, required: usize },

    #[error("no '#' separator in frame token {0:?}")]
    NotADataFrame(String),

    #[error("timestamp {0:?} is not wrapped in parentheses")]
    MalformedTimestamp(String),

    #[error("invalid timestamp {token:?}: {source}")]
    InvalidTimestamp {
        token: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("timestamp {0} is not finite")]
    NonFiniteTimestamp(f64),

    #[error("frame token {0:?} must contain exactly one '#'")]
    MalformedFrameToken(String),

    #[error("data length {0:?} is not wrapped in brackets")]
    MalformedLength(String),

    #[error("invalid data length {token:?}: {source}")]
    InvalidLength {
        token: String,
        #[source]
        source: ParseIntError,
    },

    #[error("declared {declared} data bytes but only {available} present")]
    PayloadShortfall { declared: usize, available: usize },
}

impl SkipReason {
    /// True for lines that simply are not frame lines (headers, comments,
    /// blank lines), as opposed to frame lines that failed to parse
    pub fn is_not_a_frame(&self) -> bool {
        matches!(
            self,
            SkipReason::TooFewFields { .. } | SkipReason::NotADataFrame(_)
        )
    }
}

/// Errors that abort a whole file conversion
#[derive(Debug, thiserror::Error)]
pub enum ConverterError {
    #[error("Failed to open input file {path:?}: {source}")]
    OpenInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create output file {path:?}: {source}")]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read input: {0}")]
    Read(#[source] std::io::Error),

    #[error("Failed to write output: {0}")]
    Write(#[source] std::io::Error),

    #[error("Output path {0:?} is the input file itself")]
    OutputIsInput(PathBuf),
}
