//! Converter configuration types
//!
//! The converter needs very little configuration: which TRC dialect to write,
//! how to treat short v2.1 payloads, and optionally where to put the output.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Target TRC file layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// TRC v1.3: minimal columns, no bus information
    #[default]
    V13,
    /// TRC v2.1: message numbers, relative offsets and bus labels
    V21,
}

impl Dialect {
    /// Value of the `;$FILEVERSION=` header entry
    pub fn file_version(&self) -> &'static str {
        match self {
            Dialect::V13 => "1.3",
            Dialect::V21 => "2.1",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TRC v{}", self.file_version())
    }
}

/// How the v2.1 converter treats a line that declares more data bytes than
/// it carries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadPolicy {
    /// Skip the line
    #[default]
    Strict,
    /// Emit the bytes that are present, keeping the declared length
    Lenient,
}

/// Configuration for a [`TrcConverter`](crate::TrcConverter)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Output dialect
    #[serde(default)]
    pub dialect: Dialect,

    /// Short-payload handling (v2.1 only)
    #[serde(default)]
    pub payload_policy: PayloadPolicy,

    /// Optional: write `.trc` files here instead of next to the input
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl ConverterConfig {
    /// Create a new configuration with default settings (v1.3, strict)
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: select the output dialect
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Builder method: select the short-payload policy
    pub fn with_payload_policy(mut self, policy: PayloadPolicy) -> Self {
        self.payload_policy = policy;
        self
    }

    /// Builder method: write output files into `dir`
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }
}
