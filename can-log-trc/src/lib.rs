//! CAN Log to TRC Converter Library
//!
//! Converts textual CAN log captures (one timestamped frame per line) into
//! PCAN TRC trace files.
//!
//! # Dialects
//!
//! - **TRC v1.3** - `(ts) iface ID#DATA` input, minimal output columns
//! - **TRC v2.1** - bus-annotated input with a bracketed data length, numbered
//!   rows timed relative to the first frame
//!
//! Malformed lines are logged and skipped; only I/O failures abort a
//! conversion.
//!
//! # Example Usage
//!
//! ```no_run
//! use can_log_trc::{ConverterConfig, Dialect, TrcConverter};
//! use std::path::Path;
//!
//! let config = ConverterConfig::new().with_dialect(Dialect::V13);
//! let converter = TrcConverter::new(config);
//!
//! match converter.convert(Path::new("candump.log")) {
//!     Ok(summary) => println!("Wrote {:?}", summary.output_path),
//!     Err(e) => eprintln!("Conversion failed: {}", e),
//! }
//! ```

// Public modules
pub mod config;
pub mod converter;
pub mod formats;
pub mod types;

// Re-export main types for convenience
pub use config::{ConverterConfig, Dialect, PayloadPolicy};
pub use converter::{resolved_path, ConversionSummary, LineStats, TrcConverter, TRC_EXTENSION};
pub use formats::{ConversionSession, LineConverter, V13Converter, V21Converter};
pub use types::{CanFrameRecord, ConverterError, LineResult, Payload, Result, SkipReason};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
