//! TRC v1.3 writer
//!
//! Input lines look like `(1700000000.123456) can0 123#DEADBEEF`. Each frame
//! becomes one line of the form
//!
//! ```text
//! 1700000000123 (1700000000.123) Rx 123 - 4 DEADBEEF
//! ```
//!
//! There is no state between lines.

use super::{parse_timestamp, LineConverter};
use crate::types::{CanFrameRecord, LineResult, Payload, SkipReason};

/// Static v1.3 header
pub const HEADER: &str = ";$FILEVERSION=1.3\n\
;$STARTTIME=0\n\
;$COLUMNS=N,Time,Type,ID,Length,Data\n\
\n";

const MIN_FIELDS: usize = 3;

/// Parse one log line into a frame record
pub fn parse_line(line: &str) -> LineResult<CanFrameRecord> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < MIN_FIELDS {
        return Err(SkipReason::TooFewFields {
            found: parts.len(),
            required: MIN_FIELDS,
        });
    }

    let frame_token = parts[2];
    if !frame_token.contains('#') {
        return Err(SkipReason::NotADataFrame(frame_token.to_string()));
    }

    let timestamp = parse_timestamp(parts[0])?;

    let (can_id, data) = match frame_token.split_once('#') {
        Some((id, data)) if !data.contains('#') => (id, data),
        _ => return Err(SkipReason::MalformedFrameToken(frame_token.to_string())),
    };

    // Odd digit counts drop the trailing nibble
    let length = data.chars().count() / 2;

    Ok(CanFrameRecord {
        timestamp,
        bus: None,
        can_id: can_id.to_string(),
        payload: Payload::Contiguous(data.to_string()),
        length,
    })
}

/// Render a frame record as a v1.3 line
pub fn format_record(record: &CanFrameRecord) -> String {
    let millis = (record.timestamp * 1000.0).trunc() as i64;
    format!(
        "{} ({:.3}) Rx {} - {} {}\n",
        millis, record.timestamp, record.can_id, record.length, record.payload
    )
}

/// Parse and render in one step
pub fn convert_line(line: &str) -> LineResult<String> {
    parse_line(line).map(|record| format_record(&record))
}

/// Stateless v1.3 line converter
#[derive(Debug, Clone, Copy, Default)]
pub struct V13Converter;

impl V13Converter {
    pub fn new() -> Self {
        Self
    }
}

impl LineConverter for V13Converter {
    fn header(&self) -> &'static str {
        HEADER
    }

    fn convert_line(&mut self, line: &str) -> LineResult<String> {
        convert_line(line)
    }
}
