//! TRC v2.1 writer
//!
//! Input lines carry a bus token, a bracketed data length and one token per
//! data byte:
//!
//! ```text
//! (100.000) B1 x x x 123 [2] AA BB
//! ```
//!
//! Output rows are numbered from 1 and timed relative to the first accepted
//! frame, so the writer threads a [`ConversionSession`] across lines.

use super::{parse_timestamp, unwrap_token, LineConverter};
use crate::config::PayloadPolicy;
use crate::types::{CanFrameRecord, LineResult, Payload, SkipReason};

/// Static v2.1 header
pub const HEADER: &str = ";$FILEVERSION=2.1
;$STARTTIME=45630.6373844296977
;$COLUMNS=N,O,T,B,I,d,R,L,D
;
;   Start time: 12/4/2024 15:17:50.014.7
;   Generated by PCAN-Explorer v6.7.0.2830
;-------------------------------------------------------------------------------
;   Bus  Connection   Net Connection           Protocol  Bit rate
;   1    JCA Bus      JCA_250@pcan_usb         J1939     250 kbit/s
;   2    Tractor BUS  JD_TractorCan@pcan_usb   J1939     500 kbit/s
;   3    Virtual Bus  VirtualCAN@pcan_virtual  CAN       500 kbit/s
;-------------------------------------------------------------------------------
;   Message    Time    Type    ID     Rx/Tx
;   Number     Offset  |  Bus  [hex]  |  Reserved
;   |          [ms]    |  |    |      |  |  Data Length Code
;   |          |       |  |    |      |  |  |    Data [hex] ...
;   |          |       |  |    |      |  |  |    |
;---+--- ------+------ +- +- --+----- +- +- +--- +- -- -- -- -- -- -- --
";

const MIN_FIELDS: usize = 8;

const TIMESTAMP_FIELD: usize = 0;
const BUS_FIELD: usize = 1;
const ID_FIELD: usize = 5;
const LENGTH_FIELD: usize = 6;
const DATA_FIELD: usize = 7;

/// Running state of one v2.1 file conversion
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionSession {
    message_number: u64,
    first_timestamp: Option<f64>,
}

impl ConversionSession {
    pub fn new() -> Self {
        Self {
            message_number: 1,
            first_timestamp: None,
        }
    }

    /// Number the next emitted row will carry
    pub fn message_number(&self) -> u64 {
        self.message_number
    }

    /// Timestamp of the first accepted frame, once one has been seen
    pub fn first_timestamp(&self) -> Option<f64> {
        self.first_timestamp
    }

    /// Offset of `timestamp` from the first accepted frame in milliseconds,
    /// latching it if this is the first frame
    fn relative_millis(&mut self, timestamp: f64) -> f64 {
        let first = *self.first_timestamp.get_or_insert(timestamp);
        (timestamp - first) * 1000.0
    }

    /// Render a parsed record and advance the session
    pub fn render(&mut self, record: &CanFrameRecord) -> String {
        let relative = self.relative_millis(record.timestamp);
        let bus = record.bus.map(String::from).unwrap_or_default();

        let row = format!(
            "{:>8}  {:8.3} DT {}  {} Rx -  {:<4} {}\n",
            self.message_number, relative, bus, record.can_id, record.length, record.payload
        );

        self.message_number += 1;
        row
    }
}

impl Default for ConversionSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one log line into a frame record
pub fn parse_line(line: &str, policy: PayloadPolicy) -> LineResult<CanFrameRecord> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < MIN_FIELDS {
        return Err(SkipReason::TooFewFields {
            found: parts.len(),
            required: MIN_FIELDS,
        });
    }

    let timestamp = parse_timestamp(parts[TIMESTAMP_FIELD])?;
    let bus = parts[BUS_FIELD].chars().last();
    let can_id = parts[ID_FIELD];

    let length_token = parts[LENGTH_FIELD];
    let length: usize = unwrap_token(length_token, '[', ']')
        .ok_or_else(|| SkipReason::MalformedLength(length_token.to_string()))?
        .parse()
        .map_err(|source| SkipReason::InvalidLength {
            token: length_token.to_string(),
            source,
        })?;

    // Bytes beyond the declared length are ignored
    let available = &parts[DATA_FIELD..];
    if available.len() < length && policy == PayloadPolicy::Strict {
        return Err(SkipReason::PayloadShortfall {
            declared: length,
            available: available.len(),
        });
    }
    let bytes = available
        .iter()
        .take(length)
        .map(|byte| byte.to_string())
        .collect();

    Ok(CanFrameRecord {
        timestamp,
        bus,
        can_id: can_id.to_string(),
        payload: Payload::Bytes(bytes),
        length,
    })
}

/// Parse and render one line, advancing `session` only when a row is emitted
pub fn convert_line(
    line: &str,
    session: &mut ConversionSession,
    policy: PayloadPolicy,
) -> LineResult<String> {
    let record = parse_line(line, policy)?;
    Ok(session.render(&record))
}

/// v2.1 line converter owning its session
#[derive(Debug, Clone, Default)]
pub struct V21Converter {
    session: ConversionSession,
    policy: PayloadPolicy,
}

impl V21Converter {
    pub fn new(policy: PayloadPolicy) -> Self {
        Self {
            session: ConversionSession::new(),
            policy,
        }
    }

    pub fn session(&self) -> &ConversionSession {
        &self.session
    }
}

impl LineConverter for V21Converter {
    fn header(&self) -> &'static str {
        HEADER
    }

    fn convert_line(&mut self, line: &str) -> LineResult<String> {
        convert_line(line, &mut self.session, self.policy)
    }
}
