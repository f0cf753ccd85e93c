//! TRC dialect writers (v1.3, v2.1)
//!
//! Each dialect pairs a line parser with a record formatter. The file
//! converter drives them through the [`LineConverter`] trait.

use crate::types::{LineResult, SkipReason};

pub mod v13;
pub mod v21;

pub use v13::V13Converter;
pub use v21::{ConversionSession, V21Converter};

/// Common trait for all dialect writers
///
/// A converter produces the static header once, then turns input lines into
/// output lines one at a time.
pub trait LineConverter {
    /// Header block written before any record
    fn header(&self) -> &'static str;

    /// Convert one input line into one output line (newline included)
    fn convert_line(&mut self, line: &str) -> LineResult<String>;
}

/// Parse a `(<seconds>)` timestamp token
pub(crate) fn parse_timestamp(token: &str) -> LineResult<f64> {
    let inner = unwrap_token(token, '(', ')')
        .ok_or_else(|| SkipReason::MalformedTimestamp(token.to_string()))?;

    let timestamp: f64 = inner
        .parse()
        .map_err(|source| SkipReason::InvalidTimestamp {
            token: token.to_string(),
            source,
        })?;

    if !timestamp.is_finite() {
        return Err(SkipReason::NonFiniteTimestamp(timestamp));
    }

    Ok(timestamp)
}

/// Strip a one-character wrapper such as `(...)` or `[...]`
pub(crate) fn unwrap_token(token: &str, open: char, close: char) -> Option<&str> {
    token.strip_prefix(open)?.strip_suffix(close)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("(12.500)"), Ok(12.5));
        assert_eq!(parse_timestamp("(1700000000.123456)"), Ok(1700000000.123456));
        assert_eq!(parse_timestamp("(0)"), Ok(0.0));
    }

    #[test]
    fn test_parse_timestamp_rejects_bad_tokens() {
        assert!(matches!(
            parse_timestamp("12.500"),
            Err(SkipReason::MalformedTimestamp(_))
        ));
        assert!(matches!(
            parse_timestamp("(12.5"),
            Err(SkipReason::MalformedTimestamp(_))
        ));
        assert!(matches!(
            parse_timestamp("(abc)"),
            Err(SkipReason::InvalidTimestamp { .. })
        ));
        assert!(matches!(
            parse_timestamp("()"),
            Err(SkipReason::InvalidTimestamp { .. })
        ));
        assert!(matches!(
            parse_timestamp("(inf)"),
            Err(SkipReason::NonFiniteTimestamp(_))
        ));
    }

    #[test]
    fn test_unwrap_token() {
        assert_eq!(unwrap_token("[8]", '[', ']'), Some("8"));
        assert_eq!(unwrap_token("[]", '[', ']'), Some(""));
        assert_eq!(unwrap_token("8", '[', ']'), None);
        assert_eq!(unwrap_token("(", '(', ')'), None);
    }
}
