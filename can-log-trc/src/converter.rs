//! File conversion API
//!
//! [`TrcConverter`] is the entry point of the library: it derives the output
//! path, opens both files, writes the dialect header and feeds every input
//! line through the selected dialect writer.

use crate::config::{ConverterConfig, Dialect};
use crate::formats::{LineConverter, V13Converter, V21Converter};
use crate::types::{ConverterError, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Extension given to every output file
pub const TRC_EXTENSION: &str = "trc";

/// Line counters for one conversion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LineStats {
    /// Input lines seen
    pub lines_read: usize,
    /// Records written to the output
    pub records_written: usize,
    /// Input lines that produced no record
    pub lines_skipped: usize,
}

/// Outcome of a successful file conversion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionSummary {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub dialect: Dialect,
    #[serde(flatten)]
    pub stats: LineStats,
}

/// Converts CAN log files into TRC files
#[derive(Debug, Clone, Default)]
pub struct TrcConverter {
    config: ConverterConfig,
}

impl TrcConverter {
    /// Create a converter with the given configuration
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Path the converted file will be written to
    ///
    /// The input's extension is replaced by `.trc`. The file lands next to
    /// the input unless an output directory is configured.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        let renamed = input.with_extension(TRC_EXTENSION);
        match (&self.config.output_dir, renamed.file_name()) {
            (Some(dir), Some(name)) => dir.join(name),
            _ => renamed,
        }
    }

    /// Convert `input` and write the result beside it (or into the
    /// configured output directory)
    ///
    /// # Returns
    /// * `Ok(ConversionSummary)` with the output path and line counters
    /// * `Err(ConverterError)` if either file could not be opened, read or
    ///   written. Malformed lines never fail the conversion.
    ///
    /// # Example
    /// ```no_run
    /// use can_log_trc::{ConverterConfig, Dialect, TrcConverter};
    /// use std::path::Path;
    ///
    /// let converter = TrcConverter::new(ConverterConfig::new().with_dialect(Dialect::V21));
    /// let summary = converter.convert(Path::new("capture.log")).unwrap();
    /// println!("Wrote {:?}", summary.output_path);
    /// ```
    pub fn convert(&self, input: &Path) -> Result<ConversionSummary> {
        let output_path = self.output_path(input);
        let result = self.convert_to(input, &output_path);

        match &result {
            Ok(summary) => log::info!(
                "Converted {:?} -> {:?} ({} records, {} lines skipped)",
                summary.input_path,
                summary.output_path,
                summary.stats.records_written,
                summary.stats.lines_skipped
            ),
            Err(e) => log::error!("Failed to convert {:?}: {}", input, e),
        }

        result
    }

    fn convert_to(&self, input: &Path, output_path: &Path) -> Result<ConversionSummary> {
        if output_path == input || resolved_path(output_path) == resolved_path(input) {
            return Err(ConverterError::OutputIsInput(output_path.to_path_buf()));
        }

        log::info!(
            "Converting {:?} to {} ({:?})",
            input,
            self.config.dialect,
            output_path
        );

        let reader = File::open(input)
            .map(BufReader::new)
            .map_err(|source| ConverterError::OpenInput {
                path: input.to_path_buf(),
                source,
            })?;

        let mut writer = File::create(output_path)
            .map(BufWriter::new)
            .map_err(|source| ConverterError::CreateOutput {
                path: output_path.to_path_buf(),
                source,
            })?;

        let stats = self.convert_stream(reader, &mut writer)?;

        Ok(ConversionSummary {
            input_path: input.to_path_buf(),
            output_path: output_path.to_path_buf(),
            dialect: self.config.dialect,
            stats,
        })
    }

    /// Convert a stream of log lines into TRC text
    ///
    /// The writer is flushed before returning.
    pub fn convert_stream<R: BufRead, W: Write>(&self, reader: R, writer: W) -> Result<LineStats> {
        match self.config.dialect {
            Dialect::V13 => write_trc(V13Converter::new(), reader, writer),
            Dialect::V21 => write_trc(V21Converter::new(self.config.payload_policy), reader, writer),
        }
    }
}

/// Absolute, symlink-free spelling of `path`
///
/// The file itself need not exist; its parent directory is resolved instead.
/// Falls back to `path` unchanged when nothing can be resolved.
pub fn resolved_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = path.canonicalize() {
        return resolved;
    }

    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            parent
                .canonicalize()
                .map(|dir| dir.join(name))
                .unwrap_or_else(|_| path.to_path_buf())
        }
        _ => path.to_path_buf(),
    }
}

/// Write the header, then every convertible line
fn write_trc<C, R, W>(mut converter: C, reader: R, mut writer: W) -> Result<LineStats>
where
    C: LineConverter,
    R: BufRead,
    W: Write,
{
    let mut stats = LineStats::default();

    writer
        .write_all(converter.header().as_bytes())
        .map_err(ConverterError::Write)?;

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(ConverterError::Read)?;
        stats.lines_read += 1;

        match converter.convert_line(&line) {
            Ok(row) => {
                writer.write_all(row.as_bytes()).map_err(ConverterError::Write)?;
                stats.records_written += 1;
            }
            Err(reason) => {
                stats.lines_skipped += 1;
                if reason.is_not_a_frame() {
                    log::debug!("Line {}: not a frame line ({}): {:?}", index + 1, reason, line);
                } else {
                    log::warn!("Skipping line {}: {} ({:?})", index + 1, reason, line.trim());
                }
            }
        }
    }

    writer.flush().map_err(ConverterError::Write)?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PayloadPolicy;

    fn convert_str(config: ConverterConfig, input: &str) -> (String, LineStats) {
        let converter = TrcConverter::new(config);
        let mut out = Vec::new();
        let stats = converter.convert_stream(input.as_bytes(), &mut out).unwrap();
        (String::from_utf8(out).unwrap(), stats)
    }

    #[test]
    fn test_output_path_replaces_extension() {
        let converter = TrcConverter::default();
        assert_eq!(
            converter.output_path(Path::new("logs/capture.log")),
            PathBuf::from("logs/capture.trc")
        );
        assert_eq!(
            converter.output_path(Path::new("capture")),
            PathBuf::from("capture.trc")
        );
        assert_eq!(
            converter.output_path(Path::new("run.2024.txt")),
            PathBuf::from("run.2024.trc")
        );
    }

    #[test]
    fn test_output_path_with_output_dir() {
        let converter = TrcConverter::new(ConverterConfig::new().with_output_dir("out"));
        assert_eq!(
            converter.output_path(Path::new("logs/capture.log")),
            PathBuf::from("out/capture.trc")
        );
    }

    #[test]
    fn test_v13_stream() {
        let input = "(1.000) can0 100#0102\nnot a frame\n(1.500) can0 200#AABBCC\n";
        let (out, stats) = convert_str(ConverterConfig::new(), input);

        let expected = format!(
            "{}1000 (1.000) Rx 100 - 2 0102\n1500 (1.500) Rx 200 - 3 AABBCC\n",
            crate::formats::v13::HEADER
        );
        assert_eq!(out, expected);
        assert_eq!(
            stats,
            LineStats {
                lines_read: 3,
                records_written: 2,
                lines_skipped: 1,
            }
        );
    }

    #[test]
    fn test_v21_stream() {
        let input = "header line\n\
                     (100.000) B1 x x x 123 [2] AA BB\n\
                     (100.010) B2 x x x 456 [4] 01 02\n\
                     (100.020) B2 x x x 456 [1] 01\n";
        let config = ConverterConfig::new().with_dialect(Dialect::V21);
        let (out, stats) = convert_str(config, input);

        let body = out.strip_prefix(crate::formats::v21::HEADER).unwrap();
        let rows: Vec<&str> = body.lines().collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("       1     0.000 DT 1  123"));
        assert!(rows[1].starts_with("       2    20.000 DT 2  456"));
        assert_eq!(stats.lines_skipped, 2);
    }

    #[test]
    fn test_v21_lenient_stream() {
        let input = "(100.000) B1 x x x 123 [4] AA BB\n";
        let config = ConverterConfig::new()
            .with_dialect(Dialect::V21)
            .with_payload_policy(PayloadPolicy::Lenient);
        let (out, stats) = convert_str(config, input);

        assert!(out.ends_with("       1     0.000 DT 1  123 Rx -  4    AA BB\n"));
        assert_eq!(stats.records_written, 1);
    }

    #[test]
    fn test_empty_input_writes_header_only() {
        let (out, stats) = convert_str(ConverterConfig::new(), "");
        assert_eq!(out, crate::formats::v13::HEADER);
        assert_eq!(stats, LineStats::default());
    }

    #[test]
    fn test_crlf_input() {
        let (out, _) = convert_str(ConverterConfig::new(), "(2.000) can0 1#FF\r\n");
        assert!(out.ends_with("2000 (2.000) Rx 1 - 1 FF\n"));
    }

    #[test]
    fn test_trc_input_is_rejected() {
        let converter = TrcConverter::default();
        let result = converter.convert(Path::new("already.trc"));
        assert!(matches!(result, Err(ConverterError::OutputIsInput(_))));
    }

    #[test]
    fn test_resolved_path_of_missing_file() {
        let dir = std::env::temp_dir();
        let resolved = resolved_path(&dir.join("no_such_capture.trc"));
        assert_eq!(resolved, dir.canonicalize().unwrap().join("no_such_capture.trc"));

        let dotted = dir.join(".").join("no_such_capture.trc");
        assert_eq!(resolved_path(&dotted), resolved);
    }

    #[test]
    fn test_missing_input_fails() {
        let converter = TrcConverter::default();
        let result = converter.convert(Path::new("does/not/exist.log"));
        assert!(matches!(result, Err(ConverterError::OpenInput { .. })));
    }
}
