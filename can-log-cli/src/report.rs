//! Conversion report generation
//!
//! Prints a per-file table to stdout and optionally writes the same data as
//! JSON.

use anyhow::{Context, Result};
use can_log_trc::ConversionSummary;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of converting one input file
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileOutcome {
    Converted(ConversionSummary),
    Failed { input_path: PathBuf, error: String },
}

impl FileOutcome {
    pub fn from_result(input: &Path, result: can_log_trc::Result<ConversionSummary>) -> Self {
        match result {
            Ok(summary) => FileOutcome::Converted(summary),
            Err(e) => FileOutcome::Failed {
                input_path: input.to_path_buf(),
                error: e.to_string(),
            },
        }
    }

    /// Failure for an input that was never converted
    pub fn rejected(input: &Path, reason: impl Into<String>) -> Self {
        FileOutcome::Failed {
            input_path: input.to_path_buf(),
            error: reason.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, FileOutcome::Failed { .. })
    }
}

/// Report over a batch of conversions
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub generated_at: String,
    pub converter_version: &'static str,
    pub files: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn new(files: Vec<FileOutcome>) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            converter_version: can_log_trc::VERSION,
            files,
        }
    }

    pub fn failures(&self) -> usize {
        self.files.iter().filter(|outcome| outcome.is_failure()).count()
    }

    /// Print a human-readable summary to stdout
    pub fn print(&self) {
        println!("═══════════════════════════════════════════════");
        println!("  CAN Log → TRC Conversion");
        println!("═══════════════════════════════════════════════\n");

        for outcome in &self.files {
            match outcome {
                FileOutcome::Converted(summary) => {
                    println!("✓ {}", summary.input_path.display());
                    println!("    → {} ({})", summary.output_path.display(), summary.dialect);
                    println!(
                        "    {} records written, {} of {} lines skipped",
                        summary.stats.records_written,
                        summary.stats.lines_skipped,
                        summary.stats.lines_read
                    );
                }
                FileOutcome::Failed { input_path, error } => {
                    println!("✗ {}", input_path.display());
                    println!("    {}", error);
                }
            }
        }

        println!(
            "\n{} converted, {} failed",
            self.files.len() - self.failures(),
            self.failures()
        );
    }

    /// Write the report as pretty-printed JSON
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
        fs::write(path, json).with_context(|| format!("Failed to write report: {:?}", path))?;
        log::info!("Summary written to {:?}", path);
        Ok(())
    }
}
