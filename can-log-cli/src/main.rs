//! CAN Log to TRC CLI Application
//!
//! Command-line front end for the can-log-trc library. It adds:
//! - TOML configuration with command-line overrides
//! - Batch conversion of several files
//! - Console and JSON conversion reports

use anyhow::{bail, Result};
use can_log_trc::{resolved_path, Dialect, TrcConverter};
use clap::{Parser, ValueEnum};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

mod config;
mod report;

use config::{AppConfig, Overrides};
use report::{BatchReport, FileOutcome};

/// TRC dialect selectable on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
enum DialectArg {
    /// TRC v1.3 (minimal columns)
    #[value(name = "v13")]
    V13,
    /// TRC v2.1 (message numbers, relative offsets, bus labels)
    #[value(name = "v21")]
    V21,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::V13 => Dialect::V13,
            DialectArg::V21 => Dialect::V21,
        }
    }
}

/// CAN Log to TRC - Convert text CAN captures into PCAN trace files
#[derive(Parser, Debug)]
#[command(name = "can-log-cli")]
#[command(about = "Convert text CAN log captures into PCAN TRC files", long_about = None)]
#[command(version)]
struct Args {
    /// CAN log files to convert (.log, .txt, ...)
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Target TRC dialect
    #[arg(short, long, value_enum)]
    dialect: Option<DialectArg>,

    /// Write .trc files into this directory instead of next to each input
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// v2.1: keep frames that carry fewer data bytes than declared
    #[arg(long)]
    lenient_payload: bool,

    /// Write a JSON conversion summary to this file
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            files: self.files.clone(),
            dialect: self.dialect.map(Dialect::from),
            output_dir: self.output_dir.clone(),
            lenient_payload: self.lenient_payload,
            summary: self.summary.clone(),
        }
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("CAN Log to TRC CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using converter library v{}", can_log_trc::VERSION);

    let file_config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };
    let config = file_config.merge(args.overrides());

    if config.input.files.is_empty() {
        println!("CAN Log to TRC - No input specified");
        println!("\nQuick Start:");
        println!("  can-log-cli candump.log");
        println!("  can-log-cli --dialect v21 bus_capture.txt");
        println!("\nBatch mode:");
        println!("  can-log-cli --config config.toml");
        println!("\nUse --help for more options");
        return Ok(());
    }

    let report = convert_all(&config);

    if !args.quiet {
        report.print();
    }
    if let Some(path) = &config.output.summary {
        report.write_json(path)?;
    }

    let failures = report.failures();
    if failures > 0 {
        bail!("{} of {} conversions failed", failures, report.files.len());
    }

    Ok(())
}

/// Convert every input file; files are independent so they run in parallel
///
/// Inputs whose output would land on a `.trc` already claimed by an earlier
/// input in the batch are reported as failed and not converted.
fn convert_all(config: &AppConfig) -> BatchReport {
    let converter = TrcConverter::new(config.conversion.clone());
    let jobs = claim_outputs(&converter, &config.input.files);

    let outcomes: Vec<FileOutcome> = jobs
        .into_par_iter()
        .map(|(input, rejected)| {
            rejected.unwrap_or_else(|| FileOutcome::from_result(input, converter.convert(input)))
        })
        .collect();

    BatchReport::new(outcomes)
}

/// Pair each input with a rejection if its output path is already taken
fn claim_outputs<'a>(
    converter: &TrcConverter,
    files: &'a [PathBuf],
) -> Vec<(&'a Path, Option<FileOutcome>)> {
    let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();

    files
        .iter()
        .map(|input| {
            let output = resolved_path(&converter.output_path(input));
            match claimed.get(&output) {
                Some(first) => {
                    log::warn!("Skipping {:?}: output {:?} already claimed by {:?}", input, output, first);
                    let reason = format!("output {:?} is already written by {:?}", output, first);
                    (input.as_path(), Some(FileOutcome::rejected(input, reason)))
                }
                None => {
                    claimed.insert(output, input.as_path());
                    (input.as_path(), None)
                }
            }
        })
        .collect()
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use can_log_trc::ConverterConfig;
    use std::fs;

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from([
            "can-log-cli",
            "-d",
            "v21",
            "--lenient-payload",
            "-o",
            "out",
            "a.log",
            "b.log",
        ]);

        let overrides = args.overrides();
        assert_eq!(overrides.files.len(), 2);
        assert_eq!(overrides.dialect, Some(Dialect::V21));
        assert_eq!(overrides.output_dir, Some(PathBuf::from("out")));
        assert!(overrides.lenient_payload);
    }

    #[test]
    fn test_unknown_dialect_is_rejected() {
        let result = Args::try_parse_from(["can-log-cli", "--dialect", "v3", "a.log"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_convert_all_reports_each_file() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.log");
        fs::write(&good, "(1.0) can0 100#00\n").unwrap();
        let missing = dir.path().join("missing.log");

        let config = AppConfig::default().merge(Overrides {
            files: vec![good.clone(), missing],
            ..Overrides::default()
        });
        let report = convert_all(&config);

        assert_eq!(report.files.len(), 2);
        assert_eq!(report.failures(), 1);
        assert!(dir.path().join("good.trc").exists());
    }

    #[test]
    fn test_convert_all_rejects_colliding_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("cap.log");
        let second = dir.path().join("cap.txt");
        fs::write(&first, "(1.0) can0 100#00\n").unwrap();
        fs::write(&second, "(2.0) can0 200#11\n").unwrap();

        let config = AppConfig::default().merge(Overrides {
            files: vec![first, second.clone()],
            ..Overrides::default()
        });
        let report = convert_all(&config);

        assert_eq!(report.files.len(), 2);
        assert_eq!(report.failures(), 1);
        assert!(!report.files[0].is_failure());
        match &report.files[1] {
            FileOutcome::Failed { input_path, error } => {
                assert_eq!(input_path, &second);
                assert!(error.contains("already written by"));
            }
            other => panic!("expected a failed outcome, got {:?}", other),
        }

        let output = fs::read_to_string(dir.path().join("cap.trc")).unwrap();
        assert!(output.ends_with("1000 (1.000) Rx 100 - 1 00\n"));
        assert!(!output.contains(" 200 "));
    }

    #[test]
    fn test_colliding_outputs_across_directories() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        fs::create_dir_all(dir.path().join("x")).unwrap();
        fs::create_dir_all(dir.path().join("y")).unwrap();
        fs::create_dir(&out).unwrap();
        let files = vec![dir.path().join("x/a.log"), dir.path().join("y/a.log")];

        let converter = TrcConverter::new(ConverterConfig::new().with_output_dir(&out));
        let jobs = claim_outputs(&converter, &files);

        assert!(jobs[0].1.is_none());
        assert!(jobs[1].1.as_ref().is_some_and(FileOutcome::is_failure));
    }
}
