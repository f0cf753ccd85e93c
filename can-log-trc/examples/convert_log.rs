//! Standalone CAN log to TRC converter
//!
//! Usage:
//!   convert_log <capture.log> [--v21] [--lenient]
//!
//! Example:
//!   convert_log candump-2024-12-04.log --v21

use can_log_trc::{ConverterConfig, Dialect, PayloadPolicy, TrcConverter};
use std::env;
use std::path::PathBuf;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(input) = args.iter().find(|arg| !arg.starts_with("--")).map(PathBuf::from) else {
        eprintln!("Usage: convert_log <capture.log> [--v21] [--lenient]");
        std::process::exit(1);
    };

    let mut config = ConverterConfig::new();
    if args.iter().any(|arg| arg == "--v21") {
        config = config.with_dialect(Dialect::V21);
    }
    if args.iter().any(|arg| arg == "--lenient") {
        config = config.with_payload_policy(PayloadPolicy::Lenient);
    }

    let converter = TrcConverter::new(config);
    match converter.convert(&input) {
        Ok(summary) => {
            println!("Conversion successful: {}", summary.output_path.display());
            println!("  Lines read:      {}", summary.stats.lines_read);
            println!("  Records written: {}", summary.stats.records_written);
            println!("  Lines skipped:   {}", summary.stats.lines_skipped);
        }
        Err(e) => {
            eprintln!("Failed to convert file: {}", e);
            std::process::exit(1);
        }
    }
}
