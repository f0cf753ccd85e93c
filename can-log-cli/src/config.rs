//! Configuration loading and parsing

use anyhow::{Context, Result};
use can_log_trc::{ConverterConfig, Dialect, PayloadPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub conversion: ConverterConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InputConfig {
    #[serde(default)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Where to write the JSON conversion summary
    pub summary: Option<PathBuf>,
}

/// Command-line values that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub files: Vec<PathBuf>,
    pub dialect: Option<Dialect>,
    pub output_dir: Option<PathBuf>,
    pub lenient_payload: bool,
    pub summary: Option<PathBuf>,
}

impl AppConfig {
    /// Apply command-line overrides
    pub fn merge(mut self, overrides: Overrides) -> Self {
        if !overrides.files.is_empty() {
            self.input.files = overrides.files;
        }
        if let Some(dialect) = overrides.dialect {
            self.conversion.dialect = dialect;
        }
        if let Some(dir) = overrides.output_dir {
            self.conversion.output_dir = Some(dir);
        }
        if overrides.lenient_payload {
            self.conversion.payload_policy = PayloadPolicy::Lenient;
        }
        if overrides.summary.is_some() {
            self.output.summary = overrides.summary;
        }
        self
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}
