//! TOML configuration file support.
//!
//! Settings that are tedious to repeat on every call can be kept in a file
//! passed with `--config`:
//!
//! ```toml
//! # xyconv.toml
//! [load]
//! format = "uxd"
//! options = ["first-line-header"]
//!
//! [export]
//! metadata = true
//! precision = 6
//! ```
//!
//! Command-line flags take precedence over values from the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use xydata::ExportOptions;

/// Root configuration structure for xyconv.toml files.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// How input files are read.
    #[serde(default)]
    pub load: LoadConfig,

    /// How the text export is written.
    #[serde(default)]
    pub export: ExportConfig,
}

/// `[load]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadConfig {
    /// Format name to force instead of guessing.
    pub format: Option<String>,

    /// Parser options.
    pub options: Option<Vec<String>>,
}

/// `[export]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    /// Write `#` meta-data lines.
    pub metadata: Option<bool>,

    /// Decimals in numeric rows.
    pub precision: Option<usize>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Export options from this file, with unset values at their defaults.
    pub fn export_options(&self) -> ExportOptions {
        let defaults = ExportOptions::default();
        ExportOptions {
            with_metadata: self.export.metadata.unwrap_or(defaults.with_metadata),
            precision: self.export.precision.unwrap_or(defaults.precision),
        }
    }
}
