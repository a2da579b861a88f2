//! TOML configuration file support.
//!
//! Settings that stay the same across runs can live in a file instead of
//! being typed at every prompt:
//!
//! ```toml
//! # lctrace.toml
//! [batch]
//! flow_rate = 0.5
//! trace = "uv"
//! skip_invalid = true
//! legacy_point_count = false
//! output_name = "processed.csv"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use lctrace::locator::BlockKind;

/// Root configuration structure for lctrace.toml files.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Batch conversion settings.
    #[serde(default)]
    pub batch: BatchSettings,
}

/// Configuration for a batch run.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchSettings {
    /// Flow rate in ml/min.
    pub flow_rate: Option<f64>,

    /// Detector trace, `uv` or `fl`.
    pub trace: Option<String>,

    /// Skip unparsable reports.
    pub skip_invalid: Option<bool>,

    /// Share one point count across detector blocks.
    pub legacy_point_count: Option<bool>,

    /// Output file name inside the source directory.
    pub output_name: Option<String>,
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
}

impl BatchSettings {
    /// Parsed trace setting, if present.
    pub fn trace_kind(&self) -> Result<Option<BlockKind>> {
        self.trace
            .as_deref()
            .map(|s| s.parse::<BlockKind>().map_err(anyhow::Error::msg))
            .transpose()
            .context("Invalid 'trace' in config file")
    }
}
