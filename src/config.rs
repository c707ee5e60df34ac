//! Engine configuration module.
//!
//! Handles loading, validating, and merging `rasterkit.toml`. Stock defaults
//! are overridden by whatever the user file specifies; everything else keeps
//! its default.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [output]
//! jpeg_quality = 85         # JPEG quality (0-100)
//! png_compression = 9       # PNG zlib level (0-9)
//! webp_quality = 80         # WEBP quality (0-100)
//!
//! [limits]
//! max_pixels = 100000000    # Refuse to decode larger images (0 = no limit)
//!
//! [processing]
//! max_processes = 4         # Max parallel batch workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{DecodeLimits, EncodeOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default config file name looked up in the working directory.
pub const CONFIG_FILENAME: &str = "rasterkit.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Engine configuration loaded from `rasterkit.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Default encode quality per format.
    pub output: OutputConfig,
    /// Safety limits applied before decoding.
    pub limits: LimitsConfig,
    /// Parallel batch settings.
    pub processing: ProcessingConfig,
}

impl EngineConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output.jpeg_quality > 100 {
            return Err(ConfigError::Validation(
                "output.jpeg_quality must be 0-100".into(),
            ));
        }
        if self.output.png_compression > 9 {
            return Err(ConfigError::Validation(
                "output.png_compression must be 0-9".into(),
            ));
        }
        if self.output.webp_quality > 100 {
            return Err(ConfigError::Validation(
                "output.webp_quality must be 0-100".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            jpeg_quality: self.output.jpeg_quality,
            png_compression: self.output.png_compression,
            webp_quality: self.output.webp_quality,
        }
    }

    pub fn decode_limits(&self) -> DecodeLimits {
        DecodeLimits {
            max_pixels: (self.limits.max_pixels > 0).then_some(self.limits.max_pixels),
        }
    }
}

/// Default encode quality per format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub jpeg_quality: u8,
    pub png_compression: u8,
    pub webp_quality: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        let o = EncodeOptions::default();
        Self {
            jpeg_quality: o.jpeg_quality,
            png_compression: o.png_compression,
            webp_quality: o.webp_quality,
        }
    }
}

/// Decode safety limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum `width * height` accepted by decode. 0 disables the check.
    pub max_pixels: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_pixels: 100_000_000,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Cap on batch workers. `None` uses every core; larger values are
    /// clamped to the core count.
    pub max_processes: Option<usize>,
}

/// Worker count for a batch: the configured cap, never more than the
/// machine's cores, all cores when unset.
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism().map_or(1, |n| n.get());
    match config.max_processes {
        Some(cap) => cap.min(cores),
        None => cores,
    }
}

/// Stock defaults as a TOML table, the base every user file merges onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(EngineConfig::default())?)
}

/// Overlay user TOML onto `base`. Tables merge key by key; any other
/// overlay value replaces what was there. Keys only in `base` survive.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut table), toml::Value::Table(user)) => {
            for (key, value) in user {
                let merged = match table.remove(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => value,
                };
                table.insert(key, merged);
            }
            toml::Value::Table(table)
        }
        (_, replacement) => replacement,
    }
}

/// Parse config text, merge it over the stock defaults and validate.
pub fn parse_config(content: &str) -> Result<EngineConfig, ConfigError> {
    let overlay: toml::Value = toml::from_str(content)?;
    let merged = merge_toml(stock_defaults_value()?, overlay);
    let config: EngineConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`.
///
/// A missing file yields the stock defaults; a file that exists but does
/// not parse or validate is an error.
pub fn load_config(path: &Path) -> Result<EngineConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(EngineConfig::default());
    }
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock `rasterkit.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# rasterkit configuration
# =======================
# Every key is optional. Values shown are the defaults.

[output]
# JPEG quality, 0 (smallest) to 100 (best).
jpeg_quality = 85
# PNG zlib compression level, 0 (fastest) to 9 (smallest).
png_compression = 9
# WEBP quality, 0 (smallest) to 100. 100 switches to lossless encoding.
webp_quality = 80

[limits]
# Refuse to decode images with more than this many pixels.
# Set to 0 to disable the limit.
max_pixels = 100000000

[processing]
# Maximum parallel workers for `batch`. Omit to use every CPU core.
# max_processes = 4
"##
}
