//! Configuration module
//!
//! A TOML file with an optional `[segmenter]` and an optional `[index]`
//! section. Flags given on the command line override the file.

use crate::error::CliError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use trieseg_engine::{IndexConfig, SegmenterConfig};

/// CLI configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Segmentation parameters
    #[serde(default)]
    pub segmenter: SegmenterConfig,

    /// Indexing parameters
    #[serde(default)]
    pub index: IndexConfig,
}

impl CliConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| CliError::ConfigError(e.message().to_string()))?;
        config.segmenter.validate()?;
        config.index.validate()?;
        Ok(config)
    }

    /// Load `path`, or the defaults when no file is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()).into());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}
