//! Conversion settings loaded from YAML.
//!
//! Every field is optional in the file; command-line flags override
//! whatever the file provides.
//!
//! # Example YAML
//!
//! ```yaml
//! api_root: https://services.example.com/odata/
//! format: yaml
//! pretty: true
//! jobs: 4
//! ```

use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::output::OutputFormat;

/// Errors that can occur while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A value that parses but cannot be used.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Settings for the `convert` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Value written to `$ApiRoot`.
    pub api_root: String,
    /// Output format for converted documents.
    pub format: OutputFormat,
    /// Pretty-print JSON output.
    pub pretty: bool,
    /// Worker threads for batch conversion (default: number of CPUs).
    pub jobs: Option<usize>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            api_root: String::new(),
            format: OutputFormat::Json,
            pretty: true,
            jobs: None,
        }
    }
}

impl ConvertConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if parsing fails, or [`ConfigError::Invalid`]
    /// for `jobs: 0`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_yaml::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that parse but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jobs == Some(0) {
            return Err(ConfigError::Invalid("jobs must be at least 1".to_string()));
        }
        Ok(())
    }
}
