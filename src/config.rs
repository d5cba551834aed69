//! Configuration file
//!
//! A JSON object; every field is optional:
//!
//! ```json
//! {
//!   "store": "file",
//!   "data_file": "./data/parking.json",
//!   "delete_policy": "restrict",
//!   "log_level": "info",
//!   "log_json": false
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::service::{DeletePolicy, ServiceSettings};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Which record store backs the service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    /// Process-local; contents are lost on exit
    #[default]
    Memory,
    /// Checksummed JSON snapshot at `data_file`
    File,
}

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreKind,

    /// Snapshot path (required for the file store)
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    #[serde(default)]
    pub delete_policy: DeletePolicy,

    /// Default log filter; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreKind::default(),
            data_file: None,
            delete_policy: DeletePolicy::default(),
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl Config {
    /// Load and validate configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.store == StoreKind::File && self.data_file.is_none() {
            return Err(ConfigError::Invalid(
                "'data_file' is required when 'store' is 'file'".to_string(),
            ));
        }

        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "unknown log_level '{}', expected one of {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    /// Snapshot path of the file store
    pub fn data_path(&self) -> ConfigResult<&Path> {
        self.data_file
            .as_deref()
            .ok_or_else(|| ConfigError::Invalid("no 'data_file' configured".to_string()))
    }

    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            delete_policy: self.delete_policy,
        }
    }
}
