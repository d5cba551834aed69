//! CLI-specific error types
//!
//! All CLI errors end the process with a non-zero exit code.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::storage::StoreError;

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to install logging: {0}")]
    Logging(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// `init` or `seed` on a configuration without a data file
    #[error("command requires the file store")]
    NoDataFile,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to read {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The service refused a seed batch
    #[error("seed rejected: {code}: {message}")]
    Rejected { code: String, message: String },
}

impl CliError {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "PARK_CLI_CONFIG_ERROR",
            CliError::Logging(_) => "PARK_CLI_LOGGING_ERROR",
            CliError::Store(_) => "PARK_CLI_STORE_ERROR",
            CliError::NoDataFile => "PARK_CLI_NO_DATA_FILE",
            CliError::Io(_) | CliError::Input { .. } => "PARK_CLI_IO_ERROR",
            CliError::Json(_) => "PARK_CLI_JSON_ERROR",
            CliError::Rejected { .. } => "PARK_CLI_REJECTED",
        }
    }
}
