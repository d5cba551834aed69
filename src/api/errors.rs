//! Command envelope errors
//!
//! These cover commands that never reach the service: unparseable JSON,
//! unknown operations, missing envelope fields and record payloads of the
//! wrong shape. Service failures pass through unchanged, keeping their codes.

use thiserror::Error;

use crate::service::{ResultCode, ServiceError};

/// Result type for command parsing
pub type ApiResult<T> = Result<T, ApiError>;

/// Command envelope errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// The line is not a JSON command object
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// `op` names no known operation
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// A field the operation needs is absent
    #[error("'{field}' is required for '{op}'")]
    MissingField {
        op: &'static str,
        field: &'static str,
    },

    /// A record payload does not have the record's shape
    #[error("malformed record: {0}")]
    MalformedRecord(#[source] serde_json::Error),

    /// A batch item does not have the record's shape
    #[error("malformed batch item {index}: {source}")]
    MalformedBatchItem {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Reply payload could not be encoded
    #[error("reply encoding failed: {0}")]
    ReplyEncoding(#[source] serde_json::Error),

    /// Pass-through from the service layer
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ApiError {
    pub fn invalid_command(reason: impl Into<String>) -> Self {
        ApiError::InvalidCommand(reason.into())
    }

    /// Stable error code for replies
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidCommand(_) => "PARK_INVALID_COMMAND",
            ApiError::UnknownOperation(_) => "PARK_UNKNOWN_OPERATION",
            ApiError::MissingField { .. } => "PARK_MISSING_FIELD",
            ApiError::MalformedRecord(_) => "PARK_MALFORMED_RECORD",
            ApiError::MalformedBatchItem { .. } => "PARK_MALFORMED_BATCH_ITEM",
            ApiError::ReplyEncoding(_) => "PARK_REPLY_ENCODING_FAILED",
            ApiError::Service(err) => err.code(),
        }
    }

    pub fn result_code(&self) -> ResultCode {
        match self {
            ApiError::Service(err) => err.result_code(),
            ApiError::ReplyEncoding(_) => ResultCode::Unavailable,
            _ => ResultCode::Invalid,
        }
    }
}
