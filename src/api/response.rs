//! Command replies
//!
//! Every command produces exactly one reply line carrying the outcome code,
//! the payload on success, the version token where one applies, and error
//! details on failure.

use serde::Serialize;
use serde_json::Value;

use crate::model::FieldErrors;
use crate::service::{MissingReferences, ResultCode, ServiceError};
use crate::storage::Version;

use super::errors::ApiError;

/// Failure details of a reply
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
    /// 0-based position of the rejected batch item
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<MissingReferences>,
}

/// One reply line
#[derive(Debug, Clone, Serialize)]
pub struct Reply {
    pub status: ResultCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl Reply {
    pub fn ok(data: Value) -> Self {
        Self::success(ResultCode::Ok, Some(data), None)
    }

    pub fn created(data: Value, version: Option<Version>) -> Self {
        Self::success(ResultCode::Created, Some(data), version)
    }

    pub fn no_content(version: Option<Version>) -> Self {
        Self::success(ResultCode::NoContent, None, version)
    }

    /// Success carrying a version token beside the payload
    pub fn versioned(data: Value, version: Version) -> Self {
        Self::success(ResultCode::Ok, Some(data), Some(version))
    }

    fn success(status: ResultCode, data: Option<Value>, version: Option<Version>) -> Self {
        Self {
            status,
            data,
            version,
            error: None,
        }
    }

    pub fn from_service_error(err: &ServiceError) -> Self {
        let item = match err {
            ServiceError::InvalidBatchItem { index, .. } => Some(*index),
            _ => None,
        };
        Self {
            status: err.result_code(),
            data: None,
            version: None,
            error: Some(ErrorInfo {
                code: err.code().to_string(),
                message: err.to_string(),
                fields: err.field_errors().cloned(),
                item,
                references: err.missing_references().cloned(),
            }),
        }
    }

    pub fn from_error(err: &ApiError) -> Self {
        if let ApiError::Service(err) = err {
            return Self::from_service_error(err);
        }
        let item = match err {
            ApiError::MalformedBatchItem { index, .. } => Some(*index),
            _ => None,
        };
        Self {
            status: err.result_code(),
            data: None,
            version: None,
            error: Some(ErrorInfo {
                code: err.code().to_string(),
                message: err.to_string(),
                fields: None,
                item,
                references: None,
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Convert to a single JSON line
    pub fn to_json(&self) -> String {
        match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => encoding_failure(&e.to_string()),
        }
    }
}

/// Reply line used when a reply itself cannot be serialized.
fn encoding_failure(message: &str) -> String {
    serde_json::json!({
        "status": ResultCode::Unavailable,
        "error": {
            "code": "PARK_REPLY_ENCODING_FAILED",
            "message": message,
        },
    })
    .to_string()
}
