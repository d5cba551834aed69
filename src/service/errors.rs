//! # Service Errors
//!
//! Every failure of the service layer is local and side-effect free: the
//! command is rejected before anything is committed. Only `StoreUnavailable`
//! signals a broken store; it is never retried here.

use serde::Serialize;
use thiserror::Error;

use crate::model::{FieldErrors, RecordId, RecordKind};
use crate::storage::{StoreError, Version};

use super::integrity::MissingReferences;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service layer errors
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Required field missing, blank, or too long
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// Update addressed one id but the record carries another
    #[error("record id {embedded:?} does not match addressed id {addressed}")]
    IdMismatch {
        addressed: RecordId,
        embedded: Option<RecordId>,
    },

    /// No record at the addressed id
    #[error("{kind} {id} not found")]
    NotFound { kind: RecordKind, id: RecordId },

    /// The update was issued against a stale version token
    #[error("{kind} {id} was modified concurrently (expected version {expected}, current {found}); re-fetch and resubmit")]
    ConcurrencyConflict {
        kind: RecordKind,
        id: RecordId,
        expected: Version,
        found: Version,
    },

    /// A parking session references a lot or vehicle that does not exist
    #[error("foreign key violation: {0}")]
    ForeignKeyViolation(MissingReferences),

    /// Bulk create called with zero items
    #[error("batch contains no records")]
    EmptyBatch,

    /// One batch item failed; the whole batch was rejected
    #[error("batch item {index} rejected: {source}")]
    InvalidBatchItem {
        index: usize,
        #[source]
        source: Box<ServiceError>,
    },

    /// Delete refused because parking sessions still reference the record
    #[error("{kind} {id} is referenced by {dependents} parking session(s)")]
    DeleteRestricted {
        kind: RecordKind,
        id: RecordId,
        dependents: usize,
    },

    /// The backing store failed
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { kind, id } => ServiceError::NotFound { kind, id },
            StoreError::VersionMismatch {
                kind,
                id,
                expected,
                found,
            } => ServiceError::ConcurrencyConflict {
                kind,
                id,
                expected,
                found,
            },
            other => ServiceError::StoreUnavailable(other),
        }
    }
}

impl ServiceError {
    /// Wraps this error as the failure of batch item `index`.
    pub fn at_batch_index(self, index: usize) -> Self {
        match self {
            // store failures are not the item's fault
            err @ ServiceError::StoreUnavailable(_) => err,
            err => ServiceError::InvalidBatchItem {
                index,
                source: Box::new(err),
            },
        }
    }

    /// Stable error code for replies and logs
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "PARK_VALIDATION_FAILED",
            ServiceError::IdMismatch { .. } => "PARK_ID_MISMATCH",
            ServiceError::NotFound { .. } => "PARK_NOT_FOUND",
            ServiceError::ConcurrencyConflict { .. } => "PARK_CONCURRENCY_CONFLICT",
            ServiceError::ForeignKeyViolation(_) => "PARK_FOREIGN_KEY_VIOLATION",
            ServiceError::EmptyBatch => "PARK_EMPTY_BATCH",
            ServiceError::InvalidBatchItem { .. } => "PARK_INVALID_BATCH_ITEM",
            ServiceError::DeleteRestricted { .. } => "PARK_DELETE_RESTRICTED",
            ServiceError::StoreUnavailable(_) => "PARK_STORE_UNAVAILABLE",
        }
    }

    /// Transport-neutral outcome for this error
    pub fn result_code(&self) -> ResultCode {
        match self {
            ServiceError::Validation(_)
            | ServiceError::IdMismatch { .. }
            | ServiceError::ForeignKeyViolation(_)
            | ServiceError::EmptyBatch
            | ServiceError::InvalidBatchItem { .. } => ResultCode::Invalid,
            ServiceError::NotFound { .. } => ResultCode::NotFound,
            ServiceError::ConcurrencyConflict { .. } | ServiceError::DeleteRestricted { .. } => {
                ResultCode::Conflict
            }
            ServiceError::StoreUnavailable(_) => ResultCode::Unavailable,
        }
    }

    /// Field errors behind this failure, looking through batch wrapping.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ServiceError::Validation(errors) => Some(errors),
            ServiceError::InvalidBatchItem { source, .. } => source.field_errors(),
            _ => None,
        }
    }

    /// Missing references behind this failure, looking through batch wrapping.
    pub fn missing_references(&self) -> Option<&MissingReferences> {
        match self {
            ServiceError::ForeignKeyViolation(missing) => Some(missing),
            ServiceError::InvalidBatchItem { source, .. } => source.missing_references(),
            _ => None,
        }
    }

    /// Emits one structured log line for a rejected or failed operation.
    pub(crate) fn log(&self, operation: &'static str, kind: RecordKind) {
        if self.result_code() == ResultCode::Unavailable {
            tracing::error!(
                event = "operation_failed",
                operation,
                collection = kind.collection(),
                code = self.code(),
                error = %self,
            );
        } else {
            tracing::warn!(
                event = "operation_rejected",
                operation,
                collection = kind.collection(),
                code = self.code(),
                error = %self,
            );
        }
    }
}

/// Outcome vocabulary shared with the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultCode {
    Ok,
    Created,
    NoContent,
    NotFound,
    Invalid,
    Conflict,
    Unavailable,
}

impl ResultCode {
    /// Conventional HTTP status for this outcome.
    pub fn http_status(&self) -> u16 {
        match self {
            ResultCode::Ok => 200,
            ResultCode::Created => 201,
            ResultCode::NoContent => 204,
            ResultCode::NotFound => 404,
            ResultCode::Invalid => 400,
            ResultCode::Conflict => 409,
            ResultCode::Unavailable => 503,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResultCode::Ok | ResultCode::Created | ResultCode::NoContent)
    }
}
