//! Storage error types
//!
//! Two families:
//! - rejections (`NotFound`, `VersionMismatch`): the store is healthy, the write
//!   was refused and nothing changed
//! - failures (`Io`, `Corrupted`, `Encoding`): the store cannot serve the
//!   request; callers surface these as unavailability and never retry

use std::io;

use thiserror::Error;

use crate::model::{RecordId, RecordKind};

use super::Version;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record at the addressed id
    #[error("{kind} {id} not found")]
    NotFound { kind: RecordKind, id: RecordId },

    /// The stored version token differs from the expected one
    #[error("{kind} {id} was modified concurrently (expected version {expected}, found {found})")]
    VersionMismatch {
        kind: RecordKind,
        id: RecordId,
        expected: Version,
        found: Version,
    },

    /// Disk I/O failure
    #[error("storage I/O failed: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Persisted data failed its integrity checks
    #[error("storage data corrupted: {0}")]
    Corrupted(String),

    /// Snapshot could not be encoded or decoded
    #[error("snapshot encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl StoreError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn corrupted(msg: impl Into<String>) -> Self {
        Self::Corrupted(msg.into())
    }

    /// True if the store itself failed, as opposed to refusing a write.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            StoreError::Io { .. } | StoreError::Corrupted(_) | StoreError::Encoding(_)
        )
    }

    /// Stable error code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::NotFound { .. } => "PARK_STORE_NOT_FOUND",
            StoreError::VersionMismatch { .. } => "PARK_STORE_VERSION_MISMATCH",
            StoreError::Io { .. } => "PARK_STORE_IO_ERROR",
            StoreError::Corrupted(_) => "PARK_STORE_CORRUPTED",
            StoreError::Encoding(_) => "PARK_STORE_ENCODING_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_are_not_unavailability() {
        let err = StoreError::NotFound {
            kind: RecordKind::Vehicle,
            id: 4,
        };
        assert!(!err.is_unavailable());
        assert_eq!(err.to_string(), "vehicle 4 not found");

        let err = StoreError::VersionMismatch {
            kind: RecordKind::ParkingLot,
            id: 1,
            expected: Version::new(2),
            found: Version::new(3),
        };
        assert!(!err.is_unavailable());
        assert_eq!(err.code(), "PARK_STORE_VERSION_MISMATCH");
    }

    #[test]
    fn test_failures_are_unavailability() {
        let err = StoreError::io("open", io::Error::new(io::ErrorKind::Other, "disk gone"));
        assert!(err.is_unavailable());
        assert!(err.to_string().contains("disk gone"));

        assert!(StoreError::corrupted("bad checksum").is_unavailable());
    }
}
