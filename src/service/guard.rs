//! Optimistic concurrency for updates.
//!
//! An update is a two-step affair: `expected_version` pins the token the
//! command is based on, `commit_replace` swaps the record only if the store
//! still holds that token. Nothing is retried.

use crate::model::RecordId;
use crate::storage::{ParkingStore, Record, RecordStore, Version};

use super::errors::{ServiceError, ServiceResult};
use super::ParkingService;

/// Rejects an update whose payload does not carry the addressed id.
///
/// A payload without an id is a mismatch too.
pub fn check_embedded_id(addressed: RecordId, embedded: Option<RecordId>) -> ServiceResult<()> {
    match embedded {
        Some(id) if id == addressed => Ok(()),
        _ => Err(ServiceError::IdMismatch {
            addressed,
            embedded,
        }),
    }
}

impl<S: ParkingStore> ParkingService<S> {
    /// The token an update of `id` must commit against.
    ///
    /// Existence is checked first. Without an explicit `expected` token the
    /// current one is used, which still catches writes landing between this
    /// read and the commit.
    pub(crate) async fn expected_version<T: Record>(
        &self,
        id: RecordId,
        expected: Option<Version>,
    ) -> ServiceResult<Version>
    where
        S: RecordStore<T>,
    {
        let current = self.fetch::<T>(id).await?;
        match expected {
            Some(expected) if expected != current.version => {
                Err(ServiceError::ConcurrencyConflict {
                    kind: T::KIND,
                    id,
                    expected,
                    found: current.version,
                })
            }
            Some(expected) => Ok(expected),
            None => Ok(current.version),
        }
    }

    pub(crate) async fn commit_replace<T: Record>(
        &self,
        id: RecordId,
        record: T,
        expected: Version,
    ) -> ServiceResult<Version>
    where
        S: RecordStore<T>,
    {
        let version =
            <S as RecordStore<T>>::replace(self.store.as_ref(), id, record, expected).await?;
        tracing::info!(
            event = "record_updated",
            collection = T::KIND.collection(),
            id,
            from_version = expected.value(),
            to_version = version.value(),
        );
        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_embedded_id_passes() {
        assert!(check_embedded_id(7, Some(7)).is_ok());
    }

    #[test]
    fn test_absent_embedded_id_is_rejected() {
        let err = check_embedded_id(7, None).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::IdMismatch {
                addressed: 7,
                embedded: None
            }
        ));
    }

    #[test]
    fn test_different_embedded_id_is_rejected() {
        let err = check_embedded_id(7, Some(8)).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::IdMismatch {
                addressed: 7,
                embedded: Some(8)
            }
        ));
    }
}
