//! Generic store plumbing shared by the per-record operations.

use std::collections::HashMap;

use crate::model::RecordId;
use crate::storage::{ParkingStore, Record, RecordStore, Versioned};

use super::errors::{ServiceError, ServiceResult};
use super::pagination::PageRequest;
use super::ParkingService;

impl<S: ParkingStore> ParkingService<S> {
    /// One page of `T` in insertion order.
    pub(crate) async fn page<T: Record>(&self, page: PageRequest) -> ServiceResult<Vec<T>>
    where
        S: RecordStore<T>,
    {
        let Some(window) = page.window() else {
            return Ok(Vec::new());
        };
        let records =
            <S as RecordStore<T>>::list(self.store.as_ref(), window.offset, window.limit).await?;
        Ok(records)
    }

    pub(crate) async fn lookup<T: Record>(&self, id: RecordId) -> ServiceResult<Option<Versioned<T>>>
    where
        S: RecordStore<T>,
    {
        Ok(<S as RecordStore<T>>::get(self.store.as_ref(), id).await?)
    }

    /// The record at `id`, or `NotFound`.
    pub(crate) async fn fetch<T: Record>(&self, id: RecordId) -> ServiceResult<Versioned<T>>
    where
        S: RecordStore<T>,
    {
        self.lookup::<T>(id)
            .await?
            .ok_or(ServiceError::NotFound { kind: T::KIND, id })
    }

    /// Point lookup memoized in `cache`, including misses.
    pub(crate) async fn lookup_cached<T: Record>(
        &self,
        cache: &mut HashMap<RecordId, Option<T>>,
        id: RecordId,
    ) -> ServiceResult<Option<T>>
    where
        S: RecordStore<T>,
    {
        if let Some(hit) = cache.get(&id) {
            return Ok(hit.clone());
        }
        let found = self.lookup::<T>(id).await?.map(|v| v.record);
        cache.insert(id, found.clone());
        Ok(found)
    }

    pub(crate) async fn scan<T: Record>(&self) -> ServiceResult<Vec<T>>
    where
        S: RecordStore<T>,
    {
        Ok(<S as RecordStore<T>>::scan(self.store.as_ref()).await?)
    }

    pub(crate) async fn insert<T: Record>(&self, record: T) -> ServiceResult<Versioned<T>>
    where
        S: RecordStore<T>,
    {
        let stored = <S as RecordStore<T>>::insert(self.store.as_ref(), record).await?;
        tracing::info!(
            event = "record_created",
            collection = T::KIND.collection(),
            id = stored.record.id(),
            version = stored.version.value(),
        );
        Ok(stored)
    }

    pub(crate) async fn insert_batch<T: Record>(&self, records: Vec<T>) -> ServiceResult<Vec<T>>
    where
        S: RecordStore<T>,
    {
        let stored = <S as RecordStore<T>>::insert_all(self.store.as_ref(), records).await?;
        tracing::info!(
            event = "batch_created",
            collection = T::KIND.collection(),
            count = stored.len(),
            first_id = stored.first().map(|s| s.record.id()),
            last_id = stored.last().map(|s| s.record.id()),
        );
        Ok(stored.into_iter().map(|s| s.record).collect())
    }

    /// Removes the record at `id`, or fails with `NotFound`.
    pub(crate) async fn remove<T: Record>(&self, id: RecordId) -> ServiceResult<()>
    where
        S: RecordStore<T>,
    {
        if !<S as RecordStore<T>>::remove(self.store.as_ref(), id).await? {
            return Err(ServiceError::NotFound { kind: T::KIND, id });
        }
        tracing::info!(
            event = "record_deleted",
            collection = T::KIND.collection(),
            id,
        );
        Ok(())
    }
}
