//! In-memory record store

use crate::model::RecordId;

use super::errors::StoreResult;
use super::table::{Tables, TablesSnapshot};
use super::{Record, RecordStore, Version, Versioned};

/// Process-local store; contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Tables,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store pre-populated from a snapshot.
    pub fn from_snapshot(snapshot: TablesSnapshot) -> Self {
        Self {
            tables: Tables::from_snapshot(snapshot),
        }
    }

    pub async fn snapshot(&self) -> TablesSnapshot {
        self.tables.snapshot().await
    }
}

impl<T: Record> RecordStore<T> for MemoryStore {
    async fn insert(&self, record: T) -> StoreResult<Versioned<T>> {
        Ok(T::table(&self.tables).write().await.insert(record))
    }

    async fn insert_all(&self, records: Vec<T>) -> StoreResult<Vec<Versioned<T>>> {
        // one write guard for the whole batch: no reader sees a partial batch
        Ok(T::table(&self.tables).write().await.insert_all(records))
    }

    async fn get(&self, id: RecordId) -> StoreResult<Option<Versioned<T>>> {
        Ok(T::table(&self.tables).read().await.get(id).cloned())
    }

    async fn list(&self, offset: usize, limit: usize) -> StoreResult<Vec<T>> {
        Ok(T::table(&self.tables).read().await.page(offset, limit))
    }

    async fn scan(&self) -> StoreResult<Vec<T>> {
        Ok(T::table(&self.tables).read().await.all())
    }

    async fn replace(&self, id: RecordId, record: T, expected: Version) -> StoreResult<Version> {
        T::table(&self.tables)
            .write()
            .await
            .replace(id, record, expected)
    }

    async fn remove(&self, id: RecordId) -> StoreResult<bool> {
        Ok(T::table(&self.tables).write().await.remove(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Vehicle;
    use crate::storage::StoreError;
    use chrono::Utc;

    fn vehicle(plate: &str) -> Vehicle {
        Vehicle {
            id: 0,
            plate_number: plate.to_string(),
            owner_name: "Maria Ivanova".to_string(),
            model: "Yaris".to_string(),
            vehicle_type: "hatchback".to_string(),
            color: "red".to_string(),
            registration_date: Utc::now(),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let store = MemoryStore::new();
        let stored = store.insert(vehicle("PB0001AA")).await.unwrap();

        let fetched = RecordStore::<Vehicle>::get(&store, stored.record.id)
            .await
            .unwrap();
        assert_eq!(fetched, Some(stored));
    }

    #[tokio::test]
    async fn test_replace_with_stale_version() {
        let store = MemoryStore::new();
        let stored = store.insert(vehicle("PB0001AA")).await.unwrap();

        store
            .replace(1, vehicle("PB0001AB"), stored.version)
            .await
            .unwrap();
        let err = store
            .replace(1, vehicle("PB0001AC"), stored.version)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::VersionMismatch { .. }));
    }

    #[tokio::test]
    async fn test_remove_twice() {
        let store = MemoryStore::new();
        store.insert(vehicle("PB0001AA")).await.unwrap();
        assert!(RecordStore::<Vehicle>::remove(&store, 1).await.unwrap());
        assert!(!RecordStore::<Vehicle>::remove(&store, 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_snapshot_round_trip() {
        let store = MemoryStore::new();
        store.insert(vehicle("PB0001AA")).await.unwrap();
        let copy = MemoryStore::from_snapshot(store.snapshot().await);
        let all = RecordStore::<Vehicle>::scan(&copy).await.unwrap();
        assert_eq!(all.len(), 1);
    }
}
