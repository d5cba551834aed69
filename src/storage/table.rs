//! Per-collection record tables
//!
//! A `TableState` is plain data: rows ordered by id, the last assigned id and
//! the last issued version token. Ids and tokens only ever grow, so neither
//! is reused after a delete. Store backends wrap states in async locks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::model::{ParkingLot, ParkingSession, RecordId, Vehicle};

use super::errors::{StoreError, StoreResult};
use super::{Record, Version, Versioned};

/// Rows of one collection plus its id and version counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableState<T> {
    rows: BTreeMap<RecordId, Versioned<T>>,
    last_id: RecordId,
    last_version: u64,
}

impl<T> Default for TableState<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
            last_version: 0,
        }
    }
}

impl<T: Record> TableState<T> {
    fn next_version(&mut self) -> Version {
        self.last_version += 1;
        Version::new(self.last_version)
    }

    /// Assigns a fresh id and version, then stores the record.
    pub fn insert(&mut self, mut record: T) -> Versioned<T> {
        self.last_id += 1;
        record.set_id(self.last_id);
        let stored = Versioned {
            record,
            version: self.next_version(),
        };
        self.rows.insert(self.last_id, stored.clone());
        stored
    }

    pub fn insert_all(&mut self, records: Vec<T>) -> Vec<Versioned<T>> {
        records.into_iter().map(|r| self.insert(r)).collect()
    }

    pub fn get(&self, id: RecordId) -> Option<&Versioned<T>> {
        self.rows.get(&id)
    }

    /// Records in id order, skipping `offset` and returning at most `limit`.
    pub fn page(&self, offset: usize, limit: usize) -> Vec<T> {
        self.rows
            .values()
            .skip(offset)
            .take(limit)
            .map(|row| row.record.clone())
            .collect()
    }

    pub fn all(&self) -> Vec<T> {
        self.rows.values().map(|row| row.record.clone()).collect()
    }

    /// Replaces the record at `id` if its current version is `expected`.
    ///
    /// Returns the new version token.
    pub fn replace(&mut self, id: RecordId, mut record: T, expected: Version) -> StoreResult<Version> {
        let found = match self.rows.get(&id) {
            Some(row) => row.version,
            None => return Err(StoreError::NotFound { kind: T::KIND, id }),
        };
        if found != expected {
            return Err(StoreError::VersionMismatch {
                kind: T::KIND,
                id,
                expected,
                found,
            });
        }

        record.set_id(id);
        let version = self.next_version();
        self.rows.insert(id, Versioned { record, version });
        Ok(version)
    }

    /// Removes the record at `id`; false if there was none.
    pub fn remove(&mut self, id: RecordId) -> bool {
        self.rows.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A table shared between concurrent requests.
#[derive(Debug)]
pub struct Table<T> {
    state: RwLock<TableState<T>>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self::new(TableState::default())
    }
}

impl<T> Table<T> {
    pub fn new(state: TableState<T>) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, TableState<T>> {
        self.state.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, TableState<T>> {
        self.state.write().await
    }
}

/// The three collections of a store.
#[derive(Debug, Default)]
pub struct Tables {
    pub(crate) parking_lots: Table<ParkingLot>,
    pub(crate) vehicles: Table<Vehicle>,
    pub(crate) parking_sessions: Table<ParkingSession>,
}

impl Tables {
    pub fn from_snapshot(snapshot: TablesSnapshot) -> Self {
        Self {
            parking_lots: Table::new(snapshot.parking_lots),
            vehicles: Table::new(snapshot.vehicles),
            parking_sessions: Table::new(snapshot.parking_sessions),
        }
    }

    /// Copies every collection.
    ///
    /// Collections are read one after another; callers that need a consistent
    /// cross-collection copy must exclude writers themselves.
    pub async fn snapshot(&self) -> TablesSnapshot {
        TablesSnapshot {
            parking_lots: self.parking_lots.read().await.clone(),
            vehicles: self.vehicles.read().await.clone(),
            parking_sessions: self.parking_sessions.read().await.clone(),
        }
    }
}

/// Borrowed view of all collections.
///
/// Serializes exactly like `TablesSnapshot`, without copying the rows.
#[derive(Debug, Serialize)]
pub struct TablesView<'a> {
    pub parking_lots: &'a TableState<ParkingLot>,
    pub vehicles: &'a TableState<Vehicle>,
    pub parking_sessions: &'a TableState<ParkingSession>,
}

/// Owned copy of all collections; the persisted form of a store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TablesSnapshot {
    pub parking_lots: TableState<ParkingLot>,
    pub vehicles: TableState<Vehicle>,
    pub parking_sessions: TableState<ParkingSession>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn lot(name: &str) -> ParkingLot {
        ParkingLot {
            id: 0,
            name: name.to_string(),
            address: "Main St".to_string(),
            total_slots: 10,
            available_slots: 10,
            is_covered: false,
            last_maintenance: Utc::now(),
        }
    }

    #[test]
    fn test_insert_assigns_increasing_ids_and_versions() {
        let mut table = TableState::default();
        let a = table.insert(lot("a"));
        let b = table.insert(lot("b"));
        assert_eq!(a.record.id, 1);
        assert_eq!(b.record.id, 2);
        assert!(a.version < b.version);
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let mut table = TableState::default();
        table.insert(lot("a"));
        let b = table.insert(lot("b"));
        assert!(table.remove(b.record.id));
        let c = table.insert(lot("c"));
        assert_eq!(c.record.id, 3);
    }

    #[test]
    fn test_page_follows_insertion_order() {
        let mut table = TableState::default();
        for name in ["a", "b", "c", "d", "e"] {
            table.insert(lot(name));
        }
        let names: Vec<_> = table.page(1, 2).into_iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["b", "c"]);
        assert!(table.page(10, 2).is_empty());
    }

    #[test]
    fn test_replace_checks_version() {
        let mut table = TableState::default();
        let stored = table.insert(lot("a"));

        let v1 = table
            .replace(stored.record.id, lot("renamed"), stored.version)
            .unwrap();
        assert!(v1 > stored.version);
        assert_eq!(table.get(1).unwrap().record.name, "renamed");
        // id is forced to the addressed row
        assert_eq!(table.get(1).unwrap().record.id, 1);

        let stale = table.replace(1, lot("again"), stored.version);
        assert!(matches!(stale, Err(StoreError::VersionMismatch { found, .. }) if found == v1));
        assert_eq!(table.get(1).unwrap().record.name, "renamed");
    }

    #[test]
    fn test_replace_missing_row() {
        let mut table: TableState<ParkingLot> = TableState::default();
        let result = table.replace(9, lot("x"), Version::new(1));
        assert!(matches!(result, Err(StoreError::NotFound { id: 9, .. })));
    }

    #[test]
    fn test_state_survives_json_round_trip() {
        let mut table = TableState::default();
        table.insert(lot("a"));
        table.insert(lot("b"));
        table.remove(1);

        let json = serde_json::to_string(&table).unwrap();
        let mut restored: TableState<ParkingLot> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.len(), 1);
        assert_eq!(restored.insert(lot("c")).record.id, 3);
    }
}
