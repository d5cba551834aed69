//! Record storage for the parking registry
//!
//! A store holds three collections (lots, vehicles, sessions), each keyed by a
//! store-assigned integer id and kept in insertion order. Every stored record
//! carries a version token that changes on each replacement; `replace` is a
//! compare-and-swap on that token and is the only way to overwrite a record.
//!
//! Two backends implement `RecordStore`:
//! - `MemoryStore`: process-local, used by tests and the `memory` config
//! - `FileStore`: checksummed JSON snapshot, written atomically on every mutation

mod errors;
mod file;
mod memory;
mod record;
mod table;

pub use errors::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use record::Record;
pub use table::{Table, TableState, Tables, TablesSnapshot, TablesView};

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::model::RecordId;

/// Opaque per-record modification marker.
///
/// Tokens are issued from a per-collection counter and never repeat.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(u64);

impl Version {
    #[inline]
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A record together with its current version token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Versioned<T> {
    pub record: T,
    pub version: Version,
}

impl<T> Versioned<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Versioned<U> {
        Versioned {
            record: f(self.record),
            version: self.version,
        }
    }
}

/// Persistence contract for one record type.
///
/// Every method is a suspension point. Writes are atomic per call:
/// `insert_all` persists the whole batch or nothing.
pub trait RecordStore<T: Record>: Send + Sync {
    /// Assigns a fresh id and stores the record.
    fn insert(&self, record: T) -> impl Future<Output = StoreResult<Versioned<T>>> + Send;

    /// Stores every record, each with a fresh id, as one atomic write.
    fn insert_all(
        &self,
        records: Vec<T>,
    ) -> impl Future<Output = StoreResult<Vec<Versioned<T>>>> + Send;

    fn get(&self, id: RecordId) -> impl Future<Output = StoreResult<Option<Versioned<T>>>> + Send;

    /// Records in insertion order, skipping `offset`, at most `limit`.
    fn list(&self, offset: usize, limit: usize) -> impl Future<Output = StoreResult<Vec<T>>> + Send;

    /// Every record in insertion order.
    fn scan(&self) -> impl Future<Output = StoreResult<Vec<T>>> + Send;

    /// Replaces the record at `id` if its version is still `expected`.
    ///
    /// Fails with `NotFound` or `VersionMismatch`; returns the new token.
    fn replace(
        &self,
        id: RecordId,
        record: T,
        expected: Version,
    ) -> impl Future<Output = StoreResult<Version>> + Send;

    /// Removes the record; `false` if no record existed at `id`.
    fn remove(&self, id: RecordId) -> impl Future<Output = StoreResult<bool>> + Send;
}

/// A store holding all three record collections.
pub trait ParkingStore:
    RecordStore<crate::model::ParkingLot>
    + RecordStore<crate::model::Vehicle>
    + RecordStore<crate::model::ParkingSession>
    + 'static
{
}

impl<S> ParkingStore for S where
    S: RecordStore<crate::model::ParkingLot>
        + RecordStore<crate::model::Vehicle>
        + RecordStore<crate::model::ParkingSession>
        + 'static
{
}
