//! File-backed record store
//!
//! The whole store is persisted as one JSON snapshot:
//!
//! ```text
//! {"format":1,"checksum":<crc32 of payload>,"payload":"<snapshot json>"}
//! ```
//!
//! Every mutation is applied to a copy of the affected collection, the whole
//! store is written to `<file>.tmp`, fsynced and renamed over `<file>`, the
//! directory is fsynced, and only then is the copy swapped into the live
//! tables. A failed write therefore leaves both the file and the
//! in-memory state untouched. Mutations are serialized by a single writer lock;
//! reads never wait for disk.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::model::RecordId;

use super::errors::{StoreError, StoreResult};
use super::table::{TableState, Tables, TablesSnapshot, TablesView};
use super::{Record, RecordStore, Version, Versioned};

const FORMAT_VERSION: u32 = 1;

/// CRC32 (IEEE) of the serialized tables, as stored in `SnapshotFile::checksum`.
fn payload_checksum(payload: &str) -> u32 {
    crc32fast::hash(payload.as_bytes())
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    format: u32,
    checksum: u32,
    payload: String,
}

/// Durable store backed by a single snapshot file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    tables: Tables,
    writer: Mutex<()>,
}

impl FileStore {
    /// Opens the store at `path`, starting empty if the file does not exist.
    ///
    /// # Errors
    ///
    /// `Corrupted` if the file fails its format or checksum checks,
    /// `Io` if it cannot be read.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let snapshot = match fs::try_exists(&path).await {
            Ok(true) => read_snapshot(&path).await?,
            Ok(false) => TablesSnapshot::default(),
            Err(e) => return Err(StoreError::io(format!("stat {}", path.display()), e)),
        };

        Ok(Self {
            path,
            tables: Tables::from_snapshot(snapshot),
            writer: Mutex::new(()),
        })
    }

    /// Writes an empty snapshot to `path`.
    ///
    /// Creates parent directories if needed. Overwrites nothing: an existing
    /// file is left alone and reported as an error.
    pub async fn initialize(path: &Path) -> StoreResult<()> {
        if fs::try_exists(path)
            .await
            .map_err(|e| StoreError::io(format!("stat {}", path.display()), e))?
        {
            return Err(StoreError::io(
                format!("initialize {}", path.display()),
                std::io::Error::new(std::io::ErrorKind::AlreadyExists, "data file already exists"),
            ));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(format!("create {}", parent.display()), e))?;
        }
        write_snapshot(path, &TablesSnapshot::default()).await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `change` to a copy of `T`'s table, persists, then publishes.
    ///
    /// Only `T`'s table is copied; the others are written through read guards.
    async fn mutate<T, R, F>(&self, change: F) -> StoreResult<R>
    where
        T: Record,
        R: Send,
        F: FnOnce(&mut TableState<T>) -> StoreResult<R> + Send,
    {
        let _writer = self.writer.lock().await;

        let mut updated = T::table(&self.tables).read().await.clone();
        let outcome = change(&mut updated)?;
        {
            let parking_lots = self.tables.parking_lots.read().await;
            let vehicles = self.tables.vehicles.read().await;
            let parking_sessions = self.tables.parking_sessions.read().await;
            let mut view = TablesView {
                parking_lots: &parking_lots,
                vehicles: &vehicles,
                parking_sessions: &parking_sessions,
            };
            *T::view_slot(&mut view) = &updated;
            write_snapshot(&self.path, &view).await?;
        }

        *T::table(&self.tables).write().await = updated;

        Ok(outcome)
    }
}

async fn read_snapshot(path: &Path) -> StoreResult<TablesSnapshot> {
    let bytes = fs::read(path)
        .await
        .map_err(|e| StoreError::io(format!("read {}", path.display()), e))?;

    let file: SnapshotFile = serde_json::from_slice(&bytes)
        .map_err(|e| StoreError::corrupted(format!("{}: {}", path.display(), e)))?;

    if file.format != FORMAT_VERSION {
        return Err(StoreError::corrupted(format!(
            "{}: unsupported format {} (expected {})",
            path.display(),
            file.format,
            FORMAT_VERSION
        )));
    }
    if payload_checksum(&file.payload) != file.checksum {
        return Err(StoreError::corrupted(format!(
            "{}: checksum mismatch",
            path.display()
        )));
    }

    serde_json::from_str(&file.payload)
        .map_err(|e| StoreError::corrupted(format!("{}: {}", path.display(), e)))
}

async fn write_snapshot<S: Serialize + Sync>(path: &Path, snapshot: &S) -> StoreResult<()> {
    let payload = serde_json::to_string(snapshot)?;
    let file = SnapshotFile {
        format: FORMAT_VERSION,
        checksum: payload_checksum(&payload),
        payload,
    };
    let bytes = serde_json::to_vec(&file)?;

    let tmp = path.with_extension("tmp");
    let mut out = fs::File::create(&tmp)
        .await
        .map_err(|e| StoreError::io(format!("create {}", tmp.display()), e))?;
    out.write_all(&bytes)
        .await
        .map_err(|e| StoreError::io(format!("write {}", tmp.display()), e))?;
    out.sync_all()
        .await
        .map_err(|e| StoreError::io(format!("fsync {}", tmp.display()), e))?;
    drop(out);

    fs::rename(&tmp, path)
        .await
        .map_err(|e| StoreError::io(format!("rename {}", tmp.display()), e))?;
    sync_parent_dir(path).await
}

/// fsync the directory holding `path` so a rename into it is durable.
async fn sync_parent_dir(path: &Path) -> StoreResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let handle = fs::File::open(dir)
        .await
        .map_err(|e| StoreError::io(format!("open directory {}", dir.display()), e))?;
    handle
        .sync_all()
        .await
        .map_err(|e| StoreError::io(format!("fsync directory {}", dir.display()), e))
}

impl<T: Record> RecordStore<T> for FileStore {
    async fn insert(&self, record: T) -> StoreResult<Versioned<T>> {
        self.mutate(move |table: &mut TableState<T>| Ok(table.insert(record)))
            .await
    }

    async fn insert_all(&self, records: Vec<T>) -> StoreResult<Vec<Versioned<T>>> {
        self.mutate(move |table: &mut TableState<T>| Ok(table.insert_all(records)))
            .await
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
        self.mutate(move |table: &mut TableState<T>| table.replace(id, record, expected))
            .await
    }

    async fn remove(&self, id: RecordId) -> StoreResult<bool> {
        self.mutate(move |table: &mut TableState<T>| Ok(table.remove(id)))
            .await
    }
}
