//! # Parking Service
//!
//! The persistence and query service layer. It validates command payloads,
//! consults the referential integrity checker and the concurrency guard, and
//! drives the record store. Every public operation is side-effect free on
//! failure.
//!
//! Operations are grouped per record type (`lots`, `vehicles`, `sessions`);
//! the generic store plumbing they share lives in `records`.

mod bulk;
mod errors;
mod guard;
mod integrity;
mod lots;
mod pagination;
mod records;
mod search;
mod sessions;
mod vehicles;

pub use errors::{ResultCode, ServiceError, ServiceResult};
pub use guard::check_embedded_id;
pub use integrity::{MissingReference, MissingReferences};
pub use pagination::{PageRequest, PageWindow, DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};
pub use search::SearchTerm;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::storage::ParkingStore;

/// What happens when a lot or vehicle that sessions still reference is deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletePolicy {
    /// Refuse the delete with `DeleteRestricted`.
    #[default]
    Restrict,
    /// Delete anyway, leaving the sessions dangling.
    Unrestricted,
}

/// Behavioural settings of the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceSettings {
    pub delete_policy: DeletePolicy,
}

/// Service over an injected store handle.
///
/// Cloning is cheap and shares the store.
pub struct ParkingService<S> {
    store: Arc<S>,
    settings: ServiceSettings,
}

impl<S> Clone for ParkingService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            settings: self.settings,
        }
    }
}

impl<S: ParkingStore> ParkingService<S> {
    pub fn new(store: Arc<S>, settings: ServiceSettings) -> Self {
        Self { store, settings }
    }

    /// Service with default settings owning `store`.
    pub fn with_store(store: S) -> Self {
        Self::new(Arc::new(store), ServiceSettings::default())
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn settings(&self) -> ServiceSettings {
        self.settings
    }
}
