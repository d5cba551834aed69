//! Referential integrity between sessions and the records they reference.
//!
//! Checks are plain reads taken before the write; a concurrent delete of the
//! referenced lot or vehicle can still slip in between check and commit.

use std::fmt;

use serde::Serialize;

use crate::model::{ParkingLot, ParkingSession, RecordId, RecordKind, Vehicle};
use crate::storage::ParkingStore;

use super::errors::{ServiceError, ServiceResult};
use super::{DeletePolicy, ParkingService};

/// A foreign key pointing at a record that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingReference {
    pub field: &'static str,
    pub kind: RecordKind,
    pub id: RecordId,
}

impl fmt::Display for MissingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' refers to missing {} {}", self.field, self.kind, self.id)
    }
}

/// Every dangling reference of one record, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MissingReferences(Vec<MissingReference>);

impl MissingReferences {
    pub fn new(missing: Vec<MissingReference>) -> Self {
        Self(missing)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MissingReference> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if a reference through `field` is missing.
    pub fn mentions(&self, field: &str) -> bool {
        self.0.iter().any(|m| m.field == field)
    }
}

impl fmt::Display for MissingReferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, missing) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", missing)?;
        }
        Ok(())
    }
}

impl<S: ParkingStore> ParkingService<S> {
    /// Fails with `ForeignKeyViolation` unless both the lot and the vehicle exist.
    pub(crate) async fn check_references(&self, session: &ParkingSession) -> ServiceResult<()> {
        let mut missing = Vec::new();
        if self
            .lookup::<ParkingLot>(session.parking_lot_id)
            .await?
            .is_none()
        {
            missing.push(MissingReference {
                field: "parkingLotId",
                kind: RecordKind::ParkingLot,
                id: session.parking_lot_id,
            });
        }
        if self.lookup::<Vehicle>(session.vehicle_id).await?.is_none() {
            missing.push(MissingReference {
                field: "vehicleId",
                kind: RecordKind::Vehicle,
                id: session.vehicle_id,
            });
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::ForeignKeyViolation(MissingReferences::new(
                missing,
            )))
        }
    }

    /// Applies the delete policy to a lot or vehicle about to be removed.
    ///
    /// `references` selects the sessions pointing at the record.
    pub(crate) async fn ensure_unreferenced<F>(
        &self,
        kind: RecordKind,
        id: RecordId,
        references: F,
    ) -> ServiceResult<()>
    where
        F: Fn(&ParkingSession) -> bool + Send,
    {
        if self.settings.delete_policy == DeletePolicy::Unrestricted {
            return Ok(());
        }
        let dependents = self
            .scan::<ParkingSession>()
            .await?
            .iter()
            .filter(|s| references(s))
            .count();
        if dependents > 0 {
            return Err(ServiceError::DeleteRestricted {
                kind,
                id,
                dependents,
            });
        }
        Ok(())
    }
}
