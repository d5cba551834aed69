//! Parking session operations.
//!
//! Reads return `SessionDetails`: the session joined with its lot and
//! vehicle by explicit point lookups. A reference that no longer resolves
//! joins as `None`.

use std::collections::HashMap;

use crate::model::{
    ParkingLot, ParkingSession, ParkingSessionDraft, RecordId, SessionDetails, Vehicle,
};
use crate::storage::{ParkingStore, Version, Versioned};

use super::bulk::ensure_not_empty;
use super::errors::{ServiceError, ServiceResult};
use super::guard::check_embedded_id;
use super::pagination::PageRequest;
use super::search::SearchTerm;
use super::ParkingService;

impl<S: ParkingStore> ParkingService<S> {
    pub async fn list_parking_sessions(
        &self,
        page: PageRequest,
    ) -> ServiceResult<Vec<SessionDetails>> {
        let sessions = self.page::<ParkingSession>(page).await?;
        self.join_sessions(sessions).await
    }

    /// The session at `id` with its lot and vehicle.
    pub async fn get_parking_session(
        &self,
        id: RecordId,
    ) -> ServiceResult<Versioned<SessionDetails>> {
        let stored = self.fetch::<ParkingSession>(id).await?;
        let details = self.join_session(stored.record).await?;
        Ok(Versioned {
            record: details,
            version: stored.version,
        })
    }

    pub async fn create_parking_session(
        &self,
        draft: ParkingSessionDraft,
    ) -> ServiceResult<Versioned<ParkingSession>> {
        let session = draft.validate().map_err(ServiceError::Validation)?;
        self.check_references(&session).await?;
        self.insert(session).await
    }

    /// Replaces the session at `id` and returns its new version token.
    pub async fn update_parking_session(
        &self,
        id: RecordId,
        draft: ParkingSessionDraft,
        expected: Option<Version>,
    ) -> ServiceResult<Version> {
        check_embedded_id(id, draft.id)?;
        let session = draft.validate().map_err(ServiceError::Validation)?;
        let expected = self.expected_version::<ParkingSession>(id, expected).await?;
        self.check_references(&session).await?;
        self.commit_replace(id, session, expected).await
    }

    pub async fn delete_parking_session(&self, id: RecordId) -> ServiceResult<()> {
        self.remove::<ParkingSession>(id).await
    }

    /// Sessions whose vehicle's plate number contains `term`.
    ///
    /// An absent or empty term returns every session, including those whose
    /// vehicle no longer exists.
    pub async fn search_parking_sessions(
        &self,
        term: &SearchTerm,
    ) -> ServiceResult<Vec<SessionDetails>> {
        if term.is_unrestricted() {
            let sessions = self.scan::<ParkingSession>().await?;
            return self.join_sessions(sessions).await;
        }

        let vehicles: HashMap<RecordId, Vehicle> = self
            .scan::<Vehicle>()
            .await?
            .into_iter()
            .filter(|v| term.matches(&v.plate_number))
            .map(|v| (v.id, v))
            .collect();
        if vehicles.is_empty() {
            return Ok(Vec::new());
        }

        let sessions = self.scan::<ParkingSession>().await?;
        let mut lots = HashMap::new();
        let mut joined = Vec::new();
        for session in sessions {
            let Some(vehicle) = vehicles.get(&session.vehicle_id) else {
                continue;
            };
            let vehicle = Some(vehicle.clone());
            let parking_lot = self
                .lookup_cached::<ParkingLot>(&mut lots, session.parking_lot_id)
                .await?;
            joined.push(SessionDetails {
                session,
                parking_lot,
                vehicle,
            });
        }
        Ok(joined)
    }

    /// Creates every session or none.
    ///
    /// Each item is validated, then its references checked, in order; the
    /// first failure names the item's position.
    pub async fn bulk_create_parking_sessions(
        &self,
        drafts: Vec<ParkingSessionDraft>,
    ) -> ServiceResult<Vec<ParkingSession>> {
        ensure_not_empty(&drafts)?;
        let mut sessions = Vec::with_capacity(drafts.len());
        for (index, draft) in drafts.into_iter().enumerate() {
            let session = draft
                .validate()
                .map_err(|errors| ServiceError::Validation(errors).at_batch_index(index))?;
            self.check_references(&session)
                .await
                .map_err(|err| err.at_batch_index(index))?;
            sessions.push(session);
        }
        self.insert_batch(sessions).await
    }

    async fn join_session(&self, session: ParkingSession) -> ServiceResult<SessionDetails> {
        let parking_lot = self
            .lookup::<ParkingLot>(session.parking_lot_id)
            .await?
            .map(|v| v.record);
        let vehicle = self
            .lookup::<Vehicle>(session.vehicle_id)
            .await?
            .map(|v| v.record);
        Ok(SessionDetails {
            session,
            parking_lot,
            vehicle,
        })
    }

    /// Joins a page of sessions, looking each distinct lot and vehicle up once.
    async fn join_sessions(
        &self,
        sessions: Vec<ParkingSession>,
    ) -> ServiceResult<Vec<SessionDetails>> {
        let mut lots = HashMap::new();
        let mut vehicles = HashMap::new();
        let mut joined = Vec::with_capacity(sessions.len());
        for session in sessions {
            let parking_lot = self
                .lookup_cached::<ParkingLot>(&mut lots, session.parking_lot_id)
                .await?;
            let vehicle = self
                .lookup_cached::<Vehicle>(&mut vehicles, session.vehicle_id)
                .await?;
            joined.push(SessionDetails {
                session,
                parking_lot,
                vehicle,
            });
        }
        Ok(joined)
    }
}
