//! Parking lot operations.

use crate::model::{ParkingLot, ParkingLotDraft, ParkingSession, RecordId, RecordKind};
use crate::storage::{ParkingStore, Version, Versioned};

use super::bulk::validate_batch;
use super::errors::{ServiceError, ServiceResult};
use super::guard::check_embedded_id;
use super::pagination::PageRequest;
use super::search::SearchTerm;
use super::ParkingService;

/// Slot counts outside `0..=totalSlots` are stored as given, only reported.
fn note_capacity_gap(lot: &ParkingLot) {
    if !lot.slots_within_capacity() {
        tracing::warn!(
            event = "slot_capacity_gap",
            name = %lot.name,
            total_slots = lot.total_slots,
            available_slots = lot.available_slots,
        );
    }
}

impl<S: ParkingStore> ParkingService<S> {
    pub async fn list_parking_lots(&self, page: PageRequest) -> ServiceResult<Vec<ParkingLot>> {
        self.page::<ParkingLot>(page).await
    }

    pub async fn get_parking_lot(&self, id: RecordId) -> ServiceResult<Versioned<ParkingLot>> {
        self.fetch::<ParkingLot>(id).await
    }

    pub async fn create_parking_lot(
        &self,
        draft: ParkingLotDraft,
    ) -> ServiceResult<Versioned<ParkingLot>> {
        let lot = draft.validate().map_err(ServiceError::Validation)?;
        note_capacity_gap(&lot);
        self.insert(lot).await
    }

    /// Replaces the lot at `id` and returns its new version token.
    pub async fn update_parking_lot(
        &self,
        id: RecordId,
        draft: ParkingLotDraft,
        expected: Option<Version>,
    ) -> ServiceResult<Version> {
        check_embedded_id(id, draft.id)?;
        let lot = draft.validate().map_err(ServiceError::Validation)?;
        let expected = self.expected_version::<ParkingLot>(id, expected).await?;
        note_capacity_gap(&lot);
        self.commit_replace(id, lot, expected).await
    }

    pub async fn delete_parking_lot(&self, id: RecordId) -> ServiceResult<()> {
        self.fetch::<ParkingLot>(id).await?;
        self.ensure_unreferenced(RecordKind::ParkingLot, id, move |s: &ParkingSession| {
            s.parking_lot_id == id
        })
        .await?;
        self.remove::<ParkingLot>(id).await
    }

    /// Lots whose name or address contains `term`, in insertion order.
    pub async fn search_parking_lots(&self, term: &SearchTerm) -> ServiceResult<Vec<ParkingLot>> {
        let lots = self.scan::<ParkingLot>().await?;
        Ok(lots
            .into_iter()
            .filter(|lot| term.matches_any(&[lot.name.as_str(), lot.address.as_str()]))
            .collect())
    }

    pub async fn bulk_create_parking_lots(
        &self,
        drafts: Vec<ParkingLotDraft>,
    ) -> ServiceResult<Vec<ParkingLot>> {
        let lots = validate_batch(drafts, ParkingLotDraft::validate)?;
        lots.iter().for_each(note_capacity_gap);
        self.insert_batch(lots).await
    }
}
