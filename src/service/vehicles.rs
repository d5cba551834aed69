//! Vehicle operations.

use crate::model::{ParkingSession, RecordId, RecordKind, Vehicle, VehicleDraft};
use crate::storage::{ParkingStore, Version, Versioned};

use super::bulk::validate_batch;
use super::errors::{ServiceError, ServiceResult};
use super::guard::check_embedded_id;
use super::pagination::PageRequest;
use super::search::SearchTerm;
use super::ParkingService;

impl<S: ParkingStore> ParkingService<S> {
    pub async fn list_vehicles(&self, page: PageRequest) -> ServiceResult<Vec<Vehicle>> {
        self.page::<Vehicle>(page).await
    }

    pub async fn get_vehicle(&self, id: RecordId) -> ServiceResult<Versioned<Vehicle>> {
        self.fetch::<Vehicle>(id).await
    }

    pub async fn create_vehicle(&self, draft: VehicleDraft) -> ServiceResult<Versioned<Vehicle>> {
        let vehicle = draft.validate().map_err(ServiceError::Validation)?;
        self.insert(vehicle).await
    }

    /// Replaces the vehicle at `id` and returns its new version token.
    pub async fn update_vehicle(
        &self,
        id: RecordId,
        draft: VehicleDraft,
        expected: Option<Version>,
    ) -> ServiceResult<Version> {
        check_embedded_id(id, draft.id)?;
        let vehicle = draft.validate().map_err(ServiceError::Validation)?;
        let expected = self.expected_version::<Vehicle>(id, expected).await?;
        self.commit_replace(id, vehicle, expected).await
    }

    pub async fn delete_vehicle(&self, id: RecordId) -> ServiceResult<()> {
        self.fetch::<Vehicle>(id).await?;
        self.ensure_unreferenced(RecordKind::Vehicle, id, move |s: &ParkingSession| {
            s.vehicle_id == id
        })
        .await?;
        self.remove::<Vehicle>(id).await
    }

    /// Vehicles whose plate number contains `term`.
    pub async fn search_vehicles(&self, term: &SearchTerm) -> ServiceResult<Vec<Vehicle>> {
        let vehicles = self.scan::<Vehicle>().await?;
        Ok(vehicles
            .into_iter()
            .filter(|v| term.matches(&v.plate_number))
            .collect())
    }

    pub async fn bulk_create_vehicles(
        &self,
        drafts: Vec<VehicleDraft>,
    ) -> ServiceResult<Vec<Vehicle>> {
        let vehicles = validate_batch(drafts, VehicleDraft::validate)?;
        self.insert_batch(vehicles).await
    }
}
