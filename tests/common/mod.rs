//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use parking_registry::model::{ParkingLotDraft, ParkingSessionDraft, RecordId, VehicleDraft};
use parking_registry::service::{DeletePolicy, ParkingService, ServiceSettings};
use parking_registry::storage::MemoryStore;
use rust_decimal::Decimal;

pub fn service() -> ParkingService<MemoryStore> {
    ParkingService::with_store(MemoryStore::new())
}

pub fn unrestricted_service() -> ParkingService<MemoryStore> {
    ParkingService::new(
        Arc::new(MemoryStore::new()),
        ServiceSettings {
            delete_policy: DeletePolicy::Unrestricted,
        },
    )
}

pub fn lot_draft(name: &str, address: &str) -> ParkingLotDraft {
    ParkingLotDraft {
        id: None,
        name: Some(name.to_string()),
        address: Some(address.to_string()),
        total_slots: Some(120),
        available_slots: Some(35),
        is_covered: Some(true),
        last_maintenance: Some(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()),
    }
}

pub fn vehicle_draft(plate: &str) -> VehicleDraft {
    VehicleDraft {
        id: None,
        plate_number: Some(plate.to_string()),
        owner_name: Some("Georgi Ivanov".to_string()),
        model: Some("Golf".to_string()),
        vehicle_type: Some("Hatchback".to_string()),
        color: Some("Blue".to_string()),
        registration_date: Some(Utc.with_ymd_and_hms(2021, 6, 12, 0, 0, 0).unwrap()),
        is_active: Some(true),
    }
}

pub fn session_draft(parking_lot_id: RecordId, vehicle_id: RecordId) -> ParkingSessionDraft {
    ParkingSessionDraft {
        id: None,
        parking_lot_id: Some(parking_lot_id),
        vehicle_id: Some(vehicle_id),
        start_time: Some(Utc.with_ymd_and_hms(2024, 5, 10, 9, 30, 0).unwrap()),
        end_time: None,
        fee: Some(Decimal::new(450, 2)),
        is_paid: Some(false),
        payment_date: None,
    }
}

/// Creates one lot and one vehicle, returning their ids.
pub async fn lot_and_vehicle(service: &ParkingService<MemoryStore>) -> (RecordId, RecordId) {
    let lot = service
        .create_parking_lot(lot_draft("Central Plaza", "1 Vitosha Blvd"))
        .await
        .unwrap();
    let vehicle = service
        .create_vehicle(vehicle_draft("CA1234AB"))
        .await
        .unwrap();
    (lot.record.id, vehicle.record.id)
}
