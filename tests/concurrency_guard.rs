//! Concurrency Guard Tests
//!
//! Optimistic concurrency on updates, and the outcome of concurrent
//! creates and deletes.

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use common::{lot_draft, service, vehicle_draft};
use parking_registry::model::{ParkingLotDraft, VehicleDraft};
use parking_registry::service::{ResultCode, ServiceError};
use parking_registry::storage::Version;

// =============================================================================
// Stale Tokens
// =============================================================================

/// An update against an old token fails and leaves the record as it was.
#[tokio::test]
async fn test_stale_token_is_a_conflict() {
    let service = service();
    let created = service
        .create_parking_lot(lot_draft("Central Plaza", "1 Vitosha Blvd"))
        .await
        .unwrap();
    let stale = created.version;

    service
        .update_parking_lot(
            created.record.id,
            ParkingLotDraft {
                id: Some(created.record.id),
                ..lot_draft("Central Plaza North", "1 Vitosha Blvd")
            },
            Some(stale),
        )
        .await
        .unwrap();

    let err = service
        .update_parking_lot(
            created.record.id,
            ParkingLotDraft {
                id: Some(created.record.id),
                ..lot_draft("Central Plaza South", "1 Vitosha Blvd")
            },
            Some(stale),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ConcurrencyConflict { .. }));
    assert_eq!(err.result_code(), ResultCode::Conflict);

    let current = service.get_parking_lot(created.record.id).await.unwrap();
    assert_eq!(current.record.name, "Central Plaza North");
}

/// A missing target is reported as NotFound even with a token supplied.
#[tokio::test]
async fn test_existence_checked_before_token() {
    let service = service();
    let err = service
        .update_vehicle(
            3,
            VehicleDraft {
                id: Some(3),
                ..vehicle_draft("CA1234AB")
            },
            Some(Version::new(1)),
        )
        .await
        .unwrap_err();
    assert_eq!(err.result_code(), ResultCode::NotFound);
}

// =============================================================================
// Races
// =============================================================================

/// Two concurrent updates with the same token: exactly one wins.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_have_one_winner() {
    let service = Arc::new(service());
    let created = service
        .create_vehicle(vehicle_draft("CA1234AB"))
        .await
        .unwrap();
    let id = created.record.id;
    let token = created.version;

    let tasks: Vec<_> = ["Red", "Green"]
        .into_iter()
        .map(|color| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                let mut draft = vehicle_draft("CA1234AB");
                draft.id = Some(id);
                draft.color = Some(color.to_string());
                service.update_vehicle(id, draft, Some(token)).await
            })
        })
        .collect();

    let mut wins = 0;
    let mut conflicts = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => wins += 1,
            Err(ServiceError::ConcurrencyConflict { .. }) => conflicts += 1,
            Err(other) => panic!("unexpected error: {}", other),
        }
    }
    assert_eq!(wins, 1);
    assert_eq!(conflicts, 1);
}

/// Concurrent creates always succeed with distinct ids.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_get_distinct_ids() {
    let service = Arc::new(service());

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service
                    .create_vehicle(vehicle_draft(&format!("CA{:04}", i)))
                    .await
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for task in tasks {
        let created = task.await.unwrap().unwrap();
        assert!(ids.insert(created.record.id));
    }
    assert_eq!(ids.len(), 20);
}

/// The second of two concurrent deletes observes NotFound.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_deletes_one_not_found() {
    let service = Arc::new(service());
    let created = service
        .create_parking_lot(lot_draft("East Side", "7 Graf Ignatiev"))
        .await
        .unwrap();
    let id = created.record.id;

    let tasks: Vec<_> = (0..2)
        .map(|_| {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.delete_parking_lot(id).await })
        })
        .collect();

    let mut outcomes = Vec::new();
    for task in tasks {
        outcomes.push(task.await.unwrap().map_err(|e| e.result_code()));
    }
    assert_eq!(outcomes.iter().filter(|o| o.is_ok()).count(), 1);
    assert!(outcomes.contains(&Err(ResultCode::NotFound)));
}
