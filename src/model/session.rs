//! Parking session records and their joined read form.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::validation::{FieldChecks, FieldErrors};
use super::{ParkingLot, RecordId, Vehicle};

/// A validated parking session.
///
/// `parking_lot_id` and `vehicle_id` are foreign keys; their existence is
/// checked by the service layer, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSession {
    pub id: RecordId,
    pub parking_lot_id: RecordId,
    pub vehicle_id: RecordId,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub fee: Decimal,
    pub is_paid: bool,
    pub payment_date: Option<DateTime<Utc>>,
}

impl ParkingSession {
    /// An open session has no end time yet.
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }
}

/// Unvalidated parking session payload.
///
/// Any `parkingLot` / `vehicle` objects sent along are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSessionDraft {
    pub id: Option<RecordId>,
    pub parking_lot_id: Option<RecordId>,
    pub vehicle_id: Option<RecordId>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub fee: Option<Decimal>,
    pub is_paid: Option<bool>,
    pub payment_date: Option<DateTime<Utc>>,
}

impl ParkingSessionDraft {
    pub fn validate(self) -> Result<ParkingSession, FieldErrors> {
        let mut checks = FieldChecks::new();
        let parking_lot_id = checks.present("parkingLotId", self.parking_lot_id);
        let vehicle_id = checks.present("vehicleId", self.vehicle_id);
        let start_time = checks.present("startTime", self.start_time);
        let fee = checks.present("fee", self.fee);
        let is_paid = checks.present("isPaid", self.is_paid);

        match (parking_lot_id, vehicle_id, start_time, fee, is_paid) {
            (Some(parking_lot_id), Some(vehicle_id), Some(start_time), Some(fee), Some(is_paid)) => {
                Ok(ParkingSession {
                    id: self.id.unwrap_or_default(),
                    parking_lot_id,
                    vehicle_id,
                    start_time,
                    end_time: self.end_time,
                    fee,
                    is_paid,
                    payment_date: self.payment_date,
                })
            }
            _ => Err(checks.into_errors()),
        }
    }
}

impl From<ParkingSession> for ParkingSessionDraft {
    fn from(session: ParkingSession) -> Self {
        Self {
            id: Some(session.id),
            parking_lot_id: Some(session.parking_lot_id),
            vehicle_id: Some(session.vehicle_id),
            start_time: Some(session.start_time),
            end_time: session.end_time,
            fee: Some(session.fee),
            is_paid: Some(session.is_paid),
            payment_date: session.payment_date,
        }
    }
}

/// A session joined with the lot and vehicle it references.
///
/// Either side is `None` when the referenced record no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetails {
    #[serde(flatten)]
    pub session: ParkingSession,
    pub parking_lot: Option<ParkingLot>,
    pub vehicle: Option<Vehicle>,
}
