//! Record types for the parking registry.
//!
//! Each entity comes in two shapes:
//! - the strict record (`ParkingLot`, `Vehicle`, `ParkingSession`) held by the store
//! - the draft (`*Draft`) received in commands, with every field optional
//!
//! `Draft::validate` is the only way from one to the other.

mod lot;
mod session;
mod validation;
mod vehicle;

pub use lot::{ParkingLot, ParkingLotDraft, ADDRESS_MAX, NAME_MAX};
pub use session::{ParkingSession, ParkingSessionDraft, SessionDetails};
pub use validation::{FieldChecks, FieldError, FieldErrorKind, FieldErrors};
pub use vehicle::{
    Vehicle, VehicleDraft, COLOR_MAX, MODEL_MAX, OWNER_NAME_MAX, PLATE_NUMBER_MAX, TYPE_MAX,
};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Store-assigned surrogate identifier.
pub type RecordId = i64;

/// The three record collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    ParkingLot,
    Vehicle,
    ParkingSession,
}

impl RecordKind {
    /// Collection name used in logs and persisted snapshots.
    pub fn collection(&self) -> &'static str {
        match self {
            RecordKind::ParkingLot => "parking_lots",
            RecordKind::Vehicle => "vehicles",
            RecordKind::ParkingSession => "parking_sessions",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::ParkingLot => "parking lot",
            RecordKind::Vehicle => "vehicle",
            RecordKind::ParkingSession => "parking session",
        };
        write!(f, "{}", name)
    }
}
