//! Vehicle records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{FieldChecks, FieldErrors};
use super::RecordId;

pub const PLATE_NUMBER_MAX: usize = 10;
pub const OWNER_NAME_MAX: usize = 100;
pub const MODEL_MAX: usize = 50;
pub const TYPE_MAX: usize = 20;
pub const COLOR_MAX: usize = 20;

/// A validated vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: RecordId,
    pub plate_number: String,
    pub owner_name: String,
    pub model: String,
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub color: String,
    pub registration_date: DateTime<Utc>,
    pub is_active: bool,
}

/// Unvalidated vehicle payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDraft {
    pub id: Option<RecordId>,
    pub plate_number: Option<String>,
    pub owner_name: Option<String>,
    pub model: Option<String>,
    #[serde(rename = "type")]
    pub vehicle_type: Option<String>,
    pub color: Option<String>,
    pub registration_date: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

impl VehicleDraft {
    pub fn validate(self) -> Result<Vehicle, FieldErrors> {
        let mut checks = FieldChecks::new();
        let plate_number = checks.text("plateNumber", self.plate_number, PLATE_NUMBER_MAX);
        let owner_name = checks.text("ownerName", self.owner_name, OWNER_NAME_MAX);
        let model = checks.text("model", self.model, MODEL_MAX);
        let vehicle_type = checks.text("type", self.vehicle_type, TYPE_MAX);
        let color = checks.text("color", self.color, COLOR_MAX);
        let registration_date = checks.present("registrationDate", self.registration_date);
        let is_active = checks.present("isActive", self.is_active);

        match (
            plate_number,
            owner_name,
            model,
            vehicle_type,
            color,
            registration_date,
            is_active,
        ) {
            (
                Some(plate_number),
                Some(owner_name),
                Some(model),
                Some(vehicle_type),
                Some(color),
                Some(registration_date),
                Some(is_active),
            ) => Ok(Vehicle {
                id: self.id.unwrap_or_default(),
                plate_number,
                owner_name,
                model,
                vehicle_type,
                color,
                registration_date,
                is_active,
            }),
            _ => Err(checks.into_errors()),
        }
    }
}

impl From<Vehicle> for VehicleDraft {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: Some(vehicle.id),
            plate_number: Some(vehicle.plate_number),
            owner_name: Some(vehicle.owner_name),
            model: Some(vehicle.model),
            vehicle_type: Some(vehicle.vehicle_type),
            color: Some(vehicle.color),
            registration_date: Some(vehicle.registration_date),
            is_active: Some(vehicle.is_active),
        }
    }
}
