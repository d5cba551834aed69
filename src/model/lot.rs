//! Parking lot records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{FieldChecks, FieldErrors};
use super::RecordId;

pub const NAME_MAX: usize = 100;
pub const ADDRESS_MAX: usize = 200;

/// A validated parking lot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingLot {
    pub id: RecordId,
    pub name: String,
    pub address: String,
    pub total_slots: i32,
    pub available_slots: i32,
    pub is_covered: bool,
    pub last_maintenance: DateTime<Utc>,
}

impl ParkingLot {
    /// Whether `0 <= availableSlots <= totalSlots` holds.
    ///
    /// Reported, never enforced on write.
    pub fn slots_within_capacity(&self) -> bool {
        self.available_slots >= 0 && self.available_slots <= self.total_slots
    }
}

/// Unvalidated parking lot payload as received in a command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkingLotDraft {
    pub id: Option<RecordId>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub total_slots: Option<i32>,
    pub available_slots: Option<i32>,
    pub is_covered: Option<bool>,
    pub last_maintenance: Option<DateTime<Utc>>,
}

impl ParkingLotDraft {
    /// Converts the draft into a record, collecting every field error.
    ///
    /// The returned record carries the draft's id, or 0 when absent.
    pub fn validate(self) -> Result<ParkingLot, FieldErrors> {
        let mut checks = FieldChecks::new();
        let name = checks.text("name", self.name, NAME_MAX);
        let address = checks.text("address", self.address, ADDRESS_MAX);
        let total_slots = checks.present("totalSlots", self.total_slots);
        let available_slots = checks.present("availableSlots", self.available_slots);
        let is_covered = checks.present("isCovered", self.is_covered);
        let last_maintenance = checks.present("lastMaintenance", self.last_maintenance);

        match (name, address, total_slots, available_slots, is_covered, last_maintenance) {
            (
                Some(name),
                Some(address),
                Some(total_slots),
                Some(available_slots),
                Some(is_covered),
                Some(last_maintenance),
            ) => Ok(ParkingLot {
                id: self.id.unwrap_or_default(),
                name,
                address,
                total_slots,
                available_slots,
                is_covered,
                last_maintenance,
            }),
            _ => Err(checks.into_errors()),
        }
    }
}

impl From<ParkingLot> for ParkingLotDraft {
    fn from(lot: ParkingLot) -> Self {
        Self {
            id: Some(lot.id),
            name: Some(lot.name),
            address: Some(lot.address),
            total_slots: Some(lot.total_slots),
            available_slots: Some(lot.available_slots),
            is_covered: Some(lot.is_covered),
            last_maintenance: Some(lot.last_maintenance),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn draft() -> ParkingLotDraft {
        ParkingLotDraft {
            id: None,
            name: Some("Central Plaza".to_string()),
            address: Some("1 Vitosha Blvd, Sofia".to_string()),
            total_slots: Some(120),
            available_slots: Some(40),
            is_covered: Some(true),
            last_maintenance: Some(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_valid_draft() {
        let lot = draft().validate().unwrap();
        assert_eq!(lot.id, 0);
        assert_eq!(lot.name, "Central Plaza");
        assert!(lot.slots_within_capacity());
    }

    #[test]
    fn test_reports_every_bad_field() {
        let mut d = draft();
        d.name = Some("n".repeat(NAME_MAX + 1));
        d.address = None;
        d.is_covered = None;

        let errors = d.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.mentions("name"));
        assert!(errors.mentions("address"));
        assert!(errors.mentions("isCovered"));
    }

    #[test]
    fn test_capacity_is_not_enforced() {
        let mut d = draft();
        d.available_slots = Some(500);
        let lot = d.validate().unwrap();
        assert!(!lot.slots_within_capacity());
    }

    #[test]
    fn test_draft_deserializes_camel_case_with_missing_fields() {
        let d: ParkingLotDraft = serde_json::from_value(serde_json::json!({
            "name": "East Side",
            "totalSlots": 10
        }))
        .unwrap();
        assert_eq!(d.name.as_deref(), Some("East Side"));
        assert_eq!(d.total_slots, Some(10));
        assert!(d.address.is_none());
    }

    #[test]
    fn test_draft_from_record_round_trips() {
        let mut lot = draft().validate().unwrap();
        lot.id = 7;
        let back = ParkingLotDraft::from(lot.clone()).validate().unwrap();
        assert_eq!(back, lot);
    }
}
