//! All-or-nothing batch validation.

use crate::model::FieldErrors;

use super::errors::{ServiceError, ServiceResult};

/// Rejects an empty batch.
pub(crate) fn ensure_not_empty<D>(drafts: &[D]) -> ServiceResult<()> {
    if drafts.is_empty() {
        return Err(ServiceError::EmptyBatch);
    }
    Ok(())
}

/// Validates every draft in order, stopping at the first invalid one.
///
/// The failure names the 0-based position of the offending item.
pub(crate) fn validate_batch<D, T>(
    drafts: Vec<D>,
    validate: impl Fn(D) -> Result<T, FieldErrors>,
) -> ServiceResult<Vec<T>> {
    ensure_not_empty(&drafts)?;
    drafts
        .into_iter()
        .enumerate()
        .map(|(index, draft)| {
            validate(draft).map_err(|errors| ServiceError::Validation(errors).at_batch_index(index))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Vehicle, VehicleDraft};
    use chrono::Utc;

    fn draft(plate: &str) -> VehicleDraft {
        VehicleDraft {
            id: None,
            plate_number: Some(plate.to_string()),
            owner_name: Some("Ivana Petrova".to_string()),
            model: Some("Octavia".to_string()),
            vehicle_type: Some("Sedan".to_string()),
            color: Some("Grey".to_string()),
            registration_date: Some(Utc::now()),
            is_active: Some(true),
        }
    }

    #[test]
    fn test_empty_batch() {
        let result = validate_batch(Vec::<VehicleDraft>::new(), VehicleDraft::validate);
        assert!(matches!(result, Err(ServiceError::EmptyBatch)));
    }

    #[test]
    fn test_first_invalid_item_is_reported() {
        let mut drafts = vec![draft("CA1234AB"), draft("CB9876KM"), draft("PB0001TT")];
        drafts[1].owner_name = None;
        drafts[2].plate_number = Some("WAY-TOO-LONG-PLATE".to_string());

        let err = validate_batch(drafts, VehicleDraft::validate).unwrap_err();
        match &err {
            ServiceError::InvalidBatchItem { index, .. } => assert_eq!(*index, 1),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.field_errors().unwrap().mentions("ownerName"));
    }

    #[test]
    fn test_valid_batch_keeps_order() {
        let vehicles: Vec<Vehicle> =
            validate_batch(vec![draft("A1"), draft("B2")], VehicleDraft::validate).unwrap();
        assert_eq!(vehicles[0].plate_number, "A1");
        assert_eq!(vehicles[1].plate_number, "B2");
    }
}
