//! Command envelope
//!
//! One JSON object per command:
//!
//! ```json
//! {"op": "list", "entity": "parking_lot", "pageNumber": 2, "pageSize": 5}
//! {"op": "update", "entity": "vehicle", "id": 3, "record": {...}, "expectedVersion": 7}
//! {"op": "bulk_create", "entity": "parking_session", "records": [{...}, {...}]}
//! ```
//!
//! Record payloads stay raw JSON here; they are decoded into drafts by the
//! handler once the entity is known.

use serde::Deserialize;
use serde_json::Value;

use crate::model::{RecordId, RecordKind};
use crate::service::{PageRequest, SearchTerm, DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};
use crate::storage::Version;

use super::errors::{ApiError, ApiResult};

/// A parsed command addressed to one record collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List {
        entity: RecordKind,
        page: PageRequest,
    },
    Get {
        entity: RecordKind,
        id: RecordId,
    },
    Create {
        entity: RecordKind,
        record: Value,
    },
    Update {
        entity: RecordKind,
        id: RecordId,
        record: Value,
        expected: Option<Version>,
    },
    Delete {
        entity: RecordKind,
        id: RecordId,
    },
    Search {
        entity: RecordKind,
        term: SearchTerm,
    },
    BulkCreate {
        entity: RecordKind,
        records: Vec<Value>,
    },
}

/// Raw envelope for parsing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCommand {
    op: String,
    entity: Option<RecordKind>,
    #[serde(default)]
    page_number: Option<i64>,
    #[serde(default)]
    page_size: Option<i64>,
    #[serde(default)]
    id: Option<RecordId>,
    #[serde(default)]
    record: Option<Value>,
    #[serde(default)]
    expected_version: Option<Version>,
    #[serde(default)]
    term: Option<String>,
    #[serde(default)]
    records: Option<Vec<Value>>,
}

fn required<T>(value: Option<T>, op: &'static str, field: &'static str) -> ApiResult<T> {
    value.ok_or(ApiError::MissingField { op, field })
}

impl Command {
    /// Parse a command from one JSON line
    pub fn parse(json: &str) -> ApiResult<Self> {
        let raw: RawCommand = serde_json::from_str(json)
            .map_err(|e| ApiError::invalid_command(format!("invalid JSON: {}", e)))?;

        let op = match raw.op.as_str() {
            "list" => "list",
            "get" => "get",
            "create" => "create",
            "update" => "update",
            "delete" => "delete",
            "search" => "search",
            "bulk_create" => "bulk_create",
            other => return Err(ApiError::UnknownOperation(other.to_string())),
        };
        let entity = required(raw.entity, op, "entity")?;

        let command = match op {
            "list" => Command::List {
                entity,
                page: PageRequest::new(
                    raw.page_number.unwrap_or(DEFAULT_PAGE_NUMBER),
                    raw.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
                ),
            },
            "get" => Command::Get {
                entity,
                id: required(raw.id, op, "id")?,
            },
            "create" => Command::Create {
                entity,
                record: required(raw.record, op, "record")?,
            },
            "update" => Command::Update {
                entity,
                id: required(raw.id, op, "id")?,
                record: required(raw.record, op, "record")?,
                expected: raw.expected_version,
            },
            "delete" => Command::Delete {
                entity,
                id: required(raw.id, op, "id")?,
            },
            "search" => Command::Search {
                entity,
                term: SearchTerm::new(raw.term),
            },
            _ => Command::BulkCreate {
                entity,
                records: required(raw.records, op, "records")?,
            },
        };
        Ok(command)
    }

    /// Operation name used in logs
    pub fn operation(&self) -> &'static str {
        match self {
            Command::List { .. } => "list",
            Command::Get { .. } => "get",
            Command::Create { .. } => "create",
            Command::Update { .. } => "update",
            Command::Delete { .. } => "delete",
            Command::Search { .. } => "search",
            Command::BulkCreate { .. } => "bulk_create",
        }
    }

    pub fn entity(&self) -> RecordKind {
        match self {
            Command::List { entity, .. }
            | Command::Get { entity, .. }
            | Command::Create { entity, .. }
            | Command::Update { entity, .. }
            | Command::Delete { entity, .. }
            | Command::Search { entity, .. }
            | Command::BulkCreate { entity, .. } => *entity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_defaults() {
        let cmd = Command::parse(r#"{"op": "list", "entity": "vehicle"}"#).unwrap();
        assert_eq!(
            cmd,
            Command::List {
                entity: RecordKind::Vehicle,
                page: PageRequest::new(1, 10),
            }
        );
    }

    #[test]
    fn test_parse_update_with_version() {
        let cmd = Command::parse(
            r#"{
                "op": "update",
                "entity": "parking_lot",
                "id": 4,
                "record": {"name": "Central Plaza"},
                "expectedVersion": 9
            }"#,
        )
        .unwrap();
        match cmd {
            Command::Update { id, expected, .. } => {
                assert_eq!(id, 4);
                assert_eq!(expected, Some(Version::new(9)));
            }
            other => panic!("expected Update, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_search_without_term_matches_everything() {
        let cmd = Command::parse(r#"{"op": "search", "entity": "parking_session"}"#).unwrap();
        assert_eq!(
            cmd,
            Command::Search {
                entity: RecordKind::ParkingSession,
                term: SearchTerm::any(),
            }
        );
    }

    #[test]
    fn test_parse_unknown_op() {
        let err = Command::parse(r#"{"op": "truncate", "entity": "vehicle"}"#).unwrap_err();
        assert_eq!(err.code(), "PARK_UNKNOWN_OPERATION");
    }

    #[test]
    fn test_parse_missing_field() {
        let err = Command::parse(r#"{"op": "delete", "entity": "vehicle"}"#).unwrap_err();
        assert!(matches!(
            err,
            ApiError::MissingField {
                op: "delete",
                field: "id"
            }
        ));
    }

    #[test]
    fn test_parse_unknown_entity() {
        let err = Command::parse(r#"{"op": "get", "entity": "garage", "id": 1}"#).unwrap_err();
        assert_eq!(err.code(), "PARK_INVALID_COMMAND");
    }
}
