//! Command handler
//!
//! Decodes record payloads for the addressed collection, runs the matching
//! service operation and shapes the outcome into a reply. Rejections are
//! logged here, once per command.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::model::RecordKind;
use crate::service::ParkingService;
use crate::storage::{ParkingStore, Versioned};

use super::errors::{ApiError, ApiResult};
use super::request::Command;
use super::response::Reply;

fn decode<D: DeserializeOwned>(record: Value) -> ApiResult<D> {
    serde_json::from_value(record).map_err(ApiError::MalformedRecord)
}

fn decode_batch<D: DeserializeOwned>(records: Vec<Value>) -> ApiResult<Vec<D>> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            serde_json::from_value(record)
                .map_err(|source| ApiError::MalformedBatchItem { index, source })
        })
        .collect()
}

fn to_data<T: Serialize>(value: T) -> ApiResult<Value> {
    serde_json::to_value(value).map_err(ApiError::ReplyEncoding)
}

fn found<T: Serialize>(stored: Versioned<T>) -> ApiResult<Reply> {
    Ok(Reply::versioned(to_data(stored.record)?, stored.version))
}

fn created<T: Serialize>(stored: Versioned<T>) -> ApiResult<Reply> {
    Ok(Reply::created(to_data(stored.record)?, Some(stored.version)))
}

/// Executes commands against one service.
pub struct CommandHandler<S> {
    service: ParkingService<S>,
}

impl<S: ParkingStore> CommandHandler<S> {
    pub fn new(service: ParkingService<S>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &ParkingService<S> {
        &self.service
    }

    /// Handle one raw JSON command line
    pub async fn handle(&self, line: &str) -> Reply {
        match Command::parse(line) {
            Ok(command) => self.dispatch(command).await,
            Err(err) => {
                tracing::warn!(event = "command_rejected", code = err.code(), error = %err);
                Reply::from_error(&err)
            }
        }
    }

    pub async fn dispatch(&self, command: Command) -> Reply {
        let operation = command.operation();
        let entity = command.entity();

        match self.execute(command).await {
            Ok(reply) => reply,
            Err(ApiError::Service(err)) => {
                err.log(operation, entity);
                Reply::from_service_error(&err)
            }
            Err(err) => {
                tracing::warn!(
                    event = "command_rejected",
                    operation,
                    collection = entity.collection(),
                    code = err.code(),
                    error = %err,
                );
                Reply::from_error(&err)
            }
        }
    }

    async fn execute(&self, command: Command) -> ApiResult<Reply> {
        let service = &self.service;

        match command {
            Command::List { entity, page } => {
                let data = match entity {
                    RecordKind::ParkingLot => to_data(service.list_parking_lots(page).await?)?,
                    RecordKind::Vehicle => to_data(service.list_vehicles(page).await?)?,
                    RecordKind::ParkingSession => {
                        to_data(service.list_parking_sessions(page).await?)?
                    }
                };
                Ok(Reply::ok(data))
            }
            Command::Get { entity, id } => match entity {
                RecordKind::ParkingLot => found(service.get_parking_lot(id).await?),
                RecordKind::Vehicle => found(service.get_vehicle(id).await?),
                RecordKind::ParkingSession => found(service.get_parking_session(id).await?),
            },
            Command::Create { entity, record } => match entity {
                RecordKind::ParkingLot => {
                    created(service.create_parking_lot(decode(record)?).await?)
                }
                RecordKind::Vehicle => created(service.create_vehicle(decode(record)?).await?),
                RecordKind::ParkingSession => {
                    created(service.create_parking_session(decode(record)?).await?)
                }
            },
            Command::Update {
                entity,
                id,
                record,
                expected,
            } => {
                let version = match entity {
                    RecordKind::ParkingLot => {
                        service
                            .update_parking_lot(id, decode(record)?, expected)
                            .await?
                    }
                    RecordKind::Vehicle => {
                        service.update_vehicle(id, decode(record)?, expected).await?
                    }
                    RecordKind::ParkingSession => {
                        service
                            .update_parking_session(id, decode(record)?, expected)
                            .await?
                    }
                };
                Ok(Reply::no_content(Some(version)))
            }
            Command::Delete { entity, id } => {
                match entity {
                    RecordKind::ParkingLot => service.delete_parking_lot(id).await?,
                    RecordKind::Vehicle => service.delete_vehicle(id).await?,
                    RecordKind::ParkingSession => service.delete_parking_session(id).await?,
                }
                Ok(Reply::no_content(None))
            }
            Command::Search { entity, term } => {
                let data = match entity {
                    RecordKind::ParkingLot => to_data(service.search_parking_lots(&term).await?)?,
                    RecordKind::Vehicle => to_data(service.search_vehicles(&term).await?)?,
                    RecordKind::ParkingSession => {
                        to_data(service.search_parking_sessions(&term).await?)?
                    }
                };
                Ok(Reply::ok(data))
            }
            Command::BulkCreate { entity, records } => {
                let data = match entity {
                    RecordKind::ParkingLot => to_data(
                        service
                            .bulk_create_parking_lots(decode_batch(records)?)
                            .await?,
                    )?,
                    RecordKind::Vehicle => {
                        to_data(service.bulk_create_vehicles(decode_batch(records)?).await?)?
                    }
                    RecordKind::ParkingSession => to_data(
                        service
                            .bulk_create_parking_sessions(decode_batch(records)?)
                            .await?,
                    )?,
                };
                Ok(Reply::ok(data))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::ResultCode;
    use crate::storage::MemoryStore;
    use serde_json::json;

    fn handler() -> CommandHandler<MemoryStore> {
        CommandHandler::new(ParkingService::with_store(MemoryStore::new()))
    }

    fn lot_line(name: &str) -> String {
        json!({
            "op": "create",
            "entity": "parking_lot",
            "record": {
                "name": name,
                "address": "1 Vitosha Blvd",
                "totalSlots": 120,
                "availableSlots": 40,
                "isCovered": true,
                "lastMaintenance": "2024-03-01T08:00:00Z"
            }
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let handler = handler();

        let reply = handler.handle(&lot_line("Central Plaza")).await;
        assert_eq!(reply.status, ResultCode::Created);
        let id = reply.data.unwrap()["id"].as_i64().unwrap();

        let reply = handler
            .handle(&json!({"op": "get", "entity": "parking_lot", "id": id}).to_string())
            .await;
        assert_eq!(reply.status, ResultCode::Ok);
        assert_eq!(reply.data.unwrap()["name"], "Central Plaza");
        assert!(reply.version.is_some());
    }

    #[tokio::test]
    async fn test_malformed_record_is_invalid() {
        let reply = handler()
            .handle(r#"{"op": "create", "entity": "vehicle", "record": {"isActive": "yes"}}"#)
            .await;
        assert_eq!(reply.status, ResultCode::Invalid);
        assert_eq!(reply.error.unwrap().code, "PARK_MALFORMED_RECORD");
    }

    #[tokio::test]
    async fn test_garbage_line_is_invalid() {
        let reply = handler().handle("not json").await;
        assert_eq!(reply.status, ResultCode::Invalid);
        assert_eq!(reply.error.unwrap().code, "PARK_INVALID_COMMAND");
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let reply = handler()
            .handle(r#"{"op": "delete", "entity": "parking_session", "id": 99}"#)
            .await;
        assert_eq!(reply.status, ResultCode::NotFound);
    }

    #[tokio::test]
    async fn test_update_replies_no_content_with_new_version() {
        let handler = handler();
        let created = handler.handle(&lot_line("East Side")).await;
        let mut record = created.data.unwrap();
        record["availableSlots"] = json!(12);
        let id = record["id"].as_i64().unwrap();

        let reply = handler
            .handle(
                &json!({"op": "update", "entity": "parking_lot", "id": id, "record": record})
                    .to_string(),
            )
            .await;
        assert_eq!(reply.status, ResultCode::NoContent);
        assert!(reply.version.unwrap() > created.version.unwrap());
    }
}
