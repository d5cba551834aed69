//! Command surface of the parking registry
//!
//! A transport-neutral envelope around the service: one JSON command in,
//! one JSON reply out. The CLI's `exec` mode feeds it line by line.
//!
//! # Supported Operations
//!
//! - list
//! - get
//! - create
//! - update
//! - delete
//! - search
//! - bulk_create

mod errors;
mod handler;
mod request;
mod response;

pub use errors::{ApiError, ApiResult};
pub use handler::CommandHandler;
pub use request::Command;
pub use response::{ErrorInfo, Reply};
