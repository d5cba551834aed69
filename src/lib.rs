//! parking-registry - persistence and query service for parking lots,
//! vehicles and parking sessions
//!
//! Layers, bottom up:
//! - `model`: record types, drafts and field validation
//! - `storage`: the record store contract with memory and file backends
//! - `service`: integrity, concurrency, pagination, search and bulk rules
//! - `api`: JSON command envelope and replies
//! - `cli`: the `parking-registry` binary

pub mod api;
pub mod cli;
pub mod config;
pub mod model;
pub mod observability;
pub mod service;
pub mod storage;
