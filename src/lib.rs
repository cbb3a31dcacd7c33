//! Calculator Service - cache-aside arithmetic over HTTP
//!
//! Evaluates integer operations, caches results by operands and operator,
//! and records every calculation in a durable history. Ships with a load
//! generator for exercising the service.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod storage;
pub mod tasks;
pub mod telemetry;

pub use api::AppState;
pub use config::Config;
pub use service::{Operation, OperationService};
pub use tasks::spawn_cleanup_task;
