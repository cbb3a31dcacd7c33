//! Storage Module
//!
//! Append-only history of completed calculations. Backends: an in-memory log
//! and PostgreSQL.

mod memory;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::StoreError;
use crate::service::Operation;

pub use memory::MemoryHistory;
pub use postgres::PostgresHistory;

/// Convenience Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

// == History Record ==
/// One persisted calculation. `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct HistoryRecord {
    pub id: i64,
    pub input1: i64,
    pub input2: i64,
    pub result: i64,
    pub operation: String,
    pub created_at: DateTime<Utc>,
}

// == History Store Trait ==
/// Durable log of calculations.
///
/// `append` must be safe under concurrent use and accepts duplicates.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn append(
        &self,
        input1: i64,
        input2: i64,
        result: i64,
        operation: Operation,
    ) -> StoreResult<()>;

    /// Every record, newest first. An empty log is `Ok(vec![])`.
    async fn list(&self) -> StoreResult<Vec<HistoryRecord>>;
}
