//! In-memory history log, used when no database is configured and in tests.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::service::Operation;
use crate::storage::{HistoryRecord, HistoryStore, StoreResult};

#[derive(Debug)]
pub struct MemoryHistory {
    records: RwLock<Vec<HistoryRecord>>,
    next_id: AtomicI64,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of records appended so far.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistory {
    async fn append(
        &self,
        input1: i64,
        input2: i64,
        result: i64,
        operation: Operation,
    ) -> StoreResult<()> {
        let mut records = self.records.write().await;
        // id and timestamp are taken under the write lock so both follow insert order
        let record = HistoryRecord {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            input1,
            input2,
            result,
            operation: operation.as_str().to_string(),
            created_at: Utc::now(),
        };
        records.push(record);
        Ok(())
    }

    async fn list(&self) -> StoreResult<Vec<HistoryRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().rev().cloned().collect())
    }
}
