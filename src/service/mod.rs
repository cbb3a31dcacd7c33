//! Operation Service
//!
//! Cache-aside evaluation of the four operations with a history write on
//! every successful calculation. Cache and history writes are best-effort:
//! their failures are logged and counted but never change the result.

mod operation;
mod stats;


use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, instrument, warn};

use crate::cache::{Cache, CacheKey};
use crate::error::{CacheError, CalcError, StoreError};
use crate::storage::{HistoryRecord, HistoryStore};

pub use operation::Operation;
pub use stats::{OperationStats, StatsSnapshot};

// == Operation Service ==
/// Stateless orchestrator over a cache and a history store.
pub struct OperationService {
    cache: Arc<dyn Cache>,
    history: Arc<dyn HistoryStore>,
    stats: Arc<OperationStats>,
    /// TTL handed through to every cache write
    cache_ttl: Option<Duration>,
}

impl OperationService {
    pub fn new(cache: Arc<dyn Cache>, history: Arc<dyn HistoryStore>) -> Self {
        Self {
            cache,
            history,
            stats: Arc::new(OperationStats::new()),
            cache_ttl: None,
        }
    }

    /// Uses an externally owned stats handle instead of a private one.
    pub fn with_stats(mut self, stats: Arc<OperationStats>) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn stats(&self) -> &Arc<OperationStats> {
        &self.stats
    }

    pub async fn add(&self, a: i64, b: i64) -> Result<i64, CalcError> {
        self.calculate(Operation::Add, a, b).await
    }

    pub async fn subtract(&self, a: i64, b: i64) -> Result<i64, CalcError> {
        self.calculate(Operation::Subtract, a, b).await
    }

    pub async fn multiply(&self, a: i64, b: i64) -> Result<i64, CalcError> {
        self.calculate(Operation::Multiply, a, b).await
    }

    /// Fails with `DivisionByZero` before touching the cache or the history.
    pub async fn divide(&self, a: i64, b: i64) -> Result<i64, CalcError> {
        self.calculate(Operation::Divide, a, b).await
    }

    /// Evaluates `a <operation> b` through the cache.
    ///
    /// Operands the operation is undefined for are rejected up front, so a
    /// rejected request never reads the cache or writes history.
    pub async fn calculate(&self, operation: Operation, a: i64, b: i64) -> Result<i64, CalcError> {
        if let Err(e) = operation.validate(b) {
            if e == CalcError::DivisionByZero {
                self.stats.record_division_by_zero();
            }
            warn!(operation = %operation, input1 = a, input2 = b, "rejected calculation: {}", e);
            return Err(e);
        }
        self.cached(operation, a, b).await
    }

    /// All history records, newest first.
    #[instrument(skip(self))]
    pub async fn history(&self) -> Result<Vec<HistoryRecord>, StoreError> {
        self.history.list().await.map_err(|e| {
            error!("failed to get history: {}", e);
            e
        })
    }

    #[instrument(skip(self, operation), fields(operation = %operation))]
    async fn cached(&self, operation: Operation, a: i64, b: i64) -> Result<i64, CalcError> {
        let key = CacheKey::new(a, b, operation);

        let result = match self.cache.get(&key).await {
            Ok(cached) => {
                debug!(key = %key, result = cached, "cache hit");
                self.stats.record_hit();
                cached
            }
            Err(e) => {
                if !matches!(e, CacheError::KeyNotFound(_)) {
                    warn!(key = %key, "cache read failed, computing instead: {}", e);
                }
                self.stats.record_miss();

                let computed = operation.apply(a, b)?;
                debug!(key = %key, result = computed, "computed result");

                if let Err(e) = self.cache.set(&key, computed, self.cache_ttl).await {
                    self.stats.record_cache_write_failure();
                    error!(key = %key, "failed to set cache value: {}", e);
                }
                computed
            }
        };

        self.write_history(a, b, result, operation).await;
        self.stats.record_calculation();
        Ok(result)
    }

    async fn write_history(&self, a: i64, b: i64, result: i64, operation: Operation) {
        if let Err(e) = self.history.append(a, b, result, operation).await {
            self.stats.record_history_write_failure();
            error!(
                input1 = a,
                input2 = b,
                result,
                operation = %operation,
                "failed to write history: {}",
                e
            );
        }
    }
}
