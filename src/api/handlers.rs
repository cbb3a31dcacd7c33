//! API Handlers
//!
//! HTTP request handlers for each calculator endpoint. Handlers only parse,
//! dispatch and translate errors; the work happens in `OperationService`.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::cache::MemoryCache;
use crate::error::{AppError, Result};
use crate::models::{CalculateRequest, CalculateResponse, HealthResponse, StatsResponse};
use crate::service::OperationService;
use crate::storage::MemoryHistory;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<OperationService>,
}

impl AppState {
    pub fn new(service: OperationService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// State backed by the in-memory cache and history.
    pub fn in_memory() -> Self {
        Self::new(OperationService::new(
            Arc::new(MemoryCache::new()),
            Arc::new(MemoryHistory::new()),
        ))
    }
}

/// Handler for GET|POST /ping
pub async fn ping_handler() -> &'static str {
    "pong"
}

/// Handler for POST /calculate
///
/// Body errors and unknown operators are rejected before the service runs.
pub async fn calculate_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CalculateRequest>, JsonRejection>,
) -> Result<Json<CalculateResponse>> {
    let Json(req) = payload.map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))?;
    let operation = req.operation()?;

    info!(
        "performing {} of {} and {}",
        operation, req.input1, req.input2
    );
    let result = state
        .service
        .calculate(operation, req.input1, req.input2)
        .await?;

    Ok(Json(CalculateResponse::new(result)))
}

/// Handler for GET /history
///
/// Returns 204 with no body when nothing has been recorded yet.
pub async fn history_handler(State(state): State<AppState>) -> Result<Response> {
    let records = state.service.history().await?;

    if records.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(Json(records).into_response())
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(state.service.stats().snapshot()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::tests::FailingHistory;
    use crate::service::Operation;

    fn request(
        input1: i64,
        input2: i64,
        operation: &str,
    ) -> std::result::Result<Json<CalculateRequest>, JsonRejection> {
        Ok(Json(CalculateRequest {
            input1,
            input2,
            operation: operation.to_string(),
        }))
    }

    #[tokio::test]
    async fn test_ping_handler() {
        assert_eq!(ping_handler().await, "pong");
    }

    #[tokio::test]
    async fn test_calculate_handler() {
        let state = AppState::in_memory();

        let response = calculate_handler(State(state), request(4, 2, "divide"))
            .await
            .unwrap();
        assert_eq!(response.result, 2);
    }

    #[tokio::test]
    async fn test_calculate_unknown_operation() {
        let state = AppState::in_memory();

        let result = calculate_handler(State(state.clone()), request(4, 2, "modulo")).await;
        assert!(matches!(result, Err(AppError::UnknownOperation(_))));
        assert_eq!(state.service.stats().snapshot().calculations, 0);
    }

    #[tokio::test]
    async fn test_calculate_division_by_zero() {
        let state = AppState::in_memory();

        let result = calculate_handler(State(state), request(4, 0, "divide")).await;
        assert!(matches!(result, Err(AppError::DivisionByZero)));
    }

    #[tokio::test]
    async fn test_history_handler_empty() {
        let response = history_handler(State(AppState::in_memory())).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_history_handler_with_records() {
        let state = AppState::in_memory();
        state.service.calculate(Operation::Add, 1, 2).await.unwrap();

        let response = history_handler(State(state)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_history_handler_store_failure() {
        let state = AppState::new(OperationService::new(
            Arc::new(MemoryCache::new()),
            Arc::new(FailingHistory),
        ));

        let result = history_handler(State(state)).await;
        assert!(matches!(result, Err(AppError::Persistence(_))));
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = AppState::in_memory();
        state.service.multiply(3, 5).await.unwrap();
        state.service.multiply(3, 5).await.unwrap();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.stats.cache_hits, 1);
        assert_eq!(response.stats.cache_misses, 1);
        assert_eq!(response.hit_rate, 0.5);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
