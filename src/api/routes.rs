//! API Routes
//!
//! Configures the Axum router with all calculator endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    calculate_handler, health_handler, history_handler, ping_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET|POST /ping` - Liveness probe answering `pong`
/// - `POST /calculate` - Evaluate an operation
/// - `GET /history` - List past calculations, newest first
/// - `GET /stats` - Cache and history counters
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/ping", get(ping_handler).post(ping_handler))
        .route("/calculate", post(calculate_handler))
        .route("/history", get(history_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
