//! API Module
//!
//! HTTP handlers and routing for the calculator REST API.
//!
//! # Endpoints
//! - `GET|POST /ping` - Liveness probe
//! - `POST /calculate` - Evaluate `{"input1","input2","operation"}`
//! - `GET /history` - Past calculations, newest first (204 when empty)
//! - `GET /stats` - Service counters
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
