//! Error types for the calculator service
//!
//! One enum per collaborator plus the HTTP-facing `AppError`, all built on thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Failures reported by a cache backend.
#[derive(Error, Debug)]
pub enum CacheError {
    /// No entry under the key, or the entry has expired
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// Backend read failed or the stored value could not be decoded
    #[error("Cache read failed: {0}")]
    ReadFailed(String),

    /// Backend write failed
    #[error("Cache write failed: {0}")]
    WriteFailed(String),

    /// Initial connection to the backend failed
    #[error("Cache connection failed: {0}")]
    ConnectFailed(String),
}

// == Store Error Enum ==
/// Failures reported by a history store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// An append or list statement failed
    #[error("Persistence failed: {0}")]
    PersistenceFailed(String),

    /// The store could not be reached within the retry budget
    #[error("Store connection failed after {attempts} attempts: {reason}")]
    ConnectFailed { attempts: u32, reason: String },
}

// == Calculation Error Enum ==
/// Domain errors raised by the arithmetic itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("unknown operation: {0}")]
    UnknownOperation(String),
}

// == Client Error Enum ==
/// Failures seen by the load-generating client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Request could not be sent or the response could not be read
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-200 status
    #[error("Unexpected status code: {0}")]
    UnexpectedStatus(reqwest::StatusCode),
}

// == Telemetry Error Enum ==
/// Failures while installing the tracing pipeline.
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The OTLP span exporter could not be built
    #[error("Trace exporter setup failed: {0}")]
    Exporter(String),
}

// == App Error Enum ==
/// Errors surfaced to HTTP clients.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed request body
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Operator outside add/subtract/multiply/divide
    #[error("Invalid operation: {0}")]
    UnknownOperation(String),

    #[error("Cannot divide: division by zero")]
    DivisionByZero,

    /// History store could not be read
    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),
}

impl From<CalcError> for AppError {
    fn from(err: CalcError) -> Self {
        match err {
            CalcError::DivisionByZero => AppError::DivisionByZero,
            CalcError::UnknownOperation(op) => AppError::UnknownOperation(op),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidRequest(_)
            | AppError::UnknownOperation(_)
            | AppError::DivisionByZero => StatusCode::BAD_REQUEST,
            AppError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for HTTP handlers.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_bad_request() {
        for err in [
            AppError::InvalidRequest("bad json".to_string()),
            AppError::UnknownOperation("modulo".to_string()),
            AppError::DivisionByZero,
        ] {
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_persistence_error_maps_to_internal() {
        let err = AppError::from(StoreError::PersistenceFailed("down".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_calc_error_conversion() {
        assert!(matches!(
            AppError::from(CalcError::DivisionByZero),
            AppError::DivisionByZero
        ));
        assert!(matches!(
            AppError::from(CalcError::UnknownOperation("pow".to_string())),
            AppError::UnknownOperation(op) if op == "pow"
        ));
    }

    #[test]
    fn test_division_by_zero_message() {
        assert!(AppError::DivisionByZero.to_string().contains("division by zero"));
    }
}
