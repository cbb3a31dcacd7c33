//! Load client configuration, read from environment variables.

use std::time::Duration;

use crate::config::{non_empty_var, parse_var};
use crate::telemetry::LogFormat;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the calculator service
    pub endpoint: String,
    /// Number of concurrent worker loops
    pub workers: usize,
    /// Upper bound of the random pause after a successful request
    pub max_sleep_ms: u64,
    /// Per-request timeout
    pub request_timeout_ms: u64,
    pub log_format: LogFormat,
    /// OTLP collector base URL; span export is off when unset
    pub otlp_endpoint: Option<String>,
}

impl ClientConfig {
    /// # Environment Variables
    /// - `CALC_ENDPOINT` - Service base URL (default: http://localhost:8080)
    /// - `CALC_WORKERS` - Worker count (default: 1000)
    /// - `CALC_MAX_SLEEP_MS` - Max pause between requests (default: 2000)
    /// - `CALC_REQUEST_TIMEOUT_MS` - Request timeout (default: 2000)
    /// - `LOG_FORMAT` - `text` or `json` (default: json)
    /// - `OTEL_EXPORTER_OTLP_ENDPOINT` - Collector URL for span export (default: unset, off)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            endpoint: parse_var::<String>("CALC_ENDPOINT")
                .map(|e| e.trim_end_matches('/').to_string())
                .unwrap_or(defaults.endpoint),
            workers: parse_var("CALC_WORKERS").unwrap_or(defaults.workers),
            max_sleep_ms: parse_var("CALC_MAX_SLEEP_MS").unwrap_or(defaults.max_sleep_ms),
            request_timeout_ms: parse_var("CALC_REQUEST_TIMEOUT_MS")
                .unwrap_or(defaults.request_timeout_ms),
            log_format: parse_var("LOG_FORMAT").unwrap_or(defaults.log_format),
            otlp_endpoint: non_empty_var("OTEL_EXPORTER_OTLP_ENDPOINT"),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080".to_string(),
            workers: 1000,
            max_sleep_ms: 2000,
            request_timeout_ms: 2000,
            log_format: LogFormat::Json,
            otlp_endpoint: None,
        }
    }
}
