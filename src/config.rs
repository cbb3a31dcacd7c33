//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::telemetry::LogFormat;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Redis/Valkey URL; the in-memory cache is used when unset
    pub redis_url: Option<String>,
    /// PostgreSQL URL; the in-memory history is used when unset
    pub database_url: Option<String>,
    /// Attempts made to reach the database at startup
    pub db_connect_attempts: u32,
    /// Fixed pause between database connection attempts in milliseconds
    pub db_connect_backoff_ms: u64,
    /// Upper bound on pooled database connections
    pub db_max_connections: u32,
    /// TTL in seconds handed to the cache on every write, None = no expiry
    pub cache_ttl: Option<u64>,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Log output format
    pub log_format: LogFormat,
    /// OTLP collector base URL; span export is off when unset
    pub otlp_endpoint: Option<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `REDIS_URL` - Cache backend URL (default: unset, in-memory)
    /// - `DATABASE_URL` - History backend URL (default: unset, in-memory)
    /// - `DB_CONNECT_ATTEMPTS` - Startup connection attempts (default: 5)
    /// - `DB_CONNECT_BACKOFF_MS` - Pause between attempts (default: 1000)
    /// - `DB_MAX_CONNECTIONS` - Pool size (default: 100)
    /// - `CACHE_TTL` - Cache entry TTL in seconds (default: unset)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    /// - `LOG_FORMAT` - `text` or `json` (default: text)
    /// - `OTEL_EXPORTER_OTLP_ENDPOINT` - Collector URL for span export (default: unset, off)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            redis_url: non_empty_var("REDIS_URL"),
            database_url: non_empty_var("DATABASE_URL"),
            db_connect_attempts: parse_var("DB_CONNECT_ATTEMPTS")
                .unwrap_or(defaults.db_connect_attempts),
            db_connect_backoff_ms: parse_var("DB_CONNECT_BACKOFF_MS")
                .unwrap_or(defaults.db_connect_backoff_ms),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS")
                .unwrap_or(defaults.db_max_connections),
            cache_ttl: parse_var("CACHE_TTL"),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            log_format: parse_var("LOG_FORMAT").unwrap_or(defaults.log_format),
            otlp_endpoint: non_empty_var("OTEL_EXPORTER_OTLP_ENDPOINT"),
        }
    }

    /// Cache TTL as a Duration, if one is configured.
    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl.map(Duration::from_secs)
    }

    /// Pause between database connection attempts.
    pub fn db_connect_backoff(&self) -> Duration {
        Duration::from_millis(self.db_connect_backoff_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8080,
            redis_url: None,
            database_url: None,
            db_connect_attempts: 5,
            db_connect_backoff_ms: 1000,
            db_max_connections: 100,
            cache_ttl: None,
            cleanup_interval: 1,
            log_format: LogFormat::Text,
            otlp_endpoint: None,
        }
    }
}

/// Reads and parses an environment variable, ignoring unset or unparsable values.
pub(crate) fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

pub(crate) fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 8080);
        assert!(config.redis_url.is_none());
        assert!(config.database_url.is_none());
        assert_eq!(config.db_connect_attempts, 5);
        assert_eq!(config.db_connect_backoff(), Duration::from_secs(1));
        assert!(config.cache_ttl().is_none());
        assert_eq!(config.cleanup_interval, 1);
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.otlp_endpoint.is_none());
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        for name in [
            "SERVER_PORT",
            "REDIS_URL",
            "DATABASE_URL",
            "DB_CONNECT_ATTEMPTS",
            "DB_CONNECT_BACKOFF_MS",
            "DB_MAX_CONNECTIONS",
            "CACHE_TTL",
            "CLEANUP_INTERVAL",
            "LOG_FORMAT",
            "OTEL_EXPORTER_OTLP_ENDPOINT",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env();
        assert_eq!(config.server_port, 8080);
        assert!(config.redis_url.is_none());
        assert_eq!(config.db_connect_attempts, 5);
        assert_eq!(config.db_max_connections, 100);
        assert!(config.cache_ttl.is_none());
        assert!(config.otlp_endpoint.is_none());
    }

    #[test]
    fn test_cache_ttl_conversion() {
        let config = Config {
            cache_ttl: Some(30),
            ..Config::default()
        };
        assert_eq!(config.cache_ttl(), Some(Duration::from_secs(30)));
    }
}
