//! Tracing setup shared by the server and the load client.
//!
//! Events always go to a fmt layer. When a collector endpoint is configured,
//! spans are also exported over OTLP/HTTP through `tracing-opentelemetry`.

use std::str::FromStr;

use opentelemetry::{global, trace::TracerProvider as _, KeyValue};
use opentelemetry_otlp::{Protocol, WithExportConfig};
use opentelemetry_sdk::{trace::SdkTracerProvider, Resource};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::TelemetryError;

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format: {}", other)),
        }
    }
}

/// Keeps the span exporter alive; buffered spans are flushed on drop.
#[must_use = "dropping the guard stops span export"]
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    /// Whether spans are being exported to a collector.
    pub fn is_exporting(&self) -> bool {
        self.provider.is_some()
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            if let Err(e) = provider.shutdown() {
                warn!("Failed to flush spans: {}", e);
            }
        }
    }
}

/// Installs the global tracing subscriber.
///
/// `default_filter` applies when `RUST_LOG` is not set. With `otlp_endpoint`
/// set, spans are exported under `service_name` until the returned guard is
/// dropped. Only binaries call this; library code just emits events.
pub fn init_tracing(
    service_name: &'static str,
    default_filter: &str,
    format: LogFormat,
    otlp_endpoint: Option<&str>,
) -> Result<TelemetryGuard, TelemetryError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let provider = otlp_endpoint
        .map(|endpoint| span_provider(service_name, endpoint))
        .transpose()?;
    let otel_layer = provider
        .as_ref()
        .map(|provider| tracing_opentelemetry::layer().with_tracer(provider.tracer(service_name)));

    let registry = tracing_subscriber::registry().with(filter).with(otel_layer);
    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init(),
    }

    if let Some(endpoint) = otlp_endpoint {
        info!("Exporting spans to {}", traces_endpoint(endpoint));
    }
    Ok(TelemetryGuard { provider })
}

/// Builds a batching tracer provider that ships spans to `endpoint`.
fn span_provider(
    service_name: &'static str,
    endpoint: &str,
) -> Result<SdkTracerProvider, TelemetryError> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_endpoint(traces_endpoint(endpoint))
        .with_protocol(Protocol::HttpBinary)
        .build()
        .map_err(|e| TelemetryError::Exporter(e.to_string()))?;

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(
            Resource::builder_empty()
                .with_attribute(KeyValue::new("service.name", service_name))
                .build(),
        )
        .build();

    global::set_tracer_provider(provider.clone());
    Ok(provider)
}

/// Signal path for spans under an OTLP/HTTP collector base URL.
fn traces_endpoint(base: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.ends_with("/v1/traces") {
        base.to_string()
    } else {
        format!("{}/v1/traces", base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("TEXT".parse::<LogFormat>(), Ok(LogFormat::Text));
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_traces_endpoint() {
        assert_eq!(
            traces_endpoint("http://otel-collector:4318"),
            "http://otel-collector:4318/v1/traces"
        );
        assert_eq!(
            traces_endpoint("http://otel-collector:4318/"),
            "http://otel-collector:4318/v1/traces"
        );
        assert_eq!(
            traces_endpoint("http://otel-collector:4318/v1/traces"),
            "http://otel-collector:4318/v1/traces"
        );
    }

    #[test]
    fn test_span_provider_builds_without_collector() {
        // Building the exporter does not connect; nothing listens on this port
        let provider = span_provider("calculator-test", "http://127.0.0.1:1").unwrap();
        let guard = TelemetryGuard {
            provider: Some(provider),
        };
        assert!(guard.is_exporting());
    }

    #[test]
    fn test_guard_without_exporter() {
        let guard = TelemetryGuard { provider: None };
        assert!(!guard.is_exporting());
    }
}
