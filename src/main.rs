//! Calculator server binary
//!
//! Wires configuration, backends and the HTTP router together.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use calculator_service::api::{create_router, AppState};
use calculator_service::cache::{Cache, MemoryCache, RedisCache};
use calculator_service::storage::{HistoryStore, MemoryHistory, PostgresHistory};
use calculator_service::telemetry::init_tracing;
use calculator_service::{spawn_cleanup_task, Config, OperationService};

/// Main entry point for the calculator server.
///
/// # Startup Sequence
/// 1. Load configuration from environment variables
/// 2. Initialize tracing subscriber for logging, plus OTLP span export when configured
/// 3. Connect the cache (Redis when configured, otherwise in-memory with a TTL sweeper)
/// 4. Connect the history store (PostgreSQL with bounded retries, otherwise in-memory)
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
///
/// Backend connection failures abort startup.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    // Defaults to "info" level, can be overridden with RUST_LOG env var
    let telemetry = init_tracing(
        "calculator",
        "calculator=info,calculator_service=info,tower_http=info",
        config.log_format,
        config.otlp_endpoint.as_deref(),
    )
    .context("failed to initialize tracing")?;

    info!("Starting calculator server");
    info!(
        "Configuration loaded: port={}, redis={}, database={}, cache_ttl={:?}, span_export={}",
        config.server_port,
        config.redis_url.is_some(),
        config.database_url.is_some(),
        config.cache_ttl,
        telemetry.is_exporting()
    );

    let mut cleanup_handle = None;
    let cache: Arc<dyn Cache> = match &config.redis_url {
        Some(url) => {
            let redis = RedisCache::connect(url)
                .await
                .context("failed to connect to cache")?;
            Arc::new(redis) as Arc<dyn Cache>
        }
        None => {
            let memory = Arc::new(MemoryCache::new());
            cleanup_handle = Some(spawn_cleanup_task(memory.clone(), config.cleanup_interval));
            info!("Using in-memory cache");
            memory as Arc<dyn Cache>
        }
    };

    let history: Arc<dyn HistoryStore> = match &config.database_url {
        Some(url) => {
            let postgres = PostgresHistory::connect(
                url,
                config.db_max_connections,
                config.db_connect_attempts,
                config.db_connect_backoff(),
            )
            .await
            .context("failed to connect to history database")?;
            Arc::new(postgres) as Arc<dyn HistoryStore>
        }
        None => {
            info!("Using in-memory history");
            Arc::new(MemoryHistory::new()) as Arc<dyn HistoryStore>
        }
    };

    let service = OperationService::new(cache, history).with_cache_ttl(config.cache_ttl());
    let app = create_router(AppState::new(service));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the cleanup task if one is running.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Cleanup task aborted");
    }
}
