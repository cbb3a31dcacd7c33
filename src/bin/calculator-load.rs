//! Load generator for the calculator server.
//!
//! Pings the service once, then runs `CALC_WORKERS` worker loops until
//! Ctrl+C. Workers finish their current iteration before exiting.

use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

use calculator_service::client::{ClientConfig, LoadClient, WorkerReport};
use calculator_service::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ClientConfig::from_env();
    let _telemetry = init_tracing(
        "calculator-load",
        "calculator_load=info,calculator_service=info",
        config.log_format,
        config.otlp_endpoint.as_deref(),
    )
    .context("failed to initialize tracing")?;

    let client = Arc::new(LoadClient::new(&config).context("failed to build HTTP client")?);

    if let Err(e) = client.ping().await {
        error!("Ping to {} failed: {}", config.endpoint, e);
        return Err(e).context("service is not reachable");
    }
    info!("Ping successful, starting {} workers", config.workers);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let workers = client.spawn_workers(config.workers, shutdown_rx);

    signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl+C")?;
    info!("Received shutdown signal, waiting for workers to finish");
    // Fails only when no worker is left to observe the flag
    let _ = shutdown_tx.send(true);

    let mut total = WorkerReport::default();
    for worker in workers {
        match worker.await {
            Ok(report) => total = total.merge(report),
            Err(e) => error!("Worker task failed: {}", e),
        }
    }

    info!(
        succeeded = total.succeeded,
        failed = total.failed,
        "Client shutdown complete"
    );
    Ok(())
}
