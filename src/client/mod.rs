//! Load Client Module
//!
//! Drives the calculator service with many independent worker loops. Each
//! worker sends a random calculation, pauses for a random interval after a
//! success and repeats until shutdown is signalled.

mod config;

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::error::ClientError;
use crate::models::{CalculateRequest, CalculateResponse};
use crate::service::Operation;

pub use config::ClientConfig;

const USER_AGENT: &str = "CalculatorClient/1.0";

/// Operands are drawn from `0..OPERAND_BOUND`.
pub const OPERAND_BOUND: i64 = 100;

/// Per-worker request tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerReport {
    pub succeeded: u64,
    pub failed: u64,
}

impl WorkerReport {
    pub fn merge(self, other: WorkerReport) -> WorkerReport {
        WorkerReport {
            succeeded: self.succeeded + other.succeeded,
            failed: self.failed + other.failed,
        }
    }
}

// == Load Client ==
pub struct LoadClient {
    http: reqwest::Client,
    endpoint: String,
    max_sleep_ms: u64,
}

impl LoadClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            max_sleep_ms: config.max_sleep_ms,
        })
    }

    /// Checks that the service answers `GET /ping` with 200.
    pub async fn ping(&self) -> Result<(), ClientError> {
        let response = self
            .http
            .get(format!("{}/ping", self.endpoint))
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(ClientError::UnexpectedStatus(response.status()));
        }
        Ok(())
    }

    /// Sends one calculation and decodes the result.
    pub async fn calculate(
        &self,
        request: &CalculateRequest,
    ) -> Result<CalculateResponse, ClientError> {
        let response = self
            .http
            .post(format!("{}/calculate", self.endpoint))
            .json(request)
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(ClientError::UnexpectedStatus(response.status()));
        }
        Ok(response.json().await?)
    }

    /// Runs one worker loop until `shutdown` reads `true`.
    ///
    /// The flag is checked only at the top of each iteration, so a pause that
    /// is already under way runs to completion.
    pub async fn run_worker(
        &self,
        worker_id: usize,
        shutdown: watch::Receiver<bool>,
    ) -> WorkerReport {
        let mut rng = StdRng::from_entropy();
        let mut report = WorkerReport::default();

        loop {
            if *shutdown.borrow() {
                info!(worker_id, "worker exiting");
                return report;
            }

            let request = random_request(&mut rng);
            match self.calculate(&request).await {
                Ok(response) => {
                    report.succeeded += 1;
                    info!(
                        worker_id,
                        operation = %request.operation,
                        result = response.result,
                        "calculation successful"
                    );
                    if self.max_sleep_ms > 0 {
                        let pause = rng.gen_range(0..self.max_sleep_ms);
                        tokio::time::sleep(Duration::from_millis(pause)).await;
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    error!(worker_id, operation = %request.operation, "calculation failed: {}", e);
                }
            }
        }
    }

    /// Spawns `count` workers sharing this client.
    pub fn spawn_workers(
        self: &Arc<Self>,
        count: usize,
        shutdown: watch::Receiver<bool>,
    ) -> Vec<JoinHandle<WorkerReport>> {
        (0..count)
            .map(|worker_id| {
                let client = Arc::clone(self);
                let shutdown = shutdown.clone();
                tokio::spawn(async move { client.run_worker(worker_id, shutdown).await })
            })
            .collect()
    }
}

/// Random operation over operands in `0..OPERAND_BOUND`.
pub fn random_request<R: Rng>(rng: &mut R) -> CalculateRequest {
    let operation = Operation::ALL[rng.gen_range(0..Operation::ALL.len())];
    CalculateRequest::new(
        rng.gen_range(0..OPERAND_BOUND),
        rng.gen_range(0..OPERAND_BOUND),
        operation,
    )
}
