//! Pipeline lifecycle coordination

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::PipelineConfig;
use crate::ingest::queue::ReadingQueue;
use crate::pipeline::{BatchWriter, RetentionSweeper};
use crate::store::ReadingStore;

/// Owns the cancellation token shared by the batch writer and retention
/// sweeper and drives orderly shutdown.
///
/// Both loops are started together and joined together: once
/// [`shutdown`](Self::shutdown) returns, neither task is left mid-iteration.
pub struct PipelineCoordinator {
    shutdown: CancellationToken,
    writer: JoinHandle<()>,
    sweeper: JoinHandle<()>,
}

impl PipelineCoordinator {
    /// Start the batch writer and retention sweeper as independent tasks.
    pub fn start(
        queue: Arc<ReadingQueue>,
        store: Arc<dyn ReadingStore>,
        config: &PipelineConfig,
    ) -> Self {
        let shutdown = CancellationToken::new();

        let writer = BatchWriter::new(
            queue,
            store.clone(),
            config.batch_size,
            config.flush_interval(),
            shutdown.clone(),
        )
        .spawn();

        let sweeper = RetentionSweeper::new(
            store,
            config.retention_months,
            config.sweep_interval(),
            shutdown.clone(),
        )
        .spawn();

        info!("pipeline started");

        Self {
            shutdown,
            writer,
            sweeper,
        }
    }

    /// Request cancellation of both loops. Idempotent; repeated calls are
    /// no-ops.
    pub fn request_shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Request cancellation and wait for both loops to stop.
    pub async fn shutdown(self) {
        self.request_shutdown();
        self.join().await;
    }

    /// Wait for both loops to reach their terminal state.
    pub async fn join(self) {
        if let Err(error) = self.writer.await {
            error!(%error, "batch writer task failed");
        }
        if let Err(error) = self.sweeper.await {
            error!(%error, "retention sweeper task failed");
        }
        info!("pipeline stopped");
    }
}
