//! Batch writer task

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::ingest::queue::ReadingQueue;
use crate::store::ReadingStore;

/// Periodic task draining the queue buffer into the store.
///
/// Each iteration drains up to `batch_size` readings and persists them as a
/// single batch insert. A failed insert is logged and the batch discarded —
/// no retry, no re-enqueue — so one bad iteration never stalls ingestion.
/// The wait between iterations races the cancellation token, so shutdown is
/// prompt rather than bounded by the flush interval.
pub struct BatchWriter {
    queue: Arc<ReadingQueue>,
    store: Arc<dyn ReadingStore>,
    batch_size: usize,
    flush_interval: Duration,
    shutdown: CancellationToken,
}

impl BatchWriter {
    pub fn new(
        queue: Arc<ReadingQueue>,
        store: Arc<dyn ReadingStore>,
        batch_size: usize,
        flush_interval: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            queue,
            store,
            batch_size,
            flush_interval,
            shutdown,
        }
    }

    /// Run the writer loop in a background task.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(self) {
        info!(
            batch_size = self.batch_size,
            interval_secs = self.flush_interval.as_secs_f64(),
            "batch writer started"
        );

        while !self.shutdown.is_cancelled() {
            let batch = self.queue.pop_up_to(self.batch_size);

            if !batch.is_empty() {
                let count = batch.len();
                match self.store.insert_batch(batch).await {
                    Ok(()) => debug!(count, "persisted reading batch"),
                    Err(error) => {
                        // No retry; the drained readings are gone.
                        error!(%error, discarded = count, "batch insert failed");
                    },
                }
            }

            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = sleep(self.flush_interval) => {},
            }
        }

        info!("batch writer stopped");
    }
}
