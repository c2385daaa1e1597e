//! Retention sweeper task

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Months, Utc};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::store::ReadingStore;

/// Periodic task retiring persisted readings past the retention window.
///
/// Each iteration recomputes the cutoff from "now" and asks the store to
/// delete everything recorded strictly before it. A failed sweep is logged
/// and retried no sooner than the next scheduled iteration. The wait is
/// interruptible by the shared cancellation token, identically to the batch
/// writer.
pub struct RetentionSweeper {
    store: Arc<dyn ReadingStore>,
    retention_months: u32,
    sweep_interval: Duration,
    shutdown: CancellationToken,
}

impl RetentionSweeper {
    pub fn new(
        store: Arc<dyn ReadingStore>,
        retention_months: u32,
        sweep_interval: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            store,
            retention_months,
            sweep_interval,
            shutdown,
        }
    }

    /// Run the sweeper loop in a background task.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(self) {
        info!(
            retention_months = self.retention_months,
            interval_secs = self.sweep_interval.as_secs(),
            "retention sweeper started"
        );

        while !self.shutdown.is_cancelled() {
            match retention_cutoff(Utc::now(), self.retention_months) {
                Some(cutoff) => match self.store.delete_older_than(cutoff).await {
                    Ok(deleted) if deleted > 0 => {
                        info!(deleted, %cutoff, "retired aged readings");
                    },
                    Ok(_) => {},
                    Err(error) => {
                        error!(%error, %cutoff, "retention sweep failed");
                    },
                },
                None => {
                    warn!(
                        retention_months = self.retention_months,
                        "retention cutoff not representable, skipping sweep"
                    );
                },
            }

            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = sleep(self.sweep_interval) => {},
            }
        }

        info!("retention sweeper stopped");
    }
}

/// Cutoff anchored to `now`: readings recorded strictly before it are
/// retired. Calendar months, not a fixed day count.
pub fn retention_cutoff(now: DateTime<Utc>, months: u32) -> Option<DateTime<Utc>> {
    now.checked_sub_months(Months::new(months))
}
