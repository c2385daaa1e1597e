//! Server-specific error types

use thiserror::Error;

/// Failure of a durable-store operation.
///
/// Store errors are recovered locally by the loop that issued the call: the
/// batch writer discards the batch, the retention sweeper skips the sweep.
/// Neither terminates its loop.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
