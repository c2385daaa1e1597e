//! Periodic persistence tasks and their lifecycle
//!
//! Two long-lived tokio tasks run here: the [`writer::BatchWriter`] drains
//! the queue buffer into the store in bounded batches, and the
//! [`sweeper::RetentionSweeper`] retires rows older than the retention
//! window. The [`coordinator::PipelineCoordinator`] owns the cancellation
//! token they share and joins both on shutdown.

pub mod coordinator;
pub mod sweeper;
pub mod writer;

pub use coordinator::PipelineCoordinator;
pub use sweeper::RetentionSweeper;
pub use writer::BatchWriter;
