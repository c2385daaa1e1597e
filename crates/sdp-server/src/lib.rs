//! SDP Server Library
//!
//! Ingestion service for streaming sensor telemetry.
//!
//! # Overview
//!
//! The server subscribes to an MQTT broker, normalizes every published
//! reading, buffers it in an in-memory queue, and persists it to PostgreSQL
//! in bounded batches. A second periodic task retires rows older than the
//! retention window. Both tasks share one cancellation token and are joined
//! on shutdown.
//!
//! # Architecture
//!
//! Data flows one way:
//!
//! ```text
//! MQTT publish -> transport bridge -> MessageIngestor -> ReadingQueue
//!              -> BatchWriter -> PostgreSQL
//! ```
//!
//! The [`pipeline::RetentionSweeper`] acts on PostgreSQL independently and is
//! not fed by the queue. The [`pipeline::PipelineCoordinator`] supervises
//! both periodic tasks but never touches the queue itself.
//!
//! Failure policy: a decode failure drops one message, a failed batch insert
//! drops one batch, a failed sweep skips one iteration. Nothing short of the
//! cancellation token terminates a loop.

pub mod config;
pub mod error;
pub mod ingest;
pub mod pipeline;
pub mod store;
pub mod transport;
