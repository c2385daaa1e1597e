//! Durable store collaborators
//!
//! The pipeline talks to the store through [`ReadingStore`], which exposes
//! exactly the two operations the periodic loops need. The production
//! implementation is [`postgres::PgReadingStore`]; tests substitute an
//! in-memory implementation.

pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sdp_common::SensorReading;

use crate::error::StoreError;

pub use postgres::PgReadingStore;

/// Insert-batch / delete-matching capability of the durable store.
///
/// Both calls are synchronous from the caller's point of view; the store must
/// support concurrent independent calls (batch inserts from the writer and
/// deletes from the sweeper are never coordinated).
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Persist the batch as one unit. The readings are consumed: on failure
    /// the batch is gone from the pipeline's perspective.
    async fn insert_batch(&self, readings: Vec<SensorReading>) -> Result<(), StoreError>;

    /// Delete every record recorded strictly before `cutoff`. Returns the
    /// number of rows deleted.
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError>;
}
