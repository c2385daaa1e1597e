//! Shared test helpers

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sdp_common::SensorReading;
use sdp_server::error::StoreError;
use sdp_server::store::ReadingStore;

/// In-memory [`ReadingStore`] with failure injection.
///
/// Rows live in a flat vector; successful batch sizes and sweep cutoffs are
/// recorded in arrival order so tests can assert on the pipeline's behavior.
#[derive(Default)]
pub struct MockStore {
    rows: Mutex<Vec<SensorReading>>,
    batch_sizes: Mutex<Vec<usize>>,
    cutoffs: Mutex<Vec<DateTime<Utc>>>,
    insert_attempts: AtomicUsize,
    fail_inserts: AtomicUsize,
    fail_deletes: AtomicUsize,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` insert calls fail.
    pub fn fail_next_inserts(&self, n: usize) {
        self.fail_inserts.store(n, Ordering::SeqCst);
    }

    /// Make the next `n` delete calls fail.
    pub fn fail_next_deletes(&self, n: usize) {
        self.fail_deletes.store(n, Ordering::SeqCst);
    }

    /// Pre-populate the store, as if persisted by an earlier run.
    pub fn seed(&self, readings: Vec<SensorReading>) {
        self.rows.lock().unwrap().extend(readings);
    }

    pub fn rows(&self) -> Vec<SensorReading> {
        self.rows.lock().unwrap().clone()
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes.lock().unwrap().clone()
    }

    pub fn cutoffs(&self) -> Vec<DateTime<Utc>> {
        self.cutoffs.lock().unwrap().clone()
    }

    pub fn insert_attempts(&self) -> usize {
        self.insert_attempts.load(Ordering::SeqCst)
    }

    fn take_failure(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl ReadingStore for MockStore {
    async fn insert_batch(&self, readings: Vec<SensorReading>) -> Result<(), StoreError> {
        self.insert_attempts.fetch_add(1, Ordering::SeqCst);

        if Self::take_failure(&self.fail_inserts) {
            return Err(StoreError::Database(sqlx::Error::PoolClosed));
        }

        self.batch_sizes.lock().unwrap().push(readings.len());
        self.rows.lock().unwrap().extend(readings);
        Ok(())
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        self.cutoffs.lock().unwrap().push(cutoff);

        if Self::take_failure(&self.fail_deletes) {
            return Err(StoreError::Database(sqlx::Error::PoolClosed));
        }

        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.recorded_at >= cutoff);
        Ok((before - rows.len()) as u64)
    }
}

/// A reading with a distinguishing location label.
pub fn reading(location: &str) -> SensorReading {
    reading_at(location, Utc::now())
}

pub fn reading_at(location: &str, recorded_at: DateTime<Utc>) -> SensorReading {
    SensorReading {
        id: None,
        humidity: 55.55,
        temperature: 21.24,
        location: location.to_string(),
        recorded_at,
    }
}

/// Poll `cond` until it holds or `timeout` elapses.
pub async fn wait_for<F>(cond: F, timeout: Duration, what: &str)
where
    F: Fn() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while !cond() {
        if tokio::time::Instant::now() >= deadline {
            panic!("timed out waiting for {what}");
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
