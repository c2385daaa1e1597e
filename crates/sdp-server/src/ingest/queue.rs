//! In-memory buffer for readings pending persistence

use crossbeam::queue::SegQueue;
use sdp_common::SensorReading;

/// Thread-safe, unbounded, FIFO holding area for readings awaiting the batch
/// writer.
///
/// Any number of producers may [`push`](Self::push) concurrently with the
/// batch writer's [`pop_up_to`](Self::pop_up_to); no external locking is
/// required. Contents are lost on process restart.
///
/// There is no capacity limit: sustained ingestion faster than the batch
/// writer's throughput grows the queue without bound.
#[derive(Debug, Default)]
pub struct ReadingQueue {
    inner: SegQueue<SensorReading>,
}

impl ReadingQueue {
    pub fn new() -> Self {
        Self {
            inner: SegQueue::new(),
        }
    }

    /// Enqueue one reading. Non-blocking, never fails.
    pub fn push(&self, reading: SensorReading) {
        self.inner.push(reading);
    }

    /// Remove and return up to `max` readings in FIFO order.
    ///
    /// Returns fewer if fewer are pending, and an empty vector if none are.
    pub fn pop_up_to(&self, max: usize) -> Vec<SensorReading> {
        let mut drained = Vec::with_capacity(max.min(self.inner.len()));
        while drained.len() < max {
            match self.inner.pop() {
                Some(reading) => drained.push(reading),
                None => break,
            }
        }
        drained
    }

    /// Number of readings currently pending.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn reading(location: &str) -> SensorReading {
        SensorReading {
            id: None,
            humidity: 50.0,
            temperature: 20.0,
            location: location.to_string(),
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn pop_preserves_fifo_order() {
        let queue = ReadingQueue::new();
        for i in 0..10 {
            queue.push(reading(&format!("sensor-{i}")));
        }

        let drained = queue.pop_up_to(10);
        let order: Vec<_> = drained.iter().map(|r| r.location.as_str()).collect();
        let expected: Vec<String> = (0..10).map(|i| format!("sensor-{i}")).collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn pop_up_to_respects_cap() {
        let queue = ReadingQueue::new();
        for _ in 0..120 {
            queue.push(reading("r"));
        }

        assert_eq!(queue.pop_up_to(50).len(), 50);
        assert_eq!(queue.pop_up_to(50).len(), 50);
        assert_eq!(queue.pop_up_to(50).len(), 20);
        assert!(queue.pop_up_to(50).is_empty());
    }

    #[test]
    fn pop_on_empty_returns_empty() {
        let queue = ReadingQueue::new();
        assert!(queue.pop_up_to(50).is_empty());
        assert!(queue.is_empty());
    }
}
