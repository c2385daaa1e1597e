//! Message ingestion
//!
//! The ingestor is the transport's per-message callback. It decodes and
//! normalizes each payload and hands the result to the queue buffer; it never
//! touches the store or waits on the batch writer.

pub mod queue;

use std::sync::Arc;

use sdp_common::SensorReading;
use tracing::{trace, warn};

use crate::ingest::queue::ReadingQueue;

/// Per-message ingestion callback.
///
/// Cheap to clone; safe to invoke from any number of concurrent tasks. The
/// body is synchronous and non-blocking: its only obligation is
/// enqueue-or-drop-with-log.
#[derive(Clone)]
pub struct MessageIngestor {
    queue: Arc<ReadingQueue>,
}

impl MessageIngestor {
    pub fn new(queue: Arc<ReadingQueue>) -> Self {
        Self { queue }
    }

    /// Handle one inbound transport message.
    ///
    /// A payload that fails to decode is logged and dropped; the pipeline is
    /// not interrupted and no record is produced.
    pub fn handle_message(&self, topic: &str, payload: &[u8]) {
        match SensorReading::decode(payload) {
            Ok(reading) => {
                trace!(topic, location = %reading.location, "queued reading");
                self.queue.push(reading);
            },
            Err(error) => {
                warn!(topic, %error, "dropping undecodable payload");
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_payload_is_queued() {
        let queue = Arc::new(ReadingQueue::new());
        let ingestor = MessageIngestor::new(queue.clone());

        ingestor.handle_message(
            "sensors/room1",
            br#"{"temperature":21.236,"humidity":55.554,"location":"Room1","timestamp":"2024-01-01T00:00:00"}"#,
        );

        let drained = queue.pop_up_to(50);
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].temperature, 21.24);
        assert_eq!(drained[0].humidity, 55.55);
    }

    #[test]
    fn undecodable_payload_is_dropped() {
        let queue = Arc::new(ReadingQueue::new());
        let ingestor = MessageIngestor::new(queue.clone());

        ingestor.handle_message("sensors/room1", b"not json");
        ingestor.handle_message("sensors/room1", b"");

        assert!(queue.is_empty());
    }
}
