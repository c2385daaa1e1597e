//! Error types shared across SDP

use thiserror::Error;

/// Failure to turn a raw transport payload into a [`crate::SensorReading`].
///
/// Decode failures are always recovered locally by the caller (logged and
/// dropped); they never reach the persistence pipeline.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("empty payload")]
    EmptyPayload,

    #[error("malformed reading payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unparseable timestamp: {0:?}")]
    InvalidTimestamp(String),
}
