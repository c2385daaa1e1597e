//! Shared domain types
//!
//! The central type is [`SensorReading`], one normalized sensor observation.
//! Readings enter the system as raw JSON payloads published over the
//! transport; [`SensorReading::decode`] is the only way to construct one from
//! the wire and is where all normalization happens.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// One normalized sensor observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Row identifier, assigned by the store on insert. Always `None` while
    /// the reading is in flight through the pipeline.
    pub id: Option<i64>,
    /// Relative humidity in percent, rounded to two decimal places.
    pub humidity: f64,
    /// Temperature in degrees Celsius, rounded to two decimal places.
    pub temperature: f64,
    /// Free-form sensor location label.
    pub location: String,
    /// Moment the sensor took the observation. Required on the wire; a
    /// payload without a usable timestamp is a decode failure, not a stored
    /// record with a placeholder.
    pub recorded_at: DateTime<Utc>,
}

/// Wire shape of a reading payload.
///
/// Kept separate from [`SensorReading`] so the wire field names and the lack
/// of an `id` stay out of the domain model.
#[derive(Debug, Deserialize)]
struct RawReading {
    temperature: f64,
    humidity: f64,
    location: String,
    timestamp: String,
}

impl SensorReading {
    /// Decode and normalize one raw transport payload.
    ///
    /// Numeric fields are rounded half-to-even to two decimal places.
    /// Timestamps are accepted as RFC 3339 or as a naive date-time, which is
    /// interpreted as UTC (sensor firmware publishes without an offset).
    ///
    /// Pure transformation; no side effects.
    pub fn decode(payload: &[u8]) -> Result<Self, DecodeError> {
        if payload.is_empty() {
            return Err(DecodeError::EmptyPayload);
        }

        let raw: RawReading = serde_json::from_slice(payload)?;
        let recorded_at = parse_timestamp(&raw.timestamp)?;

        Ok(Self {
            id: None,
            humidity: round_two_places(raw.humidity),
            temperature: round_two_places(raw.temperature),
            location: raw.location,
            recorded_at,
        })
    }
}

/// Round to two decimal places, ties to even.
fn round_two_places(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, DecodeError> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
        return Ok(with_offset.with_timezone(&Utc));
    }

    value
        .parse::<NaiveDateTime>()
        .map(|naive| naive.and_utc())
        .map_err(|_| DecodeError::InvalidTimestamp(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn decode_normalizes_payload() {
        let payload = br#"{"temperature":21.236,"humidity":55.554,"location":"Room1","timestamp":"2024-01-01T00:00:00"}"#;
        let reading = SensorReading::decode(payload).unwrap();

        assert_eq!(reading.id, None);
        assert_eq!(reading.temperature, 21.24);
        assert_eq!(reading.humidity, 55.55);
        assert_eq!(reading.location, "Room1");
        assert_eq!(
            reading.recorded_at,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn decode_accepts_rfc3339_with_offset() {
        let payload = br#"{"temperature":20.0,"humidity":40.0,"location":"Lab","timestamp":"2024-06-01T12:00:00+02:00"}"#;
        let reading = SensorReading::decode(payload).unwrap();

        assert_eq!(
            reading.recorded_at,
            Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn decode_rejects_empty_payload() {
        assert!(matches!(
            SensorReading::decode(b""),
            Err(DecodeError::EmptyPayload)
        ));
    }

    #[test]
    fn decode_rejects_non_json() {
        assert!(matches!(
            SensorReading::decode(b"not json"),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn decode_rejects_missing_timestamp() {
        let payload = br#"{"temperature":20.0,"humidity":40.0,"location":"Lab"}"#;
        assert!(matches!(
            SensorReading::decode(payload),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn decode_rejects_garbage_timestamp() {
        let payload = br#"{"temperature":20.0,"humidity":40.0,"location":"Lab","timestamp":"yesterday"}"#;
        assert!(matches!(
            SensorReading::decode(payload),
            Err(DecodeError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn rounding_is_two_places() {
        assert_eq!(round_two_places(21.236), 21.24);
        assert_eq!(round_two_places(55.554), 55.55);
        assert_eq!(round_two_places(-3.005), -3.0);
    }

    #[test]
    fn rounding_ties_go_to_even() {
        // 0.125 is exactly representable, so this pins the ties-to-even rule.
        assert_eq!(round_two_places(0.125), 0.12);
        assert_eq!(round_two_places(0.135), 0.14);
        // 21.245 sits just below the midpoint in IEEE-754, so it rounds down
        // under any midpoint rule.
        assert_eq!(round_two_places(21.245), 21.24);
    }
}
