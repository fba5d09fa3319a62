//! Watermark model for incremental windows
//!
//! A watermark is the remote system's record of how far a channel has been
//! synced. It is fetched fresh at the start of each phase and only lives for
//! the duration of that phase.

use crate::domain::{Channel, Result, SyncError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Naive layouts accepted in addition to RFC 3339; interpreted as UTC
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Timestamp boundary for one channel
///
/// Rows with `updated_at <= timestamp` belong to earlier runs.
///
/// # Examples
///
/// ```
/// use incident_sync::core::state::Watermark;
/// use incident_sync::domain::Channel;
///
/// let watermark = Watermark::parse(Channel::Data, "2024-03-01T09:30:00Z").unwrap();
/// let later = "2024-03-01T09:30:01Z".parse().unwrap();
/// assert!(watermark.admits(later));
/// assert!(!watermark.admits(watermark.timestamp));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watermark {
    /// Channel this watermark bounds
    pub channel: Channel,

    /// Last synced instant
    pub timestamp: DateTime<Utc>,
}

impl Watermark {
    pub fn new(channel: Channel, timestamp: DateTime<Utc>) -> Self {
        Self { channel, timestamp }
    }

    /// Parse a watermark from its textual form
    ///
    /// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS[.fff]` and
    /// `YYYY-MM-DDTHH:MM:SS[.fff]` (both UTC), and a bare date.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MalformedWatermark`] if none of the layouts match.
    pub fn parse(channel: Channel, raw: &str) -> Result<Self> {
        let raw = raw.trim();

        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Ok(Self::new(channel, ts.with_timezone(&Utc)));
        }

        for format in NAIVE_FORMATS {
            if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
                return Ok(Self::new(channel, ts.and_utc()));
            }
        }

        if let Some(ts) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        {
            return Ok(Self::new(channel, ts.and_utc()));
        }

        Err(SyncError::MalformedWatermark {
            channel,
            message: format!("unrecognised timestamp '{raw}'"),
        })
    }

    /// Read a watermark from a JSON value
    ///
    /// Strings go through [`Watermark::parse`]; integers are epoch milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MalformedWatermark`] for `null`, other JSON types,
    /// or an out-of-range timestamp.
    pub fn from_json(channel: Channel, value: &Value) -> Result<Self> {
        match value {
            Value::String(raw) => Self::parse(channel, raw),
            Value::Number(n) => n
                .as_i64()
                .and_then(DateTime::<Utc>::from_timestamp_millis)
                .map(|ts| Self::new(channel, ts))
                .ok_or_else(|| SyncError::MalformedWatermark {
                    channel,
                    message: format!("epoch value {n} is out of range"),
                }),
            other => Err(SyncError::MalformedWatermark {
                channel,
                message: format!("expected a timestamp, got {other}"),
            }),
        }
    }

    /// Whether a row changed at `updated_at` falls inside the window
    pub fn admits(&self, updated_at: DateTime<Utc>) -> bool {
        updated_at > self.timestamp
    }
}

impl fmt::Display for Watermark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.channel, self.timestamp.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn expected() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_parse_rfc3339() {
        let wm = Watermark::parse(Channel::Data, "2024-03-01T09:30:00.000Z").unwrap();
        assert_eq!(wm.timestamp, expected());
        assert_eq!(wm.channel, Channel::Data);
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let wm = Watermark::parse(Channel::Meta, "2024-03-01T12:30:00+03:00").unwrap();
        assert_eq!(wm.timestamp, expected());
    }

    #[test]
    fn test_parse_naive_formats() {
        for raw in ["2024-03-01 09:30:00", "2024-03-01T09:30:00", "2024-03-01 09:30:00.000"] {
            let wm = Watermark::parse(Channel::Data, raw).unwrap();
            assert_eq!(wm.timestamp, expected(), "{raw}");
        }
    }

    #[test]
    fn test_parse_date_only() {
        let wm = Watermark::parse(Channel::Meta, "2024-03-01").unwrap();
        assert_eq!(wm.timestamp, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_garbage() {
        let err = Watermark::parse(Channel::Meta, "yesterday").unwrap_err();
        assert!(matches!(
            err,
            SyncError::MalformedWatermark {
                channel: Channel::Meta,
                ..
            }
        ));
    }

    #[test]
    fn test_from_json_epoch_millis() {
        let millis = expected().timestamp_millis();
        let wm = Watermark::from_json(Channel::Data, &json!(millis)).unwrap();
        assert_eq!(wm.timestamp, expected());
    }

    #[test]
    fn test_from_json_null_is_malformed() {
        assert!(Watermark::from_json(Channel::Data, &Value::Null).is_err());
        assert!(Watermark::from_json(Channel::Data, &json!(true)).is_err());
    }

    #[test]
    fn test_admits_is_strict() {
        let wm = Watermark::new(Channel::Data, expected());
        assert!(!wm.admits(expected()));
        assert!(!wm.admits(expected() - chrono::Duration::seconds(1)));
        assert!(wm.admits(expected() + chrono::Duration::milliseconds(1)));
    }
}
