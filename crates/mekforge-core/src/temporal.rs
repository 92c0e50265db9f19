//! # Report Timestamps
//!
//! Defines `Timestamp`, a UTC-only instant truncated to seconds precision.
//! Reports stamped on different machines must render identically for the
//! same instant, so local offsets and sub-second noise are normalised away
//! at construction.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// A UTC instant with seconds precision.
///
/// Every construction path truncates sub-seconds and converts to UTC, so
/// two timestamps for the same second always compare equal and render the
/// same `YYYY-MM-DDTHH:MM:SSZ` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Builds a timestamp from a `chrono::DateTime<Utc>`, truncating
    /// sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parses an RFC 3339 string, converting any offset to UTC.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidTimestamp`] when the string is not
    /// valid RFC 3339.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| ParseError::InvalidTimestamp(format!("{s:?}: {e}")))?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Builds a timestamp from Unix epoch seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidTimestamp`] when the value is outside
    /// the representable range.
    pub fn from_epoch_secs(secs: i64) -> Result<Self, ParseError> {
        let dt = DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| ParseError::InvalidTimestamp(format!("epoch seconds {secs}")))?;
        Ok(Self(dt))
    }

    /// The inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Unix epoch seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Renders as ISO 8601 with Z suffix, e.g. `2026-01-15T12:00:00Z`.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_utc(dt)
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision.
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}
