//! Timestamps as reported by the backend.
//!
//! The backend emits ISO-8601 strings, sometimes with a UTC offset and
//! sometimes without one (naive database timestamps). Both forms are accepted;
//! offset-carrying values are normalized to UTC.

use core::fmt;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// A point in time as reported by the backend, in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// Wrap a naive UTC date-time.
    #[must_use]
    pub const fn new(value: NaiveDateTime) -> Self {
        Self(value)
    }

    /// Parse an ISO-8601 string with or without an offset.
    ///
    /// # Errors
    ///
    /// Returns the `chrono` parse error of the naive form if neither form
    /// matches.
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        if let Ok(with_offset) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(with_offset.naive_utc()));
        }
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").map(Self)
    }

    /// The underlying naive UTC value.
    #[must_use]
    pub const fn naive_utc(&self) -> NaiveDateTime {
        self.0
    }

    /// Date and minute, e.g. `2025-03-01 14:05`.
    #[must_use]
    pub fn display_minutes(&self) -> String {
        self.0.format("%Y-%m-%d %H:%M").to_string()
    }

    /// Date only, e.g. `2025-03-01`.
    #[must_use]
    pub fn display_date(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S%.f"))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(|e| de::Error::custom(format!("invalid timestamp {raw:?}: {e}")))
    }
}
