//! # Temporal Parsing & Rendering
//!
//! UTC-only timestamp handling for the Upkeep service. All timestamps are
//! stored as `chrono::DateTime<Utc>`; this module owns the conversion to and
//! from the wire.
//!
//! ## Accepted Input
//!
//! - RFC 3339 with an explicit offset (`2026-08-04T10:00:00+05:00`,
//!   `2026-08-04T10:00:00Z`) — normalized to UTC.
//! - Naive ISO 8601 without an offset (`2026-08-04T10:00:00`) — interpreted
//!   as UTC. Clients that already speak UTC can omit the suffix.
//!
//! Anything else is a [`ValidationError::InvalidTimestamp`], which the API
//! layer maps to a validation failure distinct from not-found or conflict.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::ValidationError;

/// Parse an ISO 8601 timestamp string into a UTC instant.
///
/// Offset-carrying input is converted to UTC; naive input is taken as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    value
        .parse::<NaiveDateTime>()
        .map(|naive| naive.and_utc())
        .map_err(|e| ValidationError::InvalidTimestamp {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// Render a UTC instant as an ISO 8601 string with `Z` suffix, truncated
/// to seconds. Used for event messages so they stay stable regardless of
/// subsecond precision in stored timestamps.
pub fn canonical_string(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
