//! # Upkeep Events
//!
//! Records produced by the check engine: notifications for deadlines inside
//! the lookahead window, violations for deadlines already missed.
//!
//! ## Deduplication Keys
//!
//! The two record types deliberately dedupe on different keys:
//!
//! - [`Notification`]: at most one per `(asset_id, kind, event_time)`. If
//!   the asset's underlying timestamp changes, a fresh notification for the
//!   new value is permitted even while one for the old value exists.
//! - [`Violation`]: at most one per `(asset_id, kind)`, regardless of how
//!   the time value changes after first detection. A raised violation
//!   persists until deleted by an external process.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// The kind of deadline an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A periodic service deadline (`Asset::service_time`).
    Service,
    /// An expiration deadline (`Asset::expiration_time`).
    Expiration,
}

impl EventKind {
    /// Return the string representation of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Expiration => "expiration",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "service" => Ok(Self::Service),
            "expiration" => Ok(Self::Expiration),
            other => Err(ValidationError::InvalidEventKind(other.to_string())),
        }
    }
}

/// A deadline falling inside the lookahead window.
///
/// Unique per `(asset_id, kind, event_time)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Surrogate identifier.
    pub id: Uuid,
    /// The asset this notification refers to.
    pub asset_id: Uuid,
    /// Human-readable description, e.g. `"Service due at 2026-08-04T10:00:00Z"`.
    pub message: String,
    /// Which deadline kind triggered the notification.
    pub kind: EventKind,
    /// The asset's relevant timestamp at evaluation time. Part of the
    /// uniqueness key — a changed deadline yields a new notification.
    pub event_time: DateTime<Utc>,
    /// When the notification was recorded.
    pub created_at: DateTime<Utc>,
}

/// A missed deadline.
///
/// Unique per `(asset_id, kind)` — carries no `event_time` in its key, so a
/// single overdue condition produces exactly one violation for its lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Surrogate identifier.
    pub id: Uuid,
    /// The asset this violation refers to.
    pub asset_id: Uuid,
    /// Human-readable description, e.g. `"Service overdue since 2026-08-04T10:00:00Z"`.
    pub message: String,
    /// Which deadline kind was missed.
    pub kind: EventKind,
    /// When the violation was recorded.
    pub created_at: DateTime<Utc>,
}
