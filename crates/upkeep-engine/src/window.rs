//! # Check Window
//!
//! One consistent `now` per run. The window is captured once at run entry
//! and every comparison in the pass uses the same instant, so evaluation is
//! unaffected by wall-clock drift while the pass executes.

use chrono::{DateTime, Duration, Utc};

/// How far ahead the upcoming window reaches.
pub const LOOKAHEAD_MINUTES: i64 = 15;

/// The time window for a single check run.
///
/// `upcoming = now + 15 minutes`. Both window boundaries are inclusive: a
/// deadline exactly at `now` or exactly at `upcoming` counts as upcoming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckWindow {
    now: DateTime<Utc>,
    upcoming: DateTime<Utc>,
}

impl CheckWindow {
    /// Capture a window starting at `now`.
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            now,
            upcoming: now + Duration::minutes(LOOKAHEAD_MINUTES),
        }
    }

    /// The instant the run was captured at.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// The far edge of the upcoming window.
    pub fn upcoming(&self) -> DateTime<Utc> {
        self.upcoming
    }

    /// Whether `deadline` falls inside `[now, upcoming]`, inclusive on both
    /// boundaries.
    pub fn is_upcoming(&self, deadline: DateTime<Utc>) -> bool {
        self.now <= deadline && deadline <= self.upcoming
    }

    /// Whether `deadline` is strictly in the past relative to the run.
    pub fn is_overdue(&self, deadline: DateTime<Utc>) -> bool {
        self.now > deadline
    }
}
