//! # Event Deduplication Index
//!
//! Logical uniqueness check consulted before an event is staged. Built from
//! the records already in storage at run entry; staged keys are added as the
//! run proceeds so a single pass also cannot stage the same event twice.
//!
//! The two record types key differently on purpose (see the record type
//! docs in `upkeep-core`): notifications include the event time in their
//! key, violations do not.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use upkeep_core::{EventKind, Notification, Violation};
use uuid::Uuid;

/// Uniqueness index over notification and violation keys.
#[derive(Debug, Default)]
pub struct DedupIndex {
    notifications: HashSet<(Uuid, EventKind, DateTime<Utc>)>,
    violations: HashSet<(Uuid, EventKind)>,
}

impl DedupIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from the records currently in storage.
    pub fn from_existing<'a>(
        notifications: impl IntoIterator<Item = &'a Notification>,
        violations: impl IntoIterator<Item = &'a Violation>,
    ) -> Self {
        let mut index = Self::new();
        for n in notifications {
            index
                .notifications
                .insert((n.asset_id, n.kind, n.event_time));
        }
        for v in violations {
            index.violations.insert((v.asset_id, v.kind));
        }
        index
    }

    /// Claim a notification key. Returns `true` if the key was free (the
    /// event should be staged) and `false` if an identical notification
    /// already exists.
    pub fn claim_notification(
        &mut self,
        asset_id: Uuid,
        kind: EventKind,
        event_time: DateTime<Utc>,
    ) -> bool {
        self.notifications.insert((asset_id, kind, event_time))
    }

    /// Claim a violation key. Returns `true` if the key was free.
    pub fn claim_violation(&mut self, asset_id: Uuid, kind: EventKind) -> bool {
        self.violations.insert((asset_id, kind))
    }
}
