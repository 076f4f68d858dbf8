//! # Rule Evaluation
//!
//! The single-pass evaluation over all assets. For each asset the service
//! and expiration rule groups are applied independently; accepted events
//! are staged into a [`CheckBatch`] for the caller to commit atomically.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use upkeep_core::{canonical_string, Asset, EventKind, Notification, Violation};
use uuid::Uuid;

use crate::dedup::DedupIndex;
use crate::window::CheckWindow;

/// The records staged by one evaluation pass.
///
/// Nothing here has been committed — the caller writes the batch in a
/// single transaction and discards it wholesale on failure.
#[derive(Debug, Default)]
pub struct CheckBatch {
    /// Staged notifications, in asset-scan order.
    pub notifications: Vec<Notification>,
    /// Staged violations, in asset-scan order.
    pub violations: Vec<Violation>,
}

impl CheckBatch {
    /// Whether the pass staged nothing.
    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty() && self.violations.is_empty()
    }

    /// Summarize the batch as creation counts.
    pub fn report(&self) -> CheckReport {
        CheckReport {
            notifications_created: self.notifications.len(),
            violations_created: self.violations.len(),
        }
    }
}

/// Counts of newly created records for one run — not table totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    /// Notifications newly recorded by this run.
    pub notifications_created: usize,
    /// Violations newly recorded by this run.
    pub violations_created: usize,
}

/// Evaluate every asset against the window and stage new events.
///
/// `index` must be seeded from the records already in storage; it is
/// mutated as events are staged so the pass cannot stage duplicates.
/// Staged records are timestamped with the window's `now`.
pub fn evaluate(window: &CheckWindow, assets: &[Asset], index: &mut DedupIndex) -> CheckBatch {
    let mut batch = CheckBatch::default();

    for asset in assets {
        if let Some(service_time) = asset.service_time {
            if window.is_upcoming(service_time) {
                stage_notification(
                    &mut batch,
                    index,
                    window,
                    asset,
                    EventKind::Service,
                    service_time,
                    format!("Service due at {}", canonical_string(&service_time)),
                );
            }
            if window.is_overdue(service_time) && service_unattended(asset, service_time) {
                stage_violation(
                    &mut batch,
                    index,
                    window,
                    asset,
                    EventKind::Service,
                    format!("Service overdue since {}", canonical_string(&service_time)),
                );
            }
        }

        if let Some(expiration_time) = asset.expiration_time {
            if window.is_upcoming(expiration_time) {
                stage_notification(
                    &mut batch,
                    index,
                    window,
                    asset,
                    EventKind::Expiration,
                    expiration_time,
                    format!("Expires at {}", canonical_string(&expiration_time)),
                );
            }
            // No last_serviced guard: expiration is not serviceable.
            if window.is_overdue(expiration_time) {
                stage_violation(
                    &mut batch,
                    index,
                    window,
                    asset,
                    EventKind::Expiration,
                    format!("Expired at {}", canonical_string(&expiration_time)),
                );
            }
        }
    }

    batch
}

/// Whether a past service deadline is still unattended. A service performed
/// exactly at `service_time` (or later) extinguishes the overdue condition.
fn service_unattended(asset: &Asset, service_time: DateTime<Utc>) -> bool {
    match asset.last_serviced {
        None => true,
        Some(last_serviced) => last_serviced < service_time,
    }
}

fn stage_notification(
    batch: &mut CheckBatch,
    index: &mut DedupIndex,
    window: &CheckWindow,
    asset: &Asset,
    kind: EventKind,
    event_time: DateTime<Utc>,
    message: String,
) {
    if !index.claim_notification(asset.id, kind, event_time) {
        return;
    }
    tracing::debug!(asset_id = %asset.id, kind = %kind, event_time = %event_time, "staging notification");
    batch.notifications.push(Notification {
        id: Uuid::new_v4(),
        asset_id: asset.id,
        message,
        kind,
        event_time,
        created_at: window.now(),
    });
}

fn stage_violation(
    batch: &mut CheckBatch,
    index: &mut DedupIndex,
    window: &CheckWindow,
    asset: &Asset,
    kind: EventKind,
    message: String,
) {
    if !index.claim_violation(asset.id, kind) {
        return;
    }
    tracing::debug!(asset_id = %asset.id, kind = %kind, "staging violation");
    batch.violations.push(Violation {
        id: Uuid::new_v4(),
        asset_id: asset.id,
        message,
        kind,
        created_at: window.now(),
    });
}
