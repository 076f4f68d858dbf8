//! # Check Run Orchestration
//!
//! Composes the engine with the stores and the database: snapshot assets,
//! build the dedup index from existing records, evaluate, commit the staged
//! batch atomically, then publish to the in-memory stores.
//!
//! Runs are serialized behind `AppState::check_lock` for the entire
//! read-evaluate-stage-commit sequence, so two invocations cannot both pass
//! the dedup check for the same key. The database uniqueness constraints
//! are the backstop that turns any remaining race into a skipped insert.

use sqlx::PgPool;
use upkeep_core::{Notification, Violation};
use upkeep_engine::{evaluate, CheckBatch, CheckReport, CheckWindow, DedupIndex};

use crate::error::AppError;
use crate::state::AppState;

/// Run the upkeep checks once and return the creation counts.
///
/// On a commit failure the whole batch is rolled back, the in-memory stores
/// are left untouched, and the error surfaces as
/// [`AppError::Persistence`] — partial application is prohibited.
pub async fn run_checks(state: &AppState) -> Result<CheckReport, AppError> {
    let _guard = state.check_lock.lock().await;

    let now = state.clock.now();
    let window = CheckWindow::starting_at(now);

    let assets = state.assets.list();
    let existing_notifications = state.notifications.list();
    let existing_violations = state.violations.list();
    let mut index =
        DedupIndex::from_existing(existing_notifications.iter(), existing_violations.iter());

    let batch = evaluate(&window, &assets, &mut index);

    let (notifications, violations) = match &state.db_pool {
        Some(pool) => commit_batch(pool, batch).await.map_err(|e| {
            tracing::error!(error = %e, "check batch commit failed — batch rolled back");
            AppError::Persistence(e.to_string())
        })?,
        None => (batch.notifications, batch.violations),
    };

    for record in &notifications {
        state.notifications.insert(record.id, record.clone());
    }
    for record in &violations {
        state.violations.insert(record.id, record.clone());
    }

    let report = CheckReport {
        notifications_created: notifications.len(),
        violations_created: violations.len(),
    };
    tracing::info!(
        assets_scanned = assets.len(),
        notifications_created = report.notifications_created,
        violations_created = report.violations_created,
        "upkeep check run completed"
    );
    Ok(report)
}

/// Write the staged batch in a single transaction.
///
/// Inserts use `ON CONFLICT DO NOTHING`; a record whose key was claimed by
/// a concurrent writer is dropped from the result so the returned counts
/// reflect rows actually created. An error at any point aborts the
/// transaction (rolled back on drop) and nothing is committed.
async fn commit_batch(
    pool: &PgPool,
    batch: CheckBatch,
) -> Result<(Vec<Notification>, Vec<Violation>), sqlx::Error> {
    let mut tx = pool.begin().await?;

    let mut notifications = Vec::with_capacity(batch.notifications.len());
    for record in batch.notifications {
        if crate::db::notifications::stage(&mut tx, &record).await? {
            notifications.push(record);
        } else {
            tracing::warn!(
                asset_id = %record.asset_id,
                kind = %record.kind,
                "notification already present — concurrent writer won the race"
            );
        }
    }

    let mut violations = Vec::with_capacity(batch.violations.len());
    for record in batch.violations {
        if crate::db::violations::stage(&mut tx, &record).await? {
            violations.push(record);
        } else {
            tracing::warn!(
                asset_id = %record.asset_id,
                kind = %record.kind,
                "violation already present — concurrent writer won the race"
            );
        }
    }

    tx.commit().await?;
    Ok((notifications, violations))
}
