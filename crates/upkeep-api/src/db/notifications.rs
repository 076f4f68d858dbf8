//! Notification persistence operations.
//!
//! Notifications are immutable once created — there are no update or delete
//! operations. Staging happens inside the check-run transaction.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use upkeep_core::{EventKind, Notification};
use uuid::Uuid;

/// Stage a notification inside the check-run transaction.
///
/// `ON CONFLICT DO NOTHING` on the `(asset_id, event_kind, event_time)`
/// uniqueness key: returns `true` if the row was inserted, `false` if an
/// identical notification already existed (a concurrent writer won the
/// race).
pub async fn stage(
    tx: &mut Transaction<'_, Postgres>,
    record: &Notification,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO notifications (id, asset_id, message, event_kind, event_time, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT (asset_id, event_kind, event_time) DO NOTHING",
    )
    .bind(record.id)
    .bind(record.asset_id)
    .bind(&record.message)
    .bind(record.kind.as_str())
    .bind(record.event_time)
    .bind(record.created_at)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Load all notifications from the database into the in-memory store on
/// startup, in creation order.
pub async fn load_all(pool: &PgPool) -> Result<Vec<Notification>, sqlx::Error> {
    let rows = sqlx::query_as::<_, NotificationRow>(
        "SELECT id, asset_id, message, event_kind, event_time, created_at
         FROM notifications ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        match row.into_record() {
            Some(record) => records.push(record),
            None => {
                tracing::error!("skipping notification row with unknown event_kind during load_all");
            }
        }
    }
    Ok(records)
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: Uuid,
    asset_id: Uuid,
    message: String,
    event_kind: String,
    event_time: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl NotificationRow {
    fn into_record(self) -> Option<Notification> {
        let kind = match self.event_kind.parse::<EventKind>() {
            Ok(kind) => kind,
            Err(_) => {
                tracing::warn!(
                    id = %self.id,
                    event_kind = %self.event_kind,
                    "skipping notification row with unknown event_kind"
                );
                return None;
            }
        };
        Some(Notification {
            id: self.id,
            asset_id: self.asset_id,
            message: self.message,
            kind,
            event_time: self.event_time,
            created_at: self.created_at,
        })
    }
}
