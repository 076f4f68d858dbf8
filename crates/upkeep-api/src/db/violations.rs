//! Violation persistence operations.
//!
//! Violations are immutable once created; removal is an external concern.
//! Staging happens inside the check-run transaction.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use upkeep_core::{EventKind, Violation};
use uuid::Uuid;

/// Stage a violation inside the check-run transaction.
///
/// `ON CONFLICT DO NOTHING` on the `(asset_id, event_kind)` uniqueness key:
/// returns `true` if the row was inserted, `false` if the violation already
/// existed.
pub async fn stage(
    tx: &mut Transaction<'_, Postgres>,
    record: &Violation,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO violations (id, asset_id, message, event_kind, created_at)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (asset_id, event_kind) DO NOTHING",
    )
    .bind(record.id)
    .bind(record.asset_id)
    .bind(&record.message)
    .bind(record.kind.as_str())
    .bind(record.created_at)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Load all violations from the database into the in-memory store on
/// startup, in creation order.
pub async fn load_all(pool: &PgPool) -> Result<Vec<Violation>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ViolationRow>(
        "SELECT id, asset_id, message, event_kind, created_at
         FROM violations ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        match row.into_record() {
            Some(record) => records.push(record),
            None => {
                tracing::error!("skipping violation row with unknown event_kind during load_all");
            }
        }
    }
    Ok(records)
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct ViolationRow {
    id: Uuid,
    asset_id: Uuid,
    message: String,
    event_kind: String,
    created_at: DateTime<Utc>,
}

impl ViolationRow {
    fn into_record(self) -> Option<Violation> {
        let kind = match self.event_kind.parse::<EventKind>() {
            Ok(kind) => kind,
            Err(_) => {
                tracing::warn!(
                    id = %self.id,
                    event_kind = %self.event_kind,
                    "skipping violation row with unknown event_kind"
                );
                return None;
            }
        };
        Some(Violation {
            id: self.id,
            asset_id: self.asset_id,
            message: self.message,
            kind,
            created_at: self.created_at,
        })
    }
}
