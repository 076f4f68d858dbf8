//! Asset persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `assets` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use upkeep_core::{Asset, AssetName};
use uuid::Uuid;

/// Insert a new asset record. A duplicate name surfaces as a
/// unique-constraint error for the caller to map to a conflict.
pub async fn insert(pool: &PgPool, record: &Asset) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO assets (id, name, service_time, expiration_time, last_serviced,
         created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(record.id)
    .bind(record.name.as_str())
    .bind(record.service_time)
    .bind(record.expiration_time)
    .bind(record.last_serviced)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Update an asset record in full. Returns `false` if no row matched.
pub async fn update(pool: &PgPool, record: &Asset) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE assets SET name = $1, service_time = $2, expiration_time = $3,
         last_serviced = $4, updated_at = $5 WHERE id = $6",
    )
    .bind(record.name.as_str())
    .bind(record.service_time)
    .bind(record.expiration_time)
    .bind(record.last_serviced)
    .bind(record.updated_at)
    .bind(record.id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete an asset by ID. Event rows cascade at the schema level. Returns
/// `false` if no row matched.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM assets WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Load all assets from the database into the in-memory store on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<Asset>, sqlx::Error> {
    let rows = sqlx::query_as::<_, AssetRow>(
        "SELECT id, name, service_time, expiration_time, last_serviced, created_at, updated_at
         FROM assets ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        match row.into_record() {
            Some(record) => records.push(record),
            None => {
                tracing::error!("skipping asset row with invalid name during load_all");
            }
        }
    }
    Ok(records)
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct AssetRow {
    id: Uuid,
    name: String,
    service_time: Option<DateTime<Utc>>,
    expiration_time: Option<DateTime<Utc>>,
    last_serviced: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AssetRow {
    fn into_record(self) -> Option<Asset> {
        let name = match AssetName::new(self.name.clone()) {
            Ok(name) => name,
            Err(_) => {
                tracing::warn!(
                    id = %self.id,
                    name = %self.name,
                    "skipping asset row with invalid name"
                );
                return None;
            }
        };
        Some(Asset {
            id: self.id,
            name,
            service_time: self.service_time,
            expiration_time: self.expiration_time,
            last_serviced: self.last_serviced,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
