//! # Database Persistence Layer
//!
//! PostgreSQL persistence via SQLx. The database is **optional**: when
//! `DATABASE_URL` is set, assets, notifications, and violations are
//! persisted and the in-memory stores are hydrated from the tables at
//! startup. When absent, the API operates in in-memory-only mode (suitable
//! for development and testing).
//!
//! The uniqueness invariants the check engine relies on are also declared
//! as constraints here — `assets.name`, `(asset_id, event_kind,
//! event_time)` on notifications, `(asset_id, event_kind)` on violations —
//! so a check-then-insert race degrades to a rejected duplicate rather than
//! a silent double record.

pub mod assets;
pub mod notifications;
pub mod violations;

use sqlx::postgres::{PgPool, PgPoolOptions};

/// Initialize the database connection pool and run migrations.
///
/// Returns `None` if `DATABASE_URL` is not set (in-memory-only mode).
/// Returns `Err` if the URL is set but the connection or migration fails.
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!(
                "DATABASE_URL not set — running in-memory only mode. \
                 State will not survive restarts."
            );
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(&url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    // Run embedded migrations.
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}

/// Whether an error is a unique-constraint violation, i.e. a write lost a
/// race to an equivalent write rather than hitting a storage fault.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation)
    )
}
