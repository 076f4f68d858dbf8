//! # upkeep-api — Axum API Service for the Upkeep Stack
//!
//! HTTP surface over the check engine and asset stores.
//!
//! ## API Surface
//!
//! | Route                  | Module                     | Domain              |
//! |------------------------|----------------------------|---------------------|
//! | `/assets` (+`/:id`)    | [`routes::assets`]         | Asset CRUD          |
//! | `/run-checks`          | [`routes::checks`]         | Check trigger       |
//! | `/notifications`       | [`routes::notifications`]  | Read-only listing   |
//! | `/violations`          | [`routes::violations`]     | Read-only listing   |
//! | `/health/*`            | (here)                     | Probes, unenveloped |
//!
//! ## Persistence
//!
//! In-memory stores serve reads; when `DATABASE_URL` is configured, writes
//! go through to PostgreSQL and the stores are hydrated at startup. See
//! [`db`].
//!
//! ## Response Contract
//!
//! Every non-probe response is wrapped in the
//! `{status, code, message, data?, errors?}` envelope ([`response`]), and
//! failures map through [`AppError`] (400 validation, 404 not found,
//! 409 conflict, 500 persistence/internal).

pub mod checks;
pub mod db;
pub mod error;
pub mod extractors;
pub mod response;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::{AppConfig, AppState};

/// Assemble the full application router.
///
/// Health probes are mounted alongside the API routes but never enveloped;
/// they answer plain text for orchestrator consumption.
///
/// Body size limit: 2 MiB, to bound memory per request.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::assets::router())
        .merge(routes::checks::router())
        .merge(routes::notifications::router())
        .merge(routes::violations::router())
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness))
        .with_state(state);

    Router::new().merge(health).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — verifies the application is ready to serve traffic.
///
/// Checks that the in-memory stores are accessible and, when a database is
/// configured, that it answers a trivial query. Returns 200 "ready" or 503
/// with a diagnostic message.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    // Verify stores are accessible (read lock acquirable).
    let _ = state.assets.len();
    let _ = state.notifications.len();
    let _ = state.violations.len();

    if let Some(pool) = &state.db_pool {
        if let Err(e) = sqlx::query("SELECT 1").execute(pool).await {
            tracing::warn!("Database health check failed: {e}");
            return (StatusCode::SERVICE_UNAVAILABLE, "database unreachable").into_response();
        }
    }

    (StatusCode::OK, "ready").into_response()
}
