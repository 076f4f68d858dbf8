//! # Violation Listing API
//!
//! GET /violations — read-only listing of all recorded violations in
//! creation order. Violations are created exclusively by check runs and
//! removed only by external processes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use upkeep_core::Violation;

use crate::response::Envelope;
use crate::state::AppState;

/// Build the violations router.
pub fn router() -> Router<AppState> {
    Router::new().route("/violations", get(list_violations))
}

/// GET /violations — list all violations.
async fn list_violations(
    State(state): State<AppState>,
) -> (StatusCode, Json<Envelope<Vec<Violation>>>) {
    let mut violations = state.violations.list();
    violations.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    Envelope::success(StatusCode::OK, "Success", violations)
}
