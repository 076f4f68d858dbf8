//! # Check Trigger API
//!
//! POST /run-checks — run the upkeep checks once, synchronously, and return
//! the creation counts. Scheduling is the caller's concern (cron, operator,
//! orchestrator); the service never self-schedules.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use upkeep_engine::CheckReport;

use crate::error::AppError;
use crate::response::Envelope;
use crate::state::AppState;

/// Build the checks router.
pub fn router() -> Router<AppState> {
    Router::new().route("/run-checks", post(run_checks))
}

/// POST /run-checks — evaluate all assets and record new events.
async fn run_checks(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Envelope<CheckReport>>), AppError> {
    let report = crate::checks::run_checks(&state).await?;
    Ok(Envelope::success(
        StatusCode::OK,
        "Checks executed",
        report,
    ))
}
