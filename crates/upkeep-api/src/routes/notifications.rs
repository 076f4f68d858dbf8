//! # Notification Listing API
//!
//! GET /notifications — read-only listing of all recorded notifications in
//! creation order. Notifications are created exclusively by check runs.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use upkeep_core::Notification;

use crate::response::Envelope;
use crate::state::AppState;

/// Build the notifications router.
pub fn router() -> Router<AppState> {
    Router::new().route("/notifications", get(list_notifications))
}

/// GET /notifications — list all notifications.
async fn list_notifications(
    State(state): State<AppState>,
) -> (StatusCode, Json<Envelope<Vec<Notification>>>) {
    let mut notifications = state.notifications.list();
    notifications.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    Envelope::success(StatusCode::OK, "Success", notifications)
}
