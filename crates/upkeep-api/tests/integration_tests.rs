//! # Integration Tests for upkeep-api
//!
//! Drives the assembled router end-to-end: asset CRUD, check runs with a
//! pinned clock, idempotence of repeated runs, the violation retention
//! rules, and the response envelope contract.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Duration, TimeZone, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;

use upkeep_api::response::Envelope;
use upkeep_api::AppState;
use upkeep_core::{Asset, EventKind, ManualClock, Notification, Violation};
use upkeep_engine::CheckReport;

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 4, 9, 0, 0).unwrap()
}

/// Helper: build the test app on a manual clock pinned at `base_time()`.
fn test_app() -> (axum::Router, ManualClock, AppState) {
    let clock = ManualClock::new(base_time());
    let state = AppState::with_clock(Arc::new(clock.clone()));
    (upkeep_api::app(state.clone()), clock, state)
}

/// Helper: read a response body and deserialize the envelope.
async fn envelope<T: serde::de::DeserializeOwned>(
    response: axum::http::Response<Body>,
) -> Envelope<T> {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn put_json(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn run_checks() -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/run-checks")
        .body(Body::empty())
        .unwrap()
}

/// Create an asset via the API and return it.
async fn create_asset(app: &axum::Router, body: String) -> Asset {
    let response = app
        .clone()
        .oneshot(post_json("/assets", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    envelope::<Asset>(response).await.data.unwrap()
}

/// Run the checks via the API and return the report.
async fn run(app: &axum::Router) -> CheckReport {
    let response = app.clone().oneshot(run_checks()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    envelope::<CheckReport>(response).await.data.unwrap()
}

fn iso(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn liveness_probe_is_plain_text() {
    let (app, _, _) = test_app();
    let response = app.oneshot(get("/health/liveness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"ok");
}

#[tokio::test]
async fn readiness_probe_without_db_is_ready() {
    let (app, _, _) = test_app();
    let response = app.oneshot(get("/health/readiness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// -- Upcoming window --------------------------------------------------------

#[tokio::test]
async fn upcoming_service_notifies_once_and_rerun_is_idempotent() {
    let (app, _clock, state) = test_app();
    let asset = create_asset(
        &app,
        format!(
            r#"{{"name":"compressor","service_time":"{}"}}"#,
            iso(base_time() + Duration::minutes(5))
        ),
    )
    .await;

    let report = run(&app).await;
    assert_eq!(report.notifications_created, 1);
    assert_eq!(report.violations_created, 0);

    // Second run without state change: zero additional records.
    let report = run(&app).await;
    assert_eq!(report.notifications_created, 0);
    assert_eq!(report.violations_created, 0);

    let response = app.clone().oneshot(get("/notifications")).await.unwrap();
    let listed = envelope::<Vec<Notification>>(response).await.data.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].asset_id, asset.id);
    assert_eq!(listed[0].kind, EventKind::Service);
    assert_eq!(listed[0].event_time, base_time() + Duration::minutes(5));
    assert_eq!(state.notifications.len(), 1);
}

// -- Overdue service and violation retention --------------------------------

#[tokio::test]
async fn overdue_service_violates_once_and_late_service_does_not_retract() {
    let (app, _clock, _state) = test_app();
    let asset = create_asset(
        &app,
        format!(
            r#"{{"name":"press","service_time":"{}"}}"#,
            iso(base_time() - Duration::hours(1))
        ),
    )
    .await;

    let report = run(&app).await;
    assert_eq!(report.violations_created, 1);

    // Mark the asset serviced at (after) its deadline.
    let response = app
        .clone()
        .oneshot(put_json(
            &format!("/assets/{}", asset.id),
            format!(r#"{{"last_serviced":"{}"}}"#, iso(base_time())),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // No new violation, and the existing one is not retracted.
    let report = run(&app).await;
    assert_eq!(report.violations_created, 0);

    let response = app.clone().oneshot(get("/violations")).await.unwrap();
    let listed = envelope::<Vec<Violation>>(response).await.data.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].kind, EventKind::Service);
}

// -- Expiration ignores last_serviced ---------------------------------------

#[tokio::test]
async fn expired_asset_violates_regardless_of_last_serviced() {
    let (app, _clock, _state) = test_app();
    create_asset(
        &app,
        format!(
            r#"{{"name":"license","expiration_time":"{}","last_serviced":"{}"}}"#,
            iso(base_time() - Duration::days(1)),
            iso(base_time())
        ),
    )
    .await;

    let report = run(&app).await;
    assert_eq!(report.notifications_created, 0);
    assert_eq!(report.violations_created, 1);

    let response = app.clone().oneshot(get("/violations")).await.unwrap();
    let listed = envelope::<Vec<Violation>>(response).await.data.unwrap();
    assert_eq!(listed[0].kind, EventKind::Expiration);
}

// -- Inclusive window boundaries --------------------------------------------

#[tokio::test]
async fn both_window_boundaries_produce_notifications() {
    let (app, _clock, _state) = test_app();
    create_asset(
        &app,
        format!(
            r#"{{"name":"at-now","service_time":"{}"}}"#,
            iso(base_time())
        ),
    )
    .await;
    create_asset(
        &app,
        format!(
            r#"{{"name":"at-edge","service_time":"{}"}}"#,
            iso(base_time() + Duration::minutes(15))
        ),
    )
    .await;

    let report = run(&app).await;
    assert_eq!(report.notifications_created, 2);
    assert_eq!(report.violations_created, 0);
}

// -- Duplicate name is a conflict -------------------------------------------

#[tokio::test]
async fn duplicate_name_is_conflict_not_validation() {
    let (app, _clock, _state) = test_app();
    create_asset(&app, r#"{"name":"unique-asset"}"#.to_string()).await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/assets",
            r#"{"name":"unique-asset"}"#.to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = envelope::<serde_json::Value>(response).await;
    assert_eq!(body.status, "error");
    assert_eq!(body.code, 409);
    assert_eq!(body.errors.unwrap()["code"], "CONFLICT");
}

// -- Window passes, violation arrives ---------------------------------------

#[tokio::test]
async fn notification_then_violation_as_clock_advances() {
    let (app, clock, _state) = test_app();
    create_asset(
        &app,
        format!(
            r#"{{"name":"scenario-asset","service_time":"{}"}}"#,
            iso(base_time() + Duration::minutes(5))
        ),
    )
    .await;

    let report = run(&app).await;
    assert_eq!(report.notifications_created, 1);
    assert_eq!(report.violations_created, 0);

    // Advance past the service time; the window has passed and no service
    // was performed.
    clock.advance(Duration::minutes(6));
    let report = run(&app).await;
    assert_eq!(report.notifications_created, 0);
    assert_eq!(report.violations_created, 1);
}

// -- Changed deadline permits a fresh notification ----------------------------

#[tokio::test]
async fn rescheduled_deadline_notifies_again() {
    let (app, _clock, _state) = test_app();
    let asset = create_asset(
        &app,
        format!(
            r#"{{"name":"reschedulable","service_time":"{}"}}"#,
            iso(base_time() + Duration::minutes(5))
        ),
    )
    .await;

    assert_eq!(run(&app).await.notifications_created, 1);

    // Move the deadline, still inside the window: the (asset, kind, time)
    // key changes, so a second notification is permitted.
    let response = app
        .clone()
        .oneshot(put_json(
            &format!("/assets/{}", asset.id),
            format!(
                r#"{{"service_time":"{}"}}"#,
                iso(base_time() + Duration::minutes(10))
            ),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(run(&app).await.notifications_created, 1);

    let response = app.clone().oneshot(get("/notifications")).await.unwrap();
    let listed = envelope::<Vec<Notification>>(response).await.data.unwrap();
    assert_eq!(listed.len(), 2);
}

// -- CRUD lifecycle -----------------------------------------------------------

#[tokio::test]
async fn full_crud_lifecycle() {
    let (app, _clock, _state) = test_app();

    // Create.
    let asset = create_asset(&app, r#"{"name":"lifecycle"}"#.to_string()).await;

    // List.
    let response = app.clone().oneshot(get("/assets")).await.unwrap();
    let listed = envelope::<Vec<Asset>>(response).await.data.unwrap();
    assert_eq!(listed.len(), 1);

    // Update.
    let response = app
        .clone()
        .oneshot(put_json(
            &format!("/assets/{}", asset.id),
            r#"{"name":"renamed"}"#.to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = envelope::<Asset>(response).await.data.unwrap();
    assert_eq!(updated.name, "renamed");

    // Get reflects the rename.
    let response = app
        .clone()
        .oneshot(get(&format!("/assets/{}", asset.id)))
        .await
        .unwrap();
    let fetched = envelope::<Asset>(response).await.data.unwrap();
    assert_eq!(fetched.name, "renamed");

    // Delete, then the asset is gone.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/assets/{}", asset.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get(&format!("/assets/{}", asset.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_asset_removes_its_events_from_listings() {
    let (app, _clock, _state) = test_app();
    let asset = create_asset(
        &app,
        format!(
            r#"{{"name":"short-lived","service_time":"{}"}}"#,
            iso(base_time() - Duration::hours(1))
        ),
    )
    .await;

    assert_eq!(run(&app).await.violations_created, 1);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/assets/{}", asset.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/violations")).await.unwrap();
    let listed = envelope::<Vec<Violation>>(response).await.data.unwrap();
    assert!(listed.is_empty());
}

// -- Envelope contract --------------------------------------------------------

#[tokio::test]
async fn success_envelope_shape() {
    let (app, _clock, _state) = test_app();
    let response = app.clone().oneshot(get("/assets")).await.unwrap();
    let body = envelope::<Vec<Asset>>(response).await;
    assert_eq!(body.status, "success");
    assert_eq!(body.code, 200);
    assert_eq!(body.message, "Success");
    assert!(body.errors.is_none());
}

#[tokio::test]
async fn validation_error_envelope_shape() {
    let (app, _clock, _state) = test_app();
    let response = app
        .clone()
        .oneshot(post_json(
            "/assets",
            r#"{"name":"bad-time","service_time":"tomorrow-ish"}"#.to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = envelope::<serde_json::Value>(response).await;
    assert_eq!(body.status, "error");
    assert_eq!(body.code, 400);
    assert_eq!(body.errors.unwrap()["code"], "VALIDATION_ERROR");
    assert!(body.message.contains("service_time"));
}

#[tokio::test]
async fn not_found_envelope_shape() {
    let (app, _clock, _state) = test_app();
    let response = app
        .clone()
        .oneshot(get(&format!("/assets/{}", uuid::Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = envelope::<serde_json::Value>(response).await;
    assert_eq!(body.status, "error");
    assert_eq!(body.errors.unwrap()["code"], "NOT_FOUND");
}
