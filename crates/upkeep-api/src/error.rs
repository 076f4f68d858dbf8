//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps domain failures to HTTP status codes and envelope-wrapped bodies.
//! Internal and persistence error details are logged, never echoed to the
//! client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::response::Envelope;

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed — malformed body, missing or invalid
    /// fields, bad timestamp format (400).
    #[error("validation error: {0}")]
    Validation(String),

    /// Conflict with existing state — duplicate asset name (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Storage failure (500). Any in-progress transaction has been rolled
    /// back; the message is logged but not returned to the client.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Any other unexpected failure (500). Message logged, not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PERSISTENCE_ERROR"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose storage or internal error messages to clients.
        let message = match &self {
            Self::Persistence(_) | Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "internal server error");
        }

        Envelope::error(status, message, Some(serde_json::json!({ "code": code })))
            .into_response()
    }
}

/// Convert domain validation errors to API errors.
impl From<upkeep_core::ValidationError> for AppError {
    fn from(err: upkeep_core::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Convert database errors to API errors. Unique-constraint races are
/// handled where they occur; everything reaching this impl is a storage
/// failure.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn not_found_status_code() {
        let err = AppError::NotFound("missing asset".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "NOT_FOUND");
    }

    #[test]
    fn validation_status_code() {
        let err = AppError::Validation("bad field".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "VALIDATION_ERROR");
    }

    #[test]
    fn conflict_status_code() {
        let err = AppError::Conflict("name taken".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(code, "CONFLICT");
    }

    #[test]
    fn persistence_status_code() {
        let err = AppError::Persistence("db down".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "PERSISTENCE_ERROR");
    }

    #[test]
    fn internal_status_code() {
        let err = AppError::Internal("boom".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "INTERNAL_ERROR");
    }

    #[test]
    fn validation_error_from_core() {
        let core_err = upkeep_core::ValidationError::InvalidName("too long".to_string());
        let app_err = AppError::from(core_err);
        match &app_err {
            AppError::Validation(msg) => assert!(msg.contains("too long")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    /// Helper to extract status and envelope from a response.
    async fn response_parts(err: AppError) -> (StatusCode, Envelope<serde_json::Value>) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn into_response_not_found_envelope() {
        let (status, body) = response_parts(AppError::NotFound("asset 123".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.status, "error");
        assert_eq!(body.code, 404);
        assert!(body.message.contains("asset 123"));
        assert_eq!(body.errors.unwrap()["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn into_response_validation_envelope() {
        let (status, body) = response_parts(AppError::Validation("bad timestamp".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.message.contains("bad timestamp"));
        assert_eq!(body.errors.unwrap()["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn into_response_conflict_envelope() {
        let (status, body) = response_parts(AppError::Conflict("already exists".into())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body.message.contains("already exists"));
    }

    #[tokio::test]
    async fn into_response_persistence_hides_details() {
        let (status, body) =
            response_parts(AppError::Persistence("connection refused".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(
            !body.message.contains("connection refused"),
            "storage error details must not leak: {}",
            body.message
        );
        assert_eq!(body.message, "An internal error occurred");
        assert_eq!(body.errors.unwrap()["code"], "PERSISTENCE_ERROR");
    }

    #[tokio::test]
    async fn into_response_internal_hides_details() {
        let (status, body) = response_parts(AppError::Internal("stack trace".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.message.contains("stack trace"));
        assert_eq!(body.errors.unwrap()["code"], "INTERNAL_ERROR");
    }
}
