//! # Response Envelope
//!
//! Every endpoint (health probes excepted) answers with the same envelope:
//! `{status, code, message, data?, errors?}`. `data` carries the payload on
//! success; `errors` carries machine-readable detail on failure. Both are
//! omitted from the JSON when absent.

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

/// The uniform response envelope.
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    /// `"success"` or `"error"`.
    pub status: String,
    /// The HTTP status code, duplicated in the body for clients that only
    /// see the payload.
    pub code: u16,
    /// Human-readable summary.
    pub message: String,
    /// Payload, present on success responses that carry data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Machine-readable error detail, present on error responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

impl<T: Serialize> Envelope<T> {
    /// Build a success response carrying `data`.
    pub fn success(
        status: StatusCode,
        message: impl Into<String>,
        data: T,
    ) -> (StatusCode, Json<Self>) {
        (
            status,
            Json(Self {
                status: "success".to_string(),
                code: status.as_u16(),
                message: message.into(),
                data: Some(data),
                errors: None,
            }),
        )
    }
}

impl Envelope<serde_json::Value> {
    /// Build a success response with no payload (e.g. after a delete).
    pub fn message_only(
        status: StatusCode,
        message: impl Into<String>,
    ) -> (StatusCode, Json<Self>) {
        (
            status,
            Json(Self {
                status: "success".to_string(),
                code: status.as_u16(),
                message: message.into(),
                data: None,
                errors: None,
            }),
        )
    }

    /// Build an error response.
    pub fn error(
        status: StatusCode,
        message: impl Into<String>,
        errors: Option<serde_json::Value>,
    ) -> (StatusCode, Json<Self>) {
        (
            status,
            Json(Self {
                status: "error".to_string(),
                code: status.as_u16(),
                message: message.into(),
                data: None,
                errors,
            }),
        )
    }
}
