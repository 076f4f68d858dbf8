//! # Validation Errors
//!
//! Structured error types for domain primitive construction and wire-format
//! parsing, built with `thiserror`. These errors carry the invalid input and
//! the reason it was rejected so that API-layer responses can report both
//! without guesswork.

use thiserror::Error;

/// Validation errors for domain primitives and wire-format values.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Asset name fails format validation (empty or too long).
    #[error("invalid asset name: {0}")]
    InvalidName(String),

    /// Timestamp string is not valid ISO 8601.
    #[error("invalid timestamp: \"{value}\" ({reason})")]
    InvalidTimestamp {
        /// The string that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Event kind string is not one of the known kinds.
    #[error("invalid event kind: \"{0}\" (expected \"service\" or \"expiration\")")]
    InvalidEventKind(String),
}
