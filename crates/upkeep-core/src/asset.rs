//! # Asset Record
//!
//! The tracked entity: an asset with an optional service deadline, an
//! optional expiration deadline, and a record of when it was last serviced.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Validated asset name.
///
/// Serializes/deserializes as a plain string. Validated on construction via
/// [`AssetName::new`]: trimmed, non-empty, at most 100 characters. Names are
/// unique across all live assets — enforced at write time by the API layer
/// and by a unique constraint at the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetName(String);

impl AssetName {
    /// Maximum length of an asset name in characters.
    pub const MAX_LEN: usize = 100;

    /// Create a validated asset name.
    ///
    /// Returns an error if the trimmed string is empty or exceeds
    /// [`AssetName::MAX_LEN`] characters.
    pub fn new(s: impl Into<String>) -> Result<Self, ValidationError> {
        let s = s.into();
        let trimmed = s.trim().to_string();
        if trimmed.is_empty() {
            return Err(ValidationError::InvalidName(
                "name must not be empty".to_string(),
            ));
        }
        if trimmed.chars().count() > Self::MAX_LEN {
            return Err(ValidationError::InvalidName(format!(
                "name must not exceed {} characters",
                Self::MAX_LEN
            )));
        }
        Ok(Self(trimmed))
    }

    /// Return the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AssetName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for AssetName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// An asset under upkeep tracking.
///
/// `service_time` and `expiration_time` are the deadlines the check engine
/// evaluates. `last_serviced` is written externally via CRUD; the check
/// engine only reads it (it guards the service-overdue rule — a service
/// performed at or after `service_time` extinguishes the overdue condition).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// Surrogate identifier.
    pub id: Uuid,
    /// Unique name.
    pub name: AssetName,
    /// When the asset is next due for service.
    pub service_time: Option<DateTime<Utc>>,
    /// When the asset expires. Expiration is not serviceable — once past,
    /// the asset stays in violation regardless of `last_serviced`.
    pub expiration_time: Option<DateTime<Utc>>,
    /// When the asset was last serviced.
    pub last_serviced: Option<DateTime<Utc>>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last modified.
    pub updated_at: DateTime<Utc>,
}
