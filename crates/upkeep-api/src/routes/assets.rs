//! # Asset CRUD API
//!
//! Routes:
//! - GET    /assets — list all assets
//! - POST   /assets — create an asset
//! - GET    /assets/:id — get one asset
//! - PUT    /assets/:id — partial update
//! - DELETE /assets/:id — delete an asset
//!
//! Timestamps are accepted as ISO 8601 strings (offset or naive-UTC) and
//! parsed via `upkeep_core::parse_timestamp`; a malformed timestamp is a
//! validation failure (400), distinct from not-found (404) and duplicate
//! name (409).

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use upkeep_core::{parse_timestamp, Asset, AssetName};
use uuid::Uuid;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::response::Envelope;
use crate::state::AppState;

/// Request to create an asset. Only `name` is required.
#[derive(Debug, Deserialize)]
pub struct CreateAssetRequest {
    pub name: String,
    #[serde(default)]
    pub service_time: Option<String>,
    #[serde(default)]
    pub expiration_time: Option<String>,
    #[serde(default)]
    pub last_serviced: Option<String>,
}

impl Validate for CreateAssetRequest {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        if self.name.trim().chars().count() > AssetName::MAX_LEN {
            return Err(format!(
                "name must not exceed {} characters",
                AssetName::MAX_LEN
            ));
        }
        Ok(())
    }
}

/// Partial update request. Fields absent from the body are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAssetRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub service_time: Option<String>,
    #[serde(default)]
    pub expiration_time: Option<String>,
    #[serde(default)]
    pub last_serviced: Option<String>,
}

impl Validate for UpdateAssetRequest {
    fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err("name must not be empty".to_string());
            }
            if name.trim().chars().count() > AssetName::MAX_LEN {
                return Err(format!(
                    "name must not exceed {} characters",
                    AssetName::MAX_LEN
                ));
            }
        }
        Ok(())
    }
}

/// Build the assets router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/assets", get(list_assets).post(create_asset))
        .route(
            "/assets/:id",
            get(get_asset).put(update_asset).delete(delete_asset),
        )
}

/// Parse an optional timestamp field, labeling the field in the error.
fn parse_time_field(
    field: &'static str,
    value: &Option<String>,
) -> Result<Option<DateTime<Utc>>, AppError> {
    match value {
        None => Ok(None),
        Some(raw) => parse_timestamp(raw)
            .map(Some)
            .map_err(|e| AppError::Validation(format!("{field}: {e}"))),
    }
}

/// GET /assets — list all assets in creation order.
async fn list_assets(State(state): State<AppState>) -> (StatusCode, Json<Envelope<Vec<Asset>>>) {
    let mut assets = state.assets.list();
    assets.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    Envelope::success(StatusCode::OK, "Success", assets)
}

/// POST /assets — create an asset.
async fn create_asset(
    State(state): State<AppState>,
    body: Result<Json<CreateAssetRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<Asset>>), AppError> {
    let req = extract_validated_json(body)?;

    let name = AssetName::new(req.name)?;
    if state.asset_by_name(name.as_str()).is_some() {
        return Err(AppError::Conflict(
            "Asset with this name already exists".to_string(),
        ));
    }

    let service_time = parse_time_field("service_time", &req.service_time)?;
    let expiration_time = parse_time_field("expiration_time", &req.expiration_time)?;
    let last_serviced = parse_time_field("last_serviced", &req.last_serviced)?;

    let now = state.clock.now();
    let asset = Asset {
        id: Uuid::new_v4(),
        name,
        service_time,
        expiration_time,
        last_serviced,
        created_at: now,
        updated_at: now,
    };

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::assets::insert(pool, &asset).await {
            // The unique constraint is the backstop for a create racing this
            // handler's in-memory check.
            if crate::db::is_unique_violation(&e) {
                return Err(AppError::Conflict(
                    "Asset with this name already exists".to_string(),
                ));
            }
            tracing::error!(asset_id = %asset.id, error = %e, "failed to persist asset");
            return Err(AppError::Persistence(e.to_string()));
        }
    }

    state.assets.insert(asset.id, asset.clone());

    Ok(Envelope::success(
        StatusCode::CREATED,
        "Asset created",
        asset,
    ))
}

/// GET /assets/:id — fetch one asset.
async fn get_asset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<Envelope<Asset>>), AppError> {
    let asset = state
        .assets
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("asset {id} not found")))?;
    Ok(Envelope::success(StatusCode::OK, "Success", asset))
}

/// PUT /assets/:id — partial update.
async fn update_asset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<UpdateAssetRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<Asset>>), AppError> {
    let req = extract_validated_json(body)?;

    let existing = state
        .assets
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("asset {id} not found")))?;

    let mut updated = existing.clone();

    if let Some(raw) = req.name {
        let name = AssetName::new(raw)?;
        // Renaming to the current name is a no-op, not a conflict.
        if name != existing.name && state.asset_by_name(name.as_str()).is_some() {
            return Err(AppError::Conflict(
                "Asset with this name already exists".to_string(),
            ));
        }
        updated.name = name;
    }
    if let Some(service_time) = parse_time_field("service_time", &req.service_time)? {
        updated.service_time = Some(service_time);
    }
    if let Some(expiration_time) = parse_time_field("expiration_time", &req.expiration_time)? {
        updated.expiration_time = Some(expiration_time);
    }
    if let Some(last_serviced) = parse_time_field("last_serviced", &req.last_serviced)? {
        updated.last_serviced = Some(last_serviced);
    }
    updated.updated_at = state.clock.now();

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::assets::update(pool, &updated).await {
            if crate::db::is_unique_violation(&e) {
                return Err(AppError::Conflict(
                    "Asset with this name already exists".to_string(),
                ));
            }
            tracing::error!(asset_id = %id, error = %e, "failed to persist asset update");
            return Err(AppError::Persistence(e.to_string()));
        }
    }

    state.assets.insert(id, updated.clone());

    Ok(Envelope::success(StatusCode::OK, "Asset updated", updated))
}

/// DELETE /assets/:id — delete an asset and its recorded events.
async fn delete_asset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<Envelope<serde_json::Value>>), AppError> {
    if state.assets.get(&id).is_none() {
        return Err(AppError::NotFound(format!("asset {id} not found")));
    }

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::assets::delete(pool, id).await {
            tracing::error!(asset_id = %id, error = %e, "failed to delete asset");
            return Err(AppError::Persistence(e.to_string()));
        }
    }

    state.assets.remove(&id);
    // Event rows cascade in the database; mirror that in the stores.
    for n in state.notifications.list() {
        if n.asset_id == id {
            state.notifications.remove(&n.id);
        }
    }
    for v in state.violations.list() {
        if v.asset_id == id {
            state.violations.remove(&v.id);
        }
    }

    Ok(Envelope::message_only(StatusCode::OK, "Asset deleted"))
}
