//! # Inventory Routes
//!
//! ## Search
//! ```text
//! GET /api/inventory?q=burma&status=In%20Stock
//!        │
//!        ├── no q, no status ──► list()      (newest first)
//!        └── otherwise ────────► search(q, status)
//!                                 q matches code, gem type, origin,
//!                                 colour or tags
//! ```
//!
//! `Sold` belongs to the sales workflow: a create or update cannot move a
//! stone into or out of it.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info};

use navratna_core::validation::{validate_inventory_input, validate_search_query};
use navratna_core::{InventoryInput, InventoryItem, StoneStatus, ValidationError};

use super::check_id;
use crate::error::{ApiError, ApiJson, ApiQuery, ApiResult};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct InventoryQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub status: Option<StoneStatus>,
}

pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<InventoryQuery>,
) -> ApiResult<Json<Vec<InventoryItem>>> {
    let text = validate_search_query(query.q.as_deref().unwrap_or_default())?;

    let items = if text.is_empty() && query.status.is_none() {
        state.db.inventory().list().await?
    } else {
        state.db.inventory().search(&text, query.status).await?
    };

    debug!(count = items.len(), "Inventory listed");
    Ok(Json(items))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<InventoryItem>> {
    check_id(&id)?;
    let item = state
        .db
        .inventory()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("InventoryItem", &id))?;
    Ok(Json(item))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<InventoryInput>,
) -> ApiResult<(StatusCode, Json<InventoryItem>)> {
    validate_inventory_input(&input)?;
    if input.status == StoneStatus::Sold {
        return Err(ValidationError::NotAllowed {
            field: "status".to_string(),
            allowed: vec![
                StoneStatus::InStock.label().to_string(),
                StoneStatus::Reserved.label().to_string(),
            ],
        }
        .into());
    }

    let item = InventoryItem::new(input, Utc::now());
    let item = state.db.inventory().insert(&item).await?;

    info!(id = %item.id, stone_code = %item.stone_code, "Stone added to inventory");
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(mut input): ApiJson<InventoryInput>,
) -> ApiResult<Json<InventoryItem>> {
    check_id(&id)?;
    validate_inventory_input(&input)?;

    let repo = state.db.inventory();
    let mut item = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("InventoryItem", &id))?;

    if item.status == StoneStatus::Sold || input.status == StoneStatus::Sold {
        input.status = item.status;
    }
    item.apply(input, Utc::now());
    let item = repo.update(&item).await?;

    debug!(id = %item.id, status = %item.status, "Stone updated");
    Ok(Json(item))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    check_id(&id)?;
    state.db.inventory().delete(&id).await?;
    info!(id = %id, "Stone deleted");
    Ok(StatusCode::NO_CONTENT)
}
