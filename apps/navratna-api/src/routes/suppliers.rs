//! # Supplier Routes

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use tracing::info;

use navratna_core::validation::validate_supplier_input;
use navratna_core::{Supplier, SupplierInput};

use super::check_id;
use crate::error::{ApiError, ApiJson, ApiResult};
use crate::AppState;

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Supplier>>> {
    Ok(Json(state.db.suppliers().list().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Supplier>> {
    check_id(&id)?;
    let supplier = state
        .db
        .suppliers()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Supplier", &id))?;
    Ok(Json(supplier))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SupplierInput>,
) -> ApiResult<(StatusCode, Json<Supplier>)> {
    validate_supplier_input(&input)?;
    let supplier = Supplier::new(input, Utc::now());
    let supplier = state.db.suppliers().insert(&supplier).await?;

    info!(id = %supplier.id, name = %supplier.name, "Supplier created");
    Ok((StatusCode::CREATED, Json(supplier)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<SupplierInput>,
) -> ApiResult<Json<Supplier>> {
    check_id(&id)?;
    validate_supplier_input(&input)?;

    let repo = state.db.suppliers();
    let mut supplier = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Supplier", &id))?;
    supplier.apply(input, Utc::now());
    Ok(Json(repo.update(&supplier).await?))
}

/// Deletes a supplier; their stones stay in inventory without one.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    check_id(&id)?;
    state.db.suppliers().delete(&id).await?;
    info!(id = %id, "Supplier deleted");
    Ok(StatusCode::NO_CONTENT)
}
