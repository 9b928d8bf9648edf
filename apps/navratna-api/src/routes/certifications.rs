//! # Certification Routes
//!
//! ```text
//! Pending ──► In Progress ──► Received ──► Certified
//!                                            │
//!                                            └─ lab copied onto the stone
//! ```

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use navratna_core::validation::validate_certification_input;
use navratna_core::{Certification, CertificationInput};

use super::check_id;
use crate::error::{ApiError, ApiJson, ApiResult};
use crate::AppState;

/// Body of `POST /api/certifications/:id/advance`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceRequest {
    /// Required when the next step is `Certified`.
    #[serde(default)]
    pub certificate_number: Option<String>,
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Certification>>> {
    Ok(Json(state.db.certifications().list().await?))
}

/// Certification history of one stone.
pub async fn list_for_stone(
    State(state): State<AppState>,
    Path(inventory_id): Path<String>,
) -> ApiResult<Json<Vec<Certification>>> {
    check_id(&inventory_id)?;
    Ok(Json(
        state
            .db
            .certifications()
            .list_by_inventory(&inventory_id)
            .await?,
    ))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Certification>> {
    check_id(&id)?;
    let cert = state
        .db
        .certifications()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Certification", &id))?;
    Ok(Json(cert))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CertificationInput>,
) -> ApiResult<(StatusCode, Json<Certification>)> {
    validate_certification_input(&input)?;
    let cert = Certification::new(input, Utc::now());
    let cert = state.db.certifications().insert(&cert).await?;

    info!(id = %cert.id, lab = %cert.lab, inventory_id = %cert.inventory_id, "Stone sent for certification");
    Ok((StatusCode::CREATED, Json(cert)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<CertificationInput>,
) -> ApiResult<Json<Certification>> {
    check_id(&id)?;
    validate_certification_input(&input)?;
    Ok(Json(state.db.certifications().update(&id, input).await?))
}

pub async fn advance(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<ApiJson<AdvanceRequest>>,
) -> ApiResult<Json<Certification>> {
    check_id(&id)?;
    let request = body.map(|ApiJson(r)| r).unwrap_or_default();
    let number = request
        .certificate_number
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    Ok(Json(
        state.db.certifications().advance_status(&id, number).await?,
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    check_id(&id)?;
    state.db.certifications().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
