//! # Consultation Routes

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use tracing::info;

use navratna_core::validation::validate_consultation_input;
use navratna_core::{Consultation, ConsultationInput};

use super::{check_id, today};
use crate::error::{ApiError, ApiJson, ApiResult};
use crate::AppState;

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Consultation>>> {
    Ok(Json(state.db.consultations().list().await?))
}

pub async fn list_for_client(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> ApiResult<Json<Vec<Consultation>>> {
    check_id(&client_id)?;
    Ok(Json(
        state.db.consultations().list_by_client(&client_id).await?,
    ))
}

/// Follow-ups due today or later, soonest first.
pub async fn follow_ups(State(state): State<AppState>) -> ApiResult<Json<Vec<Consultation>>> {
    Ok(Json(
        state.db.consultations().upcoming_follow_ups(today()).await?,
    ))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Consultation>> {
    check_id(&id)?;
    let consultation = state
        .db
        .consultations()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Consultation", &id))?;
    Ok(Json(consultation))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ConsultationInput>,
) -> ApiResult<(StatusCode, Json<Consultation>)> {
    validate_consultation_input(&input)?;
    let consultation = Consultation::new(input, Utc::now());
    let consultation = state.db.consultations().insert(&consultation).await?;

    info!(id = %consultation.id, client_id = %consultation.client_id, "Consultation logged");
    Ok((StatusCode::CREATED, Json(consultation)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<ConsultationInput>,
) -> ApiResult<Json<Consultation>> {
    check_id(&id)?;
    validate_consultation_input(&input)?;

    let repo = state.db.consultations();
    let mut consultation = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Consultation", &id))?;
    consultation.apply(input, Utc::now());
    Ok(Json(repo.update(&consultation).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    check_id(&id)?;
    state.db.consultations().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
