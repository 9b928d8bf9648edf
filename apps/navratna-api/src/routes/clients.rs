//! # Client Routes

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info};

use navratna_core::validation::{validate_client_input, validate_search_query};
use navratna_core::{Client, ClientInput};

use super::check_id;
use crate::error::{ApiError, ApiJson, ApiQuery, ApiResult};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ClientQuery {
    #[serde(default)]
    pub q: Option<String>,
}

/// Clients by name; `?q=` matches name, city or phone.
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ClientQuery>,
) -> ApiResult<Json<Vec<Client>>> {
    let text = validate_search_query(query.q.as_deref().unwrap_or_default())?;
    let clients = if text.is_empty() {
        state.db.clients().list().await?
    } else {
        state.db.clients().search(&text).await?
    };
    Ok(Json(clients))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Client>> {
    check_id(&id)?;
    let client = state
        .db
        .clients()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Client", &id))?;
    Ok(Json(client))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ClientInput>,
) -> ApiResult<(StatusCode, Json<Client>)> {
    validate_client_input(&input)?;
    let client = Client::new(input, Utc::now());
    let client = state.db.clients().insert(&client).await?;

    info!(id = %client.id, name = %client.name, "Client created");
    Ok((StatusCode::CREATED, Json(client)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<ClientInput>,
) -> ApiResult<Json<Client>> {
    check_id(&id)?;
    validate_client_input(&input)?;

    let repo = state.db.clients();
    let mut client = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Client", &id))?;
    client.apply(input, Utc::now());
    let client = repo.update(&client).await?;

    debug!(id = %client.id, "Client updated");
    Ok(Json(client))
}

/// Deletes a client and their consultations. Clients with sales are kept.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    check_id(&id)?;
    state.db.clients().delete(&id).await?;
    info!(id = %id, "Client deleted");
    Ok(StatusCode::NO_CONTENT)
}
