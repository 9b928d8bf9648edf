//! # Task Routes

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

use navratna_core::validation::validate_task_input;
use navratna_core::{Task, TaskInput, TaskStatus};

use super::{check_id, today};
use crate::error::{ApiError, ApiJson, ApiQuery, ApiResult};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct TaskQuery {
    #[serde(default)]
    pub status: Option<TaskStatus>,
}

/// Tasks, open first; `?status=Pending` filters.
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TaskQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(state.db.tasks().list(query.status).await?))
}

pub async fn overdue(State(state): State<AppState>) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(state.db.tasks().overdue(today()).await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    check_id(&id)?;
    let task = state
        .db
        .tasks()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Task", &id))?;
    Ok(Json(task))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<TaskInput>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    validate_task_input(&input)?;
    let task = Task::new(input, Utc::now());
    let task = state.db.tasks().insert(&task).await?;
    debug!(id = %task.id, "Task created");
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<TaskInput>,
) -> ApiResult<Json<Task>> {
    check_id(&id)?;
    validate_task_input(&input)?;

    let repo = state.db.tasks();
    let mut task = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Task", &id))?;
    task.apply(input, Utc::now());
    Ok(Json(repo.update(&task).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    check_id(&id)?;
    state.db.tasks().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
