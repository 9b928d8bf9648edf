//! Health check for monitoring and load balancers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `SERVING` or `NOT_SERVING`.
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    pub database: bool,
    pub server_time: DateTime<Utc>,
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// 200 while the database answers, 503 otherwise.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = state.db.health_check().await;
    let (status, label) = if database {
        (StatusCode::OK, "SERVING")
    } else {
        warn!("Health check failed: database unreachable");
        (StatusCode::SERVICE_UNAVAILABLE, "NOT_SERVING")
    };

    (
        status,
        Json(HealthResponse {
            status: label,
            module: "navratna-api",
            version: env!("CARGO_PKG_VERSION"),
            database,
            server_time: Utc::now(),
        }),
    )
}
