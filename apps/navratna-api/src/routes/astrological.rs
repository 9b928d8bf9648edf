//! # Astrological Routes
//!
//! ```text
//! GET  /api/astrological/zodiac/:sign      ─► ZodiacStrategy
//! GET  /api/astrological/planet/:planet    ─► PlanetStrategy
//! POST /api/astrological/recommend         ─► either, plus matching stock
//! POST /api/analysis/:inventory_id         ─► AnalysisStrategy
//! ```

use axum::extract::{Path, State};
use axum::Json;
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tracing::debug;

use navratna_core::recommendation::{
    match_inventory, AnalysisStrategy, GemRecommendation, GemStrategy, PlanetStrategy,
    RecommendationStrategy, StoneAnalysis, ZodiacStrategy,
};
use navratna_core::{CoreError, InventoryItem};

use super::{check_id, today};
use crate::error::{ApiError, ApiJson, ApiResult, ErrorCode};
use crate::AppState;

/// A sign or planet in the path that we do not know is a missing resource.
fn lookup(strategy: &GemStrategy, key: &str) -> ApiResult<GemRecommendation> {
    strategy.recommend(key).map_err(|err| match err {
        CoreError::UnknownAstrologicalKey { .. } => {
            ApiError::new(ErrorCode::NotFound, err.to_string())
        }
        other => ApiError::from(other),
    })
}

pub async fn zodiac(Path(sign): Path<String>) -> ApiResult<Json<GemRecommendation>> {
    Ok(Json(lookup(&ZodiacStrategy, &sign)?))
}

pub async fn planet(Path(planet): Path<String>) -> ApiResult<Json<GemRecommendation>> {
    Ok(Json(lookup(&PlanetStrategy, &planet)?))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    #[serde(default)]
    pub zodiac_sign: Option<String>,
    #[serde(default)]
    pub planet: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendResponse {
    pub recommendation: GemRecommendation,
    /// In-stock stones that fit, best first.
    pub matches: Vec<InventoryItem>,
}

/// Recommendation by sign (preferred) or planet, with stock to offer.
pub async fn recommend(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RecommendRequest>,
) -> ApiResult<Json<RecommendResponse>> {
    let non_blank = |s: Option<String>| s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

    let (strategy, key): (&GemStrategy, String) =
        match (non_blank(request.zodiac_sign), non_blank(request.planet)) {
            (Some(sign), _) => (&ZodiacStrategy as &GemStrategy, sign),
            (None, Some(planet)) => (&PlanetStrategy as &GemStrategy, planet),
            (None, None) => {
                return Err(ApiError::validation(
                    "Either zodiacSign or planet is required",
                ))
            }
        };

    let recommendation = strategy.recommend(&key)?;
    let stock = state.db.inventory().available().await?;
    let matches: Vec<InventoryItem> = match_inventory(&recommendation, &stock)
        .into_iter()
        .cloned()
        .collect();

    debug!(
        strategy = strategy.name(),
        stone = %recommendation.primary_stone,
        matches = matches.len(),
        "Recommendation served"
    );
    Ok(Json(RecommendResponse {
        recommendation,
        matches,
    }))
}

pub async fn analyze(
    State(state): State<AppState>,
    Path(inventory_id): Path<String>,
) -> ApiResult<Json<StoneAnalysis>> {
    check_id(&inventory_id)?;
    let stone = state
        .db
        .inventory()
        .get_by_id(&inventory_id)
        .await?
        .ok_or_else(|| ApiError::not_found("InventoryItem", &inventory_id))?;

    let strategy = AnalysisStrategy::new(today().month());
    Ok(Json(strategy.recommend(&stone)?))
}
