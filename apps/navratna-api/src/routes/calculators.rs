//! # Calculator Routes
//!
//! Stateless arithmetic from `navratna-core`; only the quality comparison
//! reads the database, to pull stones by id.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use navratna_core::bulk::{self, BulkQuote, BulkQuoteRequest, OptimizePlan, OptimizeRequest};
use navratna_core::money::Money;
use navratna_core::quality::{self, QualityReport, QualityStone};
use navratna_core::sale::{margin_bps, markup_bps, profit};
use navratna_core::validation::{validate_amount_paise, validate_carat, validate_uuid};
use navratna_core::valuation::{self, Valuation, ValuationRequest};

use crate::error::{ApiError, ApiJson, ApiResult};
use crate::AppState;

pub async fn valuation(ApiJson(request): ApiJson<ValuationRequest>) -> ApiResult<Json<Valuation>> {
    validate_carat(request.carat)?;
    let valuation = valuation::estimate(&request)?;
    debug!(
        gem_type = %valuation.gem_type,
        carat = valuation.carat,
        estimate = valuation.estimated_value_paise,
        "Valuation computed"
    );
    Ok(Json(valuation))
}

pub async fn bulk_quote(ApiJson(request): ApiJson<BulkQuoteRequest>) -> ApiResult<Json<BulkQuote>> {
    Ok(Json(bulk::quote(&request)?))
}

pub async fn bulk_optimize(
    ApiJson(request): ApiJson<OptimizeRequest>,
) -> ApiResult<Json<OptimizePlan>> {
    Ok(Json(bulk::optimize(&request)?))
}

/// Stones to compare: ad-hoc descriptions, stones from inventory, or both.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityCompareRequest {
    #[serde(default)]
    pub stones: Vec<QualityStone>,
    #[serde(default)]
    pub inventory_ids: Vec<String>,
}

pub async fn quality_compare(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<QualityCompareRequest>,
) -> ApiResult<Json<QualityReport>> {
    let mut stones = request.stones;
    let repo = state.db.inventory();
    for id in &request.inventory_ids {
        validate_uuid("inventoryIds", id)?;
        let item = repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("InventoryItem", id))?;
        stones.push(QualityStone::from(&item));
    }
    Ok(Json(quality::compare(&stones)?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginRequest {
    pub purchase_price_paise: i64,
    pub selling_price_paise: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginResult {
    pub profit_paise: i64,
    /// Profit over the selling price.
    pub margin_bps: i64,
    /// Profit over the purchase price.
    pub markup_bps: i64,
}

pub async fn margin(ApiJson(request): ApiJson<MarginRequest>) -> ApiResult<Json<MarginResult>> {
    validate_amount_paise("purchasePrice", request.purchase_price_paise)?;
    validate_amount_paise("sellingPrice", request.selling_price_paise)?;

    let purchase = Money::from_paise(request.purchase_price_paise);
    let selling = Money::from_paise(request.selling_price_paise);
    Ok(Json(MarginResult {
        profit_paise: profit(selling, purchase).paise(),
        margin_bps: margin_bps(purchase, selling),
        markup_bps: markup_bps(purchase, selling),
    }))
}
