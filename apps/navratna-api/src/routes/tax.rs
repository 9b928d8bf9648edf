//! # Tax Routes
//!
//! HSN table, one-off GST breakdowns, the GSTR filing calendar and
//! draft invoice previews. Nothing here touches the database.

use axum::extract::State;
use axum::Json;
use chrono::Datelike;
use serde::{Deserialize, Serialize};

use navratna_core::invoice::{compute_totals, upi_uri, Buyer, InvoiceDraft, InvoiceTotals, Seller};
use navratna_core::money::Money;
use navratna_core::tax::{
    self, filing_calendar, gst_breakdown, is_inter_state, next_due, FilingDue, GstBreakdown,
    HsnCode, HSN_TABLE,
};
use navratna_core::validation::validate_amount_paise;

use super::today;
use crate::error::{ApiJson, ApiQuery, ApiResult};
use crate::AppState;

pub async fn hsn_codes() -> Json<Vec<HsnCode>> {
    Json(HSN_TABLE.to_vec())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GstRequest {
    pub amount_paise: i64,
    #[serde(default = "default_hsn")]
    pub hsn_code: String,
    /// Explicit override; otherwise decided from `buyerStateCode`.
    #[serde(default)]
    pub inter_state: Option<bool>,
    #[serde(default)]
    pub buyer_state_code: Option<String>,
}

fn default_hsn() -> String {
    tax::HSN_GEMSTONES.to_string()
}

/// GST on a taxable amount.
pub async fn gst(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<GstRequest>,
) -> ApiResult<Json<GstBreakdown>> {
    validate_amount_paise("amountPaise", request.amount_paise)?;
    let inter_state = request.inter_state.unwrap_or_else(|| {
        is_inter_state(
            &state.config.seller.state_code,
            request.buyer_state_code.as_deref().map(str::trim),
        )
    });
    Ok(Json(gst_breakdown(
        Money::from_paise(request.amount_paise),
        request.hsn_code.trim(),
        inter_state,
    )?))
}

#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingCalendar {
    /// Returns for the requested period (default: the current month).
    pub returns: Vec<FilingDue>,
    /// The next return due from today.
    pub next_due: FilingDue,
}

pub async fn calendar(ApiQuery(query): ApiQuery<CalendarQuery>) -> ApiResult<Json<FilingCalendar>> {
    let today = today();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());

    Ok(Json(FilingCalendar {
        returns: filing_calendar(year, month)?,
        next_due: next_due(today)?,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePreview {
    pub seller: Seller,
    pub buyer: Buyer,
    pub place_of_supply: String,
    pub totals: InvoiceTotals,
    /// Payment link for the amount payable, when the seller has a UPI id.
    pub upi_uri: Option<String>,
}

/// Totals of a draft invoice as the configured seller would issue it.
pub async fn invoice_preview(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<InvoiceDraft>,
) -> ApiResult<Json<InvoicePreview>> {
    let seller = state.config.seller.clone();
    let buyer_state = draft.buyer.place_of_supply();
    let inter_state = is_inter_state(&seller.state_code, buyer_state.as_deref());
    let totals = compute_totals(&draft, inter_state)?;

    let upi_uri = seller.upi_id.as_deref().map(|upi| {
        upi_uri(
            upi,
            &seller.business_name,
            Money::from_paise(totals.amount_payable_paise),
            "Invoice payment",
        )
    });

    Ok(Json(InvoicePreview {
        place_of_supply: buyer_state.unwrap_or_else(|| seller.state_code.clone()),
        buyer: draft.buyer,
        seller,
        totals,
        upi_uri,
    }))
}
