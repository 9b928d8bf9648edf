//! # Sale Routes
//!
//! ## Sale Lifecycle
//! ```text
//! POST   /api/sales        ──► invoice number issued, stone ──► Sold
//! PUT    /api/sales/:id    ──► profit recomputed; new stone ──► Sold,
//!                              old stone ──► In Stock
//! DELETE /api/sales/:id    ──► stone ──► In Stock
//! GET    /api/sales/:id/invoice(.html)
//! ```

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::info;

use navratna_core::validation::validate_sale_input;
use navratna_core::{Sale, SaleInput};
use navratna_db::DbError;

use super::check_id;
use crate::error::{ApiError, ApiJson, ApiResult};
use crate::invoice::{self, SaleInvoice};
use crate::AppState;

/// A stone or client named in the body that does not exist is a bad
/// request, not a missing sale.
fn reference_error(err: DbError) -> ApiError {
    match err {
        DbError::NotFound { entity, id } if entity != "Sale" => {
            ApiError::validation(format!("Unknown {}: {}", entity, id))
        }
        other => ApiError::from(other),
    }
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Sale>>> {
    Ok(Json(state.db.sales().list().await?))
}

pub async fn list_for_client(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> ApiResult<Json<Vec<Sale>>> {
    check_id(&client_id)?;
    Ok(Json(state.db.sales().list_by_client(&client_id).await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Sale>> {
    check_id(&id)?;
    Ok(Json(load_sale(&state, &id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SaleInput>,
) -> ApiResult<(StatusCode, Json<Sale>)> {
    validate_sale_input(&input)?;
    let sale = state
        .db
        .sales()
        .create(input, &state.config.invoice_prefix)
        .await
        .map_err(reference_error)?;
    Ok((StatusCode::CREATED, Json(sale)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<SaleInput>,
) -> ApiResult<Json<Sale>> {
    check_id(&id)?;
    validate_sale_input(&input)?;
    let sale = state
        .db
        .sales()
        .update(&id, input)
        .await
        .map_err(reference_error)?;
    Ok(Json(sale))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    check_id(&id)?;
    state.db.sales().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Invoices
// =============================================================================

async fn load_sale(state: &AppState, id: &str) -> ApiResult<Sale> {
    state
        .db
        .sales()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Sale", id))
}

async fn build_invoice(state: &AppState, id: &str) -> ApiResult<SaleInvoice> {
    check_id(id)?;
    let sale = load_sale(state, id).await?;

    // Sales pin both rows with ON DELETE RESTRICT, so a miss here is corruption.
    let stone = state
        .db
        .inventory()
        .get_by_id(&sale.inventory_id)
        .await?
        .ok_or_else(|| ApiError::internal(format!("Sale {} has no stone", sale.invoice_number)))?;
    let client = state
        .db
        .clients()
        .get_by_id(&sale.client_id)
        .await?
        .ok_or_else(|| ApiError::internal(format!("Sale {} has no client", sale.invoice_number)))?;

    Ok(invoice::assemble(&sale, &stone, &client, &state.config.seller)?)
}

pub async fn invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SaleInvoice>> {
    Ok(Json(build_invoice(&state, &id).await?))
}

/// Printable A4 invoice.
pub async fn invoice_html(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let invoice = build_invoice(&state, &id).await?;
    info!(invoice = %invoice.invoice_number, "Rendering printable invoice");
    Ok((
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        invoice::render_html(&invoice),
    )
        .into_response())
}
