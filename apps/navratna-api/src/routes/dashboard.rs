//! # Dashboard
//!
//! One read-only snapshot of the business.
//!
//! ```text
//! ┌──────────────┬──────────────────────────────────────────────┐
//! │ stock        │ counts by status, cost and asking value      │
//! │ sales        │ all time and current financial year          │
//! │ receivables  │ open sales and the amount outstanding        │
//! │ work         │ pending certifications, overdue tasks,       │
//! │              │ follow-ups due from today                    │
//! │ gst          │ next GSTR return due                         │
//! └──────────────┴──────────────────────────────────────────────┘
//! ```

use axum::extract::State;
use axum::Json;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use navratna_core::invoice::{financial_year, financial_year_start};
use navratna_core::tax::{next_due, FilingDue};
use navratna_core::Consultation;
use navratna_db::{InventoryStats, Receivables, SaleSummary};

use super::today;
use crate::error::ApiResult;
use crate::AppState;

/// Follow-ups shown on the dashboard.
const FOLLOW_UP_LIMIT: usize = 5;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub as_of: NaiveDate,
    pub stock: InventoryStats,
    pub sales_all_time: SaleSummary,
    /// Label such as `2026-27`.
    pub financial_year: String,
    pub sales_financial_year: SaleSummary,
    pub receivables: Receivables,
    pub pending_certifications: i64,
    pub overdue_tasks: i64,
    pub upcoming_follow_ups: Vec<Consultation>,
    pub next_gst_filing: FilingDue,
}

pub async fn dashboard(State(state): State<AppState>) -> ApiResult<Json<Dashboard>> {
    let today = today();
    let fy_start = NaiveDate::from_ymd_opt(financial_year_start(today), 4, 1);

    let sales = state.db.sales();
    let stock = state.db.inventory().stats().await?;
    let sales_all_time = sales.summary(None, None).await?;
    let sales_financial_year = sales.summary(fy_start, Some(today)).await?;
    let receivables = sales.receivables().await?;
    let pending_certifications = state.db.certifications().count_pending().await?;
    let overdue_tasks = state.db.tasks().count_overdue(today).await?;

    let mut upcoming_follow_ups = state.db.consultations().upcoming_follow_ups(today).await?;
    upcoming_follow_ups.truncate(FOLLOW_UP_LIMIT);

    debug!(
        in_stock = stock.in_stock_count,
        outstanding = receivables.outstanding_paise,
        "Dashboard assembled"
    );

    Ok(Json(Dashboard {
        as_of: today,
        stock,
        sales_all_time,
        financial_year: financial_year(today),
        sales_financial_year,
        receivables,
        pending_certifications,
        overdue_tasks,
        upcoming_follow_ups,
        next_gst_filing: next_due(today)?,
    }))
}
