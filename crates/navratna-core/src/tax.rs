//! # Tax Assistant
//!
//! HSN/SAC codes used by the trade, GST breakdowns and the monthly GST
//! filing calendar.
//!
//! ## Intra-state vs Inter-state
//! ```text
//! seller state == place of supply ──► CGST (rate/2) + SGST (rate/2)
//! seller state != place of supply ──► IGST (full rate)
//! ```

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::TaxRate;

// =============================================================================
// HSN / SAC Table
// =============================================================================

/// One row of the HSN/SAC table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HsnCode {
    pub code: &'static str,
    pub description: &'static str,
    pub gst_rate_bps: u32,
    /// Services use SAC codes; goods use HSN.
    pub is_service: bool,
}

impl HsnCode {
    #[inline]
    pub fn rate(&self) -> TaxRate {
        TaxRate::from_bps(self.gst_rate_bps)
    }
}

pub const HSN_TABLE: [HsnCode; 6] = [
    HsnCode {
        code: "7101",
        description: "Pearls, natural or cultured",
        gst_rate_bps: 300,
        is_service: false,
    },
    HsnCode {
        code: "7102",
        description: "Diamonds, worked or unworked",
        gst_rate_bps: 25,
        is_service: false,
    },
    HsnCode {
        code: "7103",
        description: "Precious and semi-precious stones",
        gst_rate_bps: 25,
        is_service: false,
    },
    HsnCode {
        code: "7113",
        description: "Articles of jewellery",
        gst_rate_bps: 300,
        is_service: false,
    },
    HsnCode {
        code: "7116",
        description: "Articles of pearls and precious stones",
        gst_rate_bps: 300,
        is_service: false,
    },
    HsnCode {
        code: "9983",
        description: "Consultancy and other professional services",
        gst_rate_bps: 1800,
        is_service: true,
    },
];

/// HSN code for loose gemstones.
pub const HSN_GEMSTONES: &str = "7103";

/// SAC code for consultations.
pub const SAC_CONSULTANCY: &str = "9983";

/// Looks up an HSN/SAC code.
pub fn lookup_hsn(code: &str) -> CoreResult<&'static HsnCode> {
    let code = code.trim();
    HSN_TABLE
        .iter()
        .find(|h| h.code == code)
        .ok_or_else(|| CoreError::UnknownHsnCode(code.to_string()))
}

/// HSN code for a gem type: diamonds and pearls have their own headings.
pub fn hsn_for_gem(gem_type: &str) -> &'static str {
    let gem = gem_type.to_ascii_lowercase();
    if gem.contains("diamond") {
        "7102"
    } else if gem.contains("pearl") {
        "7101"
    } else {
        HSN_GEMSTONES
    }
}

// =============================================================================
// GST Breakdown
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GstBreakdown {
    pub hsn_code: String,
    pub rate_bps: u32,
    pub taxable_paise: i64,
    pub cgst_paise: i64,
    pub sgst_paise: i64,
    pub igst_paise: i64,
    pub total_tax_paise: i64,
    pub total_paise: i64,
    pub inter_state: bool,
}

/// Splits a tax amount into CGST and SGST halves.
///
/// The odd paisa, if any, goes to SGST so that the halves always add up.
pub fn split_intra_state(tax: Money) -> (Money, Money) {
    let cgst = Money::from_paise(tax.paise() / 2);
    (cgst, tax - cgst)
}

/// Computes GST on a taxable amount for an HSN/SAC code.
///
/// ```rust
/// use navratna_core::money::Money;
/// use navratna_core::tax::gst_breakdown;
///
/// // ₹1,00,000 of cut stones (0.25%) sold within the state
/// let gst = gst_breakdown(Money::from_rupees(1_00_000), "7103", false).unwrap();
/// assert_eq!(gst.cgst_paise, 125_00);
/// assert_eq!(gst.sgst_paise, 125_00);
/// assert_eq!(gst.total_paise, 1_00_250_00);
/// ```
pub fn gst_breakdown(amount: Money, hsn: &str, inter_state: bool) -> CoreResult<GstBreakdown> {
    let entry = lookup_hsn(hsn)?;
    let tax = amount.calculate_tax(entry.rate());

    let (cgst, sgst, igst) = if inter_state {
        (Money::zero(), Money::zero(), tax)
    } else {
        let (c, s) = split_intra_state(tax);
        (c, s, Money::zero())
    };

    Ok(GstBreakdown {
        hsn_code: entry.code.to_string(),
        rate_bps: entry.gst_rate_bps,
        taxable_paise: amount.paise(),
        cgst_paise: cgst.paise(),
        sgst_paise: sgst.paise(),
        igst_paise: igst.paise(),
        total_tax_paise: tax.paise(),
        total_paise: (amount + tax).paise(),
        inter_state,
    })
}

/// Taxable value contained in a GST-inclusive amount.
///
/// `taxable = inclusive × 10000 / (10000 + rate_bps)`, rounded half-up.
///
/// ```rust
/// use navratna_core::money::Money;
/// use navratna_core::tax::taxable_from_inclusive;
///
/// let taxable = taxable_from_inclusive(Money::from_paise(1_00_250_00), "7103").unwrap();
/// assert_eq!(taxable.paise(), 1_00_000_00);
/// ```
pub fn taxable_from_inclusive(inclusive: Money, hsn: &str) -> CoreResult<Money> {
    let entry = lookup_hsn(hsn)?;
    let denominator = 10_000 + entry.gst_rate_bps as i128;
    let numerator = inclusive.paise() as i128 * 10_000;
    let taxable = (numerator + denominator / 2) / denominator;
    Ok(Money::from_paise(taxable as i64))
}

/// State code embedded in a GSTIN (its first two digits).
pub fn state_code_from_gstin(gstin: &str) -> Option<&str> {
    let code = gstin.trim().get(..2)?;
    code.bytes().all(|b| b.is_ascii_digit()).then_some(code)
}

/// Whether a supply crosses state lines.
///
/// An unknown place of supply is treated as intra-state.
pub fn is_inter_state(seller_state: &str, buyer_state: Option<&str>) -> bool {
    buyer_state.is_some_and(|b| !b.is_empty() && b != seller_state)
}

// =============================================================================
// Filing Calendar
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GstReturn {
    #[serde(rename = "GSTR-1")]
    Gstr1,
    #[serde(rename = "GSTR-3B")]
    Gstr3b,
}

impl GstReturn {
    /// Day of the following month on which the return is due.
    pub fn due_day(&self) -> u32 {
        match self {
            GstReturn::Gstr1 => 11,
            GstReturn::Gstr3b => 20,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            GstReturn::Gstr1 => "Outward supplies",
            GstReturn::Gstr3b => "Summary return and tax payment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FilingDue {
    pub return_type: GstReturn,
    /// Tax period as `YYYY-MM`.
    pub period: String,
    #[ts(as = "String")]
    pub due_date: NaiveDate,
    pub description: String,
}

fn following_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// Returns due for the tax period `year`/`month`, in due-date order.
pub fn filing_calendar(year: i32, month: u32) -> CoreResult<Vec<FilingDue>> {
    if !(1..=12).contains(&month) {
        return Err(ValidationError::OutOfRange {
            field: "month".to_string(),
            min: 1,
            max: 12,
        }
        .into());
    }

    let (due_year, due_month) = following_month(year, month);
    [GstReturn::Gstr1, GstReturn::Gstr3b]
        .into_iter()
        .map(|ret| -> CoreResult<FilingDue> {
            let due_date = NaiveDate::from_ymd_opt(due_year, due_month, ret.due_day())
                .ok_or_else(|| ValidationError::InvalidFormat {
                    field: "year".to_string(),
                    reason: format!("{year} is out of range"),
                })?;
            Ok(FilingDue {
                return_type: ret,
                period: format!("{year:04}-{month:02}"),
                due_date,
                description: ret.description().to_string(),
            })
        })
        .collect()
}

/// The nearest filing due on or after `date`.
pub fn next_due(date: NaiveDate) -> CoreResult<FilingDue> {
    // Returns due this month belong to last month's period.
    let (period_year, period_month) = if date.month() == 1 {
        (date.year() - 1, 12)
    } else {
        (date.year(), date.month() - 1)
    };

    let current = filing_calendar(period_year, period_month)?;
    if let Some(due) = current.into_iter().find(|d| d.due_date >= date) {
        return Ok(due);
    }

    // GSTR-1 for the current period is always the first entry.
    let mut upcoming = filing_calendar(date.year(), date.month())?;
    Ok(upcoming.remove(0))
}
