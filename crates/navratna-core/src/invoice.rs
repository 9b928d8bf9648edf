//! # Invoice Totals
//!
//! Turns a draft (seller, buyer, lines, discount) into the numbers printed
//! on a tax invoice.
//!
//! ## Calculation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  line amount      = rate × quantity                                     │
//! │  subtotal         = Σ line amounts                                      │
//! │  taxable          = subtotal − discount                                 │
//! │                     (discount shared across HSN groups pro rata)        │
//! │  tax              = Σ GST per HSN group (CGST+SGST or IGST)             │
//! │  grand total      = taxable + tax                                       │
//! │  round off        = nearest rupee − grand total                         │
//! │  amount payable   = grand total + round off                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invoice Numbers
//! `PREFIX/2026-27/0001`: prefix, Indian financial year (April to March),
//! then a four-digit running sequence.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::tax::{lookup_hsn, split_intra_state};
use crate::words::amount_in_words;
use crate::MAX_INVOICE_LINES;

// =============================================================================
// Numbering
// =============================================================================

/// Financial year containing `date`, e.g. `2026-27` for any date from
/// 1 April 2026 to 31 March 2027.
pub fn financial_year(date: NaiveDate) -> String {
    let start = financial_year_start(date);
    format!("{}-{:02}", start, (start + 1) % 100)
}

/// Calendar year in which the financial year containing `date` began.
pub fn financial_year_start(date: NaiveDate) -> i32 {
    if date.month() >= 4 {
        date.year()
    } else {
        date.year() - 1
    }
}

/// Formats an invoice number.
///
/// ```rust
/// use chrono::NaiveDate;
/// use navratna_core::invoice::format_invoice_number;
///
/// let date = NaiveDate::from_ymd_opt(2027, 2, 14).unwrap();
/// assert_eq!(format_invoice_number("NR", date, 7), "NR/2026-27/0007");
/// ```
pub fn format_invoice_number(prefix: &str, date: NaiveDate, sequence: u32) -> String {
    format!("{}/{}/{:04}", prefix, financial_year(date), sequence)
}

/// Common prefix of every invoice number in the financial year of `date`,
/// including the trailing slash. Used to find the last sequence issued.
pub fn invoice_series(prefix: &str, date: NaiveDate) -> String {
    format!("{}/{}/", prefix, financial_year(date))
}

/// Parses the running sequence out of an invoice number.
pub fn parse_sequence(invoice_number: &str) -> Option<u32> {
    invoice_number.rsplit('/').next()?.parse().ok()
}

// =============================================================================
// Draft
// =============================================================================

/// The business issuing the invoice.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Seller {
    pub business_name: String,
    pub gstin: Option<String>,
    /// Two-digit GST state code.
    pub state_code: String,
    pub address: Option<String>,
    pub upi_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Buyer {
    pub name: String,
    #[serde(default)]
    pub gstin: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Place of supply. Falls back to the GSTIN's state code.
    #[serde(default)]
    pub state_code: Option<String>,
}

impl Buyer {
    pub fn place_of_supply(&self) -> Option<String> {
        self.state_code
            .clone()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| {
                self.gstin
                    .as_deref()
                    .and_then(crate::tax::state_code_from_gstin)
                    .map(str::to_string)
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceLineInput {
    pub hsn_code: String,
    pub description: String,
    #[serde(default)]
    pub carat: Option<f64>,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    pub rate_paise: i64,
}

fn default_quantity() -> i64 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceDraft {
    pub buyer: Buyer,
    pub lines: Vec<InvoiceLineInput>,
    #[serde(default)]
    pub discount_paise: i64,
}

// =============================================================================
// Totals
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceLine {
    pub serial: u32,
    pub hsn_code: String,
    pub description: String,
    pub carat: Option<f64>,
    pub quantity: i64,
    pub rate_paise: i64,
    pub amount_paise: i64,
}

/// Tax for one HSN group after its share of the discount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TaxLine {
    pub hsn_code: String,
    pub rate_bps: u32,
    pub taxable_paise: i64,
    pub cgst_paise: i64,
    pub sgst_paise: i64,
    pub igst_paise: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InvoiceTotals {
    pub lines: Vec<InvoiceLine>,
    pub tax_lines: Vec<TaxLine>,
    pub inter_state: bool,
    pub subtotal_paise: i64,
    pub discount_paise: i64,
    pub taxable_paise: i64,
    pub cgst_paise: i64,
    pub sgst_paise: i64,
    pub igst_paise: i64,
    pub total_tax_paise: i64,
    /// `taxable + tax`, before rounding.
    pub grand_total_paise: i64,
    /// Signed adjustment printed on the "Rounded off" line.
    pub round_off_paise: i64,
    /// `grand_total + round_off`, a whole number of rupees.
    pub amount_payable_paise: i64,
    pub amount_in_words: String,
}

/// Computes the totals of a draft invoice.
///
/// ## Errors
/// - `InvalidInvoice` for no lines, too many lines, a non-positive
///   quantity, a negative rate, or a discount outside `0..=subtotal`
/// - `UnknownHsnCode` for a line with an HSN/SAC code not in the table
pub fn compute_totals(draft: &InvoiceDraft, inter_state: bool) -> CoreResult<InvoiceTotals> {
    let invalid = |reason: String| CoreError::InvalidInvoice { reason };

    if draft.lines.is_empty() {
        return Err(invalid("invoice has no lines".to_string()));
    }
    if draft.lines.len() > MAX_INVOICE_LINES {
        return Err(invalid(format!(
            "invoice has more than {MAX_INVOICE_LINES} lines"
        )));
    }

    let mut lines = Vec::with_capacity(draft.lines.len());
    // HSN groups keep first-seen order so the tax table reads like the lines.
    let mut groups: Vec<(String, u32, Money)> = Vec::new();

    for (idx, line) in draft.lines.iter().enumerate() {
        if line.quantity <= 0 {
            return Err(invalid(format!("line {} has quantity {}", idx + 1, line.quantity)));
        }
        if line.rate_paise < 0 {
            return Err(invalid(format!("line {} has a negative rate", idx + 1)));
        }

        let hsn = lookup_hsn(&line.hsn_code)?;
        let amount = Money::from_paise(line.rate_paise).multiply_quantity(line.quantity);

        match groups.iter_mut().find(|(code, _, _)| code == hsn.code) {
            Some((_, _, total)) => *total += amount,
            None => groups.push((hsn.code.to_string(), hsn.gst_rate_bps, amount)),
        }

        lines.push(InvoiceLine {
            serial: idx as u32 + 1,
            hsn_code: hsn.code.to_string(),
            description: line.description.trim().to_string(),
            carat: line.carat,
            quantity: line.quantity,
            rate_paise: line.rate_paise,
            amount_paise: amount.paise(),
        });
    }

    let subtotal: Money = groups.iter().map(|(_, _, amount)| *amount).sum();
    let discount = Money::from_paise(draft.discount_paise);
    if discount.is_negative() || discount > subtotal {
        return Err(invalid(format!(
            "discount {} must be between ₹0.00 and {}",
            discount, subtotal
        )));
    }

    let shares = share_discount(&groups, discount, subtotal);

    let mut tax_lines = Vec::with_capacity(groups.len());
    let (mut cgst, mut sgst, mut igst) = (Money::zero(), Money::zero(), Money::zero());
    for ((code, rate_bps, amount), share) in groups.iter().zip(shares) {
        let taxable = *amount - share;
        let tax = taxable.apply_bps(*rate_bps as i64);
        let (c, s, i) = if inter_state {
            (Money::zero(), Money::zero(), tax)
        } else {
            let (c, s) = split_intra_state(tax);
            (c, s, Money::zero())
        };
        cgst += c;
        sgst += s;
        igst += i;
        tax_lines.push(TaxLine {
            hsn_code: code.clone(),
            rate_bps: *rate_bps,
            taxable_paise: taxable.paise(),
            cgst_paise: c.paise(),
            sgst_paise: s.paise(),
            igst_paise: i.paise(),
        });
    }

    let taxable = subtotal - discount;
    let total_tax = cgst + sgst + igst;
    let grand_total = taxable + total_tax;
    let (payable, round_off) = grand_total.round_to_rupee();

    Ok(InvoiceTotals {
        lines,
        tax_lines,
        inter_state,
        subtotal_paise: subtotal.paise(),
        discount_paise: discount.paise(),
        taxable_paise: taxable.paise(),
        cgst_paise: cgst.paise(),
        sgst_paise: sgst.paise(),
        igst_paise: igst.paise(),
        total_tax_paise: total_tax.paise(),
        grand_total_paise: grand_total.paise(),
        round_off_paise: round_off.paise(),
        amount_payable_paise: payable.paise(),
        amount_in_words: amount_in_words(payable),
    })
}

/// Splits a discount across groups in proportion to their amounts.
/// The last group absorbs the rounding remainder.
fn share_discount(groups: &[(String, u32, Money)], discount: Money, subtotal: Money) -> Vec<Money> {
    if discount.is_zero() || subtotal.is_zero() {
        return vec![Money::zero(); groups.len()];
    }

    let mut shares = Vec::with_capacity(groups.len());
    let mut allotted = Money::zero();
    for (idx, (_, _, amount)) in groups.iter().enumerate() {
        let share = if idx + 1 == groups.len() {
            discount - allotted
        } else {
            Money::from_paise(
                (discount.paise() as i128 * amount.paise() as i128 / subtotal.paise() as i128)
                    as i64,
            )
        };
        allotted += share;
        shares.push(share);
    }
    shares
}

// =============================================================================
// UPI
// =============================================================================

/// Builds a UPI deep link (`upi://pay?...`) for the payment QR code.
///
/// ```rust
/// use navratna_core::invoice::upi_uri;
/// use navratna_core::money::Money;
///
/// let uri = upi_uri("navratna@okbank", "Navratna Gems", Money::from_paise(1_500_50), "NR/2026-27/0001");
/// assert!(uri.starts_with("upi://pay?pa=navratna%40okbank&pn=Navratna+Gems&am=1500.50"));
/// ```
pub fn upi_uri(upi_id: &str, payee_name: &str, amount: Money, note: &str) -> String {
    let amount = format!("{}.{:02}", amount.rupees(), amount.paise_part());
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("pa", upi_id)
        .append_pair("pn", payee_name)
        .append_pair("am", &amount)
        .append_pair("cu", "INR")
        .append_pair("tn", note)
        .finish();
    format!("upi://pay?{query}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(hsn: &str, qty: i64, rate: i64) -> InvoiceLineInput {
        InvoiceLineInput {
            hsn_code: hsn.to_string(),
            description: "Natural Ruby".to_string(),
            carat: Some(3.2),
            quantity: qty,
            rate_paise: rate,
        }
    }

    fn draft(lines: Vec<InvoiceLineInput>, discount: i64) -> InvoiceDraft {
        InvoiceDraft {
            buyer: Buyer {
                name: "Pandit Sharma".to_string(),
                ..Default::default()
            },
            lines,
            discount_paise: discount,
        }
    }

    #[test]
    fn test_financial_year() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        assert_eq!(financial_year(d(2026, 4, 1)), "2026-27");
        assert_eq!(financial_year(d(2026, 3, 31)), "2025-26");
        assert_eq!(financial_year(d(2099, 12, 1)), "2099-00");
        assert_eq!(invoice_series("NR", d(2026, 10, 18)), "NR/2026-27/");
        assert_eq!(parse_sequence("NR/2026-27/0042"), Some(42));
        assert_eq!(parse_sequence("garbage"), None);
    }

    #[test]
    fn test_totals_identity_holds() {
        let totals = compute_totals(
            &draft(vec![line("7103", 1, 1_23_456_78), line("9983", 1, 1_100_00)], 5_000_00),
            false,
        )
        .unwrap();

        assert_eq!(totals.subtotal_paise, 1_24_556_78);
        assert_eq!(totals.taxable_paise, totals.subtotal_paise - 5_000_00);
        assert_eq!(
            totals.grand_total_paise,
            totals.subtotal_paise - totals.discount_paise + totals.total_tax_paise
        );
        assert_eq!(
            totals.amount_payable_paise,
            totals.grand_total_paise + totals.round_off_paise
        );
        assert_eq!(totals.amount_payable_paise % 100, 0);
        assert!(totals.round_off_paise.abs() <= 50);
        assert_eq!(totals.tax_lines.len(), 2);
        let taxable_by_hsn: i64 = totals.tax_lines.iter().map(|t| t.taxable_paise).sum();
        assert_eq!(taxable_by_hsn, totals.taxable_paise);
    }

    #[test]
    fn test_intra_vs_inter_state() {
        let d = draft(vec![line("7113", 2, 50_000_00)], 0);

        let intra = compute_totals(&d, false).unwrap();
        assert_eq!(intra.cgst_paise, 1_500_00);
        assert_eq!(intra.sgst_paise, 1_500_00);
        assert_eq!(intra.igst_paise, 0);

        let inter = compute_totals(&d, true).unwrap();
        assert_eq!(inter.igst_paise, 3_000_00);
        assert_eq!(inter.amount_payable_paise, 1_03_000_00);
        assert_eq!(
            inter.amount_in_words,
            "Rupees One Lakh Three Thousand Only"
        );
    }

    #[test]
    fn test_round_off_line() {
        // ₹999.99 at 0.25% → tax ₹2.50, grand total ₹1,002.49 → ₹1,002.00
        let totals = compute_totals(&draft(vec![line("7103", 1, 999_99)], 0), false).unwrap();
        assert_eq!(totals.total_tax_paise, 250);
        assert_eq!(totals.grand_total_paise, 1_002_49);
        assert_eq!(totals.round_off_paise, -49);
        assert_eq!(totals.amount_payable_paise, 1_002_00);
    }

    #[test]
    fn test_rejects_bad_drafts() {
        assert!(compute_totals(&draft(vec![], 0), false).is_err());
        assert!(compute_totals(&draft(vec![line("7103", 0, 100)], 0), false).is_err());
        assert!(compute_totals(&draft(vec![line("7103", 1, 100)], 101), false).is_err());
        assert!(matches!(
            compute_totals(&draft(vec![line("1234", 1, 100)], 0), false),
            Err(CoreError::UnknownHsnCode(_))
        ));
    }

    #[test]
    fn test_place_of_supply_from_gstin() {
        let buyer = Buyer {
            name: "Agarwal Jewellers".to_string(),
            gstin: Some("29AAGCB7383J1Z4".to_string()),
            address: None,
            state_code: None,
        };
        assert_eq!(buyer.place_of_supply().as_deref(), Some("29"));
    }

    #[test]
    fn test_upi_uri() {
        let uri = upi_uri("gems@upi", "Navratna", Money::from_rupees(2_000), "Invoice 1");
        assert_eq!(
            uri,
            "upi://pay?pa=gems%40upi&pn=Navratna&am=2000.00&cu=INR&tn=Invoice+1"
        );
    }
}
