//! # Sale Invoices
//!
//! Turns a recorded sale into a tax invoice: JSON for the frontend's
//! printer component and a self-contained A4 HTML page for printing.
//!
//! ## Amounts
//! ```text
//! sale.total_amount (what the client pays, GST inclusive)
//!        │
//!        ▼ taxable_from_inclusive(hsn)
//!   line rate ──► compute_totals ──► CGST/SGST or IGST, round-off, words
//! ```

use std::fmt::Write;

use chrono::NaiveDate;
use serde::Serialize;

use navratna_core::invoice::{
    compute_totals, financial_year, upi_uri, Buyer, InvoiceDraft, InvoiceLineInput,
    InvoiceTotals, Seller,
};
use navratna_core::money::Money;
use navratna_core::tax::{hsn_for_gem, is_inter_state, taxable_from_inclusive};
use navratna_core::{Client, CoreResult, InventoryItem, PaymentStatus, Sale};

/// Everything the printed invoice shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleInvoice {
    pub sale_id: String,
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub financial_year: String,
    pub seller: Seller,
    pub buyer: Buyer,
    pub place_of_supply: Option<String>,
    pub totals: InvoiceTotals,
    pub payment_status: PaymentStatus,
    pub amount_paid_paise: i64,
    pub balance_due_paise: i64,
    /// `upi://pay` link for the QR code; absent when nothing is due or
    /// the business has no UPI id.
    pub upi_uri: Option<String>,
}

/// Builds the invoice for a sale of `stone` to `client`.
pub fn assemble(
    sale: &Sale,
    stone: &InventoryItem,
    client: &Client,
    seller: &Seller,
) -> CoreResult<SaleInvoice> {
    let buyer = Buyer {
        name: client.name.clone(),
        gstin: client.gstin.clone().filter(|g| !g.trim().is_empty()),
        address: client.address.clone().or_else(|| client.city.clone()),
        state_code: None,
    };
    let place_of_supply = buyer.place_of_supply();
    let inter_state = is_inter_state(&seller.state_code, place_of_supply.as_deref());

    let hsn = hsn_for_gem(&stone.gem_type);
    let taxable = taxable_from_inclusive(sale.total_amount(), hsn)?;
    let draft = InvoiceDraft {
        buyer: buyer.clone(),
        lines: vec![InvoiceLineInput {
            hsn_code: hsn.to_string(),
            description: describe_stone(stone),
            carat: Some(stone.carat),
            quantity: 1,
            rate_paise: taxable.paise(),
        }],
        discount_paise: 0,
    };
    let totals = compute_totals(&draft, inter_state)?;

    let balance = Money::from_paise((totals.amount_payable_paise - sale.amount_paid_paise).max(0));
    let upi = seller
        .upi_id
        .as_deref()
        .filter(|_| balance.is_positive() && sale.payment_status != PaymentStatus::Paid)
        .map(|id| upi_uri(id, &seller.business_name, balance, &sale.invoice_number));

    Ok(SaleInvoice {
        sale_id: sale.id.clone(),
        invoice_number: sale.invoice_number.clone(),
        invoice_date: sale.sale_date,
        financial_year: financial_year(sale.sale_date),
        seller: seller.clone(),
        buyer,
        place_of_supply,
        totals,
        payment_status: sale.payment_status,
        amount_paid_paise: sale.amount_paid_paise,
        balance_due_paise: balance.paise(),
        upi_uri: upi,
    })
}

fn describe_stone(stone: &InventoryItem) -> String {
    let mut text = format!("{} {:.2} ct", stone.gem_type, stone.carat);
    if let Some(shape) = stone.shape.as_deref().filter(|s| !s.is_empty()) {
        let _ = write!(text, ", {}", shape);
    }
    let _ = write!(text, ", {} origin ({})", stone.origin, stone.stone_code);
    if let Some(lab) = stone.certification_lab.as_deref().filter(|l| !l.is_empty()) {
        let _ = write!(text, ", {} certified", lab);
    }
    text
}

// =============================================================================
// HTML
// =============================================================================

/// Escapes text for HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn rupees(paise: i64) -> String {
    Money::from_paise(paise).format_indian()
}

fn percent(bps: u32) -> String {
    format!("{}.{:02}%", bps / 100, bps % 100)
}

const PRINT_CSS: &str = r#"
@page { size: A4; margin: 12mm; }
* { box-sizing: border-box; }
body { font-family: "Noto Sans", Arial, sans-serif; font-size: 11pt; color: #222; margin: 0; }
.invoice { width: 186mm; margin: 0 auto; }
header { display: flex; justify-content: space-between; border-bottom: 2px solid #7a1f3d; padding-bottom: 6mm; }
h1 { margin: 0; color: #7a1f3d; font-size: 18pt; }
h2 { margin: 0; font-size: 14pt; text-align: right; }
.parties { display: flex; justify-content: space-between; margin: 6mm 0; }
table { width: 100%; border-collapse: collapse; margin-bottom: 4mm; }
th, td { border: 1px solid #bbb; padding: 2mm; }
th { background: #f3e9ee; text-align: left; }
td.num, th.num { text-align: right; }
.totals td { border: none; padding: 1mm 2mm; }
.totals tr.payable td { font-weight: bold; border-top: 1px solid #222; }
.words { font-style: italic; margin: 4mm 0; }
.upi { margin-top: 6mm; font-size: 9pt; word-break: break-all; }
@media print { .no-print { display: none; } }
"#;

/// Renders the invoice as a printable A4 HTML page.
pub fn render_html(invoice: &SaleInvoice) -> String {
    let mut html = String::with_capacity(8 * 1024);
    let seller = &invoice.seller;
    let buyer = &invoice.buyer;
    let totals = &invoice.totals;

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Tax Invoice {}</title>\n<style>{}</style>\n</head>\n<body>\n\
         <div class=\"invoice\">\n",
        escape(&invoice.invoice_number),
        PRINT_CSS
    );

    // Header
    let _ = write!(
        html,
        "<header>\n<div>\n<h1>{}</h1>\n",
        escape(&seller.business_name)
    );
    if let Some(address) = &seller.address {
        let _ = write!(html, "<div>{}</div>\n", escape(address));
    }
    if let Some(gstin) = &seller.gstin {
        let _ = write!(html, "<div>GSTIN: {}</div>\n", escape(gstin));
    }
    let _ = write!(
        html,
        "</div>\n<div>\n<h2>TAX INVOICE</h2>\n<div>Invoice No: {}</div>\n\
         <div>Date: {}</div>\n<div>FY {}</div>\n</div>\n</header>\n",
        escape(&invoice.invoice_number),
        invoice.invoice_date.format("%d-%m-%Y"),
        escape(&invoice.financial_year)
    );

    // Parties
    let _ = write!(
        html,
        "<section class=\"parties\">\n<div>\n<strong>Bill To</strong>\n<div>{}</div>\n",
        escape(&buyer.name)
    );
    if let Some(address) = &buyer.address {
        let _ = write!(html, "<div>{}</div>\n", escape(address));
    }
    if let Some(gstin) = &buyer.gstin {
        let _ = write!(html, "<div>GSTIN: {}</div>\n", escape(gstin));
    }
    let _ = write!(
        html,
        "</div>\n<div>\n<div>Place of supply: {}</div>\n<div>Supply: {}</div>\n</div>\n</section>\n",
        escape(invoice.place_of_supply.as_deref().unwrap_or(&seller.state_code)),
        if totals.inter_state { "Inter-state (IGST)" } else { "Intra-state (CGST + SGST)" }
    );

    // Lines
    html.push_str(
        "<table class=\"lines\">\n<thead><tr><th>#</th><th>Description</th><th>HSN</th>\
         <th class=\"num\">Carat</th><th class=\"num\">Qty</th><th class=\"num\">Rate</th>\
         <th class=\"num\">Amount</th></tr></thead>\n<tbody>\n",
    );
    for line in &totals.lines {
        let carat = line.carat.map(|c| format!("{:.2}", c)).unwrap_or_default();
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td class=\"num\">{}</td>\
             <td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>\n",
            line.serial,
            escape(&line.description),
            escape(&line.hsn_code),
            carat,
            line.quantity,
            rupees(line.rate_paise),
            rupees(line.amount_paise)
        );
    }
    html.push_str("</tbody>\n</table>\n");

    // Tax summary
    html.push_str(
        "<table class=\"tax\">\n<thead><tr><th>HSN</th><th class=\"num\">Rate</th>\
         <th class=\"num\">Taxable</th><th class=\"num\">CGST</th><th class=\"num\">SGST</th>\
         <th class=\"num\">IGST</th></tr></thead>\n<tbody>\n",
    );
    for tax in &totals.tax_lines {
        let _ = write!(
            html,
            "<tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td>\
             <td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>\n",
            escape(&tax.hsn_code),
            percent(tax.rate_bps),
            rupees(tax.taxable_paise),
            rupees(tax.cgst_paise),
            rupees(tax.sgst_paise),
            rupees(tax.igst_paise)
        );
    }
    html.push_str("</tbody>\n</table>\n");

    // Totals
    html.push_str("<table class=\"totals\">\n");
    let mut row = |label: &str, paise: i64, class: &str| {
        let _ = write!(
            html,
            "<tr class=\"{}\"><td>{}</td><td class=\"num\">{}</td></tr>\n",
            class,
            label,
            rupees(paise)
        );
    };
    row("Subtotal", totals.subtotal_paise, "");
    if totals.discount_paise != 0 {
        row("Discount", -totals.discount_paise, "");
    }
    row("Taxable value", totals.taxable_paise, "");
    if totals.inter_state {
        row("IGST", totals.igst_paise, "");
    } else {
        row("CGST", totals.cgst_paise, "");
        row("SGST", totals.sgst_paise, "");
    }
    row("Rounded off", totals.round_off_paise, "");
    row("Amount payable", totals.amount_payable_paise, "payable");
    if invoice.amount_paid_paise > 0 {
        row("Paid", invoice.amount_paid_paise, "");
        row("Balance due", invoice.balance_due_paise, "");
    }
    html.push_str("</table>\n");

    let _ = write!(
        html,
        "<p class=\"words\">{}</p>\n",
        escape(&totals.amount_in_words)
    );

    if let Some(uri) = &invoice.upi_uri {
        let _ = write!(
            html,
            "<div class=\"upi\" data-upi=\"{0}\">Pay by UPI: {0}</div>\n",
            escape(uri)
        );
    }

    html.push_str(
        "<footer>\n<p>This is a computer generated invoice.</p>\n</footer>\n\
         <button class=\"no-print\" onclick=\"window.print()\">Print</button>\n\
         </div>\n</body>\n</html>\n",
    );
    html
}
