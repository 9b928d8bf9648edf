//! # Sale Arithmetic
//!
//! Profit, margin and payment-status rules for a sale.
//!
//! ```text
//! total_amount ──┬──► profit = total_amount − purchase_price
//!                │
//! amount_paid ───┴──► payment_status
//!                      0            → Unpaid
//!                      < total      → Partial
//!                      ≥ total      → Paid
//! ```

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, BPS_DENOMINATOR};
use crate::types::{InventoryItem, PaymentStatus, Sale, SaleInput, StoneStatus};
use chrono::{DateTime, Utc};

/// Profit on a sale. Negative when the stone sells below cost.
#[inline]
pub fn profit(total_amount: Money, purchase_price: Money) -> Money {
    total_amount - purchase_price
}

/// Margin on the selling price in basis points.
///
/// Returns 0 when the selling price is not positive.
///
/// ```rust
/// use navratna_core::money::Money;
/// use navratna_core::sale::margin_bps;
///
/// // bought at ₹7,500, selling at ₹10,000 → 25%
/// assert_eq!(margin_bps(Money::from_rupees(7_500), Money::from_rupees(10_000)), 2_500);
/// ```
pub fn margin_bps(purchase: Money, selling: Money) -> i64 {
    if !selling.is_positive() {
        return 0;
    }
    ((selling.paise() - purchase.paise()) as i128 * BPS_DENOMINATOR as i128
        / selling.paise() as i128) as i64
}

/// Markup on the purchase price in basis points.
pub fn markup_bps(purchase: Money, selling: Money) -> i64 {
    if !purchase.is_positive() {
        return 0;
    }
    ((selling.paise() - purchase.paise()) as i128 * BPS_DENOMINATOR as i128
        / purchase.paise() as i128) as i64
}

/// Payment status implied by the amount paid.
pub fn derive_payment_status(total: Money, paid: Money) -> PaymentStatus {
    if paid.paise() <= 0 {
        PaymentStatus::Unpaid
    } else if paid < total {
        PaymentStatus::Partial
    } else {
        PaymentStatus::Paid
    }
}

/// Resolves the payment status of a sale.
///
/// An explicit status is accepted only when it agrees with the amounts.
pub fn resolve_payment_status(
    requested: Option<PaymentStatus>,
    total: Money,
    paid: Money,
) -> CoreResult<PaymentStatus> {
    let derived = derive_payment_status(total, paid);

    match requested {
        Some(status) if status != derived => Err(CoreError::InconsistentPaymentStatus {
            status: status.to_string(),
            paid: paid.paise(),
            total: total.paise(),
        }),
        _ => Ok(derived),
    }
}

/// Checks that a stone can be sold.
///
/// `already_sold_to_this_sale` is set when editing the sale that owns the
/// stone, so the edit does not trip over its own `Sold` status.
pub fn ensure_sellable(stone: &InventoryItem, already_sold_to_this_sale: bool) -> CoreResult<()> {
    if stone.status.is_sellable() || (already_sold_to_this_sale && stone.status == StoneStatus::Sold)
    {
        return Ok(());
    }

    Err(CoreError::StoneNotAvailable {
        stone_code: stone.stone_code.clone(),
        status: stone.status.to_string(),
    })
}

/// Builds a new sale for a stone.
pub fn build_sale(
    input: SaleInput,
    stone: &InventoryItem,
    invoice_number: String,
    now: DateTime<Utc>,
) -> CoreResult<Sale> {
    ensure_sellable(stone, false)?;

    let total = Money::from_paise(input.total_amount_paise);
    let paid = Money::from_paise(input.amount_paid_paise);
    let payment_status = resolve_payment_status(input.payment_status, total, paid)?;

    Ok(Sale {
        id: crate::types::new_id(),
        invoice_number,
        client_id: input.client_id,
        inventory_id: input.inventory_id,
        sale_date: input.sale_date,
        total_amount_paise: total.paise(),
        profit_paise: profit(total, stone.purchase_price()).paise(),
        payment_status,
        amount_paid_paise: paid.paise(),
        notes: input.notes,
        created_at: now,
        updated_at: now,
    })
}

/// Applies an edit to an existing sale, recomputing profit against `stone`.
///
/// `stone` is the stone the sale points to after the edit.
pub fn apply_sale_update(
    sale: &mut Sale,
    input: SaleInput,
    stone: &InventoryItem,
    now: DateTime<Utc>,
) -> CoreResult<()> {
    let same_stone = sale.inventory_id == input.inventory_id;
    ensure_sellable(stone, same_stone)?;

    let total = Money::from_paise(input.total_amount_paise);
    let paid = Money::from_paise(input.amount_paid_paise);
    sale.payment_status = resolve_payment_status(input.payment_status, total, paid)?;

    sale.client_id = input.client_id;
    sale.inventory_id = input.inventory_id;
    sale.sale_date = input.sale_date;
    sale.total_amount_paise = total.paise();
    sale.amount_paid_paise = paid.paise();
    sale.profit_paise = profit(total, stone.purchase_price()).paise();
    sale.notes = input.notes;
    sale.updated_at = now;
    Ok(())
}
