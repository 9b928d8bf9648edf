//! # Money Module
//!
//! Provides the `Money` type for handling rupee amounts safely.
//!
//! ## Why Integer Paise?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A ruby lot at ₹45,000.10/carat × 3.37 carats, plus 0.25% GST, then    │
//! │  rounded off on the invoice: every step must agree to the paisa.       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer paise (1 rupee = 100 paise)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use navratna_core::money::Money;
//!
//! let price = Money::from_paise(1_23_456_78);
//! assert_eq!(price.to_string(), "₹1,23,456.78");
//!
//! let (rounded, round_off) = price.round_to_rupee();
//! assert_eq!(rounded.paise(), 1_23_457_00);
//! assert_eq!(round_off.paise(), 22);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

/// Basis-point denominator (10000 bps = 100% = 1.0×).
pub const BPS_DENOMINATOR: i64 = 10_000;

/// A monetary value in paise (1/100 rupee).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for losses and round-off
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serialized as a bare integer**: the frontend receives paise
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees.
    ///
    /// ```rust
    /// use navratna_core::money::Money;
    /// assert_eq!(Money::from_rupees(250).paise(), 25_000);
    /// ```
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * 100)
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion (truncated toward zero).
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Calculates tax at the given rate.
    ///
    /// Integer math with half-up rounding:
    /// `(amount × bps + 5000) / 10000`.
    ///
    /// ```rust
    /// use navratna_core::money::Money;
    /// use navratna_core::types::TaxRate;
    ///
    /// // ₹1,000.00 at 1.5% = ₹15.00
    /// let tax = Money::from_rupees(1_000).calculate_tax(TaxRate::from_bps(150));
    /// assert_eq!(tax.paise(), 1_500);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        self.apply_bps(rate.bps() as i64)
    }

    /// Multiplies by a basis-point factor with half-up rounding.
    ///
    /// `apply_bps(15000)` is ×1.5, `apply_bps(250)` is 2.5% of the amount.
    /// Rounds half away from zero so that negative amounts mirror positive ones.
    pub fn apply_bps(&self, bps: i64) -> Money {
        let product = self.0 as i128 * bps as i128;
        let half = (BPS_DENOMINATOR / 2) as i128;
        let rounded = if product >= 0 {
            (product + half) / BPS_DENOMINATOR as i128
        } else {
            (product - half) / BPS_DENOMINATOR as i128
        };
        Money(rounded as i64)
    }

    /// Multiplies by a fractional quantity (carats), rounding to the paisa.
    ///
    /// Carat weights are decimals; this is the single place where a float
    /// enters money arithmetic, and the result is immediately rounded.
    pub fn multiply_carat(&self, carat: f64) -> Money {
        Money((self.0 as f64 * carat).round() as i64)
    }

    /// Multiplies money by an integer quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Applies a percentage discount and returns the discounted amount.
    ///
    /// ```rust
    /// use navratna_core::money::Money;
    /// let discounted = Money::from_rupees(100).apply_percentage_discount(1000);
    /// assert_eq!(discounted.paise(), 9_000);
    /// ```
    pub fn apply_percentage_discount(&self, discount_bps: u32) -> Money {
        *self - self.apply_bps(discount_bps as i64)
    }

    /// Rounds to the nearest whole rupee (half up, away from zero).
    ///
    /// ## Returns
    /// `(rounded, round_off)` where `rounded = self + round_off`.
    /// `round_off` is what the invoice prints on its "Rounded off" line.
    pub fn round_to_rupee(&self) -> (Money, Money) {
        let remainder = self.0 % 100;
        let rounded = if remainder >= 50 {
            self.0 - remainder + 100
        } else if remainder <= -50 {
            self.0 - remainder - 100
        } else {
            self.0 - remainder
        };
        (Money(rounded), Money(rounded - self.0))
    }

    /// Formats the amount with Indian digit grouping and no currency symbol.
    ///
    /// ```rust
    /// use navratna_core::money::Money;
    /// assert_eq!(Money::from_paise(12_34_56_789_00).format_indian(), "12,34,56,789.00");
    /// ```
    pub fn format_indian(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!(
            "{}{}.{:02}",
            sign,
            group_indian(self.rupees().unsigned_abs()),
            self.paise_part()
        )
    }
}

/// Groups digits the Indian way: last three, then pairs (12,34,56,789).
pub fn group_indian(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// Display shows rupees with Indian grouping, e.g. `₹1,23,456.78`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}₹{}.{:02}",
            sign,
            group_indian(self.rupees().unsigned_abs()),
            self.paise_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paise() {
        let money = Money::from_paise(1099);
        assert_eq!(money.paise(), 1099);
        assert_eq!(money.rupees(), 10);
        assert_eq!(money.paise_part(), 99);
    }

    #[test]
    fn test_display_indian_grouping() {
        assert_eq!(Money::from_paise(1099).to_string(), "₹10.99");
        assert_eq!(Money::from_rupees(1_000).to_string(), "₹1,000.00");
        assert_eq!(Money::from_rupees(1_00_000).to_string(), "₹1,00,000.00");
        assert_eq!(Money::from_rupees(12_34_56_789).to_string(), "₹12,34,56,789.00");
        assert_eq!(Money::from_paise(-550).to_string(), "-₹5.50");
        assert_eq!(Money::zero().to_string(), "₹0.00");
    }

    #[test]
    fn test_group_indian() {
        assert_eq!(group_indian(0), "0");
        assert_eq!(group_indian(999), "999");
        assert_eq!(group_indian(1_000), "1,000");
        assert_eq!(group_indian(99_999), "99,999");
        assert_eq!(group_indian(1_00_000), "1,00,000");
        assert_eq!(group_indian(1_00_00_000), "1,00,00,000");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_paise(1000);
        let b = Money::from_paise(500);

        assert_eq!((a + b).paise(), 1500);
        assert_eq!((a - b).paise(), 500);
        assert_eq!((a * 3).paise(), 3000);
        assert_eq!((-a).paise(), -1000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.paise(), 2000);
    }

    #[test]
    fn test_tax_calculation_with_rounding() {
        // ₹10.00 at 0.25% = 2.5 paise → 3 paise
        let tax = Money::from_paise(1000).calculate_tax(TaxRate::from_bps(25));
        assert_eq!(tax.paise(), 3);

        // ₹10.00 at 3% = 30 paise exactly
        let tax = Money::from_paise(1000).calculate_tax(TaxRate::from_bps(300));
        assert_eq!(tax.paise(), 30);
    }

    #[test]
    fn test_apply_bps_negative_mirrors_positive() {
        assert_eq!(Money::from_paise(15).apply_bps(5000).paise(), 8);
        assert_eq!(Money::from_paise(-15).apply_bps(5000).paise(), -8);
    }

    #[test]
    fn test_multiply_carat() {
        // ₹45,000/ct × 3.37 ct
        let value = Money::from_rupees(45_000).multiply_carat(3.37);
        assert_eq!(value.paise(), 1_51_650_00);
    }

    #[test]
    fn test_round_to_rupee() {
        let (rounded, off) = Money::from_paise(12_349).round_to_rupee();
        assert_eq!(rounded.paise(), 12_300);
        assert_eq!(off.paise(), -49);

        let (rounded, off) = Money::from_paise(12_350).round_to_rupee();
        assert_eq!(rounded.paise(), 12_400);
        assert_eq!(off.paise(), 50);

        let (rounded, off) = Money::from_paise(12_300).round_to_rupee();
        assert_eq!(rounded.paise(), 12_300);
        assert!(off.is_zero());

        let (rounded, off) = Money::from_paise(-12_350).round_to_rupee();
        assert_eq!(rounded.paise(), -12_400);
        assert_eq!(off.paise(), -50);
    }

    #[test]
    fn test_percentage_discount() {
        let discounted = Money::from_rupees(100).apply_percentage_discount(1000);
        assert_eq!(discounted.paise(), 9000);
    }
}
