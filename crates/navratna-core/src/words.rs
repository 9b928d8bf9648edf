//! # Amount in Words
//!
//! Converts amounts to words using the Indian numbering system.
//!
//! ```text
//! 12,34,56,789  →  Twelve Crore Thirty Four Lakh Fifty Six Thousand
//!                  Seven Hundred Eighty Nine
//!  ── ── ── ───
//!  │  │  │  └─ hundreds + units
//!  │  │  └──── thousand
//!  │  └─────── lakh
//!  └────────── crore (may itself exceed 99: "One Hundred Crore")
//! ```

use crate::money::Money;

const ONES: [&str; 20] = [
    "Zero", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten",
    "Eleven", "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen",
    "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

fn below_hundred(n: u64, out: &mut Vec<String>) {
    if n < 20 {
        out.push(ONES[n as usize].to_string());
    } else {
        out.push(TENS[(n / 10) as usize].to_string());
        if n % 10 != 0 {
            out.push(ONES[(n % 10) as usize].to_string());
        }
    }
}

fn below_thousand(n: u64, out: &mut Vec<String>) {
    if n >= 100 {
        out.push(ONES[(n / 100) as usize].to_string());
        out.push("Hundred".to_string());
    }
    if n % 100 != 0 {
        below_hundred(n % 100, out);
    }
}

fn push_words(mut n: u64, out: &mut Vec<String>) {
    let crore = n / 1_00_00_000;
    n %= 1_00_00_000;

    if crore > 0 {
        push_words(crore, out);
        out.push("Crore".to_string());
    }

    for (unit, label) in [(1_00_000, "Lakh"), (1_000, "Thousand")] {
        let part = n / unit;
        n %= unit;
        if part > 0 {
            below_hundred(part, out);
            out.push(label.to_string());
        }
    }

    if n > 0 {
        below_thousand(n, out);
    }
}

/// Spells out a whole number, e.g. `1_23_456` → `One Lakh Twenty Three
/// Thousand Four Hundred Fifty Six`.
pub fn number_to_words(n: u64) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }
    let mut out = Vec::new();
    push_words(n, &mut out);
    out.join(" ")
}

/// Spells out an amount the way it is printed on an invoice.
///
/// ```rust
/// use navratna_core::money::Money;
/// use navratna_core::words::amount_in_words;
///
/// assert_eq!(
///     amount_in_words(Money::from_paise(1_23_456_78)),
///     "Rupees One Lakh Twenty Three Thousand Four Hundred Fifty Six and Seventy Eight Paise Only"
/// );
/// ```
pub fn amount_in_words(amount: Money) -> String {
    let rupees = amount.rupees().unsigned_abs();
    let paise = amount.paise_part() as u64;
    let prefix = if amount.is_negative() { "Minus " } else { "" };

    if paise == 0 {
        format!("{prefix}Rupees {} Only", number_to_words(rupees))
    } else {
        format!(
            "{prefix}Rupees {} and {} Paise Only",
            number_to_words(rupees),
            number_to_words(paise)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_numbers() {
        assert_eq!(number_to_words(0), "Zero");
        assert_eq!(number_to_words(7), "Seven");
        assert_eq!(number_to_words(19), "Nineteen");
        assert_eq!(number_to_words(40), "Forty");
        assert_eq!(number_to_words(99), "Ninety Nine");
        assert_eq!(number_to_words(100), "One Hundred");
        assert_eq!(number_to_words(705), "Seven Hundred Five");
    }

    #[test]
    fn test_indian_grouping() {
        assert_eq!(number_to_words(1_000), "One Thousand");
        assert_eq!(number_to_words(1_00_000), "One Lakh");
        assert_eq!(number_to_words(10_05_010), "Ten Lakh Five Thousand Ten");
        assert_eq!(
            number_to_words(12_34_56_789),
            "Twelve Crore Thirty Four Lakh Fifty Six Thousand Seven Hundred Eighty Nine"
        );
        assert_eq!(number_to_words(150_00_00_000), "One Hundred Fifty Crore");
    }

    #[test]
    fn test_amount_in_words() {
        assert_eq!(
            amount_in_words(Money::from_rupees(2_50_000)),
            "Rupees Two Lakh Fifty Thousand Only"
        );
        assert_eq!(
            amount_in_words(Money::from_paise(5)),
            "Rupees Zero and Five Paise Only"
        );
        assert_eq!(
            amount_in_words(Money::from_paise(-1_050)),
            "Minus Rupees Ten and Fifty Paise Only"
        );
    }
}
