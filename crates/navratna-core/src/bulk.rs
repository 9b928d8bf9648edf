//! # Bulk Purchase
//!
//! Quotes for buying a lot of stones and a budget optimizer across several
//! candidate lots.
//!
//! ## Volume Discount Tiers
//! ```text
//! ┌────────────┬──────────┐
//! │ Pieces     │ Discount │
//! ├────────────┼──────────┤
//! │ 100+       │ 15%      │
//! │ 50 - 99    │ 10%      │
//! │ 25 - 49    │  7%      │
//! │ 10 - 24    │  5%      │
//! │ below 10   │  0%      │
//! └────────────┴──────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::{Money, BPS_DENOMINATOR};
use crate::validation::{validate_amount_paise, validate_carat};

/// `(minimum pieces, discount bps)`, highest tier first.
pub const VOLUME_DISCOUNT_TIERS: [(u32, i64); 4] =
    [(100, 1_500), (50, 1_000), (25, 700), (10, 500)];

/// Default resale markup over the list price (30%).
pub const DEFAULT_MARKUP_BPS: i64 = 3_000;

pub fn volume_discount_bps(quantity: u32) -> i64 {
    VOLUME_DISCOUNT_TIERS
        .iter()
        .find(|(min, _)| quantity >= *min)
        .map(|(_, bps)| *bps)
        .unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum DealRating {
    #[serde(rename = "Excellent Deal")]
    Excellent,
    #[serde(rename = "Good Deal")]
    Good,
    #[serde(rename = "Fair Deal")]
    Fair,
    #[serde(rename = "Poor Deal")]
    Poor,
}

impl DealRating {
    pub fn from_roi_bps(roi_bps: i64) -> Self {
        match roi_bps {
            r if r >= 4_000 => DealRating::Excellent,
            r if r >= 2_500 => DealRating::Good,
            r if r >= 1_000 => DealRating::Fair,
            _ => DealRating::Poor,
        }
    }
}

fn ratio_bps(numerator: Money, denominator: Money) -> i64 {
    if !denominator.is_positive() {
        return 0;
    }
    (numerator.paise() as i128 * BPS_DENOMINATOR as i128 / denominator.paise() as i128) as i64
}

fn validate_quantity(field: &str, quantity: u32) -> Result<(), ValidationError> {
    if quantity == 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Quote
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BulkQuoteRequest {
    #[serde(default)]
    pub gem_type: Option<String>,
    pub quantity: u32,
    pub carat_per_piece: f64,
    pub price_per_carat_paise: i64,
    #[serde(default = "default_markup")]
    pub markup_bps: i64,
}

fn default_markup() -> i64 {
    DEFAULT_MARKUP_BPS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BulkQuote {
    pub quantity: u32,
    pub total_carats: f64,
    pub gross_cost_paise: i64,
    pub discount_bps: i64,
    pub discount_paise: i64,
    pub net_cost_paise: i64,
    /// List value marked up by the requested markup.
    pub expected_resale_paise: i64,
    pub expected_profit_paise: i64,
    pub roi_bps: i64,
    pub break_even_per_carat_paise: i64,
    pub recommendation: DealRating,
}

/// Prices a bulk purchase.
///
/// Resale is estimated on the undiscounted list value, so the volume
/// discount shows up as extra profit.
pub fn quote(request: &BulkQuoteRequest) -> CoreResult<BulkQuote> {
    validate_quantity("quantity", request.quantity)?;
    validate_carat(request.carat_per_piece)?;
    validate_amount_paise("pricePerCarat", request.price_per_carat_paise)?;

    let total_carats = request.carat_per_piece * request.quantity as f64;
    let gross = Money::from_paise(request.price_per_carat_paise).multiply_carat(total_carats);
    let discount_bps = volume_discount_bps(request.quantity);
    let discount = gross.apply_bps(discount_bps);
    let net = gross - discount;

    let resale = gross.apply_bps(BPS_DENOMINATOR + request.markup_bps);
    let profit = resale - net;
    let roi_bps = ratio_bps(profit, net);

    Ok(BulkQuote {
        quantity: request.quantity,
        total_carats,
        gross_cost_paise: gross.paise(),
        discount_bps,
        discount_paise: discount.paise(),
        net_cost_paise: net.paise(),
        expected_resale_paise: resale.paise(),
        expected_profit_paise: profit.paise(),
        roi_bps,
        break_even_per_carat_paise: (net.paise() as f64 / total_carats).ceil() as i64,
        recommendation: DealRating::from_roi_bps(roi_bps),
    })
}

// =============================================================================
// Budget Optimizer
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BulkCandidate {
    pub name: String,
    pub carat_per_piece: f64,
    pub price_per_carat_paise: i64,
    pub resale_per_carat_paise: i64,
    pub available_quantity: u32,
}

impl BulkCandidate {
    fn piece_cost(&self) -> Money {
        Money::from_paise(self.price_per_carat_paise).multiply_carat(self.carat_per_piece)
    }

    fn piece_resale(&self) -> Money {
        Money::from_paise(self.resale_per_carat_paise).multiply_carat(self.carat_per_piece)
    }

    fn roi_bps(&self) -> i64 {
        ratio_bps(self.piece_resale() - self.piece_cost(), self.piece_cost())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OptimizeRequest {
    pub budget_paise: i64,
    pub candidates: Vec<BulkCandidate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Allocation {
    pub name: String,
    pub quantity: u32,
    pub cost_paise: i64,
    pub expected_profit_paise: i64,
    pub roi_bps: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OptimizePlan {
    pub allocations: Vec<Allocation>,
    pub total_cost_paise: i64,
    pub expected_profit_paise: i64,
    pub remaining_budget_paise: i64,
}

/// Spends a budget across candidate lots, best return first.
///
/// Candidates that would not make money are skipped. Each candidate is
/// bought up to its available quantity or what the remaining budget covers.
pub fn optimize(request: &OptimizeRequest) -> CoreResult<OptimizePlan> {
    validate_amount_paise("budget", request.budget_paise)?;
    for candidate in &request.candidates {
        validate_carat(candidate.carat_per_piece)?;
        validate_amount_paise("pricePerCarat", candidate.price_per_carat_paise)?;
        validate_amount_paise("resalePerCarat", candidate.resale_per_carat_paise)?;
    }

    let mut ranked: Vec<&BulkCandidate> = request
        .candidates
        .iter()
        .filter(|c| c.piece_cost().is_positive() && c.piece_resale() > c.piece_cost())
        .collect();
    ranked.sort_by(|a, b| {
        b.roi_bps()
            .cmp(&a.roi_bps())
            .then_with(|| a.piece_cost().cmp(&b.piece_cost()))
    });

    let mut remaining = Money::from_paise(request.budget_paise);
    let mut allocations = Vec::new();

    for candidate in ranked {
        let piece_cost = candidate.piece_cost();
        let affordable = (remaining.paise() / piece_cost.paise()).max(0);
        let quantity = affordable.min(candidate.available_quantity as i64);
        if quantity == 0 {
            continue;
        }

        let cost = piece_cost.multiply_quantity(quantity);
        let profit = (candidate.piece_resale() - piece_cost).multiply_quantity(quantity);
        remaining -= cost;

        allocations.push(Allocation {
            name: candidate.name.clone(),
            quantity: quantity as u32,
            cost_paise: cost.paise(),
            expected_profit_paise: profit.paise(),
            roi_bps: candidate.roi_bps(),
        });
    }

    Ok(OptimizePlan {
        total_cost_paise: allocations.iter().map(|a| a.cost_paise).sum(),
        expected_profit_paise: allocations.iter().map(|a| a.expected_profit_paise).sum(),
        remaining_budget_paise: remaining.paise(),
        allocations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_discount_tiers() {
        assert_eq!(volume_discount_bps(1), 0);
        assert_eq!(volume_discount_bps(10), 500);
        assert_eq!(volume_discount_bps(49), 700);
        assert_eq!(volume_discount_bps(100), 1_500);
        assert_eq!(volume_discount_bps(5_000), 1_500);
    }

    #[test]
    fn test_quote() {
        // 50 pieces × 2 ct × ₹1,000/ct = ₹1,00,000 list, 10% off
        let q = quote(&BulkQuoteRequest {
            gem_type: Some("Hessonite".to_string()),
            quantity: 50,
            carat_per_piece: 2.0,
            price_per_carat_paise: 1_000_00,
            markup_bps: 3_000,
        })
        .unwrap();

        assert_eq!(q.total_carats, 100.0);
        assert_eq!(q.gross_cost_paise, 1_00_000_00);
        assert_eq!(q.discount_paise, 10_000_00);
        assert_eq!(q.net_cost_paise, 90_000_00);
        assert_eq!(q.expected_resale_paise, 1_30_000_00);
        assert_eq!(q.expected_profit_paise, 40_000_00);
        assert_eq!(q.roi_bps, 4_444);
        assert_eq!(q.break_even_per_carat_paise, 900_00);
        assert_eq!(q.recommendation, DealRating::Excellent);
    }

    #[test]
    fn test_quote_rejects_zero_quantity() {
        let err = quote(&BulkQuoteRequest {
            gem_type: None,
            quantity: 0,
            carat_per_piece: 1.0,
            price_per_carat_paise: 100,
            markup_bps: 0,
        });
        assert!(err.is_err());
    }

    fn candidate(name: &str, price: i64, resale: i64, available: u32) -> BulkCandidate {
        BulkCandidate {
            name: name.to_string(),
            carat_per_piece: 1.0,
            price_per_carat_paise: price,
            resale_per_carat_paise: resale,
            available_quantity: available,
        }
    }

    #[test]
    fn test_optimize_prefers_roi_within_budget() {
        let plan = optimize(&OptimizeRequest {
            budget_paise: 10_000_00,
            candidates: vec![
                candidate("coral", 1_000_00, 1_200_00, 100), // 20%
                candidate("gomed", 2_000_00, 3_000_00, 3),   // 50%
                candidate("loss", 1_000_00, 900_00, 100),
            ],
        })
        .unwrap();

        assert_eq!(plan.allocations.len(), 2);
        assert_eq!(plan.allocations[0].name, "gomed");
        assert_eq!(plan.allocations[0].quantity, 3);
        assert_eq!(plan.allocations[1].name, "coral");
        assert_eq!(plan.allocations[1].quantity, 4);
        assert_eq!(plan.total_cost_paise, 10_000_00);
        assert_eq!(plan.expected_profit_paise, 3_000_00 + 800_00);
        assert_eq!(plan.remaining_budget_paise, 0);
    }

    #[test]
    fn test_optimize_with_small_budget_buys_nothing() {
        let plan = optimize(&OptimizeRequest {
            budget_paise: 500_00,
            candidates: vec![candidate("ruby", 1_000_00, 2_000_00, 5)],
        })
        .unwrap();
        assert!(plan.allocations.is_empty());
        assert_eq!(plan.remaining_budget_paise, 500_00);
    }
}
