//! # Valuation Calculator
//!
//! Estimates the market value of a stone from fixed multiplier tables.
//!
//! ## Formula
//! ```text
//! value   = base_per_carat(gem) × carat
//!           × size_multiplier(carat)
//!           × grade_multiplier(grade)
//!           × origin_multiplier(origin)
//!           × (1 + market_trend(gem))
//! premium = value × 10%            (only when certified)
//! result  = value + premium,  range = result ± 10%
//! ```
//!
//! Every multiplier is in basis points (10000 = 1.0×), so the whole
//! calculation stays in integer paise apart from the carat weight.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, BPS_DENOMINATOR};
use crate::types::QualityGrade;
use crate::validation::validate_carat;

// =============================================================================
// Gem Profiles
// =============================================================================

/// Static market data for one gem type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GemProfile {
    pub name: &'static str,
    pub base_per_carat_rupees: i64,
    /// Year-on-year price movement in basis points.
    pub market_trend_bps: i64,
}

pub const GEM_PROFILES: [GemProfile; 9] = [
    GemProfile { name: "Ruby", base_per_carat_rupees: 50_000, market_trend_bps: 800 },
    GemProfile { name: "Pearl", base_per_carat_rupees: 5_000, market_trend_bps: 300 },
    GemProfile { name: "Red Coral", base_per_carat_rupees: 3_000, market_trend_bps: 200 },
    GemProfile { name: "Emerald", base_per_carat_rupees: 40_000, market_trend_bps: 500 },
    GemProfile { name: "Yellow Sapphire", base_per_carat_rupees: 35_000, market_trend_bps: 1_000 },
    GemProfile { name: "Diamond", base_per_carat_rupees: 1_50_000, market_trend_bps: -200 },
    GemProfile { name: "Blue Sapphire", base_per_carat_rupees: 60_000, market_trend_bps: 1_200 },
    GemProfile { name: "Hessonite", base_per_carat_rupees: 4_000, market_trend_bps: 400 },
    GemProfile { name: "Cat's Eye", base_per_carat_rupees: 15_000, market_trend_bps: 600 },
];

/// Trade and vernacular names mapped to the canonical gem type.
const GEM_ALIASES: [(&str, &str); 10] = [
    ("manik", "Ruby"),
    ("moti", "Pearl"),
    ("coral", "Red Coral"),
    ("moonga", "Red Coral"),
    ("panna", "Emerald"),
    ("pukhraj", "Yellow Sapphire"),
    ("neelam", "Blue Sapphire"),
    ("gomed", "Hessonite"),
    ("lehsunia", "Cat's Eye"),
    ("cats eye", "Cat's Eye"),
];

/// Finds the profile for a gem type (case-insensitive, aliases accepted).
pub fn gem_profile(gem_type: &str) -> CoreResult<&'static GemProfile> {
    let needle = gem_type.trim().to_lowercase();

    let canonical = GEM_ALIASES
        .iter()
        .find(|(alias, _)| *alias == needle)
        .map(|(_, name)| name.to_lowercase())
        .unwrap_or(needle);

    GEM_PROFILES
        .iter()
        .find(|p| p.name.to_lowercase() == canonical)
        .ok_or_else(|| CoreError::UnknownGemType(gem_type.trim().to_string()))
}

// =============================================================================
// Multiplier Tables
// =============================================================================

/// Larger stones are disproportionately rarer.
pub fn size_multiplier_bps(carat: f64) -> i64 {
    match carat {
        c if c < 1.0 => 8_000,
        c if c < 3.0 => 10_000,
        c if c < 5.0 => 12_000,
        c if c < 10.0 => 15_000,
        _ => 20_000,
    }
}

pub fn grade_multiplier_bps(grade: QualityGrade) -> i64 {
    match grade {
        QualityGrade::Aaa => 25_000,
        QualityGrade::Aa => 18_000,
        QualityGrade::A => 12_000,
        QualityGrade::B => 8_000,
        QualityGrade::Commercial => 5_000,
    }
}

const ORIGIN_MULTIPLIERS: [(&str, i64); 12] = [
    ("kashmir", 20_000),
    ("burma", 15_000),
    ("myanmar", 15_000),
    ("colombia", 14_000),
    ("ceylon", 13_000),
    ("sri lanka", 13_000),
    ("basra", 13_000),
    ("zambia", 11_000),
    ("brazil", 10_000),
    ("africa", 10_000),
    ("thailand", 9_000),
    ("synthetic", 2_000),
];

/// Origin premium; unknown origins are neutral (1.0×).
pub fn origin_multiplier_bps(origin: &str) -> i64 {
    let origin = origin.trim().to_lowercase();
    ORIGIN_MULTIPLIERS
        .iter()
        .find(|(name, _)| origin.contains(name))
        .map(|(_, bps)| *bps)
        .unwrap_or(BPS_DENOMINATOR)
}

/// Premium for a lab certificate.
pub const CERTIFICATION_PREMIUM_BPS: i64 = 1_000;

/// Half-width of the reported value range.
pub const RANGE_BPS: i64 = 1_000;

// =============================================================================
// Estimate
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ValuationRequest {
    pub gem_type: String,
    pub carat: f64,
    #[serde(default)]
    pub quality_grade: QualityGrade,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub certified: bool,
}

/// An estimate with every factor that went into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Valuation {
    pub gem_type: String,
    pub carat: f64,
    pub base_per_carat_paise: i64,
    pub size_multiplier_bps: i64,
    pub grade_multiplier_bps: i64,
    pub origin_multiplier_bps: i64,
    pub market_trend_bps: i64,
    pub certification_premium_paise: i64,
    pub estimated_value_paise: i64,
    pub per_carat_paise: i64,
    pub low_paise: i64,
    pub high_paise: i64,
}

impl Valuation {
    #[inline]
    pub fn estimated_value(&self) -> Money {
        Money::from_paise(self.estimated_value_paise)
    }
}

/// Estimates the value of a stone.
///
/// ```rust
/// use navratna_core::types::QualityGrade;
/// use navratna_core::valuation::{estimate, ValuationRequest};
///
/// let v = estimate(&ValuationRequest {
///     gem_type: "Ruby".into(),
///     carat: 2.0,
///     quality_grade: QualityGrade::A,
///     origin: "Unknown".into(),
///     certified: false,
/// })
/// .unwrap();
/// // ₹50,000 × 2 × 1.0 × 1.2 × 1.0 × 1.08
/// assert_eq!(v.estimated_value_paise, 1_29_600_00);
/// ```
pub fn estimate(request: &ValuationRequest) -> CoreResult<Valuation> {
    validate_carat(request.carat)?;
    let profile = gem_profile(&request.gem_type)?;

    let size = size_multiplier_bps(request.carat);
    let grade = grade_multiplier_bps(request.quality_grade);
    let origin = origin_multiplier_bps(&request.origin);

    let base = Money::from_rupees(profile.base_per_carat_rupees);
    let value = base
        .multiply_carat(request.carat)
        .apply_bps(size)
        .apply_bps(grade)
        .apply_bps(origin)
        .apply_bps(BPS_DENOMINATOR + profile.market_trend_bps);

    let premium = if request.certified {
        value.apply_bps(CERTIFICATION_PREMIUM_BPS)
    } else {
        Money::zero()
    };
    let total = value + premium;

    Ok(Valuation {
        gem_type: profile.name.to_string(),
        carat: request.carat,
        base_per_carat_paise: base.paise(),
        size_multiplier_bps: size,
        grade_multiplier_bps: grade,
        origin_multiplier_bps: origin,
        market_trend_bps: profile.market_trend_bps,
        certification_premium_paise: premium.paise(),
        estimated_value_paise: total.paise(),
        per_carat_paise: (total.paise() as f64 / request.carat).round() as i64,
        low_paise: total.apply_bps(BPS_DENOMINATOR - RANGE_BPS).paise(),
        high_paise: total.apply_bps(BPS_DENOMINATOR + RANGE_BPS).paise(),
    })
}
