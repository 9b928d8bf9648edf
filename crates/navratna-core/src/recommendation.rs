//! # Recommendation Strategies
//!
//! Astrological gemstone recommendations and stone analysis, each behind
//! the [`RecommendationStrategy`] trait.
//!
//! ## Strategies
//! ```text
//! ┌──────────────────┬──────────────────┬──────────────────────────────────┐
//! │ Strategy         │ Subject          │ Output                           │
//! ├──────────────────┼──────────────────┼──────────────────────────────────┤
//! │ ZodiacStrategy   │ sign (str)       │ GemRecommendation                │
//! │                  │  └─► ruling planet ─► Navratna stone                 │
//! │ PlanetStrategy   │ planet (str)     │ GemRecommendation                │
//! │ AnalysisStrategy │ InventoryItem    │ StoneAnalysis (valuation,        │
//! │                  │                  │ demand, quality, pricing)        │
//! └──────────────────┴──────────────────┴──────────────────────────────────┘
//! ```
//!
//! Every strategy is deterministic: the same subject always yields the
//! same output.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::demand;
use crate::error::{CoreError, CoreResult};
use crate::money::{Money, BPS_DENOMINATOR};
use crate::quality;
use crate::sale::margin_bps;
use crate::types::{InventoryItem, QualityGrade, StoneStatus};
use crate::valuation::{self, gem_profile, Valuation, ValuationRequest};

/// A way of turning a subject into a recommendation.
pub trait RecommendationStrategy {
    type Subject: ?Sized;
    type Output;

    /// Short identifier reported alongside the output.
    fn name(&self) -> &'static str;

    fn recommend(&self, subject: &Self::Subject) -> CoreResult<Self::Output>;
}

/// Strategies that map a key (sign or planet) to a gemstone.
pub type GemStrategy =
    dyn RecommendationStrategy<Subject = str, Output = GemRecommendation> + Send + Sync;

// =============================================================================
// Navratna Table
// =============================================================================

/// One planet of the Navagraha and its stone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetGem {
    pub planet: &'static str,
    pub gem: &'static str,
    pub substitutes: &'static [&'static str],
    pub metal: &'static str,
    pub finger: &'static str,
    pub day: &'static str,
    pub min_carat: f64,
}

pub const NAVRATNA: [PlanetGem; 9] = [
    PlanetGem {
        planet: "Sun",
        gem: "Ruby",
        substitutes: &["Red Garnet", "Red Spinel"],
        metal: "Gold",
        finger: "Ring",
        day: "Sunday",
        min_carat: 3.0,
    },
    PlanetGem {
        planet: "Moon",
        gem: "Pearl",
        substitutes: &["Moonstone"],
        metal: "Silver",
        finger: "Little",
        day: "Monday",
        min_carat: 4.0,
    },
    PlanetGem {
        planet: "Mars",
        gem: "Red Coral",
        substitutes: &["Carnelian"],
        metal: "Gold",
        finger: "Ring",
        day: "Tuesday",
        min_carat: 6.0,
    },
    PlanetGem {
        planet: "Mercury",
        gem: "Emerald",
        substitutes: &["Peridot", "Green Tourmaline"],
        metal: "Gold",
        finger: "Little",
        day: "Wednesday",
        min_carat: 3.0,
    },
    PlanetGem {
        planet: "Jupiter",
        gem: "Yellow Sapphire",
        substitutes: &["Citrine", "Yellow Topaz"],
        metal: "Gold",
        finger: "Index",
        day: "Thursday",
        min_carat: 3.0,
    },
    PlanetGem {
        planet: "Venus",
        gem: "Diamond",
        substitutes: &["White Sapphire", "Zircon"],
        metal: "Platinum",
        finger: "Middle",
        day: "Friday",
        min_carat: 0.5,
    },
    PlanetGem {
        planet: "Saturn",
        gem: "Blue Sapphire",
        substitutes: &["Amethyst", "Iolite"],
        metal: "Silver",
        finger: "Middle",
        day: "Saturday",
        min_carat: 3.0,
    },
    PlanetGem {
        planet: "Rahu",
        gem: "Hessonite",
        substitutes: &["Orange Zircon"],
        metal: "Silver",
        finger: "Middle",
        day: "Saturday",
        min_carat: 5.0,
    },
    PlanetGem {
        planet: "Ketu",
        gem: "Cat's Eye",
        substitutes: &["Tiger's Eye"],
        metal: "Silver",
        finger: "Little",
        day: "Tuesday",
        min_carat: 3.0,
    },
];

/// `(western name, vedic name, ruling planet)`
pub const ZODIAC_SIGNS: [(&str, &str, &str); 12] = [
    ("Aries", "Mesh", "Mars"),
    ("Taurus", "Vrishabh", "Venus"),
    ("Gemini", "Mithun", "Mercury"),
    ("Cancer", "Kark", "Moon"),
    ("Leo", "Simha", "Sun"),
    ("Virgo", "Kanya", "Mercury"),
    ("Libra", "Tula", "Venus"),
    ("Scorpio", "Vrishchik", "Mars"),
    ("Sagittarius", "Dhanu", "Jupiter"),
    ("Capricorn", "Makar", "Saturn"),
    ("Aquarius", "Kumbh", "Saturn"),
    ("Pisces", "Meen", "Jupiter"),
];

pub fn planet_gem(planet: &str) -> CoreResult<&'static PlanetGem> {
    let planet = planet.trim();
    NAVRATNA
        .iter()
        .find(|p| p.planet.eq_ignore_ascii_case(planet))
        .ok_or_else(|| CoreError::UnknownAstrologicalKey {
            kind: "planet".to_string(),
            value: planet.to_string(),
        })
}

/// Resolves a sign by western or vedic name to `(western name, planet)`.
pub fn ruling_planet(sign: &str) -> CoreResult<(&'static str, &'static str)> {
    let sign = sign.trim();
    ZODIAC_SIGNS
        .iter()
        .find(|(western, vedic, _)| {
            western.eq_ignore_ascii_case(sign) || vedic.eq_ignore_ascii_case(sign)
        })
        .map(|(western, _, planet)| (*western, *planet))
        .ok_or_else(|| CoreError::UnknownAstrologicalKey {
            kind: "zodiac sign".to_string(),
            value: sign.to_string(),
        })
}

// =============================================================================
// Gem Recommendation
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GemRecommendation {
    pub strategy: String,
    pub zodiac_sign: Option<String>,
    pub planet: String,
    pub primary_stone: String,
    pub substitutes: Vec<String>,
    pub metal: String,
    pub finger: String,
    pub day: String,
    pub min_carat: f64,
    pub reasoning: Vec<String>,
}

impl GemRecommendation {
    fn from_planet(strategy: &str, sign: Option<&str>, entry: &PlanetGem) -> Self {
        let mut reasoning = Vec::new();
        if let Some(sign) = sign {
            reasoning.push(format!("{sign} is ruled by {}", entry.planet));
        }
        reasoning.push(format!("{} is the Navratna stone of {}", entry.gem, entry.planet));
        reasoning.push(format!(
            "Wear at least {:.1} ct set in {} on the {} finger, first on a {}",
            entry.min_carat,
            entry.metal.to_lowercase(),
            entry.finger.to_lowercase(),
            entry.day
        ));

        GemRecommendation {
            strategy: strategy.to_string(),
            zodiac_sign: sign.map(str::to_string),
            planet: entry.planet.to_string(),
            primary_stone: entry.gem.to_string(),
            substitutes: entry.substitutes.iter().map(|s| s.to_string()).collect(),
            metal: entry.metal.to_string(),
            finger: entry.finger.to_string(),
            day: entry.day.to_string(),
            min_carat: entry.min_carat,
            reasoning,
        }
    }
}

/// Sign → ruling planet → stone.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZodiacStrategy;

impl RecommendationStrategy for ZodiacStrategy {
    type Subject = str;
    type Output = GemRecommendation;

    fn name(&self) -> &'static str {
        "zodiac"
    }

    fn recommend(&self, sign: &str) -> CoreResult<GemRecommendation> {
        let (sign, planet) = ruling_planet(sign)?;
        let entry = planet_gem(planet)?;
        Ok(GemRecommendation::from_planet(self.name(), Some(sign), entry))
    }
}

/// Planet → stone.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanetStrategy;

impl RecommendationStrategy for PlanetStrategy {
    type Subject = str;
    type Output = GemRecommendation;

    fn name(&self) -> &'static str {
        "planet"
    }

    fn recommend(&self, planet: &str) -> CoreResult<GemRecommendation> {
        let entry = planet_gem(planet)?;
        Ok(GemRecommendation::from_planet(self.name(), None, entry))
    }
}

/// In-stock stones that fit a recommendation.
///
/// Primary stones at or above the minimum weight come first, then
/// substitutes. Within each group: better grade, then heavier.
pub fn match_inventory<'a>(
    rec: &GemRecommendation,
    items: &'a [InventoryItem],
) -> Vec<&'a InventoryItem> {
    let is_primary = |item: &InventoryItem| {
        gem_profile(&item.gem_type)
            .map(|p| p.name == rec.primary_stone)
            .unwrap_or(false)
    };
    let is_substitute = |item: &InventoryItem| {
        rec.substitutes
            .iter()
            .any(|s| s.eq_ignore_ascii_case(item.gem_type.trim()))
    };
    let grade_rank = |grade: QualityGrade| {
        QualityGrade::ALL
            .iter()
            .position(|g| *g == grade)
            .unwrap_or(QualityGrade::ALL.len())
    };

    let mut matches: Vec<(bool, &InventoryItem)> = items
        .iter()
        .filter(|item| item.status == StoneStatus::InStock)
        .filter_map(|item| {
            if is_primary(item) && item.carat >= rec.min_carat {
                Some((true, item))
            } else if is_substitute(item) {
                Some((false, item))
            } else {
                None
            }
        })
        .collect();

    matches.sort_by(|(a_primary, a), (b_primary, b)| {
        b_primary
            .cmp(a_primary)
            .then_with(|| grade_rank(a.quality_grade).cmp(&grade_rank(b.quality_grade)))
            .then_with(|| b.carat.total_cmp(&a.carat))
    });

    matches.into_iter().map(|(_, item)| item).collect()
}

// =============================================================================
// Stone Analysis
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PricingVerdict {
    Underpriced,
    Fair,
    Overpriced,
    /// No reference valuation for this gem type.
    Unrated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StoneAnalysis {
    pub strategy: String,
    pub stone_code: String,
    pub valuation: Option<Valuation>,
    /// Listed price relative to the estimate (positive = above estimate).
    pub price_vs_estimate_bps: Option<i64>,
    pub verdict: PricingVerdict,
    pub margin_bps: i64,
    pub quality_score: i64,
    pub demand_index: i64,
    pub peak_month: String,
    pub planet: Option<String>,
    pub summary: Vec<String>,
}

/// Market, quality and pricing commentary for a stone in stock.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisStrategy {
    /// Month (1-12) used for the demand reading.
    pub month: u32,
}

impl AnalysisStrategy {
    pub fn new(month: u32) -> Self {
        AnalysisStrategy { month }
    }
}

/// Pricing band around the estimate considered fair.
const FAIR_BAND_BPS: i64 = 1_500;

impl RecommendationStrategy for AnalysisStrategy {
    type Subject = InventoryItem;
    type Output = StoneAnalysis;

    fn name(&self) -> &'static str {
        "analysis"
    }

    fn recommend(&self, stone: &InventoryItem) -> CoreResult<StoneAnalysis> {
        let valuation = valuation::estimate(&ValuationRequest {
            gem_type: stone.gem_type.clone(),
            carat: stone.carat,
            quality_grade: stone.quality_grade,
            origin: stone.origin.clone(),
            certified: stone.is_certified(),
        });
        let valuation = match valuation {
            Ok(v) => Some(v),
            Err(CoreError::UnknownGemType(_)) => None,
            Err(e) => return Err(e),
        };

        let price_vs_estimate_bps = valuation
            .as_ref()
            .filter(|v| v.estimated_value_paise > 0)
            .map(|v| {
                ((stone.selling_price_paise - v.estimated_value_paise) as i128
                    * BPS_DENOMINATOR as i128
                    / v.estimated_value_paise as i128) as i64
            });
        let verdict = match price_vs_estimate_bps {
            None => PricingVerdict::Unrated,
            Some(d) if d < -FAIR_BAND_BPS => PricingVerdict::Underpriced,
            Some(d) if d > FAIR_BAND_BPS => PricingVerdict::Overpriced,
            Some(_) => PricingVerdict::Fair,
        };

        let margin = margin_bps(stone.purchase_price(), stone.selling_price());
        let quality_score = quality::score(&quality::QualityStone::from(stone)).total;
        let forecast = demand::forecast(&stone.gem_type);
        let demand_index = forecast
            .months
            .iter()
            .find(|m| m.month == self.month)
            .map(|m| m.index)
            .unwrap_or(demand::BASELINE_INDEX);
        let planet = gem_profile(&stone.gem_type).ok().and_then(|p| {
            NAVRATNA
                .iter()
                .find(|n| n.gem == p.name)
                .map(|n| n.planet.to_string())
        });

        let mut summary = Vec::new();
        if let Some(v) = &valuation {
            summary.push(format!(
                "Estimated at {} ({} to {})",
                v.estimated_value(),
                Money::from_paise(v.low_paise),
                Money::from_paise(v.high_paise)
            ));
        }
        summary.push(match verdict {
            PricingVerdict::Underpriced => {
                "Listed below the estimate; room to raise the price".to_string()
            }
            PricingVerdict::Overpriced => {
                "Listed above the estimate; expect negotiation".to_string()
            }
            PricingVerdict::Fair => "Listed close to the estimate".to_string(),
            PricingVerdict::Unrated => format!("No reference prices for {}", stone.gem_type),
        });
        summary.push(format!(
            "Margin {:.1}% on a quality score of {quality_score}/100",
            margin as f64 / 100.0
        ));
        summary.push(if demand_index >= 110 {
            format!("Demand is strong this month (index {demand_index})")
        } else if demand_index < 90 {
            format!(
                "Demand is soft this month (index {demand_index}); peaks in {}",
                forecast.peak_label
            )
        } else {
            format!("Demand is steady this month (index {demand_index})")
        });
        if let Some(planet) = &planet {
            summary.push(format!("Recommended for clients seeking the blessings of {planet}"));
        }

        Ok(StoneAnalysis {
            strategy: self.name().to_string(),
            stone_code: stone.stone_code.clone(),
            valuation,
            price_vs_estimate_bps,
            verdict,
            margin_bps: margin,
            quality_score,
            demand_index,
            peak_month: forecast.peak_label,
            planet,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InventoryInput;
    use chrono::Utc;

    fn item(gem: &str, carat: f64, grade: QualityGrade, status: StoneStatus) -> InventoryItem {
        InventoryItem::new(
            InventoryInput {
                stone_code: "STN-0001".to_string(),
                gem_type: gem.to_string(),
                carat,
                origin: "Ceylon".to_string(),
                shape: None,
                color: None,
                clarity: None,
                quality_grade: grade,
                certification_lab: None,
                certificate_file: None,
                purchase_price_paise: 1_00_000_00,
                selling_price_paise: 1_50_000_00,
                status,
                tags: vec![],
                supplier_id: None,
                notes: None,
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_zodiac_strategy() {
        let rec = ZodiacStrategy.recommend("leo").unwrap();
        assert_eq!(rec.planet, "Sun");
        assert_eq!(rec.primary_stone, "Ruby");
        assert_eq!(rec.zodiac_sign.as_deref(), Some("Leo"));

        let rec = ZodiacStrategy.recommend("Dhanu").unwrap();
        assert_eq!(rec.primary_stone, "Yellow Sapphire");
        assert_eq!(rec.finger, "Index");
    }

    #[test]
    fn test_planet_strategy_and_unknown_keys() {
        let rec = PlanetStrategy.recommend("Saturn").unwrap();
        assert_eq!(rec.primary_stone, "Blue Sapphire");
        assert_eq!(rec.strategy, "planet");

        assert!(matches!(
            PlanetStrategy.recommend("Pluto"),
            Err(CoreError::UnknownAstrologicalKey { .. })
        ));
        assert!(ZodiacStrategy.recommend("Ophiuchus").is_err());
    }

    #[test]
    fn test_strategies_are_interchangeable() {
        let zodiac: Box<GemStrategy> = Box::new(ZodiacStrategy);
        let planet: Box<GemStrategy> = Box::new(PlanetStrategy);
        for (strategy, key) in [(zodiac, "Cancer"), (planet, "Moon")] {
            assert_eq!(strategy.recommend(key).unwrap().primary_stone, "Pearl");
        }
    }

    #[test]
    fn test_match_inventory_orders_primary_first() {
        let rec = PlanetStrategy.recommend("Sun").unwrap();
        let items = vec![
            item("Red Garnet", 5.0, QualityGrade::Aaa, StoneStatus::InStock),
            item("Ruby", 3.5, QualityGrade::A, StoneStatus::InStock),
            item("Ruby", 4.0, QualityGrade::Aa, StoneStatus::InStock),
            item("Ruby", 2.0, QualityGrade::Aaa, StoneStatus::InStock),
            item("Ruby", 6.0, QualityGrade::Aaa, StoneStatus::Sold),
        ];
        let found = match_inventory(&rec, &items);
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].carat, 4.0);
        assert_eq!(found[1].carat, 3.5);
        assert_eq!(found[2].gem_type, "Red Garnet");
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let stone = item("Blue Sapphire", 3.0, QualityGrade::Aa, StoneStatus::InStock);
        let strategy = AnalysisStrategy::new(11);
        let a = strategy.recommend(&stone).unwrap();
        let b = strategy.recommend(&stone).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.planet.as_deref(), Some("Saturn"));
        assert_eq!(a.margin_bps, 3_333);
        assert_eq!(a.demand_index, 115);
        assert!(a.valuation.is_some());
    }

    #[test]
    fn test_analysis_of_unrated_gem() {
        let stone = item("Tanzanite", 2.0, QualityGrade::A, StoneStatus::InStock);
        let a = AnalysisStrategy::new(6).recommend(&stone).unwrap();
        assert_eq!(a.verdict, PricingVerdict::Unrated);
        assert!(a.valuation.is_none());
        assert!(a.planet.is_none());
    }
}
