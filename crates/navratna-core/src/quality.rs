//! # Quality Comparison
//!
//! Scores stones 0-100 and ranks them side by side.
//!
//! ## Weights
//! ```text
//! colour 30 │ clarity 25 │ cut 15 │ carat 10 │ origin 10 │ certificate 10
//! ```
//! Each factor is scored 0-100 from a fixed table, then weighted.
//! Unknown descriptors score 50 (neutral).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::types::InventoryItem;
use crate::validation::validate_carat;
use crate::valuation::origin_multiplier_bps;

const WEIGHT_COLOR: i64 = 30;
const WEIGHT_CLARITY: i64 = 25;
const WEIGHT_CUT: i64 = 15;
const WEIGHT_CARAT: i64 = 10;
const WEIGHT_ORIGIN: i64 = 10;
const WEIGHT_CERTIFICATION: i64 = 10;

const NEUTRAL: i64 = 50;

/// Maximum number of stones in one comparison.
pub const MAX_COMPARE: usize = 10;

fn lookup(table: &[(&str, i64)], value: Option<&str>) -> i64 {
    let Some(value) = value.map(|v| v.trim().to_lowercase()) else {
        return NEUTRAL;
    };
    table
        .iter()
        .find(|(key, _)| value.starts_with(key))
        .map(|(_, score)| *score)
        .unwrap_or(NEUTRAL)
}

pub fn color_score(color: Option<&str>) -> i64 {
    const TABLE: [(&str, i64); 6] = [
        ("pigeon blood", 100),
        ("vivid", 100),
        ("intense", 85),
        ("medium", 65),
        ("light", 40),
        ("pale", 20),
    ];
    lookup(&TABLE, color)
}

pub fn clarity_score(clarity: Option<&str>) -> i64 {
    // "vvs" must be tried before "vs"
    const TABLE: [(&str, i64); 8] = [
        ("fl", 100),
        ("if", 100),
        ("vvs", 90),
        ("eye clean", 80),
        ("vs", 75),
        ("si", 55),
        ("included", 30),
        ("i", 30),
    ];
    lookup(&TABLE, clarity)
}

pub fn cut_score(cut: Option<&str>) -> i64 {
    const TABLE: [(&str, i64); 5] = [
        ("excellent", 100),
        ("very good", 85),
        ("good", 70),
        ("fair", 50),
        ("poor", 30),
    ];
    lookup(&TABLE, cut)
}

pub fn carat_score(carat: f64) -> i64 {
    match carat {
        c if c < 0.5 => 20,
        c if c < 1.0 => 40,
        c if c < 2.0 => 60,
        c if c < 3.0 => 75,
        c if c < 5.0 => 90,
        _ => 100,
    }
}

/// Origin score follows the valuation origin premium (2.0× caps at 100).
pub fn origin_score(origin: &str) -> i64 {
    (origin_multiplier_bps(origin) / 200).clamp(0, 100)
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct QualityStone {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub clarity: Option<String>,
    #[serde(default)]
    pub cut: Option<String>,
    pub carat: f64,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub certified: bool,
    #[serde(default)]
    pub price_paise: Option<i64>,
}

impl From<&InventoryItem> for QualityStone {
    fn from(item: &InventoryItem) -> Self {
        QualityStone {
            name: item.stone_code.clone(),
            color: item.color.clone(),
            clarity: item.clarity.clone(),
            cut: None,
            carat: item.carat,
            origin: item.origin.clone(),
            certified: item.is_certified(),
            price_paise: Some(item.selling_price_paise),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct QualityScore {
    pub name: String,
    pub rank: u32,
    pub total: i64,
    pub color: i64,
    pub clarity: i64,
    pub cut: i64,
    pub carat: i64,
    pub origin: i64,
    pub certification: i64,
    /// Price per quality point; absent without a price or with a zero score.
    pub value_per_point_paise: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct QualityReport {
    /// Sorted best score first.
    pub scores: Vec<QualityScore>,
    pub highest_quality: Option<String>,
    pub best_value: Option<String>,
}

/// Scores one stone.
pub fn score(stone: &QualityStone) -> QualityScore {
    let color = color_score(stone.color.as_deref());
    let clarity = clarity_score(stone.clarity.as_deref());
    let cut = cut_score(stone.cut.as_deref());
    let carat = carat_score(stone.carat);
    let origin = origin_score(&stone.origin);
    let certification = if stone.certified { 100 } else { 0 };

    let weighted = color * WEIGHT_COLOR
        + clarity * WEIGHT_CLARITY
        + cut * WEIGHT_CUT
        + carat * WEIGHT_CARAT
        + origin * WEIGHT_ORIGIN
        + certification * WEIGHT_CERTIFICATION;
    let total = (weighted + 50) / 100;

    let value_per_point_paise = match stone.price_paise {
        Some(price) if total > 0 => Some((price + total / 2) / total),
        _ => None,
    };

    QualityScore {
        name: stone.name.clone(),
        rank: 0,
        total,
        color,
        clarity,
        cut,
        carat,
        origin,
        certification,
        value_per_point_paise,
    }
}

/// Scores and ranks a set of stones.
///
/// Ties keep input order. Best value is the lowest price per point.
pub fn compare(stones: &[QualityStone]) -> CoreResult<QualityReport> {
    if stones.is_empty() || stones.len() > MAX_COMPARE {
        return Err(ValidationError::OutOfRange {
            field: "stones".to_string(),
            min: 1,
            max: MAX_COMPARE as i64,
        }
        .into());
    }
    for stone in stones {
        validate_carat(stone.carat)?;
    }

    let mut scores: Vec<QualityScore> = stones.iter().map(score).collect();
    scores.sort_by(|a, b| b.total.cmp(&a.total));
    for (idx, s) in scores.iter_mut().enumerate() {
        s.rank = idx as u32 + 1;
    }

    let best_value = scores
        .iter()
        .filter_map(|s| s.value_per_point_paise.map(|v| (v, &s.name)))
        .min_by_key(|(v, _)| *v)
        .map(|(_, name)| name.clone());

    Ok(QualityReport {
        highest_quality: scores.first().map(|s| s.name.clone()),
        best_value,
        scores,
    })
}
