//! # Demand Charts
//!
//! Static monthly demand index per gem type (100 = an average month).
//!
//! ```text
//! index
//!  140 ┤                                          ╭──╮
//!  120 ┤ ╮                  ╭─╮                ╭──╯  ╰─╮
//!  100 ┤ ╰─╮             ╭──╯ ╰─╮         ╭───╯        ╰
//!   80 ┤   ╰─────────────╯      ╰─────────╯
//!      └──┬──┬──┬──┬──┬──┬──┬──┬──┬──┬──┬──┬
//!        Jan   Mar   May   Jul   Sep   Nov
//!        weddings  Akshaya Tritiya   Navratri/Diwali
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::valuation::gem_profile;

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Flat index for gems without a curve.
pub const BASELINE_INDEX: i64 = 100;

/// The trade calendar shared by every curve.
fn season(month: u32) -> Option<&'static str> {
    match month {
        1 | 2 | 12 => Some("Wedding season"),
        4 | 5 => Some("Akshaya Tritiya"),
        10 => Some("Navratri"),
        11 => Some("Diwali and Dhanteras"),
        _ => None,
    }
}

fn curve(gem: &str) -> Option<[i64; 12]> {
    let curve = match gem {
        "Ruby" => [115, 105, 90, 105, 100, 80, 75, 80, 95, 125, 135, 110],
        "Pearl" => [110, 100, 90, 100, 95, 85, 90, 95, 100, 115, 120, 105],
        "Red Coral" => [100, 95, 100, 105, 100, 90, 85, 85, 95, 110, 115, 100],
        "Emerald" => [120, 110, 95, 110, 105, 80, 70, 75, 90, 115, 130, 120],
        "Yellow Sapphire" => [125, 115, 95, 120, 110, 80, 75, 75, 90, 110, 125, 120],
        "Diamond" => [130, 120, 90, 110, 105, 75, 70, 75, 90, 120, 140, 125],
        "Blue Sapphire" => [100, 95, 95, 100, 100, 90, 90, 95, 100, 110, 115, 105],
        "Hessonite" => [95, 95, 100, 100, 100, 95, 95, 100, 105, 105, 110, 100],
        "Cat's Eye" => [95, 95, 100, 100, 100, 95, 95, 100, 105, 105, 110, 100],
        _ => return None,
    };
    Some(curve)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MonthlyDemand {
    /// 1-12
    pub month: u32,
    pub label: String,
    pub index: i64,
    pub season: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DemandForecast {
    pub gem_type: String,
    /// False when the gem has no curve and the flat baseline was used.
    pub known: bool,
    pub months: Vec<MonthlyDemand>,
    pub peak_month: u32,
    pub peak_label: String,
    pub average_index: i64,
}

/// Demand curve for a gem type. Unknown gems get a flat baseline whose
/// peak is January.
pub fn forecast(gem_type: &str) -> DemandForecast {
    let profile = gem_profile(gem_type).ok();
    let values = profile.and_then(|p| curve(p.name));
    let name = match (profile, values) {
        (Some(p), Some(_)) => p.name.to_string(),
        _ => gem_type.trim().to_string(),
    };
    let known = values.is_some();
    let values = values.unwrap_or([BASELINE_INDEX; 12]);

    let months: Vec<MonthlyDemand> = values
        .iter()
        .enumerate()
        .map(|(idx, index)| {
            let month = idx as u32 + 1;
            MonthlyDemand {
                month,
                label: MONTH_LABELS[idx].to_string(),
                index: *index,
                season: season(month).map(str::to_string),
            }
        })
        .collect();

    // First maximum wins.
    let peak = months
        .iter()
        .fold(&months[0], |best, m| if m.index > best.index { m } else { best });

    DemandForecast {
        gem_type: name,
        known,
        peak_month: peak.month,
        peak_label: peak.label.clone(),
        average_index: values.iter().sum::<i64>() / 12,
        months,
    }
}

/// Demand index for one month (1-12).
pub fn index_for_month(gem_type: &str, month: u32) -> i64 {
    forecast(gem_type)
        .months
        .iter()
        .find(|m| m.month == month)
        .map(|m| m.index)
        .unwrap_or(BASELINE_INDEX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_gem_peaks_in_festival_season() {
        let f = forecast("ruby");
        assert!(f.known);
        assert_eq!(f.gem_type, "Ruby");
        assert_eq!(f.months.len(), 12);
        assert_eq!(f.peak_month, 11);
        assert_eq!(f.peak_label, "Nov");
        assert_eq!(f.months[10].season.as_deref(), Some("Diwali and Dhanteras"));
    }

    #[test]
    fn test_unknown_gem_is_flat() {
        let f = forecast("Tanzanite");
        assert!(!f.known);
        assert!(f.months.iter().all(|m| m.index == BASELINE_INDEX));
        assert_eq!(f.peak_month, 1);
        assert_eq!(f.average_index, BASELINE_INDEX);
    }

    #[test]
    fn test_index_for_month() {
        assert_eq!(index_for_month("Diamond", 11), 140);
        assert_eq!(index_for_month("Diamond", 13), BASELINE_INDEX);
    }
}
