//! Antecedent wetness index (AWI) and soil wetness classification

use serde::{Deserialize, Serialize};

/// Number of most recent daily records summed into the AWI
pub const AWI_WINDOW_DAYS: usize = 7;

/// AWI above this value (mm) means saturated ground
pub const SATURATED_AWI_MM: f64 = 100.0;

/// AWI above this value (mm) means moderately wet ground
pub const MODERATELY_WET_AWI_MM: f64 = 30.0;

/// Coarse soil wetness derived from the AWI
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WetnessState {
    Dry,
    ModeratelyWet,
    Saturated,
}

impl std::fmt::Display for WetnessState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WetnessState::Dry => write!(f, "Dry"),
            WetnessState::ModeratelyWet => write!(f, "Moderately Wet"),
            WetnessState::Saturated => write!(f, "Saturated"),
        }
    }
}

/// Classify wetness from an AWI value. Both thresholds are strict.
pub fn classify_wetness(awi: f64) -> WetnessState {
    if awi > SATURATED_AWI_MM {
        WetnessState::Saturated
    } else if awi > MODERATELY_WET_AWI_MM {
        WetnessState::ModeratelyWet
    } else {
        WetnessState::Dry
    }
}

/// Trailing rolling sum over a chronological series.
///
/// Each output element is the sum of the current value and up to
/// `window - 1` preceding values, so the first entries use a shorter window.
/// A `window` of zero is treated as one.
pub fn rolling_sum(series: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..series.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            series[start..=i].iter().sum()
        })
        .collect()
}

/// AWI for every day of a chronological rainfall series at one location
pub fn rolling_awi(rainfall: &[f64]) -> Vec<f64> {
    rolling_sum(rainfall, AWI_WINDOW_DAYS)
}

/// AWI for the most recent day of a chronological rainfall series.
///
/// Missing readings count as zero rain, matching how training data is cleaned.
pub fn antecedent_wetness_index(recent_rainfall: &[Option<f64>]) -> f64 {
    let start = recent_rainfall.len().saturating_sub(AWI_WINDOW_DAYS);
    recent_rainfall[start..]
        .iter()
        .map(|r| r.unwrap_or(0.0))
        .sum()
}
