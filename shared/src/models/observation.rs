//! Historical weather observation models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of historical weather at a single location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub location: String,
    /// Rainfall over the day in mm. Missing values count as zero rain.
    pub rainfall: Option<f64>,
    pub humidity_am: Option<f64>,
    pub humidity_pm: Option<f64>,
    pub pressure_am: Option<f64>,
    pub pressure_pm: Option<f64>,
    /// Cloud cover in oktas (0-8)
    pub cloud_am: Option<f64>,
    pub cloud_pm: Option<f64>,
    pub rain_tomorrow: Option<RainLabel>,
}

impl Observation {
    /// Rainfall with missing readings replaced by zero
    pub fn clean_rainfall(&self) -> f64 {
        self.rainfall.unwrap_or(0.0)
    }
}

/// Whether it rained on the following day
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RainLabel {
    No,
    Yes,
}

impl RainLabel {
    /// Parse the dataset label text. Returns `None` for anything but `Yes`/`No`.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "Yes" => Some(RainLabel::Yes),
            "No" => Some(RainLabel::No),
            _ => None,
        }
    }

    /// Binary class index used by the classifier
    pub fn class(&self) -> usize {
        match self {
            RainLabel::No => 0,
            RainLabel::Yes => 1,
        }
    }
}

impl std::fmt::Display for RainLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RainLabel::No => write!(f, "No"),
            RainLabel::Yes => write!(f, "Yes"),
        }
    }
}
