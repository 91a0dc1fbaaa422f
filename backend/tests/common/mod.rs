//! Synthetic observation sets shared by the integration tests

#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use rainrisk_backend::services::{ForestParams, TrainingSettings};
use shared::{Observation, PredictionInput, RainLabel};

pub const LOCATIONS: [&str; 4] = ["Albury", "Cairns", "Darwin", "Hobart"];

/// Small forest for fast tests
pub fn settings(seed: u64) -> TrainingSettings {
    TrainingSettings {
        forest: ForestParams {
            n_trees: 25,
            seed,
            ..ForestParams::default()
        },
        test_fraction: 0.0,
    }
}

/// One day at one location. Wet days are humid, low pressure and overcast,
/// and are followed by rain.
pub fn observation(location: &str, day: i64, wet: bool) -> Observation {
    let date = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap() + Duration::days(day);
    // small daily jitter so no two rows are identical
    let jitter = (day % 5) as f64;
    if wet {
        Observation {
            date,
            location: location.to_string(),
            rainfall: Some(10.0 + jitter),
            humidity_am: Some(88.0 + jitter),
            humidity_pm: Some(84.0 + jitter),
            pressure_am: Some(1004.0 - jitter),
            pressure_pm: Some(1002.0 - jitter),
            cloud_am: Some(8.0),
            cloud_pm: Some(7.0),
            rain_tomorrow: Some(RainLabel::Yes),
        }
    } else {
        Observation {
            date,
            location: location.to_string(),
            rainfall: Some(0.0),
            humidity_am: Some(45.0 + jitter),
            humidity_pm: Some(35.0 + jitter),
            pressure_am: Some(1022.0 + jitter),
            pressure_pm: Some(1020.0 + jitter),
            cloud_am: Some(1.0),
            cloud_pm: Some(2.0),
            rain_tomorrow: Some(RainLabel::No),
        }
    }
}

/// Sixty days per location with wet spells on roughly two days in five
pub fn observations() -> Vec<Observation> {
    LOCATIONS
        .iter()
        .enumerate()
        .flat_map(|(loc, name)| {
            (0..60).map(move |day| observation(name, day, (day * 7 + loc as i64) % 5 < 2))
        })
        .collect()
}

pub fn rainy_input(location: &str) -> PredictionInput {
    PredictionInput::complete(location, 15.0, 92.0, 88.0, 1002.0, 1000.0, 8.0, 8.0, 60.0)
}

pub fn dry_input(location: &str) -> PredictionInput {
    PredictionInput::complete(location, 0.0, 42.0, 33.0, 1024.0, 1022.0, 1.0, 1.0, 2.0)
}
