//! Rain prediction request and result models

use serde::{Deserialize, Serialize};

use crate::types::{FeatureColumn, NUM_IMPUTED_FEATURES};

/// Readings for one location used to score tomorrow's rain risk.
///
/// Any numeric reading may be omitted; the model substitutes the value it
/// learned during training.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PredictionInput {
    pub location: String,
    #[serde(default)]
    pub rainfall: Option<f64>,
    #[serde(default)]
    pub humidity_am: Option<f64>,
    #[serde(default)]
    pub humidity_pm: Option<f64>,
    #[serde(default)]
    pub pressure_am: Option<f64>,
    #[serde(default)]
    pub pressure_pm: Option<f64>,
    #[serde(default)]
    pub cloud_am: Option<f64>,
    #[serde(default)]
    pub cloud_pm: Option<f64>,
    #[serde(default)]
    pub awi: Option<f64>,
}

impl PredictionInput {
    /// Build an input with every reading present
    #[allow(clippy::too_many_arguments)]
    pub fn complete(
        location: impl Into<String>,
        rainfall: f64,
        humidity_am: f64,
        humidity_pm: f64,
        pressure_am: f64,
        pressure_pm: f64,
        cloud_am: f64,
        cloud_pm: f64,
        awi: f64,
    ) -> Self {
        Self {
            location: location.into(),
            rainfall: Some(rainfall),
            humidity_am: Some(humidity_am),
            humidity_pm: Some(humidity_pm),
            pressure_am: Some(pressure_am),
            pressure_pm: Some(pressure_pm),
            cloud_am: Some(cloud_am),
            cloud_pm: Some(cloud_pm),
            awi: Some(awi),
        }
    }

    /// Numeric readings in model column order (location excluded)
    pub fn numeric_readings(&self) -> [Option<f64>; NUM_IMPUTED_FEATURES] {
        [
            self.rainfall,
            self.humidity_am,
            self.humidity_pm,
            self.pressure_am,
            self.pressure_pm,
            self.cloud_am,
            self.cloud_pm,
            self.awi,
        ]
    }

    /// Columns with no reading supplied
    pub fn missing_columns(&self) -> Vec<FeatureColumn> {
        self.numeric_readings()
            .iter()
            .zip(FeatureColumn::ALL.iter())
            .filter(|(value, _)| value.is_none())
            .map(|(_, column)| *column)
            .collect()
    }
}

/// Live conditions for a location, as reported by a weather data provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LiveConditions {
    pub location: String,
    pub humidity_am: Option<f64>,
    pub humidity_pm: Option<f64>,
    pub pressure_am: Option<f64>,
    pub pressure_pm: Option<f64>,
    pub cloud_am: Option<f64>,
    pub cloud_pm: Option<f64>,
    pub rainfall_now: Option<f64>,
}

impl LiveConditions {
    /// Combine the snapshot with an AWI derived from recent rainfall history
    pub fn into_prediction_input(self, awi: f64) -> PredictionInput {
        PredictionInput {
            location: self.location,
            rainfall: self.rainfall_now,
            humidity_am: self.humidity_am,
            humidity_pm: self.humidity_pm,
            pressure_am: self.pressure_am,
            pressure_pm: self.pressure_pm,
            cloud_am: self.cloud_am,
            cloud_pm: self.cloud_pm,
            awi: Some(awi),
        }
    }
}

/// Model output for one input
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RainPrediction {
    /// Probability that it rains tomorrow, in [0, 1]
    pub rain_probability: f64,
    /// Probability of the more likely outcome, in [0.5, 1]
    pub confidence: f64,
    /// Location code fed to the model
    pub location_code: usize,
    /// False when the location was unknown and the default code was used
    pub location_recognized: bool,
}

impl RainPrediction {
    pub fn from_probability(probability: f64, location_code: usize, location_recognized: bool) -> Self {
        let rain_probability = probability.clamp(0.0, 1.0);
        Self {
            rain_probability,
            confidence: rain_probability.max(1.0 - rain_probability),
            location_code,
            location_recognized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_is_max_class_probability() {
        let p = RainPrediction::from_probability(0.23, 4, true);
        assert!((p.confidence - 0.77).abs() < 1e-12);

        let p = RainPrediction::from_probability(0.9, 4, true);
        assert!((p.confidence - 0.9).abs() < 1e-12);

        let p = RainPrediction::from_probability(0.5, 0, false);
        assert_eq!(p.confidence, 0.5);
        assert!(!p.location_recognized);
    }

    #[test]
    fn test_missing_columns_listed_in_order() {
        let input = PredictionInput {
            location: "Albury".to_string(),
            rainfall: Some(0.0),
            humidity_am: None,
            cloud_pm: None,
            ..PredictionInput::complete("Albury", 0.0, 51.0, 40.0, 1014.2, 1011.3, 1.0, 1.0, 0.0)
        };
        assert_eq!(
            input.missing_columns(),
            vec![FeatureColumn::HumidityAm, FeatureColumn::CloudPm]
        );
    }

    #[test]
    fn test_live_conditions_carry_awi() {
        let live = LiveConditions {
            location: "Darwin".to_string(),
            humidity_am: Some(80.0),
            humidity_pm: Some(70.0),
            pressure_am: Some(1008.0),
            pressure_pm: Some(1005.0),
            cloud_am: Some(6.0),
            cloud_pm: None,
            rainfall_now: Some(2.4),
        };
        let input = live.into_prediction_input(42.0);
        assert_eq!(input.awi, Some(42.0));
        assert_eq!(input.rainfall, Some(2.4));
        assert_eq!(input.cloud_pm, None);
        assert_eq!(input.location, "Darwin");
    }

    #[test]
    fn test_input_deserializes_with_omitted_readings() {
        let input: PredictionInput =
            serde_json::from_str(r#"{"location":"Sydney","humidity_am":60.0}"#).unwrap();
        assert_eq!(input.humidity_am, Some(60.0));
        assert_eq!(input.awi, None);
    }
}
