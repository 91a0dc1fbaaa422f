//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Number of columns in a model feature vector
pub const NUM_FEATURES: usize = 9;

/// Number of leading feature columns filled by median imputation.
/// The trailing location code column is always present.
pub const NUM_IMPUTED_FEATURES: usize = 8;

/// Model input columns, in the order the model is fit on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FeatureColumn {
    Rainfall,
    HumidityAm,
    HumidityPm,
    PressureAm,
    PressurePm,
    CloudAm,
    CloudPm,
    Awi,
    LocationCode,
}

impl FeatureColumn {
    /// All columns in model order
    pub const ALL: [FeatureColumn; NUM_FEATURES] = [
        FeatureColumn::Rainfall,
        FeatureColumn::HumidityAm,
        FeatureColumn::HumidityPm,
        FeatureColumn::PressureAm,
        FeatureColumn::PressurePm,
        FeatureColumn::CloudAm,
        FeatureColumn::CloudPm,
        FeatureColumn::Awi,
        FeatureColumn::LocationCode,
    ];

    /// Position of the column inside a [`FeatureVector`]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Snake-case field name used in API payloads
    pub fn field_name(&self) -> &'static str {
        match self {
            FeatureColumn::Rainfall => "rainfall",
            FeatureColumn::HumidityAm => "humidity_am",
            FeatureColumn::HumidityPm => "humidity_pm",
            FeatureColumn::PressureAm => "pressure_am",
            FeatureColumn::PressurePm => "pressure_pm",
            FeatureColumn::CloudAm => "cloud_am",
            FeatureColumn::CloudPm => "cloud_pm",
            FeatureColumn::Awi => "awi",
            FeatureColumn::LocationCode => "location_code",
        }
    }
}

impl std::fmt::Display for FeatureColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureColumn::Rainfall => write!(f, "Rainfall (mm)"),
            FeatureColumn::HumidityAm => write!(f, "Humidity 9am (%)"),
            FeatureColumn::HumidityPm => write!(f, "Humidity 3pm (%)"),
            FeatureColumn::PressureAm => write!(f, "Pressure 9am (hPa)"),
            FeatureColumn::PressurePm => write!(f, "Pressure 3pm (hPa)"),
            FeatureColumn::CloudAm => write!(f, "Cloud 9am (oktas)"),
            FeatureColumn::CloudPm => write!(f, "Cloud 3pm (oktas)"),
            FeatureColumn::Awi => write!(f, "AWI (mm, 7 days)"),
            FeatureColumn::LocationCode => write!(f, "Location code"),
        }
    }
}

/// A complete, fixed-order model input row
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FeatureVector(pub [f64; NUM_FEATURES]);

impl FeatureVector {
    pub fn get(&self, column: FeatureColumn) -> f64 {
        self.0[column.index()]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// A feature row before imputation. Governed numeric columns may be missing.
pub type RawFeatureRow = [Option<f64>; NUM_FEATURES];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_order_matches_indices() {
        for (i, column) in FeatureColumn::ALL.iter().enumerate() {
            assert_eq!(column.index(), i);
        }
        assert_eq!(FeatureColumn::LocationCode.index(), NUM_IMPUTED_FEATURES);
    }

    #[test]
    fn test_feature_vector_lookup() {
        let v = FeatureVector([0.0, 51.0, 40.0, 1014.2, 1011.3, 1.0, 1.0, 12.5, 3.0]);
        assert_eq!(v.get(FeatureColumn::PressureAm), 1014.2);
        assert_eq!(v.get(FeatureColumn::Awi), 12.5);
        assert_eq!(v.as_slice().len(), NUM_FEATURES);
    }
}
