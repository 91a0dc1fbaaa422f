//! Validation of manually entered weather readings

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::PredictionInput;

/// Message shown to users when a reading is not a number
pub const NUMERIC_INPUT_REQUIRED: &str =
    "Invalid input! Please enter numerical values for the weather data.";

/// Problems with a manually entered reading
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("{field} is required")]
    Missing { field: String },

    #[error("{field} must be a number, got '{value}'")]
    NotNumeric { field: String, value: String },

    #[error("{field} must be a finite number")]
    NotFinite { field: String },
}

impl InputError {
    /// Name of the offending field
    pub fn field(&self) -> &str {
        match self {
            InputError::Missing { field }
            | InputError::NotNumeric { field, .. }
            | InputError::NotFinite { field } => field,
        }
    }
}

/// Parse one reading typed by a user
pub fn parse_reading(field: &str, raw: &str) -> Result<f64, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputError::Missing {
            field: field.to_string(),
        });
    }
    let value: f64 = trimmed.parse().map_err(|_| InputError::NotNumeric {
        field: field.to_string(),
        value: trimmed.to_string(),
    })?;
    if !value.is_finite() {
        return Err(InputError::NotFinite {
            field: field.to_string(),
        });
    }
    Ok(value)
}

/// Validate a location name (non-empty after trimming)
pub fn validate_location(location: &str) -> Result<&str, InputError> {
    let trimmed = location.trim();
    if trimmed.is_empty() {
        return Err(InputError::Missing {
            field: "location".to_string(),
        });
    }
    Ok(trimmed)
}

/// Raw text of one manual entry, exactly as typed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManualEntry {
    pub location: String,
    pub rainfall: String,
    pub humidity_am: String,
    pub humidity_pm: String,
    pub pressure_am: String,
    pub pressure_pm: String,
    pub cloud_am: String,
    pub cloud_pm: String,
    pub awi: String,
}

impl ManualEntry {
    /// Validate every field. All readings are required for manual entry.
    pub fn validate(&self) -> Result<PredictionInput, InputError> {
        let location = validate_location(&self.location)?;
        Ok(PredictionInput::complete(
            location,
            parse_reading("rainfall", &self.rainfall)?,
            parse_reading("humidity_am", &self.humidity_am)?,
            parse_reading("humidity_pm", &self.humidity_pm)?,
            parse_reading("pressure_am", &self.pressure_am)?,
            parse_reading("pressure_pm", &self.pressure_pm)?,
            parse_reading("cloud_am", &self.cloud_am)?,
            parse_reading("cloud_pm", &self.cloud_pm)?,
            parse_reading("awi", &self.awi)?,
        ))
    }
}
