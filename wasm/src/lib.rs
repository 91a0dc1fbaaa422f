//! WebAssembly module for the rain risk dashboard
//!
//! Provides client-side computation for:
//! - Soil wetness classification
//! - Antecedent wetness index from a rainfall history
//! - Manual input validation before a prediction request is sent

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Classify soil wetness from an AWI value (mm)
#[wasm_bindgen]
pub fn classify_wetness_state(awi: f64) -> String {
    classify_wetness(awi).to_string()
}

/// AWI for today from daily rainfall, oldest first.
/// NaN entries count as no rain.
#[wasm_bindgen]
pub fn compute_awi(rainfall: Vec<f64>) -> f64 {
    let readings: Vec<Option<f64>> = rainfall
        .into_iter()
        .map(|r| if r.is_nan() { None } else { Some(r) })
        .collect();
    antecedent_wetness_index(&readings)
}

/// Rolling AWI for every day of a rainfall history
#[wasm_bindgen]
pub fn compute_awi_series(rainfall: Vec<f64>) -> Vec<f64> {
    let cleaned: Vec<f64> = rainfall
        .into_iter()
        .map(|r| if r.is_nan() { 0.0 } else { r })
        .collect();
    rolling_awi(&cleaned)
}

/// Validate a manual entry (JSON of raw text fields).
///
/// Returns the prediction request as JSON, or throws the user-facing message.
#[wasm_bindgen]
pub fn validate_manual_input(entry_json: &str) -> Result<String, JsValue> {
    manual_input_to_request(entry_json).map_err(|e| JsValue::from_str(&e))
}

fn manual_input_to_request(entry_json: &str) -> Result<String, String> {
    let entry: ManualEntry = serde_json::from_str(entry_json)
        .map_err(|e| format!("Invalid entry JSON: {}", e))?;
    let input = entry
        .validate()
        .map_err(|e| format!("{} ({})", NUMERIC_INPUT_REQUIRED, e))?;
    serde_json::to_string(&input).map_err(|e| e.to_string())
}
