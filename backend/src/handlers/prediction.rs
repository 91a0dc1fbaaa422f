//! HTTP handlers for rain predictions

use axum::extract::{rejection::JsonRejection, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use shared::{
    antecedent_wetness_index, classify_wetness, validate_location, FeatureColumn, InputError,
    LiveConditions, PredictionInput, RainPrediction, WetnessState,
};

use crate::error::{AppError, AppResult};
use crate::AppState;

/// Prediction with the context it was made in
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    #[serde(flatten)]
    pub prediction: RainPrediction,
    pub awi: Option<f64>,
    pub wetness: Option<WetnessState>,
    /// Readings that were filled from training medians; missing rainfall counts as zero instead
    pub imputed: Vec<FeatureColumn>,
}

/// Request body for a prediction from live conditions
#[derive(Debug, Deserialize)]
pub struct LivePredictionRequest {
    pub conditions: LiveConditions,
    /// Daily rainfall, oldest first, ending with today
    #[serde(default)]
    pub recent_rainfall: Vec<Option<f64>>,
}

/// Predict tomorrow's rain from a set of readings
pub async fn predict(
    State(state): State<AppState>,
    body: Result<Json<PredictionInput>, JsonRejection>,
) -> AppResult<Json<PredictionResponse>> {
    let Json(input) = body.map_err(|e| AppError::ValidationError(e.body_text()))?;
    score(&state, input)
}

/// Predict tomorrow's rain from live conditions and recent rainfall history
pub async fn predict_live(
    State(state): State<AppState>,
    body: Result<Json<LivePredictionRequest>, JsonRejection>,
) -> AppResult<Json<PredictionResponse>> {
    let Json(request) = body.map_err(|e| AppError::ValidationError(e.body_text()))?;
    let awi = antecedent_wetness_index(&request.recent_rainfall);
    tracing::debug!(
        "Derived AWI {:.1} from {} days of rainfall for {}",
        awi,
        request.recent_rainfall.len(),
        request.conditions.location
    );
    score(&state, request.conditions.into_prediction_input(awi))
}

fn score(state: &AppState, input: PredictionInput) -> AppResult<Json<PredictionResponse>> {
    validate_location(&input.location)?;
    if let Some((_, column)) = input
        .numeric_readings()
        .iter()
        .zip(FeatureColumn::ALL.iter())
        .find(|(value, _)| value.is_some_and(|v| !v.is_finite()))
    {
        return Err(InputError::NotFinite {
            field: column.field_name().to_string(),
        }
        .into());
    }

    let prediction = state.model.predict(&input);
    Ok(Json(PredictionResponse {
        prediction,
        awi: input.awi,
        wetness: input.awi.map(classify_wetness),
        imputed: input
            .missing_columns()
            .into_iter()
            .filter(|column| *column != FeatureColumn::Rainfall)
            .collect(),
    }))
}
