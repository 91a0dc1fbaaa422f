//! HTTP handler for soil wetness classification

use axum::extract::{rejection::QueryRejection, Query};
use axum::Json;
use serde::{Deserialize, Serialize};
use shared::{classify_wetness, WetnessState};

use crate::error::{AppError, AppResult};

/// Query parameters for wetness classification
#[derive(Debug, Deserialize)]
pub struct WetnessQuery {
    pub awi: f64,
}

#[derive(Debug, Serialize)]
pub struct WetnessResponse {
    pub awi: f64,
    pub state: WetnessState,
    pub label: String,
}

/// Classify an antecedent wetness index
pub async fn classify_awi(
    query: Result<Query<WetnessQuery>, QueryRejection>,
) -> AppResult<Json<WetnessResponse>> {
    let Query(query) = query.map_err(|e| AppError::Validation {
        field: "awi".to_string(),
        message: e.body_text(),
    })?;
    if !query.awi.is_finite() {
        return Err(AppError::Validation {
            field: "awi".to_string(),
            message: "awi must be a finite number".to_string(),
        });
    }

    let state = classify_wetness(query.awi);
    Ok(Json(WetnessResponse {
        awi: query.awi,
        state,
        label: state.to_string(),
    }))
}
