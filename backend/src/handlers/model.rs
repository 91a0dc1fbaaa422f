//! HTTP handlers describing the trained model

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::services::ModelSummary;
use crate::AppState;

/// A known location and the code the model uses for it
#[derive(Debug, Serialize)]
pub struct LocationEntry {
    pub name: String,
    pub code: usize,
}

/// Summary of the trained model
pub async fn get_model_summary(State(state): State<AppState>) -> Json<ModelSummary> {
    Json(state.model.summary().clone())
}

/// All locations the model was trained on, in code order
pub async fn list_locations(State(state): State<AppState>) -> Json<Vec<LocationEntry>> {
    let locations = state
        .model
        .encoder()
        .classes()
        .iter()
        .enumerate()
        .map(|(code, name)| LocationEntry {
            name: name.clone(),
            code,
        })
        .collect();
    Json(locations)
}

/// Look up the code for one location
pub async fn get_location(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<LocationEntry>> {
    let code = state
        .model
        .encoder()
        .transform(&name)
        .ok_or_else(|| AppError::NotFound(format!("Location '{}'", name)))?;
    Ok(Json(LocationEntry { name, code }))
}
