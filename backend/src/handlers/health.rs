//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub model: ModelHealth,
}

#[derive(Serialize)]
pub struct ModelHealth {
    pub trees: usize,
    pub locations: usize,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let summary = state.model.summary();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.clone(),
        model: ModelHealth {
            trees: summary.n_trees,
            locations: summary.locations,
        },
    })
}
