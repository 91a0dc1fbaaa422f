//! Route definitions for the rain risk API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/predictions", prediction_routes())
        .route("/wetness", get(handlers::classify_awi))
        .route("/model", get(handlers::get_model_summary))
        .nest("/locations", location_routes())
}

/// Prediction routes
fn prediction_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::predict))
        .route("/live", post(handlers::predict_live))
}

/// Location vocabulary routes
fn location_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_locations))
        .route("/:name", get(handlers::get_location))
}
