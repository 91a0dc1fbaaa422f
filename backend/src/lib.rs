//! Rain risk service
//!
//! Trains a random forest on historical weather observations to estimate the
//! probability of rain tomorrow, and serves it over a small JSON API.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod console;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;
pub use services::RainRiskModel;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<RainRiskModel>,
    pub config: Arc<Config>,
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Rain Risk API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
