//! Rain Risk Service - Backend Server
//!
//! Trains the rain risk model once at startup, then serves predictions.

use std::{net::SocketAddr, sync::Arc};

use rainrisk_backend::{config::Config, create_app, services::shared_model, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "rainrisk_server=debug,rainrisk_backend=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Rain Risk Server");
    tracing::info!("Environment: {}", config.environment);

    // Train before accepting requests; a failure aborts startup
    let model = shared_model(&config.model).await?;
    let summary = model.summary();
    tracing::info!(
        "Model ready: {} trees, {} locations, {} training rows",
        summary.n_trees,
        summary.locations,
        summary.training_rows
    );

    let state = AppState {
        model,
        config: Arc::new(config.clone()),
    };

    let app = create_app(state);

    let ip: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::from((ip, config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
