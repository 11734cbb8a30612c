//! triage-api - Clinical triage prediction service
//!
//! Accepts patient symptom data over HTTP, applies expert severity rules
//! and a pre-trained classifier to estimate an ESI level (1 = most
//! critical, 5 = least urgent), persists each assessment, and exposes a
//! severity-prioritized recent-assessment queue.

use std::sync::Arc;

use anyhow::Result;
use axum::http::HeaderValue;
use tracing::{error, info, warn};

use triage_api::config::Config;
use triage_api::engine::DecisionEngine;
use triage_api::model::ModelAdapter;
use triage_api::{build_router, db, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting Triage Assistant AI API (triage-api) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;
    info!("Database: {}", config.database_url);

    let pool = db::connect(&config.database_url).await?;

    // Artifact loading failure is not fatal: the service starts and every
    // prediction fails until a restart with valid artifacts.
    let engine = match ModelAdapter::load(
        &config.features_path,
        &config.preprocessor_path,
        &config.model_path,
    ) {
        Ok(adapter) => {
            info!("Model, preprocessor, and feature list loaded successfully");
            Some(Arc::new(DecisionEngine::new(Arc::new(adapter))))
        }
        Err(e) => {
            error!("Error loading model artifacts: {}", e);
            warn!("Predictions will fail until the service restarts with valid artifacts");
            None
        }
    };

    let allowed_origin: HeaderValue = config
        .allowed_origin
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid TRIAGE_ALLOWED_ORIGIN '{}': {}", config.allowed_origin, e))?;
    info!("CORS origin: {}", config.allowed_origin);

    let state = AppState::new(pool, engine);
    let app = build_router(state, allowed_origin);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("triage-api listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
