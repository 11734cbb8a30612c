//! Welcome and health endpoints

use axum::{routing::get, Json, Router};
use serde::Serialize;
use serde_json::json;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

/// GET /
///
/// Static liveness/welcome response, no logic.
pub async fn read_root() -> Json<serde_json::Value> {
    Json(json!({"message": "Welcome to the Triage Assistant AI API"}))
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "triage-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build welcome and health routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(read_root))
        .route("/health", get(health_check))
}
