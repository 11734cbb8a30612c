//! triage-api library interface
//!
//! Clinical triage prediction service: expert severity rules backed by a
//! pre-trained classifier, persisted assessments, and a prioritized queue.

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod model;
pub mod record;
pub mod rules;

pub use crate::engine::DecisionEngine;
pub use crate::error::{ApiError, ApiResult, Error, Result};

/// Application state shared across HTTP handlers
///
/// The engine is `None` when model artifacts failed to load at startup;
/// predictions then fail until the process restarts with valid artifacts.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Decision engine with the loaded classifier, immutable once built
    pub engine: Option<Arc<DecisionEngine>>,
}

impl AppState {
    pub fn new(db: SqlitePool, engine: Option<Arc<DecisionEngine>>) -> Self {
        Self { db, engine }
    }
}

/// Build application router
///
/// CORS is restricted to the single configured origin.
pub fn build_router(state: AppState, allowed_origin: HeaderValue) -> Router {
    use axum::routing::{get, post};

    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .route("/predict", post(api::predict_esi))
        .route("/queue", get(api::get_patient_queue))
        .merge(api::health_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
