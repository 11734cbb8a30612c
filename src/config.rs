//! Environment configuration
//!
//! Every setting has a documented default so the service starts with zero
//! configuration; overrides come from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Default connection string: a local SQLite file, created if missing.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://triage.db?mode=rwc";
/// Default bind address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
/// Default CORS origin: the development frontend.
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Resolved service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// `DATABASE_URL`
    pub database_url: String,
    /// `TRIAGE_BIND`
    pub bind_addr: SocketAddr,
    /// `TRIAGE_ALLOWED_ORIGIN` — the single origin allowed by CORS
    pub allowed_origin: String,
    /// `TRIAGE_FEATURES_PATH` — ordered feature-name list (JSON array)
    pub features_path: PathBuf,
    /// `TRIAGE_PREPROCESSOR_PATH` — preprocessor parameters (JSON)
    pub preprocessor_path: PathBuf,
    /// `TRIAGE_MODEL_PATH` — network weights (JSON)
    pub model_path: PathBuf,
}

impl Config {
    /// Resolve configuration from the environment, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let bind = std::env::var("TRIAGE_BIND").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind
            .parse()
            .map_err(|e| Error::Config(format!("Invalid TRIAGE_BIND '{}': {}", bind, e)))?;

        let allowed_origin = std::env::var("TRIAGE_ALLOWED_ORIGIN")
            .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGIN.to_string());

        let features_path = env_path("TRIAGE_FEATURES_PATH", "features.json");
        let preprocessor_path =
            env_path("TRIAGE_PREPROCESSOR_PATH", "final_triage_preprocessor.json");
        let model_path = env_path("TRIAGE_MODEL_PATH", "final_triage_assistant_model.json");

        Ok(Self {
            database_url,
            bind_addr,
            allowed_origin,
            features_path,
            preprocessor_path,
            model_path,
        })
    }
}

fn env_path(var: &str, default: &str) -> PathBuf {
    std::env::var(var)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default))
}
