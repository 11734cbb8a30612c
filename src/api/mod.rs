//! HTTP API handlers

pub mod health;
pub mod predict;
pub mod queue;

pub use health::{health_routes, read_root};
pub use predict::predict_esi;
pub use queue::get_patient_queue;
