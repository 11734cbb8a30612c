//! Prediction endpoint

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::{debug, info};

use crate::db::{self, NewAssessment};
use crate::error::{ApiError, ApiResult};
use crate::record::PatientRecord;
use crate::AppState;

/// Successful prediction response
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub predicted_esi: u8,
}

/// POST /predict
///
/// Accepts an open-ended key/value patient record, decides the ESI level
/// (expert rules first, model fallback), persists the assessment, and
/// returns the level. Any failure surfaces as a JSON error body with zero
/// committed side effects: a persistence failure after a computed decision
/// rolls back rather than silently committing.
pub async fn predict_esi(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<Json<PredictResponse>> {
    // Model availability is re-checked per request; artifacts that failed
    // to load at startup fail every prediction until restart.
    let engine = state.engine.as_ref().ok_or(ApiError::ModelUnavailable)?;

    debug!("Raw data received: {}", body);
    let record: PatientRecord = serde_json::from_value(body)
        .map_err(|e| ApiError::BadRequest(format!("Malformed patient record: {}", e)))?;

    let decision = engine.decide(&record)?;

    let new = NewAssessment {
        patient_id: record.patient_label().to_string(),
        age: record.age,
        gender: record.gender.clone(),
        symptoms: record.triggered_symptoms(engine.feature_names()),
        predicted_esi: decision.esi_level,
    };

    let id = db::save_assessment(&state.db, &new).await?;
    info!(
        "Saved assessment {} for '{}': ESI level {} ({})",
        id,
        new.patient_id,
        decision.esi_level,
        if decision.used_rule { "expert rule" } else { "model" }
    );

    Ok(Json(PredictResponse {
        predicted_esi: decision.esi_level,
    }))
}
