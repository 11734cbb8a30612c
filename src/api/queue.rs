//! Patient queue endpoint

use axum::{extract::State, Json};

use crate::db::{self, Assessment, QUEUE_LIMIT};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// GET /queue
///
/// The 50 most recent assessments, prioritized by severity: ascending ESI
/// level first, then most recent assessment time within the same level.
pub async fn get_patient_queue(State(state): State<AppState>) -> ApiResult<Json<Vec<Assessment>>> {
    let queue = db::fetch_queue(&state.db, QUEUE_LIMIT)
        .await
        .map_err(|e| ApiError::Database(e.to_string()))?;
    Ok(Json(queue))
}
