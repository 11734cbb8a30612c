//! Assessment persistence and the prioritized queue query

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use tracing::warn;

use crate::error::{Error, Result};

/// Maximum number of assessments returned by the queue view.
pub const QUEUE_LIMIT: i64 = 50;

/// A persisted triage assessment. Created once, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub id: i64,
    pub patient_id: String,
    pub age: Option<i64>,
    pub gender: Option<String>,
    /// Triggered symptom flags, as a JSON object of name -> 1.
    pub symptoms: serde_json::Value,
    pub predicted_esi: i64,
    pub assessment_time: DateTime<Utc>,
}

/// Fields supplied by the caller; identity and timestamp are assigned here.
#[derive(Debug, Clone)]
pub struct NewAssessment {
    pub patient_id: String,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub symptoms: serde_json::Map<String, serde_json::Value>,
    pub predicted_esi: u8,
}

/// Insert a new assessment, returning its assigned id.
///
/// Runs in its own transaction; any failure rolls back before the error
/// surfaces, so a failed save commits nothing.
pub async fn save_assessment(pool: &SqlitePool, new: &NewAssessment) -> Result<i64> {
    let symptoms = serde_json::to_string(&new.symptoms)
        .map_err(|e| Error::Internal(format!("Failed to serialize symptoms: {}", e)))?;
    let assessment_time = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

    let mut tx = pool.begin().await?;

    let insert = sqlx::query(
        r#"
        INSERT INTO assessments (patient_id, age, gender, symptoms, predicted_esi, assessment_time)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&new.patient_id)
    .bind(new.age)
    .bind(&new.gender)
    .bind(&symptoms)
    .bind(new.predicted_esi as i64)
    .bind(&assessment_time)
    .execute(&mut *tx)
    .await;

    match insert {
        Ok(result) => {
            tx.commit().await?;
            Ok(result.last_insert_rowid())
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!("Rollback after failed insert also failed: {}", rollback_err);
            }
            Err(Error::Database(e))
        }
    }
}

/// The triage priority view: sickest-and-newest-first.
///
/// Ordered by ascending ESI level, then descending assessment time; exact
/// timestamp ties keep insertion order. Truncated to `limit` rows.
pub async fn fetch_queue(pool: &SqlitePool, limit: i64) -> Result<Vec<Assessment>> {
    let rows = sqlx::query(
        r#"
        SELECT id, patient_id, age, gender, symptoms, predicted_esi, assessment_time
        FROM assessments
        ORDER BY predicted_esi ASC, assessment_time DESC, id ASC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            let symptoms_text: String = row.get("symptoms");
            let symptoms = serde_json::from_str(&symptoms_text)
                .map_err(|e| Error::Internal(format!("Failed to parse symptoms JSON: {}", e)))?;

            let time_text: String = row.get("assessment_time");
            let assessment_time = DateTime::parse_from_rfc3339(&time_text)
                .map_err(|e| Error::Internal(format!("Failed to parse assessment_time: {}", e)))?
                .with_timezone(&Utc);

            Ok(Assessment {
                id: row.get("id"),
                patient_id: row.get("patient_id"),
                age: row.get("age"),
                gender: row.get("gender"),
                symptoms,
                predicted_esi: row.get("predicted_esi"),
                assessment_time,
            })
        })
        .collect()
}
