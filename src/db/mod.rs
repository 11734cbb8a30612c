//! Database access layer
//!
//! One relational table of assessment rows. The connection string comes from
//! the environment (`DATABASE_URL`) with a documented default; the schema is
//! created on startup if missing.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::Result;

pub mod assessments;

pub use assessments::{fetch_queue, save_assessment, Assessment, NewAssessment, QUEUE_LIMIT};

/// Connect to the database and ensure the schema exists.
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let pool = SqlitePool::connect(database_url).await?;
    init_schema(&pool).await?;
    info!("Database schema ready");
    Ok(pool)
}

/// Create the assessments table if it does not exist.
///
/// Assessments are written once and never mutated or deleted, so no
/// migration machinery is needed beyond this.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS assessments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            patient_id TEXT NOT NULL,
            age INTEGER,
            gender TEXT,
            symptoms TEXT NOT NULL,
            predicted_esi INTEGER NOT NULL,
            assessment_time TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
