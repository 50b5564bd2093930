use async_trait::async_trait;
use farescout_core::collaborators::{AuditRecord, HistoryStore};
use farescout_core::CollaboratorError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS analysis_history (
    run_id UUID PRIMARY KEY,
    ts TIMESTAMPTZ NOT NULL,
    origin TEXT NOT NULL,
    destination TEXT NOT NULL,
    departure_date DATE NOT NULL,
    return_date DATE,
    preferences JSONB NOT NULL,
    summary JSONB,
    recommendation_price DOUBLE PRECISION
)
"#;

/// Postgres-backed audit history. Writes are best-effort: the analyzer logs
/// and swallows append failures.
pub struct PgHistoryStore {
    pool: PgPool,
}

impl PgHistoryStore {
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        info!("analysis history schema ready");
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for PgHistoryStore {
    async fn append(&self, record: &AuditRecord) -> Result<(), CollaboratorError> {
        let preferences = serde_json::to_value(&record.preferences)
            .map_err(|e| CollaboratorError::Malformed(e.to_string()))?;
        let summary = record
            .summary
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| CollaboratorError::Malformed(e.to_string()))?;

        sqlx::query(
            "INSERT INTO analysis_history \
             (run_id, ts, origin, destination, departure_date, return_date, \
              preferences, summary, recommendation_price) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(record.run_id)
        .bind(record.ts)
        .bind(&record.origin)
        .bind(&record.destination)
        .bind(record.departure_date)
        .bind(record.return_date)
        .bind(preferences)
        .bind(summary)
        .bind(record.recommendation_price)
        .execute(&self.pool)
        .await
        .map_err(|e| CollaboratorError::Unavailable(e.to_string()))?;

        Ok(())
    }
}
