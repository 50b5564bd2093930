use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Preferences, PriceSummary, RawOffer};
use crate::{CollaboratorError, CoreResult};

/// External flight-offer search. Called once per swept date pair; an error
/// is the "error marker" and contributes zero offers upstream.
#[async_trait]
pub trait FlightSearch: Send + Sync {
    async fn search(
        &self,
        origin: &str,
        destination: &str,
        departure_date: NaiveDate,
        return_date: Option<NaiveDate>,
        travelers: u32,
    ) -> CoreResult<Vec<RawOffer>>;
}

/// Optional live FX lookup. Errors fall back to the static table / 1:1.
#[async_trait]
pub trait FxRates: Send + Sync {
    async fn rate(&self, from_currency: &str, to_currency: &str)
        -> CoreResult<f64>;
}

/// Optional natural-language rationale generator.
#[async_trait]
pub trait ExplanationSource: Send + Sync {
    async fn explain(&self, context: &ExplanationContext) -> CoreResult<String>;
}

/// Best-effort audit sink. Append failures are logged and swallowed.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn append(&self, record: &AuditRecord) -> CoreResult<()>;
}

/// Structured payload handed to the explanation collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct ExplanationContext {
    pub summary: Option<PriceSummary>,
    pub recommendation_price: Option<f64>,
    pub preferences: Preferences,
    pub date_window: String,
    pub currency: String,
}

/// One history row per analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    pub run_id: Uuid,
    pub ts: DateTime<Utc>,
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub preferences: Preferences,
    pub summary: Option<PriceSummary>,
    pub recommendation_price: Option<f64>,
}

/// Null-object explanation source: always defers to the template fallback.
pub struct NoopExplanation;

#[async_trait]
impl ExplanationSource for NoopExplanation {
    async fn explain(&self, _context: &ExplanationContext) -> CoreResult<String> {
        Err(CollaboratorError::Unavailable(
            "explanation collaborator not configured".to_string(),
        ))
    }
}

/// Null-object history sink.
pub struct NoopHistory;

#[async_trait]
impl HistoryStore for NoopHistory {
    async fn append(&self, _record: &AuditRecord) -> CoreResult<()> {
        Ok(())
    }
}
