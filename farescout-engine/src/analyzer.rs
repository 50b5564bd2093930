use std::sync::Arc;

use chrono::Utc;
use farescout_core::collaborators::{
    AuditRecord, ExplanationContext, ExplanationSource, FlightSearch, FxRates, HistoryStore,
    NoopExplanation, NoopHistory,
};
use farescout_core::models::{AnalysisReport, Highlights, NormalizedOffer, TravelRequest};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::currency::CurrencyNormalizer;
use crate::filter::passes_filters;
use crate::sweep::{OfferSweeper, SweepKey, DEFAULT_CACHE_CAPACITY, DEFAULT_WINDOW_DAYS};
use crate::{explain, ranking, stats};

#[derive(Debug, Clone, Copy)]
pub struct AnalyzerSettings {
    pub window_days: i64,
    pub cache_capacity: u64,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Coordinates one analysis pass: sweep, filter, normalize, summarize, rank,
/// explain, and record. Nothing escapes `analyze` as an error; malformed
/// offers are skipped and collaborator failures degrade to fallbacks.
pub struct TravelAnalyzer {
    sweeper: OfferSweeper,
    normalizer: CurrencyNormalizer,
    explainer: Arc<dyn ExplanationSource>,
    history: Arc<dyn HistoryStore>,
    window_days: i64,
}

impl TravelAnalyzer {
    /// Analyzer with default settings and null-object collaborators.
    pub fn new(search: Arc<dyn FlightSearch>) -> Self {
        Self::with_collaborators(
            search,
            None,
            Arc::new(NoopExplanation),
            Arc::new(NoopHistory),
            AnalyzerSettings::default(),
        )
    }

    pub fn with_collaborators(
        search: Arc<dyn FlightSearch>,
        fx: Option<Arc<dyn FxRates>>,
        explainer: Arc<dyn ExplanationSource>,
        history: Arc<dyn HistoryStore>,
        settings: AnalyzerSettings,
    ) -> Self {
        Self {
            sweeper: OfferSweeper::with_settings(
                search,
                settings.cache_capacity,
                settings.window_days,
            ),
            normalizer: CurrencyNormalizer::new(fx),
            explainer,
            history,
            window_days: settings.window_days,
        }
    }

    pub async fn analyze(&self, request: &TravelRequest) -> AnalysisReport {
        let run_id = Uuid::new_v4();
        let target_currency = request.currency.to_uppercase();

        let key = SweepKey::for_request(request);
        let raw_offers = self.sweeper.collect(&key).await;
        debug!(
            %run_id,
            origin = %request.origin,
            destination = %request.destination,
            raw = raw_offers.len(),
            "collected swept offers"
        );

        let mut prices = Vec::new();
        let mut offers = Vec::new();
        for raw in raw_offers.iter() {
            // Malformed price or fields skip this offer, never the batch.
            let Some((amount, native_currency)) = raw.total_price() else {
                continue;
            };
            if !passes_filters(raw, &request.preferences) {
                continue;
            }
            let price = self
                .normalizer
                .convert(amount, &native_currency, &target_currency)
                .await;
            // "NaN" parses as a valid f64, so a plain <= 0.0 guard would let
            // it through and poison the whole summary.
            if !(price.is_finite() && price > 0.0) {
                continue;
            }
            prices.push(price);
            offers.push(NormalizedOffer {
                id: raw.id.clone(),
                price,
                currency: target_currency.clone(),
                itineraries: raw.itineraries.clone(),
                highlights: Highlights::collect(&raw.itineraries),
            });
        }

        let summary = stats::summarize(&prices);
        let median = summary.as_ref().map(|s| s.median);
        let top_recommendations = ranking::top_recommendations(&offers, median);
        let recommendation = top_recommendations.first().cloned();

        let context = ExplanationContext {
            summary: summary.clone(),
            recommendation_price: recommendation.as_ref().map(|r| r.offer.price),
            preferences: request.preferences.clone(),
            date_window: format!("+/- {} days", self.window_days),
            currency: target_currency.clone(),
        };
        let explanation = explain::generate_explanation(self.explainer.as_ref(), &context).await;

        let record = AuditRecord {
            run_id,
            ts: Utc::now(),
            origin: request.origin.clone(),
            destination: request.destination.clone(),
            departure_date: request.departure_date,
            return_date: request.return_date,
            preferences: request.preferences.clone(),
            summary: summary.clone(),
            recommendation_price: recommendation.as_ref().map(|r| r.offer.price),
        };
        if let Err(err) = self.history.append(&record).await {
            warn!(%run_id, error = %err, "failed to record analysis history");
        }

        AnalysisReport {
            summary,
            recommendation,
            top_recommendations,
            offers_considered: offers.len(),
            explanation,
        }
    }
}
