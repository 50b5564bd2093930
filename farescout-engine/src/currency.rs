use farescout_core::collaborators::FxRates;
use std::sync::Arc;
use tracing::debug;

/// Static conversion table consulted before any live lookup.
const STATIC_RATES: &[(&str, &str, f64)] = &[("EUR", "USD", 1.08), ("USD", "EUR", 0.93)];

/// Converts offer prices into the target currency. Lookup order: identity,
/// static table, optional live collaborator, then fail-open 1:1 so an FX
/// outage never zeroes out the result set.
pub struct CurrencyNormalizer {
    live: Option<Arc<dyn FxRates>>,
}

impl CurrencyNormalizer {
    pub fn new(live: Option<Arc<dyn FxRates>>) -> Self {
        Self { live }
    }

    pub async fn convert(&self, amount: f64, from_currency: &str, to_currency: &str) -> f64 {
        if from_currency == to_currency {
            return amount;
        }
        if let Some(rate) = static_rate(from_currency, to_currency) {
            return round2(amount * rate);
        }
        if let Some(live) = &self.live {
            match live.rate(from_currency, to_currency).await {
                Ok(rate) if rate > 0.0 => return round2(amount * rate),
                Ok(rate) => {
                    debug!(from_currency, to_currency, rate, "ignoring non-positive live rate");
                }
                Err(err) => {
                    debug!(from_currency, to_currency, error = %err, "live FX lookup failed");
                }
            }
        }
        amount
    }
}

fn static_rate(from_currency: &str, to_currency: &str) -> Option<f64> {
    STATIC_RATES
        .iter()
        .find(|(from, to, _)| *from == from_currency && *to == to_currency)
        .map(|(_, _, rate)| *rate)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
