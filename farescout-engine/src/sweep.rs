use chrono::{Duration, NaiveDate};
use farescout_core::collaborators::FlightSearch;
use farescout_core::models::{RawOffer, TravelRequest};
use moka::future::Cache;
use moka::policy::EvictionPolicy;
use std::sync::Arc;
use tracing::{debug, warn};

/// Symmetric sweep radius around the requested dates.
pub const DEFAULT_WINDOW_DAYS: i64 = 3;
/// Distinct route/date/traveler tuples kept in the process-wide cache.
pub const DEFAULT_CACHE_CAPACITY: u64 = 64;

/// Cache key: one aggregated offer list per route/date/traveler tuple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SweepKey {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub travelers: u32,
}

impl SweepKey {
    pub fn for_request(request: &TravelRequest) -> Self {
        Self {
            origin: request.origin.clone(),
            destination: request.destination.clone(),
            departure_date: request.departure_date,
            return_date: request.return_date,
            travelers: request.travelers,
        }
    }
}

/// Expand a date pair into the swept window: 2*window_days + 1 pairs, with
/// the return date (when present) shifted by the same offset.
pub fn expand_dates(
    departure_date: NaiveDate,
    return_date: Option<NaiveDate>,
    window_days: i64,
) -> Vec<(NaiveDate, Option<NaiveDate>)> {
    (-window_days..=window_days)
        .map(|offset| {
            (
                departure_date + Duration::days(offset),
                return_date.map(|r| r + Duration::days(offset)),
            )
        })
        .collect()
}

/// Queries the flight-search collaborator once per swept date pair and
/// concatenates the results. A failed date contributes zero offers. The
/// aggregated list is cached for the life of the process in a bounded LRU;
/// concurrent misses for the same key may duplicate upstream calls, which is
/// wasteful but not incorrect.
pub struct OfferSweeper {
    search: Arc<dyn FlightSearch>,
    cache: Cache<SweepKey, Arc<Vec<RawOffer>>>,
    window_days: i64,
}

impl OfferSweeper {
    pub fn new(search: Arc<dyn FlightSearch>) -> Self {
        Self::with_settings(search, DEFAULT_CACHE_CAPACITY, DEFAULT_WINDOW_DAYS)
    }

    pub fn with_settings(search: Arc<dyn FlightSearch>, capacity: u64, window_days: i64) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .eviction_policy(EvictionPolicy::lru())
            .build();
        Self {
            search,
            cache,
            window_days,
        }
    }

    pub async fn collect(&self, key: &SweepKey) -> Arc<Vec<RawOffer>> {
        if let Some(cached) = self.cache.get(key).await {
            debug!(origin = %key.origin, destination = %key.destination, "sweep cache hit");
            return cached;
        }

        let mut aggregated = Vec::new();
        for (departure, ret) in expand_dates(key.departure_date, key.return_date, self.window_days)
        {
            match self
                .search
                .search(&key.origin, &key.destination, departure, ret, key.travelers)
                .await
            {
                Ok(mut offers) => aggregated.append(&mut offers),
                Err(err) => {
                    warn!(%departure, error = %err, "flight search unavailable for swept date");
                }
            }
        }

        let entry = Arc::new(aggregated);
        self.cache.insert(key.clone(), Arc::clone(&entry)).await;
        entry
    }
}
