use async_trait::async_trait;
use chrono::NaiveDate;
use farescout_core::collaborators::FlightSearch;
use farescout_core::models::RawOffer;
use farescout_core::CollaboratorError;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const MAX_RESULTS_PER_DATE: u32 = 10;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin pass-through client for an Amadeus-style flight-offers endpoint.
/// Any transport or decode failure maps to the error marker so a single
/// swept date degrades to zero offers upstream.
pub struct HttpFlightSearch {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SearchEnvelope {
    data: Vec<RawOffer>,
}

impl HttpFlightSearch {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl FlightSearch for HttpFlightSearch {
    async fn search(
        &self,
        origin: &str,
        destination: &str,
        departure_date: NaiveDate,
        return_date: Option<NaiveDate>,
        travelers: u32,
    ) -> Result<Vec<RawOffer>, CollaboratorError> {
        let mut query = vec![
            ("originLocationCode", origin.to_string()),
            ("destinationLocationCode", destination.to_string()),
            ("departureDate", departure_date.to_string()),
            ("adults", travelers.to_string()),
            ("max", MAX_RESULTS_PER_DATE.to_string()),
        ];
        if let Some(return_date) = return_date {
            query.push(("returnDate", return_date.to_string()));
        }

        let mut request = self
            .http
            .get(&self.base_url)
            .timeout(REQUEST_TIMEOUT)
            .query(&query);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CollaboratorError::Unavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| CollaboratorError::Unavailable(e.to_string()))?;

        let envelope: SearchEnvelope = response
            .json()
            .await
            .map_err(|e| CollaboratorError::Malformed(e.to_string()))?;

        debug!(
            origin,
            destination,
            %departure_date,
            offers = envelope.data.len(),
            "flight search returned"
        );
        Ok(envelope.data)
    }
}
