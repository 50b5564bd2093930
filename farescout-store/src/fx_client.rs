use async_trait::async_trait;
use farescout_core::collaborators::FxRates;
use farescout_core::CollaboratorError;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Live FX lookup against a configured convert endpoint
/// (exchangerate.host style: `{url}?from=EUR&to=USD`).
pub struct HttpFxRates {
    http: reqwest::Client,
    url: String,
}

impl HttpFxRates {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl FxRates for HttpFxRates {
    async fn rate(
        &self,
        from_currency: &str,
        to_currency: &str,
    ) -> Result<f64, CollaboratorError> {
        let response = self
            .http
            .get(&self.url)
            .timeout(REQUEST_TIMEOUT)
            .query(&[("from", from_currency), ("to", to_currency)])
            .send()
            .await
            .map_err(|e| CollaboratorError::Unavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| CollaboratorError::Unavailable(e.to_string()))?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| CollaboratorError::Malformed(e.to_string()))?;

        body.pointer("/info/rate")
            .and_then(|v| v.as_f64())
            .or_else(|| body.get("result").and_then(|v| v.as_f64()))
            .ok_or_else(|| {
                CollaboratorError::Malformed("FX response carries no rate".to_string())
            })
    }
}
