use async_trait::async_trait;
use farescout_core::collaborators::{ExplanationContext, ExplanationSource};
use farescout_core::CollaboratorError;
use serde_json::json;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Explanation collaborator backed by an OpenAI-style chat-completions API.
/// The structured decision payload is embedded in a single user prompt; the
/// first choice's content is used verbatim.
pub struct ChatExplanationClient {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
}

impl ChatExplanationClient {
    pub fn new(api_url: impl Into<String>, api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into(),
            api_key,
            model: model.into(),
        }
    }

    fn prompt(context: &ExplanationContext) -> Result<String, CollaboratorError> {
        let data = serde_json::to_value(context)
            .map_err(|e| CollaboratorError::Malformed(e.to_string()))?;
        Ok(format!(
            "As the travel cost analysis coordinator, explain your decision. Data: {data}. \
             Provide approach, alternatives, confidence, and risks."
        ))
    }
}

#[async_trait]
impl ExplanationSource for ChatExplanationClient {
    async fn explain(&self, context: &ExplanationContext) -> Result<String, CollaboratorError> {
        let body = json!({
            "model": self.model,
            "temperature": 0.3,
            "messages": [{ "role": "user", "content": Self::prompt(context)? }],
        });

        let mut request = self
            .http
            .post(&self.api_url)
            .timeout(REQUEST_TIMEOUT)
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CollaboratorError::Unavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| CollaboratorError::Unavailable(e.to_string()))?;

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| CollaboratorError::Malformed(e.to_string()))?;

        payload
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                CollaboratorError::Malformed("completion carries no message content".to_string())
            })
    }
}
