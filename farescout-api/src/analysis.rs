use axum::{extract::State, routing::post, Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;

use farescout_core::models::{AnalysisReport, Preferences, TravelRequest};

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/analysis", post(run_analysis))
}

#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    pub return_date: Option<String>,
    #[serde(default = "default_travelers")]
    pub travelers: u32,
    pub currency: Option<String>,
    #[serde(default)]
    pub preferences: Preferences,
}

fn default_travelers() -> u32 {
    1
}

/// POST /v1/analysis
/// Run the heuristic offer analysis for one route and date window.
pub async fn run_analysis(
    State(state): State<AppState>,
    Json(req): Json<AnalysisRequest>,
) -> Result<Json<AnalysisReport>, AppError> {
    let request = validate(req)?;
    tracing::info!(
        origin = %request.origin,
        destination = %request.destination,
        departure = %request.departure_date,
        "analysis requested"
    );
    let report = state.analyzer.analyze(&request).await;
    Ok(Json(report))
}

/// Contract violations are rejected here; nothing malformed reaches the
/// engine.
fn validate(req: AnalysisRequest) -> Result<TravelRequest, AppError> {
    let origin = airport_code(&req.origin, "origin")?;
    let destination = airport_code(&req.destination, "destination")?;

    let departure_date = parse_date(&req.departure_date, "departure_date")?;
    let return_date = req
        .return_date
        .as_deref()
        .map(|raw| parse_date(raw, "return_date"))
        .transpose()?;
    if let Some(return_date) = return_date {
        if return_date < departure_date {
            return Err(AppError::ValidationError(
                "return_date must not precede departure_date".to_string(),
            ));
        }
    }

    if req.travelers < 1 || req.travelers > 9 {
        return Err(AppError::ValidationError(
            "travelers must be between 1 and 9".to_string(),
        ));
    }

    let currency = req.currency.unwrap_or_else(|| "USD".to_string());
    let currency = currency.trim().to_uppercase();
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(AppError::ValidationError(
            "currency must be a 3-letter code".to_string(),
        ));
    }

    Ok(TravelRequest {
        origin,
        destination,
        departure_date,
        return_date,
        travelers: req.travelers,
        currency,
        preferences: req.preferences,
    })
}

fn airport_code(raw: &str, field: &str) -> Result<String, AppError> {
    let code = raw.trim().to_uppercase();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(AppError::ValidationError(format!(
            "{field} must be a 3-letter IATA code"
        )));
    }
    Ok(code)
}

fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::ValidationError(format!("{field} must be an ISO date (YYYY-MM-DD)")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> AnalysisRequest {
        AnalysisRequest {
            origin: "mad".to_string(),
            destination: "JFK".to_string(),
            departure_date: "2025-06-10".to_string(),
            return_date: None,
            travelers: 1,
            currency: None,
            preferences: Preferences::default(),
        }
    }

    #[test]
    fn codes_are_trimmed_and_uppercased() {
        let request = validate(base_request()).unwrap();
        assert_eq!(request.origin, "MAD");
        assert_eq!(request.currency, "USD");
    }

    #[test]
    fn rejects_bad_airport_codes_and_dates() {
        let mut req = base_request();
        req.origin = "MADRID".to_string();
        assert!(validate(req).is_err());

        let mut req = base_request();
        req.departure_date = "10/06/2025".to_string();
        assert!(validate(req).is_err());

        let mut req = base_request();
        req.return_date = Some("2025-06-01".to_string());
        assert!(validate(req).is_err());
    }

    #[test]
    fn rejects_out_of_range_travelers_and_currency() {
        let mut req = base_request();
        req.travelers = 0;
        assert!(validate(req).is_err());

        let mut req = base_request();
        req.travelers = 10;
        assert!(validate(req).is_err());

        let mut req = base_request();
        req.currency = Some("DOLLARS".to_string());
        assert!(validate(req).is_err());
    }
}
