use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use farescout_api::{app, AppState};
use farescout_core::collaborators::FlightSearch;
use farescout_core::models::RawOffer;
use farescout_core::CollaboratorError;
use farescout_engine::TravelAnalyzer;

struct StubSearch {
    offers: Vec<RawOffer>,
}

#[async_trait]
impl FlightSearch for StubSearch {
    async fn search(
        &self,
        _origin: &str,
        _destination: &str,
        departure_date: NaiveDate,
        _return_date: Option<NaiveDate>,
        _travelers: u32,
    ) -> Result<Vec<RawOffer>, CollaboratorError> {
        // Offers only on the requested date keeps expectations simple.
        if departure_date == NaiveDate::parse_from_str("2025-06-10", "%Y-%m-%d").unwrap() {
            Ok(self.offers.clone())
        } else {
            Ok(Vec::new())
        }
    }
}

struct DownSearch;

#[async_trait]
impl FlightSearch for DownSearch {
    async fn search(
        &self,
        _origin: &str,
        _destination: &str,
        _departure_date: NaiveDate,
        _return_date: Option<NaiveDate>,
        _travelers: u32,
    ) -> Result<Vec<RawOffer>, CollaboratorError> {
        Err(CollaboratorError::Unavailable("search down".into()))
    }
}

fn offer(id: &str, total: &str) -> RawOffer {
    serde_json::from_value(json!({
        "id": id,
        "price": { "total": total, "currency": "USD" },
        "itineraries": [{
            "segments": [{
                "departure": { "iataCode": "MAD", "at": "2025-06-10T09:00:00" },
                "arrival": { "iataCode": "JFK", "at": "2025-06-10T12:00:00" },
                "carrierCode": "IB",
                "numberOfStops": 0
            }]
        }]
    }))
    .unwrap()
}

fn test_app(search: Arc<dyn FlightSearch>) -> axum::Router {
    app(AppState {
        analyzer: Arc::new(TravelAnalyzer::new(search)),
    })
}

async fn post_analysis(app: axum::Router, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/analysis")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_endpoint_responds() {
    let app = test_app(Arc::new(DownSearch));
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn analysis_returns_summary_and_recommendation() {
    let app = test_app(Arc::new(StubSearch {
        offers: vec![
            offer("a", "90.00"),
            offer("b", "100.00"),
            offer("c", "110.00"),
            offer("d", "200.00"),
        ],
    }));

    let (status, body) = post_analysis(
        app,
        json!({
            "origin": "MAD",
            "destination": "JFK",
            "departure_date": "2025-06-10"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["offers_considered"], 4);
    assert_eq!(body["summary"]["count"], 4);
    assert_eq!(body["summary"]["median"], 105.0);
    assert_eq!(body["recommendation"]["id"], "b");
    assert_eq!(body["top_recommendations"].as_array().unwrap().len(), 3);
    assert!(body["explanation"].as_str().unwrap().contains("4 offers"));
}

#[tokio::test]
async fn unreachable_upstream_yields_empty_report() {
    let app = test_app(Arc::new(DownSearch));

    let (status, body) = post_analysis(
        app,
        json!({
            "origin": "MAD",
            "destination": "JFK",
            "departure_date": "2025-06-10",
            "return_date": "2025-06-17",
            "travelers": 2
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["offers_considered"], 0);
    assert!(body["summary"].is_null());
    assert!(body["recommendation"].is_null());
    assert!(!body["explanation"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn invalid_request_is_rejected_before_the_engine() {
    let app = test_app(Arc::new(DownSearch));

    let (status, body) = post_analysis(
        app,
        json!({
            "origin": "MADRID",
            "destination": "JFK",
            "departure_date": "2025-06-10"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("origin"));
}

#[tokio::test]
async fn preferences_are_honored_end_to_end() {
    let redeye: RawOffer = serde_json::from_value(json!({
        "id": "redeye",
        "price": { "total": "80.00", "currency": "USD" },
        "itineraries": [{
            "segments": [{
                "departure": { "at": "2025-06-10T03:00:00" },
                "numberOfStops": 0
            }]
        }]
    }))
    .unwrap();

    let app = test_app(Arc::new(StubSearch {
        offers: vec![redeye, offer("daytime", "120.00")],
    }));

    let (status, body) = post_analysis(
        app,
        json!({
            "origin": "MAD",
            "destination": "JFK",
            "departure_date": "2025-06-10",
            "preferences": { "exclude_redeye": true }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["offers_considered"], 1);
    assert_eq!(body["recommendation"]["id"], "daytime");
}
