use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Requested fare cabin. `Any` disables the cabin filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CabinClass {
    #[default]
    Any,
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl CabinClass {
    pub fn as_code(self) -> &'static str {
        match self {
            Self::Any => "ANY",
            Self::Economy => "ECONOMY",
            Self::PremiumEconomy => "PREMIUM_ECONOMY",
            Self::Business => "BUSINESS",
            Self::First => "FIRST",
        }
    }

    pub fn is_any(self) -> bool {
        self == Self::Any
    }

    /// Compare against a fare-detail cabin string from an offer.
    pub fn matches(self, fare_cabin: &str) -> bool {
        fare_cabin.trim().to_uppercase() == self.as_code()
    }
}

/// Caller constraints applied to every offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub max_stops: u32,
    pub preferred_carriers: Vec<String>,
    pub exclude_redeye: bool,
    pub min_layover_minutes: i64,
    pub max_total_travel_minutes: i64,
    pub cabin_class: CabinClass,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            max_stops: 1,
            preferred_carriers: Vec::new(),
            exclude_redeye: false,
            min_layover_minutes: 0,
            max_total_travel_minutes: 0,
            cabin_class: CabinClass::Any,
        }
    }
}

impl Preferences {
    /// Uppercased carrier codes for membership checks.
    pub fn carrier_set(&self) -> HashSet<String> {
        self.preferred_carriers
            .iter()
            .map(|c| c.trim().to_uppercase())
            .collect()
    }
}

/// Immutable analysis input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelRequest {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub travelers: u32,
    pub currency: String,
    pub preferences: Preferences,
}

// ============================================================================
// Raw offers (Amadeus Flight Offers Search shape)
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawOffer {
    pub id: Option<String>,
    pub price: Option<OfferPrice>,
    pub itineraries: Vec<Itinerary>,
    pub traveler_pricings: Vec<TravelerPricing>,
}

impl RawOffer {
    /// Total amount and native currency, or `None` when the price block is
    /// missing or unparseable (such offers are skipped, never fatal).
    pub fn total_price(&self) -> Option<(f64, String)> {
        let price = self.price.as_ref()?;
        let amount = price
            .total
            .as_deref()
            .or(price.grand_total.as_deref())?
            .parse::<f64>()
            .ok()?;
        let currency = price
            .currency
            .as_deref()
            .unwrap_or("USD")
            .to_uppercase();
        Some((amount, currency))
    }

    /// Fare cabin of the first traveler pricing's first segment, if present.
    pub fn fare_cabin(&self) -> Option<&str> {
        self.traveler_pricings
            .first()?
            .fare_details_by_segment
            .first()?
            .cabin
            .as_deref()
            .filter(|c| !c.is_empty())
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.itineraries.iter().flat_map(|i| i.segments.iter())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OfferPrice {
    pub total: Option<String>,
    pub grand_total: Option<String>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Itinerary {
    pub duration: Option<String>,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Segment {
    pub departure: Option<SegmentPoint>,
    pub arrival: Option<SegmentPoint>,
    pub carrier_code: Option<String>,
    pub operating: Option<OperatingCarrier>,
    pub duration: Option<String>,
    pub number_of_stops: u32,
}

impl Segment {
    /// Operating carrier when known, else the marketing carrier.
    pub fn carrier(&self) -> Option<&str> {
        self.operating
            .as_ref()
            .and_then(|o| o.carrier_code.as_deref())
            .or(self.carrier_code.as_deref())
            .filter(|c| !c.is_empty())
    }

    pub fn departure_at(&self) -> Option<NaiveDateTime> {
        self.departure.as_ref()?.at.as_deref().and_then(parse_timestamp)
    }

    pub fn arrival_at(&self) -> Option<NaiveDateTime> {
        self.arrival.as_ref()?.at.as_deref().and_then(parse_timestamp)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SegmentPoint {
    pub iata_code: Option<String>,
    pub at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperatingCarrier {
    pub carrier_code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TravelerPricing {
    pub fare_details_by_segment: Vec<FareDetails>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FareDetails {
    pub cabin: Option<String>,
}

/// Parse an offer timestamp: local wall-clock time as written. Amadeus emits
/// offset-free local timestamps; RFC 3339 with an offset is also accepted.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local())
}

// ============================================================================
// Derived results
// ============================================================================

/// An offer that passed all filters, priced in the target currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedOffer {
    pub id: Option<String>,
    pub price: f64,
    pub currency: String,
    pub itineraries: Vec<Itinerary>,
    pub highlights: Highlights,
}

/// Quick per-offer summary for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Highlights {
    pub stops: u32,
    pub carriers: Vec<String>,
    pub depart_at: Option<String>,
    pub arrive_at: Option<String>,
}

impl Highlights {
    pub fn collect(itineraries: &[Itinerary]) -> Self {
        let mut highlights = Self::default();
        for segment in itineraries.iter().flat_map(|i| i.segments.iter()) {
            highlights.stops += segment.number_of_stops;
            if let Some(carrier) = segment.carrier() {
                if !highlights.carriers.iter().any(|c| c == carrier) {
                    highlights.carriers.push(carrier.to_string());
                }
            }
            // ISO timestamps compare lexicographically.
            if let Some(dep) = segment.departure.as_ref().and_then(|p| p.at.as_deref()) {
                if highlights.depart_at.as_deref().map_or(true, |cur| dep < cur) {
                    highlights.depart_at = Some(dep.to_string());
                }
            }
            if let Some(arr) = segment.arrival.as_ref().and_then(|p| p.at.as_deref()) {
                if highlights.arrive_at.as_deref().map_or(true, |cur| arr > cur) {
                    highlights.arrive_at = Some(arr.to_string());
                }
            }
        }
        highlights
    }
}

/// Distribution of surviving normalized prices, target currency throughout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    pub count: usize,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

/// A top offer with its pros/cons annotations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedOffer {
    #[serde(flatten)]
    pub offer: NormalizedOffer,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

/// Result of one analysis run. Empty summary/recommendation signal "no
/// viable offers"; the operation itself never fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub summary: Option<PriceSummary>,
    pub recommendation: Option<RankedOffer>,
    pub top_recommendations: Vec<RankedOffer>,
    pub offers_considered: usize,
    pub explanation: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_offer_deserializes_amadeus_payload() {
        let offer: RawOffer = serde_json::from_value(json!({
            "id": "1",
            "price": { "total": "123.45", "currency": "EUR" },
            "itineraries": [{
                "segments": [{
                    "departure": { "iataCode": "MAD", "at": "2025-06-10T08:15:00" },
                    "arrival": { "iataCode": "JFK", "at": "2025-06-10T11:05:00" },
                    "carrierCode": "IB",
                    "duration": "PT8H50M",
                    "numberOfStops": 0
                }]
            }],
            "travelerPricings": [{
                "fareDetailsBySegment": [{ "cabin": "ECONOMY" }]
            }]
        }))
        .expect("valid payload");

        assert_eq!(offer.total_price(), Some((123.45, "EUR".to_string())));
        assert_eq!(offer.fare_cabin(), Some("ECONOMY"));
        assert_eq!(offer.segments().count(), 1);
    }

    #[test]
    fn total_price_prefers_total_over_grand_total() {
        let offer: RawOffer = serde_json::from_value(json!({
            "price": { "total": "100.00", "grandTotal": "110.00" }
        }))
        .unwrap();
        assert_eq!(offer.total_price(), Some((100.0, "USD".to_string())));

        let offer: RawOffer = serde_json::from_value(json!({
            "price": { "grandTotal": "110.00", "currency": "usd" }
        }))
        .unwrap();
        assert_eq!(offer.total_price(), Some((110.0, "USD".to_string())));
    }

    #[test]
    fn total_price_absent_on_malformed_amount() {
        let offer: RawOffer = serde_json::from_value(json!({
            "price": { "total": "not-a-number" }
        }))
        .unwrap();
        assert!(offer.total_price().is_none());
        assert!(RawOffer::default().total_price().is_none());
    }

    #[test]
    fn segment_prefers_operating_carrier() {
        let segment: Segment = serde_json::from_value(json!({
            "carrierCode": "AA",
            "operating": { "carrierCode": "BA" }
        }))
        .unwrap();
        assert_eq!(segment.carrier(), Some("BA"));

        let segment: Segment = serde_json::from_value(json!({ "carrierCode": "AA" })).unwrap();
        assert_eq!(segment.carrier(), Some("AA"));
    }

    #[test]
    fn parse_timestamp_accepts_local_and_rfc3339() {
        let local = parse_timestamp("2025-06-10T03:00:00").unwrap();
        assert_eq!(local.format("%H").to_string(), "03");

        let zoned = parse_timestamp("2025-06-10T03:00:00+02:00").unwrap();
        assert_eq!(zoned.format("%H").to_string(), "03");

        assert!(parse_timestamp("tomorrow-ish").is_none());
    }

    #[test]
    fn highlights_aggregate_stops_carriers_and_times() {
        let itineraries: Vec<Itinerary> = serde_json::from_value(json!([
            {
                "segments": [
                    {
                        "departure": { "at": "2025-06-10T08:00:00" },
                        "arrival": { "at": "2025-06-10T11:00:00" },
                        "carrierCode": "LH",
                        "numberOfStops": 1
                    },
                    {
                        "departure": { "at": "2025-06-10T13:00:00" },
                        "arrival": { "at": "2025-06-10T17:00:00" },
                        "carrierCode": "UA",
                        "numberOfStops": 0
                    }
                ]
            },
            {
                "segments": [{
                    "departure": { "at": "2025-06-17T09:00:00" },
                    "arrival": { "at": "2025-06-17T19:30:00" },
                    "carrierCode": "LH",
                    "numberOfStops": 0
                }]
            }
        ]))
        .unwrap();

        let highlights = Highlights::collect(&itineraries);
        assert_eq!(highlights.stops, 1);
        assert_eq!(highlights.carriers, vec!["LH", "UA"]);
        assert_eq!(highlights.depart_at.as_deref(), Some("2025-06-10T08:00:00"));
        assert_eq!(highlights.arrive_at.as_deref(), Some("2025-06-17T19:30:00"));
    }

    #[test]
    fn cabin_class_matching() {
        assert!(CabinClass::Economy.matches("economy"));
        assert!(CabinClass::PremiumEconomy.matches("PREMIUM_ECONOMY"));
        assert!(!CabinClass::Business.matches("ECONOMY"));
        assert!(CabinClass::Any.is_any());
    }
}
