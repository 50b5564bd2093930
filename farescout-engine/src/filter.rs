use farescout_core::models::{Preferences, RawOffer};
use std::collections::HashSet;

/// Decide whether an offer satisfies the caller's constraint set. Predicates
/// run in a fixed order and short-circuit on the first failure. A timestamp
/// that fails to parse skips that segment for that check only.
pub fn passes_filters(offer: &RawOffer, prefs: &Preferences) -> bool {
    if !within_stop_limit(offer, prefs.max_stops) {
        return false;
    }
    if !matches_cabin(offer, prefs) {
        return false;
    }
    if prefs.exclude_redeye && has_redeye_departure(offer) {
        return false;
    }
    let carriers = prefs.carrier_set();
    if !carriers.is_empty() && !all_segments_on_carriers(offer, &carriers) {
        return false;
    }
    if prefs.min_layover_minutes > 0 && !honors_min_layover(offer, prefs.min_layover_minutes) {
        return false;
    }
    if prefs.max_total_travel_minutes > 0
        && total_travel_minutes(offer) > prefs.max_total_travel_minutes as f64
    {
        return false;
    }
    true
}

/// Stop counts summed across every segment of every itinerary.
fn within_stop_limit(offer: &RawOffer, max_stops: u32) -> bool {
    let total: u32 = offer.segments().map(|s| s.number_of_stops).sum();
    total <= max_stops
}

/// Offers without fare-cabin data are not rejected on this basis.
fn matches_cabin(offer: &RawOffer, prefs: &Preferences) -> bool {
    if prefs.cabin_class.is_any() {
        return true;
    }
    match offer.fare_cabin() {
        Some(cabin) => prefs.cabin_class.matches(cabin),
        None => true,
    }
}

/// A red-eye departs in local [00:00, 05:00).
fn has_redeye_departure(offer: &RawOffer) -> bool {
    use chrono::Timelike;
    offer
        .segments()
        .filter_map(|s| s.departure_at())
        .any(|dep| dep.hour() < 5)
}

/// Every segment with a known carrier must be in the preferred set.
fn all_segments_on_carriers(offer: &RawOffer, carriers: &HashSet<String>) -> bool {
    for segment in offer.segments() {
        if let Some(carrier) = segment.carrier() {
            if !carriers.contains(&carrier.to_uppercase()) {
                return false;
            }
        }
    }
    true
}

/// Gap between consecutive segments must reach the minimum, per itinerary.
fn honors_min_layover(offer: &RawOffer, min_minutes: i64) -> bool {
    for itinerary in &offer.itineraries {
        for pair in itinerary.segments.windows(2) {
            let (Some(arr), Some(dep)) = (pair[0].arrival_at(), pair[1].departure_at()) else {
                continue;
            };
            let gap = (dep - arr).num_seconds() as f64 / 60.0;
            if gap < min_minutes as f64 {
                return false;
            }
        }
    }
    true
}

/// Sum of segment durations across all itineraries, in fractional minutes.
/// Prefers the ISO duration string, falls back to arrival minus departure.
fn total_travel_minutes(offer: &RawOffer) -> f64 {
    let mut total = 0.0;
    for segment in offer.segments() {
        if let Some(duration) = segment.duration.as_deref().filter(|d| d.starts_with("PT")) {
            total += parse_duration_minutes(duration) as f64;
        } else if let (Some(dep), Some(arr)) = (segment.departure_at(), segment.arrival_at()) {
            total += (arr - dep).num_seconds() as f64 / 60.0;
        }
    }
    total
}

/// Minimal parser for durations of the form "PT5H35M" / "PT2H" / "PT45M".
pub fn parse_duration_minutes(iso: &str) -> i64 {
    let Some(mut rest) = iso.strip_prefix("PT") else {
        return 0;
    };
    let mut hours = 0i64;
    let mut minutes = 0i64;
    if let Some(idx) = rest.find('H') {
        hours = rest[..idx].parse().unwrap_or(0);
        rest = &rest[idx + 1..];
    }
    if let Some(idx) = rest.find('M') {
        minutes = rest[..idx].parse().unwrap_or(0);
    }
    hours * 60 + minutes
}
