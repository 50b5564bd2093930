use farescout_core::models::{NormalizedOffer, RankedOffer};
use std::cmp::Ordering;

/// How many ranked offers are surfaced at most.
pub const TOP_N: usize = 3;

/// Order offers by closeness to the median with a soft cheapness tie-break
/// and return the top candidates, annotated. The first entry (if any) is the
/// recommendation.
pub fn top_recommendations(
    offers: &[NormalizedOffer],
    median: Option<f64>,
) -> Vec<RankedOffer> {
    let mut ranked: Vec<(f64, &NormalizedOffer)> = offers
        .iter()
        .map(|offer| (score(offer.price, median), offer))
        .collect();
    // Stable sort keeps input order on exact score ties.
    ranked.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
    ranked
        .into_iter()
        .take(TOP_N)
        .map(|(_, offer)| annotate(offer, median))
        .collect()
}

/// Score preserved verbatim from the source behavior: distance to the median
/// plus one percent of the price, or the bare price when no median exists.
pub fn score(price: f64, median: Option<f64>) -> f64 {
    match median {
        Some(median) => (price - median).abs() + 0.01 * price,
        None => price,
    }
}

fn annotate(offer: &NormalizedOffer, median: Option<f64>) -> RankedOffer {
    let mut pros = Vec::new();
    let mut cons = Vec::new();

    if let Some(median) = median {
        if offer.price <= median {
            pros.push("priced at or below median".to_string());
        } else {
            cons.push("priced above median".to_string());
        }
    }

    let nonstop = offer
        .itineraries
        .iter()
        .flat_map(|i| i.segments.iter())
        .all(|s| s.number_of_stops == 0);
    if nonstop {
        pros.push("non-stop segments".to_string());
    } else {
        cons.push("one or more stops".to_string());
    }

    RankedOffer {
        offer: offer.clone(),
        pros,
        cons,
    }
}
