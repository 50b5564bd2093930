use farescout_core::collaborators::{ExplanationContext, ExplanationSource};
use tracing::debug;

/// Ask the collaborator for a rationale; any failure or empty response uses
/// the deterministic template instead. Never fails the request.
pub async fn generate_explanation(
    source: &dyn ExplanationSource,
    context: &ExplanationContext,
) -> String {
    match source.explain(context).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => fallback_explanation(context),
        Err(err) => {
            debug!(error = %err, "explanation collaborator unavailable, using template");
            fallback_explanation(context)
        }
    }
}

/// Deterministic rationale: offer count, price range, median, active filters,
/// and a near-median note when a recommendation exists.
pub fn fallback_explanation(context: &ExplanationContext) -> String {
    let Some(summary) = &context.summary else {
        return "No price summary available. Try different dates or relaxing filters.".to_string();
    };

    let mut text = format!(
        "We evaluated {} offers over {}. Price range: {:.2}-{:.2} {}. Median: {:.2} {}.",
        summary.count,
        context.date_window,
        summary.min,
        summary.max,
        context.currency,
        summary.median,
        context.currency,
    );

    let prefs = &context.preferences;
    let carriers = if prefs.preferred_carriers.is_empty() {
        "none".to_string()
    } else {
        prefs.preferred_carriers.join(",")
    };
    text.push_str(&format!(
        " Filters applied: max_stops={}, exclude_redeye={}, preferred_carriers=[{}].",
        prefs.max_stops, prefs.exclude_redeye, carriers,
    ));

    if let Some(price) = context.recommendation_price {
        text.push_str(&format!(
            " Recommended option balances cost near median ({:.2} {}) and constraints.",
            price, context.currency,
        ));
    }

    text
}
