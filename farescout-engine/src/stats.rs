use farescout_core::models::PriceSummary;
use std::cmp::Ordering;

/// Distribution statistics over normalized prices. Empty input yields `None`
/// rather than a zero-filled summary.
pub fn summarize(prices: &[f64]) -> Option<PriceSummary> {
    if prices.is_empty() {
        return None;
    }
    let mut sorted = prices.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    Some(PriceSummary {
        count: sorted.len(),
        min: sorted[0],
        p25: percentile(&sorted, 25.0),
        median: median(&sorted),
        p75: percentile(&sorted, 75.0),
        max: sorted[sorted.len() - 1],
    })
}

/// Linear interpolation between closest ranks over a sorted slice:
/// k = (n-1)*p/100, value = v[floor]*(ceil-k) + v[ceil]*(k-floor).
pub fn percentile(sorted: &[f64], pct: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let k = (sorted.len() - 1) as f64 * pct / 100.0;
    let floor = k.floor() as usize;
    let ceil = k.ceil() as usize;
    if floor == ceil {
        return sorted[floor];
    }
    sorted[floor] * (ceil as f64 - k) + sorted[ceil] * (k - floor as f64)
}

/// Exact median: mean of the two middle values for even-length input.
fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    let mid = n / 2;
    if n % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_has_no_summary() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn interpolated_percentiles_on_four_values() {
        let sorted = [10.0, 20.0, 30.0, 40.0];
        assert_eq!(percentile(&sorted, 25.0), 17.5);
        assert_eq!(percentile(&sorted, 50.0), 25.0);
        assert_eq!(percentile(&sorted, 75.0), 32.5);
        assert_eq!(percentile(&sorted, 0.0), 10.0);
        assert_eq!(percentile(&sorted, 100.0), 40.0);
    }

    #[test]
    fn summary_of_four_values() {
        let summary = summarize(&[40.0, 10.0, 30.0, 20.0]).unwrap();
        assert_eq!(summary.count, 4);
        assert_eq!(summary.min, 10.0);
        assert_eq!(summary.p25, 17.5);
        assert_eq!(summary.median, 25.0);
        assert_eq!(summary.p75, 32.5);
        assert_eq!(summary.max, 40.0);
    }

    #[test]
    fn odd_length_median_is_middle_value() {
        let summary = summarize(&[3.0, 1.0, 2.0]).unwrap();
        assert_eq!(summary.median, 2.0);
    }

    #[test]
    fn single_value_collapses_all_statistics() {
        let summary = summarize(&[99.5]).unwrap();
        assert_eq!(summary.min, 99.5);
        assert_eq!(summary.p25, 99.5);
        assert_eq!(summary.median, 99.5);
        assert_eq!(summary.p75, 99.5);
        assert_eq!(summary.max, 99.5);
    }
}
