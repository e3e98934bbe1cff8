//! Percentile Computation

use std::cmp::Ordering;

/// Compute a single percentile from samples.
///
/// Uses linear interpolation between nearest ranks. Empty input yields 0.0.
pub fn compute_percentile(samples: &[f64], percentile: f64) -> f64 {
    match samples {
        [] => return 0.0,
        [only] => return *only,
        _ => {}
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let n = sorted.len();
    let rank = (percentile / 100.0).clamp(0.0, 1.0) * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = (lower_idx + 1).min(n - 1);
    let fraction = rank - lower_idx as f64;

    sorted[lower_idx] + fraction * (sorted[upper_idx] - sorted[lower_idx])
}

/// Median of the samples
pub fn compute_median(samples: &[f64]) -> f64 {
    compute_percentile(samples, 50.0)
}
