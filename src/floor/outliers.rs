//! Robust outlier rejection.
//!
//! Values further than 3 median absolute deviations from the median are
//! dropped. The MAD is unscaled (no normal-consistency constant), and the
//! bounds are inclusive, so a degenerate window (all values equal, or too few
//! points for any spread) collapses the band to the median itself and keeps
//! only exact matches. That collapse is intended, not special-cased.

use std::cmp::Ordering;

/// Median of a pre-sorted slice: middle element, or the mean of the two
/// middle elements for even lengths. Callers guarantee non-empty input.
fn median_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    let mid = n / 2;
    if n % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/// Remove outliers from `values`, preserving order.
///
/// Keeps the subsequence inside `[median - 3*MAD, median + 3*MAD]` inclusive.
/// An empty input yields an empty output; a single value always survives.
pub fn remove_outliers(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let median = median_sorted(&sorted_copy(values));
    let deviations: Vec<f64> = values.iter().map(|x| (x - median).abs()).collect();
    let mad = median_sorted(&sorted_copy(&deviations));

    let lb = median - 3.0 * mad;
    let ub = median + 3.0 * mad;

    values
        .iter()
        .copied()
        .filter(|x| *x >= lb && *x <= ub)
        .collect()
}
