//! Exact linear-interpolation quantile.

use std::cmp::Ordering;

/// Value at quantile `q` of the non-missing entries of `values`.
///
/// NaN entries are dropped before computation, matching the upstream data
/// contract where NaN marks a missing observation. The remaining values are
/// sorted and the quantile is linearly interpolated between order statistics
/// at rank `h = (n - 1) * q`. `q` is clamped to `[0, 1]`.
///
/// Returns `None` when nothing remains after dropping missing values;
/// callers own the fallback policy for empty windows.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    let mut kept: Vec<f64> = values.iter().copied().filter(|x| !x.is_nan()).collect();
    if kept.is_empty() {
        return None;
    }
    if kept.len() == 1 {
        return Some(kept[0]);
    }

    let q = q.clamp(0.0, 1.0);
    kept.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let h = (kept.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    if lo == hi {
        return Some(kept[lo]);
    }

    let w = h - lo as f64;
    Some(kept[lo] + (kept[hi] - kept[lo]) * w)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_zero_is_min() {
        let values = [3.0, 1.0, 4.0, 1.5, 9.0];
        assert_eq!(quantile(&values, 0.0), Some(1.0));
    }

    #[test]
    fn test_quantile_one_is_max() {
        let values = [3.0, 1.0, 4.0, 1.5, 9.0];
        assert_eq!(quantile(&values, 1.0), Some(9.0));
    }

    #[test]
    fn test_median_of_even_length_interpolates() {
        assert_eq!(quantile(&[1.0, 2.0, 3.0, 4.0], 0.5), Some(2.5));
    }

    #[test]
    fn test_interpolation_between_order_statistics() {
        // h = 3 * 0.25 = 0.75 => 1 + 0.75 * (2 - 1)
        assert_eq!(quantile(&[1.0, 2.0, 3.0, 4.0], 0.25), Some(1.75));
    }

    #[test]
    fn test_unsorted_input_handled() {
        assert_eq!(quantile(&[4.0, 1.0, 3.0, 2.0], 0.25), Some(1.75));
    }

    #[test]
    fn test_nan_entries_dropped() {
        let values = [f64::NAN, 1.0, f64::NAN, 3.0];
        assert_eq!(quantile(&values, 0.5), Some(2.0));
    }

    #[test]
    fn test_all_nan_is_empty() {
        assert_eq!(quantile(&[f64::NAN, f64::NAN], 0.5), None);
    }

    #[test]
    fn test_empty_input_is_none() {
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn test_single_value_at_any_quantile() {
        assert_eq!(quantile(&[7.0], 0.0), Some(7.0));
        assert_eq!(quantile(&[7.0], 0.37), Some(7.0));
        assert_eq!(quantile(&[7.0], 1.0), Some(7.0));
    }

    #[test]
    fn test_out_of_range_q_clamped() {
        let values = [1.0, 2.0, 3.0];
        assert_eq!(quantile(&values, -0.5), Some(1.0));
        assert_eq!(quantile(&values, 1.5), Some(3.0));
    }
}
