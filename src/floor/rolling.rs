//! Trailing rolling mean over below-target signals.

/// Per-position trailing mean of the last `window` boolean signals, cast to
/// {0, 1}. Positions that have seen fewer than `window` signals (their own
/// included) carry no value.
///
/// Signals must be in time order; the caller establishes that ordering once,
/// upstream.
pub fn rolling_means(signals: &[bool], window: usize) -> Vec<Option<f64>> {
    assert!(window >= 1, "rolling window must be at least 1");

    let mut means = Vec::with_capacity(signals.len());
    let mut hits = 0usize;
    for (i, &signal) in signals.iter().enumerate() {
        if signal {
            hits += 1;
        }
        if i >= window && signals[i - window] {
            hits -= 1;
        }
        if i + 1 >= window {
            means.push(Some(hits as f64 / window as f64));
        } else {
            means.push(None);
        }
    }
    means
}

/// Group-summary value: mean over the trailing `min(window, len)` signals.
///
/// This is the terminal observation the estimator feeds into the controller.
/// When the evaluation set is already capped at `window` trades it equals the
/// plain mean over all signals. `None` only for an empty signal set.
pub fn terminal_mean(signals: &[bool], window: usize) -> Option<f64> {
    assert!(window >= 1, "rolling window must be at least 1");
    if signals.is_empty() {
        return None;
    }

    let take = window.min(signals.len());
    let hits = signals[signals.len() - take..].iter().filter(|&&s| s).count();
    Some(hits as f64 / take as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warmup_positions_have_no_value() {
        let means = rolling_means(&[true, false, true, true], 3);
        assert_eq!(means[0], None);
        assert_eq!(means[1], None);
        assert!(means[2].is_some());
    }

    #[test]
    fn test_rolling_means_exact_values() {
        let signals = [true, false, true, true, false];
        let means = rolling_means(&signals, 3);
        assert_eq!(
            means,
            vec![
                None,
                None,
                Some(2.0 / 3.0),
                Some(2.0 / 3.0),
                Some(2.0 / 3.0),
            ]
        );
    }

    #[test]
    fn test_window_of_one_is_the_signal_itself() {
        let means = rolling_means(&[true, false, true], 1);
        assert_eq!(means, vec![Some(1.0), Some(0.0), Some(1.0)]);
    }

    #[test]
    fn test_rolling_means_drops_expired_signals() {
        let signals = [true, true, false, false, false];
        let means = rolling_means(&signals, 2);
        assert_eq!(means[1], Some(1.0));
        assert_eq!(means[2], Some(0.5));
        assert_eq!(means[3], Some(0.0));
        assert_eq!(means[4], Some(0.0));
    }

    #[test]
    fn test_terminal_mean_uses_trailing_window() {
        let signals = [true, true, true, false, false];
        assert_eq!(terminal_mean(&signals, 2), Some(0.0));
        assert_eq!(terminal_mean(&signals, 4), Some(0.5));
    }

    #[test]
    fn test_terminal_mean_short_input_uses_all_signals() {
        let signals = [true, false];
        assert_eq!(terminal_mean(&signals, 800), Some(0.5));
    }

    #[test]
    fn test_terminal_mean_empty_is_none() {
        assert_eq!(terminal_mean(&[], 10), None);
    }

    #[test]
    fn test_terminal_mean_matches_last_rolling_value_when_warm() {
        let signals = [true, false, true, true, false, true, false];
        let window = 3;
        let means = rolling_means(&signals, window);
        assert_eq!(means.last().copied().flatten(), terminal_mean(&signals, window));
    }
}
