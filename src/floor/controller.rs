//! Proportional quantile feedback.

/// Nudge the effective quantile toward the target by the observed gap,
/// clamped to the configured band.
///
/// Negative feedback: when prices fall below the target more often than the
/// target quantile intends (`q_obs > q_target`), the adjustment term is
/// negative and the next estimate uses a lower quantile, which reduces the
/// undershoot frequency on the following pass.
///
/// `pct_target_min <= pct_target_max` is a configuration invariant enforced
/// by [`FloorConfig::validate`](crate::floor::FloorConfig::validate).
pub fn adjust_quantile(
    q_curr: f64,
    q_target: f64,
    q_obs: f64,
    speed: f64,
    pct_target_min: f64,
    pct_target_max: f64,
) -> f64 {
    (q_curr + speed * (q_target - q_obs))
        .max(pct_target_min)
        .min(pct_target_max)
}
