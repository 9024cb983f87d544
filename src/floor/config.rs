//! Floor estimation parameters.

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

/// Tunable parameters for the adaptive floor price estimator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorConfig {
    /// How many strictly-prior trades feed each trade's lookback window.
    pub lookback: usize,
    /// Evaluation window: the most recent trades whose below-target signals
    /// are aggregated into the observed quantile.
    pub backtest: usize,
    /// Target quantile for the initial floor estimate.
    pub pct_target: f64,
    /// Lower clamp for the adjusted quantile.
    pub pct_target_min: f64,
    /// Upper clamp for the adjusted quantile.
    pub pct_target_max: f64,
    /// Proportional gain applied to the target/observed gap.
    pub speed: f64,
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self {
            lookback: 140,
            backtest: 800,
            pct_target: 0.05,
            pct_target_min: 0.02, // never chase the floor below the 2nd percentile
            pct_target_max: 0.10,
            speed: 0.5,
        }
    }
}

impl FloorConfig {
    /// Trades retained per collection ahead of lookback construction.
    ///
    /// Keeps full lookback depth available for every trade in the evaluation
    /// window while bounding memory for heavily traded collections.
    pub fn retention(&self) -> usize {
        self.backtest + 2 * self.lookback
    }

    /// Validate before any collection runs. Violations are fatal to the whole
    /// batch: no partial results.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.backtest >= 1, "backtest window must be at least 1");
        ensure!(
            self.pct_target > 0.0 && self.pct_target < 1.0,
            "pct_target must lie in (0, 1), got {}",
            self.pct_target
        );
        ensure!(
            self.pct_target_min <= self.pct_target_max,
            "pct_target_min {} exceeds pct_target_max {}",
            self.pct_target_min,
            self.pct_target_max
        );
        ensure!(
            self.speed.is_finite() && self.speed > 0.0,
            "speed must be a positive gain, got {}",
            self.speed
        );
        Ok(())
    }
}
