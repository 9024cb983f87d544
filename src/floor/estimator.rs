//! Adaptive floor price estimation pipeline.
//!
//! Per collection, strictly in order:
//!
//! 1. Stable sort by block number.
//! 2. Retain the most recent `backtest + 2*lookback` trades. This happens
//!    before lookback construction; the ordering matters because windows
//!    built after the cut would see different history.
//! 3. Build one lookback window per trade.
//! 4. Retain the most recent `backtest` trades. Windows built in step 3 keep
//!    the history this cut drops from the trade list.
//! 5. Strip outliers from each window.
//! 6. Estimate the target-quantile log price per trade. An empty outlier-free
//!    window means the trade has no estimate.
//! 7. Signal per estimated trade: did its own log price land at or below the
//!    target estimate?
//! 8. Aggregate the signals into the observed quantile.
//! 9. Run the proportional controller against the target.
//! 10. Re-estimate the most recent trade's window at the adjusted quantile
//!     and exponentiate back into price space.
//!
//! Collections are independent and run in parallel; a failure in one
//! collection never aborts the others.

use crate::floor::config::FloorConfig;
use crate::floor::controller::adjust_quantile;
use crate::floor::lookback::build_lookback_windows;
use crate::floor::outliers::remove_outliers;
use crate::floor::quantile::quantile;
use crate::floor::rolling::terminal_mean;
use crate::models::{
    BatchOutcome, CollectionKey, FailureReason, FloorEstimate, GroupFailure, Trade,
};
use anyhow::Result;
use rayon::prelude::*;
use std::collections::BTreeMap;

pub struct FloorPriceEstimator {
    config: FloorConfig,
}

impl FloorPriceEstimator {
    /// Create an estimator with validated configuration. Configuration errors
    /// are fatal here, before any collection runs.
    pub fn new(config: FloorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FloorConfig {
        &self.config
    }

    /// Run the full batch: one estimate per collection, failures isolated and
    /// collected alongside the partial result set.
    pub fn run(&self, trades_by_collection: BTreeMap<CollectionKey, Vec<Trade>>) -> BatchOutcome {
        let groups: Vec<(CollectionKey, Vec<Trade>)> = trades_by_collection.into_iter().collect();

        let results: Vec<Result<FloorEstimate, GroupFailure>> = groups
            .into_par_iter()
            .map(|(collection, trades)| self.estimate_collection(collection, trades))
            .collect();

        let mut outcome = BatchOutcome::default();
        for result in results {
            match result {
                Ok(estimate) => outcome.estimates.push(estimate),
                Err(failure) => outcome.failures.push(failure),
            }
        }

        tracing::info!(
            "Batch complete: {} collections estimated, {} failed",
            outcome.estimates.len(),
            outcome.failures.len()
        );
        outcome
    }

    /// Steps 1-10 for a single collection.
    pub fn estimate_collection(
        &self,
        collection: CollectionKey,
        mut trades: Vec<Trade>,
    ) -> Result<FloorEstimate, GroupFailure> {
        let total_trades = trades.len();

        // Block order is the precondition for every windowed computation
        // below; the sort is stable so equal blocks keep input order.
        trades.sort_by_key(|t| t.block_number);

        for trade in &trades {
            if !trade.log_price.is_finite() {
                return Err(GroupFailure {
                    collection,
                    reason: FailureReason::NonFiniteLogPrice {
                        block_number: trade.block_number,
                    },
                });
            }
        }

        // Bound memory before building windows; every trade that can reach
        // the evaluation window keeps its full lookback depth.
        let retention = self.config.retention();
        if trades.len() > retention {
            trades.drain(..trades.len() - retention);
        }

        let log_prices: Vec<f64> = trades.iter().map(|t| t.log_price).collect();
        let windows = build_lookback_windows(&log_prices, self.config.lookback);

        let eval_start = trades.len().saturating_sub(self.config.backtest);
        let eval_trades = &trades[eval_start..];
        let eval_windows = &windows[eval_start..];

        let clean_windows: Vec<Vec<f64>> =
            eval_windows.iter().map(|w| remove_outliers(w)).collect();

        // Trades whose outlier-free window is empty have no target estimate
        // and contribute no signal, in either direction.
        let mut signals = Vec::with_capacity(eval_trades.len());
        for (trade, clean) in eval_trades.iter().zip(&clean_windows) {
            if let Some(target) = quantile(clean, self.config.pct_target) {
                signals.push(trade.log_price <= target);
            }
        }

        let observed_quantile = match terminal_mean(&signals, self.config.backtest) {
            Some(observed) => observed,
            None => {
                return Err(GroupFailure {
                    collection,
                    reason: FailureReason::InsufficientData {
                        trades: total_trades,
                    },
                })
            }
        };

        let adjusted_quantile = adjust_quantile(
            self.config.pct_target,
            self.config.pct_target,
            observed_quantile,
            self.config.speed,
            self.config.pct_target_min,
            self.config.pct_target_max,
        );

        // The estimate belongs to the most recent trade; its window must be
        // usable or the collection has no defined floor.
        let (last_trade, last_window) = match (eval_trades.last(), clean_windows.last()) {
            (Some(trade), Some(window)) => (trade, window),
            _ => {
                return Err(GroupFailure {
                    collection,
                    reason: FailureReason::InsufficientData {
                        trades: total_trades,
                    },
                })
            }
        };

        let floor_log_price = match quantile(last_window, adjusted_quantile) {
            Some(value) => value,
            None => {
                return Err(GroupFailure {
                    collection,
                    reason: FailureReason::InsufficientData {
                        trades: total_trades,
                    },
                })
            }
        };

        let estimate = FloorEstimate {
            observed_quantile,
            adjusted_quantile,
            floor_price_eth: floor_log_price.exp(),
            trades_evaluated: eval_trades.len(),
            signals_observed: signals.len(),
            last_trade_block: last_trade.block_number,
            last_trade_unix_timestamp: last_trade.unix_timestamp,
            collection,
        };

        tracing::debug!(
            "Estimated {}: observed quantile {:.4}, adjusted quantile {:.4}, floor {:.6}",
            estimate.collection,
            estimate.observed_quantile,
            estimate.adjusted_quantile,
            estimate.floor_price_eth
        );

        Ok(estimate)
    }
}
