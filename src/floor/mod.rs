//! Adaptive Floor Price Estimation
//!
//! Batch pipeline that replays each collection's trade history and produces
//! one floor price estimate per collection.
//!
//! # Architecture
//!
//! ```text
//! trades (JSONL) ──▶ dataset loader ──▶ per-collection pipeline ──▶ BatchOutcome
//!
//!   per collection (one rayon task, steps strictly in order):
//!     sort by block
//!       ─▶ retain backtest + 2·lookback trades
//!       ─▶ lookback windows          (lookback.rs)
//!       ─▶ retain backtest trades
//!       ─▶ MAD outlier filter        (outliers.rs)
//!       ─▶ target quantile           (quantile.rs)
//!       ─▶ below-target signals
//!       ─▶ observed quantile         (rolling.rs)
//!       ─▶ feedback adjustment       (controller.rs)
//!       ─▶ exp(quantile at adjusted) (estimator.rs)
//! ```
//!
//! # Determinism Guarantees
//!
//! - Collections are keyed and emitted in `BTreeMap` order; rayon's indexed
//!   collect preserves that order regardless of thread count.
//! - No system time, no RNG: the same dataset and configuration produce
//!   exactly equal outcomes.

pub mod config;
pub mod controller;
pub mod dataset;
pub mod estimator;
pub mod lookback;
pub mod outliers;
pub mod quantile;
pub mod rolling;


// Re-exports for convenience
pub use config::FloorConfig;
pub use dataset::{load_trades, TimeFilter};
pub use estimator::FloorPriceEstimator;
