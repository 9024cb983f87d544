//! Floor Price Runner CLI
//!
//! Batch entrypoint: load a historical trade dataset, run the adaptive floor
//! price pipeline, report one estimate per collection.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin floorbot -- \
//!   --input nft_trades.jsonl \
//!   --output results.json \
//!   --lookback 140 --backtest 800
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success (failed collections are reported in the outcome, not fatal)
//! - 2: Configuration or validation error
//! - 3: Runtime error (I/O, malformed dataset)

use anyhow::{Context, Result};
use chrono::DateTime;
use clap::Parser;
use floorbot_backend::floor::{load_trades, FloorConfig, FloorPriceEstimator, TimeFilter};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(
    name = "floorbot",
    about = "Adaptive NFT floor price estimation over historical trades"
)]
struct Cli {
    /// JSON-lines trade dataset, one record per line
    #[arg(long, short = 'i')]
    input: PathBuf,

    /// Write the batch outcome as pretty JSON to this path
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Only consider trades at or after this RFC3339 instant
    #[arg(long)]
    start: Option<String>,

    /// Only consider trades at or before this RFC3339 instant
    #[arg(long)]
    end: Option<String>,

    /// Lookback window depth (prior trades per estimate)
    #[arg(long, default_value_t = 140)]
    lookback: usize,

    /// Evaluation window (most recent trades scored per collection)
    #[arg(long, default_value_t = 800)]
    backtest: usize,

    /// Target quantile for the floor estimate
    #[arg(long, default_value_t = 0.05)]
    pct_target: f64,

    /// Lower clamp for the adjusted quantile
    #[arg(long, default_value_t = 0.02)]
    pct_target_min: f64,

    /// Upper clamp for the adjusted quantile
    #[arg(long, default_value_t = 0.10)]
    pct_target_max: f64,

    /// Proportional gain for the quantile controller
    #[arg(long, default_value_t = 0.5)]
    speed: f64,
}

impl Cli {
    fn config(&self) -> FloorConfig {
        FloorConfig {
            lookback: self.lookback,
            backtest: self.backtest,
            pct_target: self.pct_target,
            pct_target_min: self.pct_target_min,
            pct_target_max: self.pct_target_max,
            speed: self.speed,
        }
    }

    fn time_filter(&self) -> Result<TimeFilter> {
        let parse = |label: &str, value: &Option<String>| -> Result<Option<i64>> {
            value
                .as_deref()
                .map(|raw| {
                    DateTime::parse_from_rfc3339(raw)
                        .map(|dt| dt.timestamp())
                        .with_context(|| format!("invalid {} time {:?}", label, raw))
                })
                .transpose()
        };

        Ok(TimeFilter {
            start: parse("start", &self.start)?,
            end: parse("end", &self.end)?,
        })
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let estimator = match FloorPriceEstimator::new(cli.config()) {
        Ok(estimator) => estimator,
        Err(err) => {
            tracing::error!("Invalid configuration: {:#}", err);
            return ExitCode::from(2);
        }
    };

    let filter = match cli.time_filter() {
        Ok(filter) => filter,
        Err(err) => {
            tracing::error!("Invalid configuration: {:#}", err);
            return ExitCode::from(2);
        }
    };

    match run(&cli, &estimator, filter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("Run failed: {:#}", err);
            ExitCode::from(3)
        }
    }
}

fn run(cli: &Cli, estimator: &FloorPriceEstimator, filter: TimeFilter) -> Result<()> {
    tracing::info!("Reading trades from {}", cli.input.display());
    let groups = load_trades(&cli.input, filter)?;

    tracing::info!("Estimating floor prices for {} collections", groups.len());
    let outcome = estimator.run(groups);

    for estimate in &outcome.estimates {
        tracing::info!(
            "Floor price estimate for {} (in ETH): {}",
            estimate.collection,
            estimate.floor_price_eth
        );
    }
    for failure in &outcome.failures {
        tracing::warn!("No estimate for {}: {}", failure.collection, failure.reason);
    }

    if let Some(path) = &cli.output {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &outcome)
            .with_context(|| format!("writing {}", path.display()))?;
        writer.flush().with_context(|| format!("writing {}", path.display()))?;
        tracing::info!("Wrote batch outcome to {}", path.display());
    }

    Ok(())
}
