//! Trade dataset loading and preprocessing.
//!
//! The input contract is a JSON-lines file, one [`TradeRecord`] per line.
//! Preprocessing mirrors the upstream pipeline: records with a non-positive
//! price never reach the core, and prices enter the estimator as log prices.

use crate::models::{CollectionKey, Trade, TradeRecord};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Inclusive unix-second bounds applied while loading.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeFilter {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl TimeFilter {
    fn accepts(&self, unix_timestamp: i64) -> bool {
        self.start.map_or(true, |s| unix_timestamp >= s)
            && self.end.map_or(true, |e| unix_timestamp <= e)
    }
}

/// Load a JSON-lines trade file and group it by collection for the estimator.
///
/// Blank lines are skipped; a malformed line fails the run with its line
/// number. Records with a non-positive price (NaN included) are dropped and
/// counted, matching the upstream `price > 0` filter. The estimator owns
/// block ordering, so trades are grouped here but not sorted.
pub fn load_trades(
    path: &Path,
    filter: TimeFilter,
) -> Result<BTreeMap<CollectionKey, Vec<Trade>>> {
    let file =
        File::open(path).with_context(|| format!("opening trade file {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut groups: BTreeMap<CollectionKey, Vec<Trade>> = BTreeMap::new();
    let mut total = 0usize;
    let mut dropped_non_positive = 0usize;
    let mut dropped_out_of_range = 0usize;

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }

        let record: TradeRecord = serde_json::from_str(&line).with_context(|| {
            format!("malformed trade record at {}:{}", path.display(), line_idx + 1)
        })?;
        total += 1;

        if !(record.price_eth > 0.0) {
            dropped_non_positive += 1;
            continue;
        }
        if !filter.accepts(record.unix_timestamp) {
            dropped_out_of_range += 1;
            continue;
        }

        let key = CollectionKey {
            chain_id: record.chain_id,
            contract_address: record.contract_address,
        };
        groups.entry(key).or_default().push(Trade {
            block_number: record.block_number,
            unix_timestamp: record.unix_timestamp,
            log_price: record.price_eth.ln(),
        });
    }

    if dropped_non_positive > 0 {
        tracing::warn!(
            "Dropped {} of {} records with non-positive price",
            dropped_non_positive,
            total
        );
    }
    if dropped_out_of_range > 0 {
        tracing::info!(
            "Dropped {} records outside the requested time range",
            dropped_out_of_range
        );
    }
    tracing::info!(
        "Loaded {} trades across {} collections from {}",
        total - dropped_non_positive - dropped_out_of_range,
        groups.len(),
        path.display()
    );

    Ok(groups)
}
