use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw trade record as it arrives from the data source.
///
/// Field names follow the upstream trade export. `ds` is the export's
/// partition date tag and is carried through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    pub chain_id: u64,
    pub contract_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ds: Option<String>,
    pub block_number: u64,
    pub unix_timestamp: i64,
    pub price_eth: f64,
}

/// Identifies one collection. All trades sharing this key form one group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CollectionKey {
    pub chain_id: u64,
    pub contract_address: String,
}

impl fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chain_id, self.contract_address)
    }
}

/// A preprocessed trade. Non-positive prices are filtered out upstream, so
/// `log_price` is finite for any record the loader admits.
#[derive(Debug, Clone)]
pub struct Trade {
    pub block_number: u64,
    pub unix_timestamp: i64,
    pub log_price: f64,
}

/// One floor price estimate, the per-collection output of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorEstimate {
    pub collection: CollectionKey,
    /// Frequency of below-target prices over the evaluation window.
    pub observed_quantile: f64,
    /// Quantile actually used for the final estimate, after feedback and clamping.
    pub adjusted_quantile: f64,
    /// Final estimate, back in price space.
    pub floor_price_eth: f64,
    /// Trades that entered the evaluation window.
    pub trades_evaluated: usize,
    /// Trades that produced a below-target signal.
    pub signals_observed: usize,
    pub last_trade_block: u64,
    pub last_trade_unix_timestamp: i64,
}

/// Why a collection produced no estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    /// Too little history to form an outlier-free window where one is required.
    InsufficientData { trades: usize },
    /// A log price was NaN or infinite. The upstream price filter admits only
    /// finite positive prices, so this indicates a corrupted record.
    NonFiniteLogPrice { block_number: u64 },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::InsufficientData { trades } => {
                write!(f, "insufficient data ({} trades)", trades)
            }
            FailureReason::NonFiniteLogPrice { block_number } => {
                write!(f, "non-finite log price at block {}", block_number)
            }
        }
    }
}

/// A collection whose pipeline failed. Failures are isolated: they never
/// abort the rest of the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupFailure {
    pub collection: CollectionKey,
    pub reason: FailureReason,
}

/// Result set for one batch run: partial results plus per-collection failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub estimates: Vec<FloorEstimate>,
    pub failures: Vec<GroupFailure>,
}
