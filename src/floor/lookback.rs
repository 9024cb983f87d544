//! Lookback window construction.

/// For each trade in one collection's block-ordered log price sequence,
/// collect the log prices of up to `lookback` strictly-prior trades, oldest
/// first. The trade's own price is excluded. The first trade has no history
/// and gets an empty window; downstream stages treat that as an explicit
/// no-estimate condition.
///
/// Always produces exactly one window per trade.
pub fn build_lookback_windows(log_prices: &[f64], lookback: usize) -> Vec<Vec<f64>> {
    let mut windows = Vec::with_capacity(log_prices.len());
    for idx in 0..log_prices.len() {
        let start = idx.saturating_sub(lookback);
        windows.push(log_prices[start..idx].to_vec());
    }
    windows
}
