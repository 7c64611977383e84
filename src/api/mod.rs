pub mod binance;
pub mod file;

pub use binance::BinanceClient;
pub use file::{load_candles_file, JsonFileProvider};

use crate::models::Candle;
use anyhow::Result;
use std::future::Future;

/// Source of candle windows and spot prices
///
/// Implementations own their transport concerns (rate limits, retries,
/// file access). Scoring never calls a provider directly.
pub trait MarketDataProvider: Send + Sync {
    /// Most recent `limit` candles for `symbol`, oldest first
    fn get_candles(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Candle>>> + Send;

    /// Latest traded price for `symbol`
    fn get_current_price(&self, symbol: &str) -> impl Future<Output = Result<f64>> + Send;
}

/// Length of a kline interval such as `5m`, `1h` or `1d` in milliseconds
///
/// Month intervals have no fixed length and return `None`.
pub fn interval_millis(interval: &str) -> Option<i64> {
    let unit = interval.chars().last()?;
    let count: i64 = interval[..interval.len() - unit.len_utf8()].parse().ok()?;
    if count <= 0 {
        return None;
    }

    let unit_ms = match unit {
        's' => 1_000,
        'm' => 60_000,
        'h' => 3_600_000,
        'd' => 86_400_000,
        'w' => 604_800_000,
        _ => return None,
    };

    count.checked_mul(unit_ms)
}
