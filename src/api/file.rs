use super::MarketDataProvider;
use crate::models::Candle;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Read a JSON array of candles from disk
pub async fn load_candles_file(path: impl AsRef<Path>) -> Result<Vec<Candle>> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    serde_json::from_str(&text).with_context(|| format!("Failed to parse candles in {}", path.display()))
}

/// Offline provider backed by a directory of `<SYMBOL>.json` files
///
/// Each file holds one candle array at a single timeframe, so the
/// `interval` argument is ignored.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    dir: PathBuf,
}

impl JsonFileProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.json", symbol))
    }
}

impl MarketDataProvider for JsonFileProvider {
    async fn get_candles(&self, symbol: &str, _interval: &str, limit: usize) -> Result<Vec<Candle>> {
        let mut candles = load_candles_file(self.path_for(symbol)).await?;

        let excess = candles.len().saturating_sub(limit);
        candles.drain(..excess);

        tracing::debug!("Loaded {} candles for {} from disk", candles.len(), symbol);
        Ok(candles)
    }

    async fn get_current_price(&self, symbol: &str) -> Result<f64> {
        let candles = load_candles_file(self.path_for(symbol)).await?;
        candles
            .last()
            .map(|c| c.close)
            .with_context(|| format!("No candles for {}", symbol))
    }
}
