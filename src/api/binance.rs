use super::MarketDataProvider;
use crate::models::Candle;
use anyhow::{Context, Result};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

pub const BINANCE_API_BASE: &str = "https://api.binance.com";
const RATE_LIMIT_RPM: u32 = 600;
const MAX_RETRIES: u32 = 3;
/// Binance rejects kline requests above this limit
pub const MAX_KLINES: usize = 1000;

// Type alias for the rate limiter to simplify signatures
type BinanceRateLimiter = RateLimiter<
    governor::state::direct::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Binance spot REST client for klines and ticker prices
///
/// This struct is cloneable to allow sharing across async tasks.
/// All clones share the same rate limiter.
#[derive(Clone)]
pub struct BinanceClient {
    client: Client,
    base_url: String,
    rate_limiter: Arc<BinanceRateLimiter>,
    backoff_base: Duration,
}

/// Response from /api/v3/ticker/price
#[derive(Debug, Deserialize)]
struct TickerPrice {
    #[allow(dead_code)]
    symbol: String,
    price: String,
}

impl BinanceClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(BINANCE_API_BASE)
    }

    /// Create a client against another host, e.g. a testnet or a mock server
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        let quota = Quota::per_minute(NonZeroU32::new(RATE_LIMIT_RPM).unwrap_or(NonZeroU32::MIN));

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
            backoff_base: Duration::from_secs(1),
        })
    }

    /// Base delay for retries; attempt `n` waits `base * 2^n`
    pub fn with_retry_backoff(mut self, backoff_base: Duration) -> Self {
        self.backoff_base = backoff_base;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a rate-limited API request with retry logic
    async fn make_request(&self, path: &str, query: &[(&str, String)]) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);

        for attempt in 1..=MAX_RETRIES {
            // Wait for rate limiter
            self.rate_limiter.until_ready().await;

            let backoff = self.backoff_base * 2u32.pow(attempt);

            match self.client.get(&url).query(query).send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return Ok(response);
                    }

                    // Rate limited (429) or IP banned for ignoring 429s (418)
                    if status.as_u16() == 429 || status.as_u16() == 418 {
                        tracing::warn!(
                            "Rate limited by Binance ({}), backing off for {:?} (attempt {}/{})",
                            status,
                            backoff,
                            attempt,
                            MAX_RETRIES
                        );
                        tokio::time::sleep(backoff).await;
                        continue;
                    }

                    if status.is_server_error() {
                        tracing::warn!(
                            "Server error {} from Binance, retrying in {:?} (attempt {}/{})",
                            status,
                            backoff,
                            attempt,
                            MAX_RETRIES
                        );
                        tokio::time::sleep(backoff).await;
                        continue;
                    }

                    // Other errors (4xx) - don't retry
                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    anyhow::bail!("Binance API error ({}): {}", status, error_text);
                }
                Err(e) if attempt < MAX_RETRIES => {
                    tracing::warn!(
                        "Network error: {}, retrying in {:?} (attempt {}/{})",
                        e,
                        backoff,
                        attempt,
                        MAX_RETRIES
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => anyhow::bail!("Network error after {} retries: {}", MAX_RETRIES, e),
            }
        }

        anyhow::bail!("Failed after {} retries", MAX_RETRIES)
    }

    /// Fetch the latest `limit` klines, oldest first
    pub async fn get_klines(&self, symbol: &str, interval: &str, limit: usize) -> Result<Vec<Candle>> {
        let limit = limit.min(MAX_KLINES);
        tracing::debug!("Fetching {} {} klines for {}", limit, interval, symbol);

        let response = self
            .make_request(
                "/api/v3/klines",
                &[
                    ("symbol", symbol.to_uppercase()),
                    ("interval", interval.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        let rows: Vec<Value> = response
            .json()
            .await
            .context("Failed to parse klines response")?;

        let candles = rows
            .iter()
            .enumerate()
            .map(|(i, row)| parse_kline(row).with_context(|| format!("Malformed kline at row {}", i)))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!("Fetched {} klines for {}", candles.len(), symbol);

        Ok(candles)
    }

    pub async fn get_ticker_price(&self, symbol: &str) -> Result<f64> {
        let response = self
            .make_request("/api/v3/ticker/price", &[("symbol", symbol.to_uppercase())])
            .await?;

        let ticker: TickerPrice = response
            .json()
            .await
            .context("Failed to parse ticker response")?;

        ticker
            .price
            .parse()
            .with_context(|| format!("Invalid price {:?} for {}", ticker.price, symbol))
    }
}

/// Parse one kline row: `[open_time, "open", "high", "low", "close", "volume", close_time, ...]`
fn parse_kline(row: &Value) -> Result<Candle> {
    let fields = row.as_array().context("kline is not an array")?;
    if fields.len() < 6 {
        anyhow::bail!("kline has {} fields, expected at least 6", fields.len());
    }

    let number = |index: usize| -> Result<f64> {
        let field = &fields[index];
        // Binance sends decimals as strings
        match field.as_str() {
            Some(text) => text
                .parse()
                .with_context(|| format!("field {} is not a number: {:?}", index, text)),
            None => field
                .as_f64()
                .with_context(|| format!("field {} is not a number", index)),
        }
    };

    let timestamp = fields[0].as_i64().context("open time is not an integer")?;

    Ok(Candle::new(
        timestamp,
        number(1)?,
        number(2)?,
        number(3)?,
        number(4)?,
        number(5)?,
    ))
}

impl MarketDataProvider for BinanceClient {
    async fn get_candles(&self, symbol: &str, interval: &str, limit: usize) -> Result<Vec<Candle>> {
        self.get_klines(symbol, interval, limit).await
    }

    async fn get_current_price(&self, symbol: &str) -> Result<f64> {
        self.get_ticker_price(symbol).await
    }
}
