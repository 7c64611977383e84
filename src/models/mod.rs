use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum number of candles needed before a signal is attempted
pub const MIN_ANALYSIS_CANDLES: usize = 50;

/// OHLCV candlestick for one period
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Candle {
    /// Period open time in milliseconds since the Unix epoch
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Absolute size of the real body
    #[inline]
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// High-low range
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    #[inline]
    pub fn upper_shadow(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    #[inline]
    pub fn lower_shadow(&self) -> f64 {
        self.open.min(self.close) - self.low
    }

    #[inline]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    #[inline]
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Midpoint of the real body
    #[inline]
    pub fn body_midpoint(&self) -> f64 {
        (self.open + self.close) / 2.0
    }

    /// Check the OHLCV invariants of a single candle
    pub fn validate(&self, index: usize) -> Result<(), CandleError> {
        let values = [self.open, self.high, self.low, self.close, self.volume];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(CandleError::NonFinite { index });
        }
        if self.low > self.open.min(self.close) || self.high < self.open.max(self.close) {
            return Err(CandleError::InvalidRange {
                index,
                low: self.low,
                high: self.high,
            });
        }
        if self.volume < 0.0 {
            return Err(CandleError::NegativeVolume {
                index,
                volume: self.volume,
            });
        }
        Ok(())
    }
}

/// Invalid candle data supplied by a caller or a data provider
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CandleError {
    #[error("candle {index}: non-finite OHLCV value")]
    NonFinite { index: usize },

    #[error("candle {index}: open/close outside low {low} .. high {high}")]
    InvalidRange { index: usize, low: f64, high: f64 },

    #[error("candle {index}: negative volume {volume}")]
    NegativeVolume { index: usize, volume: f64 },

    #[error("candle {index}: timestamp {timestamp} precedes previous {previous}")]
    Unsorted {
        index: usize,
        timestamp: i64,
        previous: i64,
    },

    #[error("candle {index}: gap of {gap_ms}ms exceeds {max_ms}ms")]
    Gap { index: usize, gap_ms: i64, max_ms: i64 },
}

/// Validate every candle and check timestamps are non-decreasing
pub fn validate_window(candles: &[Candle]) -> Result<(), CandleError> {
    for (index, candle) in candles.iter().enumerate() {
        candle.validate(index)?;
    }

    for (index, pair) in candles.windows(2).enumerate() {
        if pair[1].timestamp < pair[0].timestamp {
            return Err(CandleError::Unsorted {
                index: index + 1,
                timestamp: pair[1].timestamp,
                previous: pair[0].timestamp,
            });
        }
    }

    Ok(())
}

/// Check that candles are evenly spaced in time
///
/// Allows up to 1.5x the expected interval between consecutive candles.
/// Scoring itself never fills or rejects gaps; this is for callers that want
/// to flag patchy history before trusting a signal.
pub fn check_uniform_spacing(candles: &[Candle], interval_ms: i64) -> Result<(), CandleError> {
    // Allow 50% tolerance for slight timing variations
    let max_ms = interval_ms + interval_ms / 2;

    for (index, pair) in candles.windows(2).enumerate() {
        let gap_ms = pair[1].timestamp - pair[0].timestamp;
        if gap_ms > max_ms {
            return Err(CandleError::Gap {
                index: index + 1,
                gap_ms,
                max_ms,
            });
        }
    }

    Ok(())
}

/// Instrument metadata, passed through untouched into the signal
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Instrument {
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
}

impl Instrument {
    pub fn new(symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        Self {
            name: symbol.clone(),
            symbol,
            sector: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }
}

/// Directional bias shared by patterns and trend classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Bullish,
    Bearish,
    Neutral,
}

/// Side of an emitted signal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Sell => write!(f, "SELL"),
        }
    }
}

/// Profit target ladder
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Targets {
    pub t1: f64,
    pub t2: f64,
    pub t3: f64,
}

/// Expected holding period for a signal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TradeDuration {
    pub estimated_minutes: u32,
    pub trading_style: String,
    pub holding_period: String,
    pub target_distance: f64,
    pub percent_move: f64,
}

/// MACD values carried in the signal snapshot
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MacdSnapshot {
    pub macd_line: f64,
    pub signal_line: f64,
    pub histogram: f64,
}

/// Indicator values the signal was derived from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSnapshot {
    pub rsi: f64,
    pub macd: MacdSnapshot,
    pub ema20: f64,
    pub ema50: f64,
    pub volume_strength: f64,
}

/// Direction, price levels and rationale of a trade recommendation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TradeSetup {
    pub action: Action,
    pub entry: f64,
    pub stop_loss: f64,
    pub targets: Targets,
    pub confidence: u8,
    pub reason: String,
    pub risk_reward: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<TradeDuration>,
    pub patterns: Vec<String>,
}

/// Advisory trading signal for one instrument
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    #[serde(flatten)]
    pub instrument: Instrument,
    #[serde(flatten)]
    pub setup: TradeSetup,
    pub indicators: IndicatorSnapshot,
    pub timeframe: String,
    pub profile: String,
    /// Caller supplied evaluation time, milliseconds since the Unix epoch
    pub generated_at: i64,
}
