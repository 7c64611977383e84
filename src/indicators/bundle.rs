/// Indicator engine: derives the full indicator bundle for one candle window.

use super::{
    analyze_volume, calculate_atr, calculate_bollinger, calculate_default_macd, calculate_ema,
    calculate_rsi, detect_trend, find_support_resistance, BollingerBands, Macd,
    SupportResistance, Trend, VolumeProfile, BOLLINGER_PERIOD, BOLLINGER_STD_DEV,
};
use crate::models::{Candle, IndicatorSnapshot, MacdSnapshot};

pub const RSI_PERIOD: usize = 14;
pub const ATR_PERIOD: usize = 14;

/// Every indicator the scorer consumes, always fully populated
///
/// Values that cannot be computed from the window are `f64::NAN`.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorBundle {
    pub rsi: f64,
    pub macd: Macd,
    pub ema20: f64,
    pub ema50: f64,
    pub ema200: f64,
    pub atr: f64,
    pub bollinger: BollingerBands,
    pub support_resistance: SupportResistance,
    pub trend: Trend,
    pub volume: VolumeProfile,
}

impl IndicatorBundle {
    /// Compute all indicators over the supplied window
    pub fn compute(candles: &[Candle]) -> Self {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

        let ema20 = calculate_ema(&closes, 20).unwrap_or(f64::NAN);
        let ema50 = calculate_ema(&closes, 50).unwrap_or(f64::NAN);
        let last_close = closes.last().copied().unwrap_or(f64::NAN);

        Self {
            rsi: calculate_rsi(&closes, RSI_PERIOD).unwrap_or(f64::NAN),
            macd: calculate_default_macd(&closes).unwrap_or(Macd::NAN),
            ema20,
            ema50,
            ema200: calculate_ema(&closes, 200).unwrap_or(f64::NAN),
            atr: calculate_atr(candles, ATR_PERIOD).unwrap_or(f64::NAN),
            bollinger: calculate_bollinger(&closes, BOLLINGER_PERIOD, BOLLINGER_STD_DEV)
                .unwrap_or(BollingerBands::NAN),
            support_resistance: find_support_resistance(candles),
            trend: detect_trend(last_close, ema20, ema50),
            volume: analyze_volume(candles),
        }
    }

    /// Name of the first scoring input that is not a finite number
    pub fn first_missing_input(&self) -> Option<&'static str> {
        [
            ("rsi", self.rsi),
            ("macd", self.macd.macd_line),
            ("macd signal", self.macd.signal_line),
            ("ema20", self.ema20),
            ("ema50", self.ema50),
            ("atr", self.atr),
        ]
        .into_iter()
        .find(|(_, value)| !value.is_finite())
        .map(|(name, _)| name)
    }

    pub fn snapshot(&self) -> IndicatorSnapshot {
        IndicatorSnapshot {
            rsi: self.rsi,
            macd: MacdSnapshot {
                macd_line: self.macd.macd_line,
                signal_line: self.macd.signal_line,
                histogram: self.macd.histogram,
            },
            ema20: self.ema20,
            ema50: self.ema50,
            volume_strength: self.volume.strength,
        }
    }
}
