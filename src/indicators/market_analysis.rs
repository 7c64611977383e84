/// Market structure and volume analysis
///
/// Provides support/resistance extraction from local swing points, a coarse
/// trend classification from EMA alignment, and relative volume strength.

use crate::models::{Candle, Direction};
use serde::{Deserialize, Serialize};

/// How many of the most recent levels of each kind are kept
pub const MAX_LEVELS: usize = 3;

/// Bars compared on each side of a swing point
const SWING_NEIGHBOURS: usize = 2;

/// Recent swing highs (resistance) and swing lows (support), oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupportResistance {
    pub support: Vec<f64>,
    pub resistance: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub direction: Direction,
    pub strength: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeProfile {
    pub current: f64,
    pub average: f64,
    /// current / average, NaN when the average is not positive
    pub strength: f64,
}

/// Find swing levels in the candle window
///
/// A bar is resistance when its high is strictly above the highs of the two
/// bars on each side; support mirrors this with lows.
pub fn find_support_resistance(candles: &[Candle]) -> SupportResistance {
    let mut levels = SupportResistance::default();

    if candles.len() < 2 * SWING_NEIGHBOURS + 1 {
        return levels;
    }

    for i in SWING_NEIGHBOURS..candles.len() - SWING_NEIGHBOURS {
        let neighbours = candles[i - SWING_NEIGHBOURS..=i + SWING_NEIGHBOURS]
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != SWING_NEIGHBOURS)
            .map(|(_, c)| c);

        let high = candles[i].high;
        let low = candles[i].low;
        let (mut is_peak, mut is_trough) = (true, true);
        for neighbour in neighbours {
            is_peak &= high > neighbour.high;
            is_trough &= low < neighbour.low;
        }

        if is_peak {
            levels.resistance.push(high);
        }
        if is_trough {
            levels.support.push(low);
        }
    }

    keep_most_recent(&mut levels.resistance);
    keep_most_recent(&mut levels.support);
    levels
}

fn keep_most_recent(levels: &mut Vec<f64>) {
    let excess = levels.len().saturating_sub(MAX_LEVELS);
    levels.drain(..excess);
}

/// Classify trend from the last close against EMA20 and EMA50
///
/// Strength is a fixed 0.8 for an aligned trend and 0.5 otherwise.
pub fn detect_trend(close: f64, ema20: f64, ema50: f64) -> Trend {
    if close > ema20 && ema20 > ema50 {
        Trend {
            direction: Direction::Bullish,
            strength: 0.8,
        }
    } else if close < ema20 && ema20 < ema50 {
        Trend {
            direction: Direction::Bearish,
            strength: 0.8,
        }
    } else {
        Trend {
            direction: Direction::Neutral,
            strength: 0.5,
        }
    }
}

/// Compare the latest bar's volume with the mean over the whole window
pub fn analyze_volume(candles: &[Candle]) -> VolumeProfile {
    let Some(last) = candles.last() else {
        return VolumeProfile {
            current: f64::NAN,
            average: f64::NAN,
            strength: f64::NAN,
        };
    };

    let average = candles.iter().map(|c| c.volume).sum::<f64>() / candles.len() as f64;
    let strength = if average > 0.0 {
        last.volume / average
    } else {
        f64::NAN
    };

    VolumeProfile {
        current: last.volume,
        average,
        strength,
    }
}
