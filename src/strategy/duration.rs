//! Holding-period estimate from the distance to the first target.

use crate::models::TradeDuration;

/// Volume strength above which moves are expected to play out faster
const FAST_VOLUME_STRENGTH: f64 = 1.5;
const FAST_VOLUME_FACTOR: f64 = 0.7;

/// (percent move upper bound, style, holding period, minutes)
const BANDS: [(f64, &str, &str, u32); 4] = [
    (0.5, "Scalping", "15-30 minutes", 15),
    (1.0, "Intraday", "1-2 hours", 60),
    (2.0, "Intraday/Swing", "3-6 hours", 180),
    (3.0, "Swing Trading", "1-3 days", 1440),
];

const POSITIONAL: (&str, &str, u32) = ("Positional", "3-7 days", 4320);

/// Classify the expected trade duration
///
/// `entry` and `target1` are the already rounded signal prices.
pub fn estimate_duration(entry: f64, target1: f64, volume_strength: f64) -> TradeDuration {
    let target_distance = (target1 - entry).abs();
    let percent_move = target_distance / entry * 100.0;

    let (style, holding_period, minutes) = BANDS
        .iter()
        .find(|(limit, ..)| percent_move < *limit)
        .map(|&(_, style, period, minutes)| (style, period, minutes))
        .unwrap_or(POSITIONAL);

    let estimated_minutes = if volume_strength > FAST_VOLUME_STRENGTH {
        (minutes as f64 * FAST_VOLUME_FACTOR).floor() as u32
    } else {
        minutes
    };

    TradeDuration {
        estimated_minutes,
        trading_style: style.to_string(),
        holding_period: holding_period.to_string(),
        target_distance: super::round2(target_distance),
        percent_move: super::round2(percent_move),
    }
}
