//! Simplified chart patterns over the trailing 20 to 30 bars.
//!
//! These are coarse heuristics, each reported at most once per call.

use super::PatternObservation;
use crate::models::{Candle, Direction};

pub const DOUBLE_TOP: &str = "Double Top";
pub const HEAD_AND_SHOULDERS: &str = "Head and Shoulders";
pub const ASCENDING_TRIANGLE: &str = "Ascending Triangle";

const DOUBLE_TOP_WINDOW: usize = 20;
const HEAD_AND_SHOULDERS_WINDOW: usize = 30;
const TRIANGLE_WINDOW: usize = 20;

pub fn detect_chart_patterns(candles: &[Candle]) -> Vec<PatternObservation> {
    [
        detect_double_top(candles),
        detect_head_and_shoulders(candles),
        detect_triangle(candles),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn tail(candles: &[Candle], window: usize) -> Option<&[Candle]> {
    (candles.len() >= window).then(|| &candles[candles.len() - window..])
}

fn max_of(values: impl IntoIterator<Item = f64>) -> f64 {
    values.into_iter().fold(f64::NEG_INFINITY, f64::max)
}

fn min_of(values: impl IntoIterator<Item = f64>) -> f64 {
    values.into_iter().fold(f64::INFINITY, f64::min)
}

/// Two or more highs within 2% of the window maximum, more than 5 bars apart
pub fn detect_double_top(candles: &[Candle]) -> Option<PatternObservation> {
    let recent = tail(candles, DOUBLE_TOP_WINDOW)?;
    let max_high = max_of(recent.iter().map(|c| c.high));

    let mut near_max = recent
        .iter()
        .enumerate()
        .filter(|(_, c)| c.high > max_high * 0.98)
        .map(|(i, _)| i);

    let first = near_max.next()?;
    let last = near_max.last()?;

    (last - first > 5).then_some(PatternObservation::chart(DOUBLE_TOP, Direction::Bearish, 0.8))
}

/// Peak in the middle third of the last 30 bars, 5% above both shoulders
///
/// The shoulders are the highest highs more than five bars away from the
/// head on either side.
pub fn detect_head_and_shoulders(candles: &[Candle]) -> Option<PatternObservation> {
    let recent = tail(candles, HEAD_AND_SHOULDERS_WINDOW)?;
    let highs: Vec<f64> = recent.iter().map(|c| c.high).collect();

    let head = max_of(highs.iter().copied());
    // First occurrence of the maximum
    let head_idx = highs.iter().position(|&h| h == head)?;

    if head_idx <= 10 || head_idx >= 20 {
        return None;
    }

    let left_shoulder = max_of(highs[..head_idx - 5].iter().copied());
    let right_shoulder = max_of(highs[head_idx + 5..].iter().copied());

    (head > left_shoulder * 1.05 && head > right_shoulder * 1.05).then_some(
        PatternObservation::chart(HEAD_AND_SHOULDERS, Direction::Bearish, 0.85),
    )
}

/// Highs compressed to less than half the spread of the lows
///
/// This is a loose heuristic rather than a geometric ascending triangle: it
/// only compares the ranges of the two series and never fits trendlines.
pub fn detect_triangle(candles: &[Candle]) -> Option<PatternObservation> {
    let recent = tail(candles, TRIANGLE_WINDOW)?;

    let high_range = max_of(recent.iter().map(|c| c.high)) - min_of(recent.iter().map(|c| c.high));
    let low_range = max_of(recent.iter().map(|c| c.low)) - min_of(recent.iter().map(|c| c.low));

    (high_range < low_range * 0.5)
        .then_some(PatternObservation::chart(ASCENDING_TRIANGLE, Direction::Bullish, 0.75))
}
