//! Pattern detection
//!
//! Candlestick patterns look at the last one to three bars; chart patterns
//! look at the trailing 20 or 30 bars. Both are pure functions of the window
//! tail, so prepending older history never changes the result.

pub mod candlestick;
pub mod chart;

use crate::models::{Candle, Direction};
use serde::Serialize;

pub use candlestick::detect_candlestick_patterns;
pub use chart::detect_chart_patterns;

/// Whether a pattern comes from bar shapes or from window structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    Candlestick,
    Chart,
}

/// One detected pattern
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PatternObservation {
    pub name: &'static str,
    pub kind: PatternKind,
    pub direction: Direction,
    /// Fixed per-pattern weight in [0, 1]
    pub strength: f64,
}

impl PatternObservation {
    pub(crate) const fn candlestick(name: &'static str, direction: Direction, strength: f64) -> Self {
        Self {
            name,
            kind: PatternKind::Candlestick,
            direction,
            strength,
        }
    }

    pub(crate) const fn chart(name: &'static str, direction: Direction, strength: f64) -> Self {
        Self {
            name,
            kind: PatternKind::Chart,
            direction,
            strength,
        }
    }
}

/// Run every detector; candlestick observations come first
pub fn detect(candles: &[Candle]) -> Vec<PatternObservation> {
    let mut patterns = detect_candlestick_patterns(candles);
    patterns.extend(detect_chart_patterns(candles));

    tracing::trace!(
        count = patterns.len(),
        names = ?patterns.iter().map(|p| p.name).collect::<Vec<_>>(),
        "Detected patterns"
    );

    patterns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| Candle::new(i as i64 * 60_000, 100.0, 100.5, 99.5, 100.2, 1000.0))
            .collect()
    }

    #[test]
    fn test_candlestick_before_chart() {
        // Hammer on the last bar of a 30 bar window with a double top
        let mut candles = flat(28);
        candles[12].high = 110.0;
        candles[20].high = 109.5;
        candles.push(Candle::new(28 * 60_000, 100.0, 101.0, 99.0, 100.5, 1000.0));
        candles.push(Candle::new(29 * 60_000, 100.0, 101.05, 97.0, 101.0, 1000.0));

        let patterns = detect(&candles);
        let names: Vec<_> = patterns.iter().map(|p| p.name).collect();

        assert!(names.contains(&"Hammer"));
        assert!(names.contains(&"Double Top"));

        let first_chart = patterns.iter().position(|p| p.kind == PatternKind::Chart).unwrap();
        assert!(patterns[..first_chart]
            .iter()
            .all(|p| p.kind == PatternKind::Candlestick));
    }

    #[test]
    fn test_prepending_history_does_not_change_patterns() {
        let mut tail = flat(30);
        tail[12].high = 115.0;
        tail[27] = Candle::new(27 * 60_000, 101.0, 101.2, 98.0, 99.0, 1000.0);
        tail[28] = Candle::new(28 * 60_000, 99.0, 99.5, 98.5, 99.1, 1000.0);
        tail[29] = Candle::new(29 * 60_000, 99.2, 101.5, 99.0, 101.0, 1000.0);

        let expected = detect(&tail);

        let mut longer: Vec<Candle> = (0..40)
            .map(|i| Candle::new(-(i as i64 + 1) * 60_000, 150.0, 160.0, 140.0, 145.0, 5000.0))
            .rev()
            .collect();
        longer.extend(tail);

        assert_eq!(detect(&longer), expected);
    }

    #[test]
    fn test_tiny_window_detects_nothing() {
        assert!(detect(&flat(2)).is_empty());
        assert!(detect(&[]).is_empty());
    }
}
