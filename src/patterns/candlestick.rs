//! Candlestick patterns on the most recent one to three bars.

use super::PatternObservation;
use crate::models::{Candle, Direction};

pub const HAMMER: &str = "Hammer";
pub const SHOOTING_STAR: &str = "Shooting Star";
pub const DOJI: &str = "Doji";
pub const BULLISH_ENGULFING: &str = "Bullish Engulfing";
pub const BEARISH_ENGULFING: &str = "Bearish Engulfing";
pub const MORNING_STAR: &str = "Morning Star";
pub const EVENING_STAR: &str = "Evening Star";
pub const THREE_WHITE_SOLDIERS: &str = "Three White Soldiers";
pub const PIN_BAR: &str = "Pin Bar";

/// Minimum window length before any candlestick check runs
pub const MIN_CANDLESTICK_BARS: usize = 3;

/// Detect candlestick patterns on the tail of the window
///
/// Returns nothing for windows shorter than three bars. Several patterns may
/// fire for the same bar (a doji can also be a pin bar).
pub fn detect_candlestick_patterns(candles: &[Candle]) -> Vec<PatternObservation> {
    let [.., first, second, current] = candles else {
        return Vec::new();
    };

    let mut patterns = Vec::new();

    if is_hammer(current) {
        patterns.push(PatternObservation::candlestick(HAMMER, Direction::Bullish, 0.7));
    }
    if is_shooting_star(current) {
        patterns.push(PatternObservation::candlestick(SHOOTING_STAR, Direction::Bearish, 0.7));
    }
    if is_doji(current) {
        patterns.push(PatternObservation::candlestick(DOJI, Direction::Neutral, 0.5));
    }
    if is_bullish_engulfing(second, current) {
        patterns.push(PatternObservation::candlestick(BULLISH_ENGULFING, Direction::Bullish, 0.85));
    }
    if is_bearish_engulfing(second, current) {
        patterns.push(PatternObservation::candlestick(BEARISH_ENGULFING, Direction::Bearish, 0.85));
    }
    if is_morning_star(first, second, current) {
        patterns.push(PatternObservation::candlestick(MORNING_STAR, Direction::Bullish, 0.9));
    }
    if is_evening_star(first, second, current) {
        patterns.push(PatternObservation::candlestick(EVENING_STAR, Direction::Bearish, 0.9));
    }
    if is_three_white_soldiers(first, second, current) {
        patterns.push(PatternObservation::candlestick(THREE_WHITE_SOLDIERS, Direction::Bullish, 0.9));
    }
    if is_pin_bar(current) {
        let direction = if current.is_bullish() {
            Direction::Bullish
        } else {
            Direction::Bearish
        };
        patterns.push(PatternObservation::candlestick(PIN_BAR, direction, 0.75));
    }

    patterns
}

/// Long lower shadow, almost no upper shadow
pub fn is_hammer(candle: &Candle) -> bool {
    let body = candle.body();
    candle.lower_shadow() > body * 2.0 && candle.upper_shadow() < body * 0.3
}

pub fn is_shooting_star(candle: &Candle) -> bool {
    let body = candle.body();
    candle.upper_shadow() > body * 2.0 && candle.lower_shadow() < body * 0.3
}

pub fn is_doji(candle: &Candle) -> bool {
    candle.body() < candle.range() * 0.1
}

/// Bearish bar followed by a bullish bar whose body swallows it
pub fn is_bullish_engulfing(prev: &Candle, current: &Candle) -> bool {
    prev.is_bearish()
        && current.is_bullish()
        && current.open < prev.close
        && current.close > prev.open
}

pub fn is_bearish_engulfing(prev: &Candle, current: &Candle) -> bool {
    prev.is_bullish()
        && current.is_bearish()
        && current.open > prev.close
        && current.close < prev.open
}

pub fn is_morning_star(first: &Candle, second: &Candle, third: &Candle) -> bool {
    first.is_bearish()
        && second.body() < first.range() * 0.3
        && third.is_bullish()
        && third.close > first.body_midpoint()
}

pub fn is_evening_star(first: &Candle, second: &Candle, third: &Candle) -> bool {
    first.is_bullish()
        && second.body() < first.range() * 0.3
        && third.is_bearish()
        && third.close < first.body_midpoint()
}

pub fn is_three_white_soldiers(first: &Candle, second: &Candle, third: &Candle) -> bool {
    [first, second, third].iter().all(|c| c.is_bullish())
        && second.close > first.close
        && third.close > second.close
}

/// Nose is measured from the high down to the close (bullish bar) or the
/// open (bearish or flat bar).
pub fn is_pin_bar(candle: &Candle) -> bool {
    let range = candle.range();
    let nose = if candle.is_bullish() {
        candle.high - candle.close
    } else {
        candle.high - candle.open
    };

    nose > range * 0.6 && candle.body() < range * 0.3
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(open: f64, high: f64, low: f64, close: f64) -> Candle {
        Candle::new(0, open, high, low, close, 1000.0)
    }

    /// Neutral filler bars ahead of the bars under test
    fn window(tail: &[Candle]) -> Vec<Candle> {
        let mut candles = vec![bar(100.0, 101.0, 99.0, 100.5), bar(100.5, 101.5, 99.5, 100.0)];
        candles.extend_from_slice(tail);
        candles
    }

    fn names(candles: &[Candle]) -> Vec<&'static str> {
        detect_candlestick_patterns(candles).iter().map(|p| p.name).collect()
    }

    #[test]
    fn test_hammer() {
        let hammer = bar(100.0, 101.05, 97.0, 101.0);
        assert!(is_hammer(&hammer));
        assert!(!is_shooting_star(&hammer));

        let found = detect_candlestick_patterns(&window(&[hammer]));
        let obs = found.iter().find(|p| p.name == HAMMER).unwrap();
        assert_eq!(obs.direction, Direction::Bullish);
        assert_eq!(obs.strength, 0.7);
    }

    #[test]
    fn test_shooting_star() {
        let star = bar(101.0, 104.0, 99.95, 100.0);
        assert!(is_shooting_star(&star));
        assert!(!is_hammer(&star));

        let found = detect_candlestick_patterns(&window(&[star]));
        let obs = found.iter().find(|p| p.name == SHOOTING_STAR).unwrap();
        assert_eq!(obs.direction, Direction::Bearish);
    }

    #[test]
    fn test_doji_is_neutral() {
        let doji = bar(100.0, 102.0, 98.0, 100.1);
        let found = detect_candlestick_patterns(&window(&[doji]));
        let obs = found.iter().find(|p| p.name == DOJI).unwrap();
        assert_eq!(obs.direction, Direction::Neutral);
        assert_eq!(obs.strength, 0.5);
    }

    #[test]
    fn test_zero_range_bar_is_not_doji() {
        let flat = bar(100.0, 100.0, 100.0, 100.0);
        assert!(!is_doji(&flat));
        assert!(names(&window(&[flat])).is_empty());
    }

    #[test]
    fn test_bullish_engulfing_three_candle_window() {
        let candles = vec![
            bar(100.0, 101.0, 99.0, 100.5),
            bar(102.0, 102.5, 99.5, 100.0),  // bearish body 102 -> 100
            bar(99.5, 103.0, 99.0, 102.5),   // opens below 100, closes above 102
        ];

        let found = detect_candlestick_patterns(&candles);
        let obs = found.iter().find(|p| p.name == BULLISH_ENGULFING).unwrap();
        assert_eq!(obs.direction, Direction::Bullish);
        assert_eq!(obs.strength, 0.85);
    }

    #[test]
    fn test_bearish_engulfing() {
        let prev = bar(100.0, 102.5, 99.5, 102.0);
        let current = bar(102.5, 103.0, 99.0, 99.5);
        assert!(is_bearish_engulfing(&prev, &current));
        assert!(!is_bullish_engulfing(&prev, &current));
        assert!(names(&window(&[prev, current])).contains(&BEARISH_ENGULFING));
    }

    #[test]
    fn test_engulfing_requires_strict_containment() {
        let prev = bar(102.0, 102.5, 99.5, 100.0);
        let same_size = bar(100.0, 102.5, 99.5, 102.0);
        assert!(!is_bullish_engulfing(&prev, &same_size));
    }

    #[test]
    fn test_morning_star() {
        let first = bar(110.0, 110.5, 99.5, 100.0);  // long bearish, midpoint 105
        let second = bar(99.0, 100.0, 97.0, 99.5);   // small body
        let third = bar(100.0, 107.0, 99.5, 106.0);  // closes above 105

        assert!(is_morning_star(&first, &second, &third));
        let found = detect_candlestick_patterns(&[first, second, third]);
        let obs = found.iter().find(|p| p.name == MORNING_STAR).unwrap();
        assert_eq!(obs.strength, 0.9);
    }

    #[test]
    fn test_morning_star_needs_close_above_midpoint() {
        let first = bar(110.0, 110.5, 99.5, 100.0);
        let second = bar(99.0, 100.0, 97.0, 99.5);
        let third = bar(100.0, 105.5, 99.5, 104.0);
        assert!(!is_morning_star(&first, &second, &third));
    }

    #[test]
    fn test_evening_star() {
        let first = bar(100.0, 110.5, 99.5, 110.0);
        let second = bar(110.5, 113.0, 110.0, 111.0);
        let third = bar(110.0, 110.5, 103.0, 104.0);

        assert!(is_evening_star(&first, &second, &third));
        assert!(names(&[first, second, third]).contains(&EVENING_STAR));
    }

    #[test]
    fn test_three_white_soldiers() {
        let candles = vec![
            bar(100.0, 102.2, 99.8, 102.0),
            bar(102.0, 104.2, 101.8, 104.0),
            bar(104.0, 106.2, 103.8, 106.0),
        ];
        let found = detect_candlestick_patterns(&candles);
        let obs = found.iter().find(|p| p.name == THREE_WHITE_SOLDIERS).unwrap();
        assert_eq!(obs.direction, Direction::Bullish);
        assert_eq!(obs.strength, 0.9);
    }

    #[test]
    fn test_three_white_soldiers_needs_rising_closes() {
        let candles = vec![
            bar(100.0, 102.2, 99.8, 102.0),
            bar(100.5, 102.2, 100.0, 101.5),
            bar(101.0, 103.2, 100.8, 103.0),
        ];
        assert!(!names(&candles).contains(&THREE_WHITE_SOLDIERS));
    }

    #[test]
    fn test_pin_bar_direction_follows_body() {
        let bearish = bar(100.5, 104.0, 99.9, 100.0);
        let found = detect_candlestick_patterns(&window(&[bearish]));
        let obs = found.iter().find(|p| p.name == PIN_BAR).unwrap();
        assert_eq!(obs.direction, Direction::Bearish);
        assert_eq!(obs.strength, 0.75);

        let bullish = bar(100.0, 104.0, 99.9, 100.5);
        let found = detect_candlestick_patterns(&window(&[bullish]));
        let obs = found.iter().find(|p| p.name == PIN_BAR).unwrap();
        assert_eq!(obs.direction, Direction::Bullish);
    }

    #[test]
    fn test_bearish_pin_bar_nose_ends_at_open() {
        // high - open is 5.9 of a 10.0 range; high - close would be 6.5
        let bearish = bar(94.1, 100.0, 90.0, 93.5);
        assert!(!is_pin_bar(&bearish));

        let bearish = bar(93.9, 100.0, 90.0, 93.5);
        assert!(is_pin_bar(&bearish));
    }

    #[test]
    fn test_needs_three_bars() {
        let hammer = bar(100.0, 101.05, 97.0, 101.0);
        assert!(detect_candlestick_patterns(&[hammer, hammer]).is_empty());
    }
}
