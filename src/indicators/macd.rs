/// Moving Average Convergence Divergence (MACD)
///
/// MACD line = fast EMA - slow EMA of closes; signal line = EMA of the MACD
/// line; histogram = MACD - signal.

use super::moving_average::calculate_ema_series;

pub const MACD_FAST_PERIOD: usize = 12;
pub const MACD_SLOW_PERIOD: usize = 26;
pub const MACD_SIGNAL_PERIOD: usize = 9;

/// Latest MACD reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Macd {
    pub macd_line: f64,
    pub signal_line: f64,
    pub histogram: f64,
}

impl Macd {
    /// All-NaN reading used when history is too short
    pub const NAN: Macd = Macd {
        macd_line: f64::NAN,
        signal_line: f64::NAN,
        histogram: f64::NAN,
    };
}

/// Calculate the latest MACD reading
///
/// Returns None until `slow + signal - 1` prices are available.
pub fn calculate_macd(prices: &[f64], fast: usize, slow: usize, signal: usize) -> Option<Macd> {
    if fast == 0 || fast >= slow {
        return None;
    }

    let fast_series = calculate_ema_series(prices, fast);
    let slow_series = calculate_ema_series(prices, slow);
    if slow_series.is_empty() {
        return None;
    }

    // Align the fast series with the first bar the slow EMA exists for
    let offset = slow - fast;
    let macd_series: Vec<f64> = slow_series
        .iter()
        .zip(&fast_series[offset..])
        .map(|(slow_ema, fast_ema)| fast_ema - slow_ema)
        .collect();

    let signal_line = *calculate_ema_series(&macd_series, signal).last()?;
    let macd_line = *macd_series.last()?;

    Some(Macd {
        macd_line,
        signal_line,
        histogram: macd_line - signal_line,
    })
}

/// MACD with the standard 12/26/9 periods
pub fn calculate_default_macd(prices: &[f64]) -> Option<Macd> {
    calculate_macd(prices, MACD_FAST_PERIOD, MACD_SLOW_PERIOD, MACD_SIGNAL_PERIOD)
}
