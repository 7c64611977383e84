/// Bollinger Bands: SMA middle band with bands `k` population standard
/// deviations above and below.

use super::moving_average::calculate_sma;

pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_STD_DEV: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl BollingerBands {
    pub const NAN: BollingerBands = BollingerBands {
        upper: f64::NAN,
        middle: f64::NAN,
        lower: f64::NAN,
    };
}

/// Calculate the bands for the most recent `period` prices
pub fn calculate_bollinger(prices: &[f64], period: usize, k: f64) -> Option<BollingerBands> {
    let middle = calculate_sma(prices, period)?;

    let variance = prices
        .iter()
        .rev()
        .take(period)
        .map(|p| (p - middle).powi(2))
        .sum::<f64>()
        / period as f64;
    let deviation = variance.sqrt();

    Some(BollingerBands {
        upper: middle + k * deviation,
        middle,
        lower: middle - k * deviation,
    })
}
