// Technical indicators module
// Implements RSI, EMA, MACD, ATR, Bollinger Bands and market structure analysis

pub mod atr;
pub mod bollinger;
pub mod bundle;
pub mod macd;
pub mod market_analysis;
pub mod moving_average;
pub mod rsi;

pub use atr::calculate_atr;
pub use bollinger::{calculate_bollinger, BollingerBands, BOLLINGER_PERIOD, BOLLINGER_STD_DEV};
pub use bundle::{IndicatorBundle, ATR_PERIOD, RSI_PERIOD};
pub use macd::{calculate_default_macd, calculate_macd, Macd};
pub use market_analysis::{
    analyze_volume, detect_trend, find_support_resistance, SupportResistance, Trend,
    VolumeProfile,
};
pub use moving_average::{calculate_ema, calculate_ema_series, calculate_sma};
pub use rsi::calculate_rsi;
