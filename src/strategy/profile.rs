use serde::{Deserialize, Serialize};

/// RSI thresholds and weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsiRule {
    pub oversold: f64,
    pub overbought: f64,
    pub weight: f64,
    /// Points for the neutral bands either side of 50, if scored at all
    pub neutral_weight: Option<f64>,
}

/// Volume strength bonus given to whichever lane is ahead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeRule {
    /// Volume strength must be strictly above this multiple of the average
    pub threshold: f64,
    pub weight: f64,
    pub tag: String,
}

/// Indicator-only score used when no pattern was detected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackRule {
    pub bullish_rsi_below: f64,
    pub bearish_rsi_above: f64,
    pub weight: f64,
}

/// Bonus when price sits close to a recent swing level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelProximityRule {
    /// Maximum |price - level| / price
    pub tolerance: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasonTags {
    pub macd_bullish: String,
    pub macd_bearish: String,
    pub ema_bullish: String,
    pub ema_bearish: String,
}

/// Label reported when a profile declines to trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Avoid,
    Hold,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Avoid => write!(f, "AVOID"),
            Verdict::Hold => write!(f, "HOLD"),
        }
    }
}

/// Weights, thresholds and gates of the signal scorer
///
/// Two built-in profiles exist: [`ScoringProfile::generic`] and
/// [`ScoringProfile::equity_relaxed`]. Both are plain data, so a profile can
/// also be loaded from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringProfile {
    pub name: String,

    // Pattern weights
    pub candle_weight: f64,
    pub chart_weight: f64,

    // Indicators
    pub rsi: RsiRule,
    pub macd_weight: f64,
    pub ema_weight: f64,
    pub high_volume: VolumeRule,
    pub above_average_volume: Option<VolumeRule>,
    pub fallback: Option<FallbackRule>,
    pub trend_weight: f64,
    pub tag_trend: bool,
    pub level_proximity: Option<LevelProximityRule>,
    pub tags: ReasonTags,

    // Gates
    pub min_confidence: f64,
    pub min_score_gap: Option<f64>,
    pub min_risk_reward: Option<f64>,
    pub no_signal: Verdict,

    // Price levels
    pub atr_stop_multiple: f64,
    /// Stop never further than this fraction of price from entry
    pub percent_stop: Option<f64>,
    pub target_multiples: [f64; 3],

    // Output
    pub max_reasons: Option<usize>,
    pub estimate_duration: bool,
}

impl ScoringProfile {
    pub const GENERIC: &'static str = "generic";
    pub const EQUITY_RELAXED: &'static str = "equity-relaxed";

    /// Balanced weights, strict RSI, AVOID below 60 confidence
    pub fn generic() -> Self {
        Self {
            name: Self::GENERIC.to_string(),
            candle_weight: 20.0,
            chart_weight: 15.0,
            rsi: RsiRule {
                oversold: 30.0,
                overbought: 70.0,
                weight: 15.0,
                neutral_weight: None,
            },
            macd_weight: 10.0,
            ema_weight: 10.0,
            high_volume: VolumeRule {
                threshold: 1.5,
                weight: 10.0,
                tag: "High Volume".to_string(),
            },
            above_average_volume: None,
            fallback: None,
            trend_weight: 15.0,
            tag_trend: false,
            level_proximity: None,
            tags: ReasonTags {
                macd_bullish: "MACD Bullish".to_string(),
                macd_bearish: "MACD Bearish".to_string(),
                ema_bullish: "EMA Crossover Bullish".to_string(),
                ema_bearish: "EMA Crossover Bearish".to_string(),
            },
            min_confidence: 60.0,
            min_score_gap: None,
            min_risk_reward: None,
            no_signal: Verdict::Avoid,
            atr_stop_multiple: 1.5,
            percent_stop: None,
            target_multiples: [1.5, 2.5, 4.0],
            max_reasons: None,
            estimate_duration: false,
        }
    }

    /// Short-horizon equity profile: heavier patterns, relaxed RSI bands,
    /// indicator fallback and a tighter stop, gated on score gap and R:R
    pub fn equity_relaxed() -> Self {
        Self {
            name: Self::EQUITY_RELAXED.to_string(),
            candle_weight: 25.0,
            chart_weight: 20.0,
            rsi: RsiRule {
                oversold: 40.0,
                overbought: 60.0,
                weight: 18.0,
                neutral_weight: Some(8.0),
            },
            macd_weight: 12.0,
            ema_weight: 10.0,
            high_volume: VolumeRule {
                threshold: 1.5,
                weight: 15.0,
                tag: "High Volume Breakout".to_string(),
            },
            above_average_volume: Some(VolumeRule {
                threshold: 1.2,
                weight: 8.0,
                tag: "Above Average Volume".to_string(),
            }),
            fallback: Some(FallbackRule {
                bullish_rsi_below: 45.0,
                bearish_rsi_above: 55.0,
                weight: 15.0,
            }),
            trend_weight: 15.0,
            tag_trend: true,
            level_proximity: Some(LevelProximityRule {
                tolerance: 0.02,
                weight: 8.0,
            }),
            tags: ReasonTags {
                macd_bullish: "MACD Bullish Crossover".to_string(),
                macd_bearish: "MACD Bearish Crossover".to_string(),
                ema_bullish: "Golden Cross (EMA)".to_string(),
                ema_bearish: "Death Cross (EMA)".to_string(),
            },
            min_confidence: 50.0,
            min_score_gap: Some(10.0),
            min_risk_reward: Some(0.8),
            no_signal: Verdict::Hold,
            atr_stop_multiple: 1.5,
            percent_stop: Some(0.015),
            target_multiples: [1.5, 2.5, 4.0],
            max_reasons: Some(4),
            estimate_duration: true,
        }
    }

    /// Look up a built-in profile by name
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            Self::GENERIC => Some(Self::generic()),
            Self::EQUITY_RELAXED => Some(Self::equity_relaxed()),
            _ => None,
        }
    }

    pub fn builtin_names() -> [&'static str; 2] {
        [Self::GENERIC, Self::EQUITY_RELAXED]
    }
}

impl Default for ScoringProfile {
    fn default() -> Self {
        Self::generic()
    }
}
