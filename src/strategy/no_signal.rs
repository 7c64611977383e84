use super::profile::Verdict;
use crate::models::CandleError;
use serde::Serialize;
use thiserror::Error;

/// Why an indecisive score was not turned into a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndecisionReason {
    BelowConfidence,
    ScoresTooClose,
    PoorRiskReward,
}

impl std::fmt::Display for IndecisionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndecisionReason::BelowConfidence => write!(f, "confidence below threshold"),
            IndecisionReason::ScoresTooClose => write!(f, "bullish and bearish scores too close"),
            IndecisionReason::PoorRiskReward => write!(f, "risk-reward below minimum"),
        }
    }
}

/// Typed outcome when no signal is produced
///
/// None of these are failures of the engine; they are expected results of
/// analysing a window.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NoSignal {
    #[error("insufficient data: need {need} candles, got {got}")]
    InsufficientData { need: usize, got: usize },

    #[error("insufficient data: {indicator} unavailable for this window")]
    MissingIndicator { indicator: &'static str },

    #[error("invalid candles: {0}")]
    InvalidCandles(#[from] CandleError),

    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    #[error("{verdict}: {reason} (bullish {bullish:.1}, bearish {bearish:.1})")]
    Indecisive {
        verdict: Verdict,
        reason: IndecisionReason,
        bullish: f64,
        bearish: f64,
    },
}

impl NoSignal {
    pub fn is_insufficient_data(&self) -> bool {
        matches!(
            self,
            NoSignal::InsufficientData { .. } | NoSignal::MissingIndicator { .. }
        )
    }

    /// AVOID or HOLD for indecisive scores
    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            NoSignal::Indecisive { verdict, .. } => Some(*verdict),
            _ => None,
        }
    }
}
