// Signal generation
pub mod duration;
pub mod engine;
pub mod no_signal;
pub mod profile;
pub mod scorer;
pub mod sector;

pub use engine::SignalEngine;
pub use no_signal::{IndecisionReason, NoSignal};
pub use profile::{ScoringProfile, Verdict};

use crate::models::{Candle, Instrument, Signal};

/// Base trait for signal strategies
pub trait Strategy: Send + Sync {
    /// Produce a signal for one instrument's candle window
    fn evaluate(
        &self,
        candles: &[Candle],
        instrument: &Instrument,
        generated_at: i64,
    ) -> Result<Signal, NoSignal>;

    /// Get strategy name
    fn name(&self) -> &str;

    /// Minimum candles required for this strategy
    fn min_candles_required(&self) -> usize;
}

/// Round to two decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
