use super::no_signal::NoSignal;
use super::profile::ScoringProfile;
use super::scorer::score;
use super::Strategy;
use crate::indicators::IndicatorBundle;
use crate::models::{validate_window, Candle, Instrument, Signal, MIN_ANALYSIS_CANDLES};
use crate::patterns;

/// Runs pattern detection, indicators and scoring over one candle window
///
/// Holds no state besides its configuration, so one engine can be shared
/// across tasks.
#[derive(Debug, Clone)]
pub struct SignalEngine {
    profile: ScoringProfile,
    timeframe: String,
}

impl SignalEngine {
    pub fn new(profile: ScoringProfile, timeframe: impl Into<String>) -> Self {
        Self {
            profile,
            timeframe: timeframe.into(),
        }
    }

    pub fn profile(&self) -> &ScoringProfile {
        &self.profile
    }

    pub fn timeframe(&self) -> &str {
        &self.timeframe
    }

    /// Analyse a candle window for `instrument`
    ///
    /// The current price is the last close. `generated_at` is stamped onto
    /// the signal as given.
    pub fn analyze(
        &self,
        candles: &[Candle],
        instrument: &Instrument,
        generated_at: i64,
    ) -> Result<Signal, NoSignal> {
        if candles.len() < MIN_ANALYSIS_CANDLES {
            tracing::debug!(
                "{}: insufficient data ({}/{} candles)",
                instrument.symbol,
                candles.len(),
                MIN_ANALYSIS_CANDLES
            );
            return Err(NoSignal::InsufficientData {
                need: MIN_ANALYSIS_CANDLES,
                got: candles.len(),
            });
        }
        validate_window(candles)?;

        let current_price = candles[candles.len() - 1].close;
        let patterns = patterns::detect(candles);
        let indicators = IndicatorBundle::compute(candles);

        let outcome = score(&patterns, &indicators, current_price, &self.profile);
        let setup = match outcome {
            Ok(setup) => setup,
            Err(no_signal) => {
                tracing::debug!("{}: no signal ({})", instrument.symbol, no_signal);
                return Err(no_signal);
            }
        };

        tracing::info!(
            "{}: {} @ {:.2} (stop {:.2}, t1 {:.2}, confidence {}%) - {}",
            instrument.symbol,
            setup.action,
            setup.entry,
            setup.stop_loss,
            setup.targets.t1,
            setup.confidence,
            setup.reason
        );

        Ok(Signal {
            instrument: instrument.clone(),
            setup,
            indicators: indicators.snapshot(),
            timeframe: self.timeframe.clone(),
            profile: self.profile.name.clone(),
            generated_at,
        })
    }
}

impl Default for SignalEngine {
    fn default() -> Self {
        Self::new(ScoringProfile::generic(), "5m")
    }
}

impl Strategy for SignalEngine {
    fn evaluate(
        &self,
        candles: &[Candle],
        instrument: &Instrument,
        generated_at: i64,
    ) -> Result<Signal, NoSignal> {
        self.analyze(candles, instrument, generated_at)
    }

    fn name(&self) -> &str {
        &self.profile.name
    }

    fn min_candles_required(&self) -> usize {
        MIN_ANALYSIS_CANDLES
    }
}
