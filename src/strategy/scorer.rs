//! Signal scorer: turns patterns and indicators into a trade setup.
//!
//! Evidence is accumulated into independent bullish and bearish lanes. The
//! stronger lane sets the direction, its score (capped at 100) is the
//! confidence, and ATR sets the stop and target ladder.

use super::duration::estimate_duration;
use super::no_signal::{IndecisionReason, NoSignal};
use super::profile::ScoringProfile;
use super::round2;
use crate::indicators::IndicatorBundle;
use crate::models::{Action, Direction, Targets, TradeSetup};
use crate::patterns::{PatternKind, PatternObservation};

/// RSI level separating the neutral-bullish and neutral-bearish bands
const RSI_MIDPOINT: f64 = 50.0;
const MAX_CONFIDENCE: f64 = 100.0;

/// Running bullish and bearish totals with the reasons that produced them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scorecard {
    pub bullish: f64,
    pub bearish: f64,
    pub reasons: Vec<String>,
}

impl Scorecard {
    fn add(&mut self, direction: Direction, points: f64) {
        match direction {
            Direction::Bullish => self.bullish += points,
            Direction::Bearish => self.bearish += points,
            Direction::Neutral => {}
        }
    }

    fn add_tagged(&mut self, direction: Direction, points: f64, tag: &str) {
        self.add(direction, points);
        self.reasons.push(tag.to_string());
    }

    /// Lane strictly ahead, bearish on a tie
    pub fn leading(&self) -> Direction {
        if self.bullish > self.bearish {
            Direction::Bullish
        } else {
            Direction::Bearish
        }
    }

    pub fn confidence(&self) -> f64 {
        self.bullish.max(self.bearish).min(MAX_CONFIDENCE)
    }

    pub fn gap(&self) -> f64 {
        (self.bullish - self.bearish).abs()
    }
}

/// Accumulate pattern and indicator evidence
///
/// Indicator inputs are expected to be finite; [`score`] checks this before
/// calling.
pub fn tally(
    patterns: &[PatternObservation],
    indicators: &IndicatorBundle,
    current_price: f64,
    profile: &ScoringProfile,
) -> Scorecard {
    let mut card = Scorecard::default();

    // Patterns, candlestick first
    for kind in [PatternKind::Candlestick, PatternKind::Chart] {
        let weight = match kind {
            PatternKind::Candlestick => profile.candle_weight,
            PatternKind::Chart => profile.chart_weight,
        };
        for pattern in patterns
            .iter()
            .filter(|p| p.kind == kind && p.direction != Direction::Neutral)
        {
            card.add_tagged(pattern.direction, pattern.strength * weight, pattern.name);
        }
    }

    // RSI
    let rsi = indicators.rsi;
    let rule = &profile.rsi;
    if rsi < rule.oversold {
        card.add_tagged(Direction::Bullish, rule.weight, "RSI Oversold");
    } else if rsi > rule.overbought {
        card.add_tagged(Direction::Bearish, rule.weight, "RSI Overbought");
    } else if let Some(neutral) = rule.neutral_weight {
        if rsi <= RSI_MIDPOINT {
            card.add_tagged(Direction::Bullish, neutral, "RSI Neutral-Bullish");
        } else {
            card.add_tagged(Direction::Bearish, neutral, "RSI Neutral-Bearish");
        }
    }

    // MACD
    let macd = &indicators.macd;
    if macd.macd_line > macd.signal_line {
        card.add_tagged(Direction::Bullish, profile.macd_weight, &profile.tags.macd_bullish);
    } else if macd.macd_line < macd.signal_line {
        card.add_tagged(Direction::Bearish, profile.macd_weight, &profile.tags.macd_bearish);
    }

    // EMA alignment
    if indicators.ema20 > indicators.ema50 {
        card.add_tagged(Direction::Bullish, profile.ema_weight, &profile.tags.ema_bullish);
    } else if indicators.ema20 < indicators.ema50 {
        card.add_tagged(Direction::Bearish, profile.ema_weight, &profile.tags.ema_bearish);
    }

    // Volume confirms whichever side is ahead
    let volume_strength = indicators.volume.strength;
    let volume_rule = if volume_strength > profile.high_volume.threshold {
        Some(&profile.high_volume)
    } else {
        profile
            .above_average_volume
            .as_ref()
            .filter(|rule| volume_strength > rule.threshold)
    };
    if let Some(rule) = volume_rule {
        let leading = card.leading();
        card.add_tagged(leading, rule.weight, &rule.tag);
    }

    // Indicator-only fallback when nothing was detected, neutral patterns included
    if let Some(fallback) = profile.fallback.as_ref().filter(|_| patterns.is_empty()) {
        if rsi < fallback.bullish_rsi_below && indicators.ema20 > indicators.ema50 {
            card.add_tagged(Direction::Bullish, fallback.weight, "Technical Indicators Bullish");
        } else if rsi > fallback.bearish_rsi_above && indicators.ema20 < indicators.ema50 {
            card.add_tagged(Direction::Bearish, fallback.weight, "Technical Indicators Bearish");
        }
    }

    // Trend
    let trend = &indicators.trend;
    let trend_points = trend.strength * profile.trend_weight;
    match (trend.direction, profile.tag_trend) {
        (Direction::Bullish, true) => card.add_tagged(Direction::Bullish, trend_points, "Strong Uptrend"),
        (Direction::Bearish, true) => card.add_tagged(Direction::Bearish, trend_points, "Strong Downtrend"),
        (Direction::Neutral, _) => {}
        (direction, false) => card.add(direction, trend_points),
    }

    // Proximity to recent swing levels
    if let Some(rule) = &profile.level_proximity {
        let near = |level: &f64| (current_price - level).abs() / current_price < rule.tolerance;
        let levels = &indicators.support_resistance;

        if levels.support.iter().any(near) {
            card.add_tagged(Direction::Bullish, rule.weight, "Near Support Level");
        }
        if levels.resistance.iter().any(near) {
            card.add_tagged(Direction::Bearish, rule.weight, "Near Resistance Level");
        }
    }

    card
}

/// Score the window and build a trade setup, or explain why not
pub fn score(
    patterns: &[PatternObservation],
    indicators: &IndicatorBundle,
    current_price: f64,
    profile: &ScoringProfile,
) -> Result<TradeSetup, NoSignal> {
    if !current_price.is_finite() || current_price <= 0.0 {
        return Err(degenerate(format!("current price {} is not a positive number", current_price)));
    }
    if let Some(indicator) = indicators.first_missing_input() {
        return Err(NoSignal::MissingIndicator { indicator });
    }
    if indicators.atr <= 0.0 {
        return Err(degenerate(format!("ATR {} is not positive", indicators.atr)));
    }
    if !indicators.volume.strength.is_finite() {
        return Err(degenerate("volume average is zero".to_string()));
    }

    let card = tally(patterns, indicators, current_price, profile);
    let confidence = card.confidence();

    tracing::debug!(
        "Score [{}]: bullish={:.1} bearish={:.1} confidence={:.1} reasons=[{}]",
        profile.name,
        card.bullish,
        card.bearish,
        confidence,
        card.reasons.join(", ")
    );

    if confidence < profile.min_confidence {
        return Err(indecisive(profile, IndecisionReason::BelowConfidence, &card));
    }
    if profile.min_score_gap.is_some_and(|min_gap| card.gap() < min_gap) {
        return Err(indecisive(profile, IndecisionReason::ScoresTooClose, &card));
    }

    let action = match card.leading() {
        Direction::Bullish => Action::Buy,
        _ => Action::Sell,
    };
    let levels = PriceLevels::from_atr(action, current_price, indicators.atr, profile);

    if !levels.risk_reward.is_finite() || levels.risk_reward <= 0.0 {
        return Err(degenerate(format!("risk-reward {} is not positive", levels.risk_reward)));
    }
    if profile
        .min_risk_reward
        .is_some_and(|min_rr| levels.risk_reward < min_rr)
    {
        return Err(indecisive(profile, IndecisionReason::PoorRiskReward, &card));
    }

    let raw_risk_reward = levels.risk_reward;
    let levels = levels.rounded();
    if !levels.is_ordered(action) {
        return Err(degenerate(format!(
            "price levels collapse after rounding (ATR {})",
            indicators.atr
        )));
    }
    if levels.risk_reward <= 0.0 {
        return Err(degenerate(format!("risk-reward {:.4} rounds to zero", raw_risk_reward)));
    }
    if levels.stop_loss <= 0.0 || levels.targets.t3 <= 0.0 {
        return Err(degenerate(format!(
            "price level below zero (stop {}, t3 {}, ATR {})",
            levels.stop_loss, levels.targets.t3, indicators.atr
        )));
    }

    let reasons = match profile.max_reasons {
        Some(max) => &card.reasons[..card.reasons.len().min(max)],
        None => &card.reasons[..],
    };

    let duration = profile
        .estimate_duration
        .then(|| estimate_duration(levels.entry, levels.targets.t1, indicators.volume.strength));

    Ok(TradeSetup {
        action,
        entry: levels.entry,
        stop_loss: levels.stop_loss,
        targets: levels.targets,
        confidence: confidence.round() as u8,
        reason: reasons.join(" + "),
        risk_reward: levels.risk_reward,
        duration,
        patterns: patterns.iter().map(|p| p.name.to_string()).collect(),
    })
}

fn degenerate(reason: String) -> NoSignal {
    tracing::warn!("Degenerate input: {}", reason);
    NoSignal::DegenerateInput(reason)
}

fn indecisive(profile: &ScoringProfile, reason: IndecisionReason, card: &Scorecard) -> NoSignal {
    NoSignal::Indecisive {
        verdict: profile.no_signal,
        reason,
        bullish: card.bullish,
        bearish: card.bearish,
    }
}

/// Entry, stop and targets for one side of the market
#[derive(Debug, Clone, Copy, PartialEq)]
struct PriceLevels {
    entry: f64,
    stop_loss: f64,
    targets: Targets,
    risk_reward: f64,
}

impl PriceLevels {
    fn from_atr(action: Action, price: f64, atr: f64, profile: &ScoringProfile) -> Self {
        // +1 moves with the trade, -1 against it
        let side = match action {
            Action::Buy => 1.0,
            Action::Sell => -1.0,
        };

        let atr_stop = price - side * atr * profile.atr_stop_multiple;
        let stop_loss = match profile.percent_stop {
            // Tighter of the two: BUY takes the higher stop, SELL the lower
            Some(pct) => {
                let pct_stop = price * (1.0 - side * pct);
                match action {
                    Action::Buy => atr_stop.max(pct_stop),
                    Action::Sell => atr_stop.min(pct_stop),
                }
            }
            None => atr_stop,
        };

        let [m1, m2, m3] = profile.target_multiples;
        let targets = Targets {
            t1: price + side * atr * m1,
            t2: price + side * atr * m2,
            t3: price + side * atr * m3,
        };

        let risk_reward = (targets.t1 - price) / (price - stop_loss);

        Self {
            entry: price,
            stop_loss,
            targets,
            risk_reward,
        }
    }

    fn rounded(self) -> Self {
        Self {
            entry: round2(self.entry),
            stop_loss: round2(self.stop_loss),
            targets: Targets {
                t1: round2(self.targets.t1),
                t2: round2(self.targets.t2),
                t3: round2(self.targets.t3),
            },
            risk_reward: round2(self.risk_reward),
        }
    }

    fn is_ordered(&self, action: Action) -> bool {
        let Targets { t1, t2, t3 } = self.targets;
        match action {
            Action::Buy => self.stop_loss < self.entry && self.entry < t1 && t1 < t2 && t2 < t3,
            Action::Sell => self.stop_loss > self.entry && self.entry > t1 && t1 > t2 && t2 > t3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{
        BollingerBands, Macd, SupportResistance, Trend, VolumeProfile,
    };
    use crate::patterns::candlestick::{BULLISH_ENGULFING, DOJI, HAMMER};
    use crate::patterns::chart::DOUBLE_TOP;
    use crate::strategy::profile::Verdict;

    /// Indicators that contribute nothing under either built-in profile
    fn quiet_indicators() -> IndicatorBundle {
        IndicatorBundle {
            rsi: 65.0,
            macd: Macd {
                macd_line: 0.5,
                signal_line: 0.5,
                histogram: 0.0,
            },
            ema20: 100.0,
            ema50: 100.0,
            ema200: f64::NAN,
            atr: 2.0,
            bollinger: BollingerBands::NAN,
            support_resistance: SupportResistance::default(),
            trend: Trend {
                direction: Direction::Neutral,
                strength: 0.5,
            },
            volume: VolumeProfile {
                current: 1000.0,
                average: 1000.0,
                strength: 1.0,
            },
        }
    }

    fn bullish_indicators() -> IndicatorBundle {
        IndicatorBundle {
            rsi: 25.0,
            macd: Macd {
                macd_line: 1.0,
                signal_line: 0.5,
                histogram: 0.5,
            },
            ema20: 102.0,
            ema50: 100.0,
            trend: Trend {
                direction: Direction::Bullish,
                strength: 0.8,
            },
            ..quiet_indicators()
        }
    }

    fn bearish_indicators() -> IndicatorBundle {
        IndicatorBundle {
            rsi: 78.0,
            macd: Macd {
                macd_line: -1.0,
                signal_line: -0.5,
                histogram: -0.5,
            },
            ema20: 98.0,
            ema50: 100.0,
            trend: Trend {
                direction: Direction::Bearish,
                strength: 0.8,
            },
            ..quiet_indicators()
        }
    }

    fn hammer() -> PatternObservation {
        PatternObservation::candlestick(HAMMER, Direction::Bullish, 0.7)
    }

    #[test]
    fn test_generic_buy_ladder() {
        let profile = ScoringProfile::generic();
        let setup = score(&[hammer()], &bullish_indicators(), 100.0, &profile).unwrap();

        // 14 (hammer) + 15 (RSI) + 10 (MACD) + 10 (EMA) + 12 (trend)
        assert_eq!(setup.action, Action::Buy);
        assert_eq!(setup.confidence, 61);
        assert_eq!(setup.entry, 100.0);
        assert_eq!(setup.stop_loss, 97.0);
        assert_eq!(setup.targets.t1, 103.0);
        assert_eq!(setup.targets.t2, 105.0);
        assert_eq!(setup.targets.t3, 108.0);
        assert_eq!(setup.risk_reward, 1.0);
        assert_eq!(
            setup.reason,
            "Hammer + RSI Oversold + MACD Bullish + EMA Crossover Bullish"
        );
        assert_eq!(setup.patterns, vec!["Hammer"]);
        assert!(setup.duration.is_none());
    }

    #[test]
    fn test_generic_sell_ladder() {
        let profile = ScoringProfile::generic();
        let patterns = [PatternObservation::chart(DOUBLE_TOP, Direction::Bearish, 0.8)];
        let indicators = IndicatorBundle {
            volume: VolumeProfile {
                current: 3000.0,
                average: 1500.0,
                strength: 2.0,
            },
            ..bearish_indicators()
        };
        let setup = score(&patterns, &indicators, 100.0, &profile).unwrap();

        // 12 + 15 + 10 + 10 + 10 (volume) + 12
        assert_eq!(setup.action, Action::Sell);
        assert_eq!(setup.confidence, 69);
        assert_eq!(setup.stop_loss, 103.0);
        assert_eq!(setup.targets.t3, 92.0);
        assert_eq!(setup.risk_reward, 1.0);
        assert!(setup.stop_loss > setup.entry);
        assert!(setup.entry > setup.targets.t1);
        assert!(setup.targets.t1 > setup.targets.t2);
        assert!(setup.targets.t2 > setup.targets.t3);
    }

    #[test]
    fn test_generic_avoid_below_sixty() {
        let profile = ScoringProfile::generic();
        let outcome = score(&[], &bullish_indicators(), 100.0, &profile).unwrap_err();

        match outcome {
            NoSignal::Indecisive {
                verdict,
                reason,
                bullish,
                bearish,
            } => {
                assert_eq!(verdict, Verdict::Avoid);
                assert_eq!(reason, IndecisionReason::BelowConfidence);
                assert_eq!(bullish, 47.0);
                assert_eq!(bearish, 0.0);
            }
            other => panic!("expected indecisive outcome, got {:?}", other),
        }
    }

    #[test]
    fn test_neutral_patterns_add_nothing() {
        let profile = ScoringProfile::generic();
        let doji = PatternObservation::candlestick(DOJI, Direction::Neutral, 0.5);
        let card = tally(&[doji], &quiet_indicators(), 100.0, &profile);

        assert_eq!(card.bullish, 0.0);
        assert_eq!(card.bearish, 0.0);
        assert!(card.reasons.is_empty());
    }

    #[test]
    fn test_relaxed_rsi_bands() {
        let profile = ScoringProfile::equity_relaxed();
        let at = |rsi: f64| {
            let indicators = IndicatorBundle {
                rsi,
                ..quiet_indicators()
            };
            tally(&[], &indicators, 100.0, &profile)
        };

        assert_eq!(at(35.0).reasons, vec!["RSI Oversold"]);
        assert_eq!(at(35.0).bullish, 18.0);
        assert_eq!(at(45.0).reasons, vec!["RSI Neutral-Bullish"]);
        assert_eq!(at(50.0).reasons, vec!["RSI Neutral-Bullish"]);
        assert_eq!(at(55.0).reasons, vec!["RSI Neutral-Bearish"]);
        assert_eq!(at(55.0).bearish, 8.0);
        assert_eq!(at(60.0).reasons, vec!["RSI Neutral-Bearish"]);
        assert_eq!(at(61.0).reasons, vec!["RSI Overbought"]);
    }

    #[test]
    fn test_generic_rsi_has_no_neutral_band() {
        let profile = ScoringProfile::generic();
        let indicators = IndicatorBundle {
            rsi: 50.0,
            ..quiet_indicators()
        };
        assert!(tally(&[], &indicators, 100.0, &profile).reasons.is_empty());
    }

    #[test]
    fn test_volume_goes_to_leading_lane() {
        let profile = ScoringProfile::generic();
        let high_volume = VolumeProfile {
            current: 2000.0,
            average: 1000.0,
            strength: 2.0,
        };

        let bullish = IndicatorBundle {
            volume: high_volume,
            ..bullish_indicators()
        };
        let card = tally(&[], &bullish, 100.0, &profile);
        assert!((card.bullish - 57.0).abs() < 1e-9);
        assert!(card.reasons.contains(&"High Volume".to_string()));

        // Tied lanes: volume counts as bearish
        let tied = IndicatorBundle {
            volume: high_volume,
            ..quiet_indicators()
        };
        let card = tally(&[], &tied, 100.0, &profile);
        assert_eq!(card.bullish, 0.0);
        assert_eq!(card.bearish, 10.0);
        assert_eq!(card.reasons, vec!["High Volume"]);
    }

    #[test]
    fn test_above_average_volume_relaxed_only() {
        let volume = VolumeProfile {
            current: 1300.0,
            average: 1000.0,
            strength: 1.3,
        };
        let indicators = IndicatorBundle {
            volume,
            ..quiet_indicators()
        };

        let generic = tally(&[], &indicators, 100.0, &ScoringProfile::generic());
        assert!(generic.reasons.is_empty());

        let relaxed = tally(&[], &indicators, 100.0, &ScoringProfile::equity_relaxed());
        assert!(relaxed.reasons.contains(&"Above Average Volume".to_string()));
    }

    #[test]
    fn test_relaxed_fallback_buy() {
        let profile = ScoringProfile::equity_relaxed();
        let indicators = IndicatorBundle {
            rsi: 42.0,
            macd: Macd {
                macd_line: 1.0,
                signal_line: 0.5,
                histogram: 0.5,
            },
            ema20: 102.0,
            ema50: 100.0,
            trend: Trend {
                direction: Direction::Bullish,
                strength: 0.8,
            },
            ..quiet_indicators()
        };

        let setup = score(&[], &indicators, 100.0, &profile).unwrap();

        // 8 (neutral RSI) + 12 + 10 + 15 (fallback) + 12 (trend)
        assert_eq!(setup.action, Action::Buy);
        assert_eq!(setup.confidence, 57);
        assert_eq!(
            setup.reason,
            "RSI Neutral-Bullish + MACD Bullish Crossover + Golden Cross (EMA) + Technical Indicators Bullish"
        );
        // Percent stop is tighter than 1.5 ATR here
        assert_eq!(setup.stop_loss, 98.5);
        assert_eq!(setup.targets.t1, 103.0);
        assert_eq!(setup.risk_reward, 2.0);

        // A 3% move is past the swing band
        let duration = setup.duration.unwrap();
        assert_eq!(duration.trading_style, "Positional");
        assert_eq!(duration.percent_move, 3.0);
    }

    #[test]
    fn test_fallback_skipped_when_any_pattern_detected() {
        let profile = ScoringProfile::equity_relaxed();
        let indicators = IndicatorBundle {
            rsi: 42.0,
            ema20: 102.0,
            ema50: 100.0,
            ..quiet_indicators()
        };
        let doji = PatternObservation::candlestick(DOJI, Direction::Neutral, 0.5);

        let card = tally(&[doji], &indicators, 100.0, &profile);
        assert!(!card.reasons.iter().any(|r| r.starts_with("Technical")));
    }

    #[test]
    fn test_relaxed_scores_too_close() {
        let profile = ScoringProfile::equity_relaxed();
        // Bullish candle evidence vs bearish indicators of similar size
        let patterns = [PatternObservation::candlestick(
            BULLISH_ENGULFING,
            Direction::Bullish,
            0.85,
        )];
        let indicators = IndicatorBundle {
            rsi: 62.0,
            macd: Macd {
                macd_line: -1.0,
                signal_line: -0.5,
                histogram: -0.5,
            },
            ema20: 98.0,
            ema50: 100.0,
            trend: Trend {
                direction: Direction::Bullish,
                strength: 0.8,
            },
            ..quiet_indicators()
        };

        // bullish 21.25 + 12 vs bearish 18 + 12 + 10: 40 < 50
        let outcome = score(&patterns, &indicators, 100.0, &profile).unwrap_err();
        assert!(matches!(
            outcome,
            NoSignal::Indecisive {
                reason: IndecisionReason::BelowConfidence,
                ..
            }
        ));

        let strong = [
            patterns[0],
            PatternObservation::candlestick(HAMMER, Direction::Bullish, 0.7),
        ];
        // bullish 21.25 + 17.5 + 12 = 50.75 vs bearish 40
        let setup = score(&strong, &indicators, 100.0, &profile).unwrap();
        assert_eq!(setup.action, Action::Buy);
        assert_eq!(setup.confidence, 51);

        // Bearish leads (40 vs 38.75) when volume is scored, so it takes the
        // +8 and the final gap is 50.75 vs 48
        let above_average = IndicatorBundle {
            volume: VolumeProfile {
                current: 1300.0,
                average: 1000.0,
                strength: 1.3,
            },
            ..indicators
        };
        let outcome = score(&strong, &above_average, 100.0, &profile).unwrap_err();
        assert!(matches!(
            outcome,
            NoSignal::Indecisive {
                verdict: Verdict::Hold,
                reason: IndecisionReason::ScoresTooClose,
                ..
            }
        ));
    }

    #[test]
    fn test_relaxed_reason_truncated_to_four() {
        let profile = ScoringProfile::equity_relaxed();
        let patterns = [
            hammer(),
            PatternObservation::candlestick(BULLISH_ENGULFING, Direction::Bullish, 0.85),
        ];
        let setup = score(&patterns, &bullish_indicators(), 100.0, &profile).unwrap();

        assert_eq!(setup.reason.split(" + ").count(), 4);
        assert!(setup.reason.starts_with("Hammer + Bullish Engulfing"));
        assert_eq!(setup.confidence, 91);
    }

    #[test]
    fn test_support_proximity() {
        let profile = ScoringProfile::equity_relaxed();
        let indicators = IndicatorBundle {
            rsi: 65.0,
            support_resistance: SupportResistance {
                support: vec![90.0, 98.5],
                resistance: vec![103.0],
            },
            ..quiet_indicators()
        };

        let card = tally(&[], &indicators, 100.0, &profile);
        assert_eq!(card.bullish, 8.0);
        assert!(card.reasons.contains(&"Near Support Level".to_string()));
        // 3% away
        assert!(!card.reasons.contains(&"Near Resistance Level".to_string()));
    }

    #[test]
    fn test_generic_trend_untagged() {
        let profile = ScoringProfile::generic();
        let indicators = IndicatorBundle {
            trend: Trend {
                direction: Direction::Bearish,
                strength: 0.8,
            },
            ..quiet_indicators()
        };

        let card = tally(&[], &indicators, 100.0, &profile);
        assert!((card.bearish - 12.0).abs() < 1e-9);
        assert!(card.reasons.is_empty());
    }

    #[test]
    fn test_relaxed_poor_risk_reward() {
        let mut profile = ScoringProfile::equity_relaxed();
        // Targets so close that t1 is well under 0.8x the risk
        profile.target_multiples = [0.5, 1.0, 2.0];
        profile.percent_stop = None;

        let outcome = score(&[hammer()], &bullish_indicators(), 100.0, &profile).unwrap_err();
        assert!(matches!(
            outcome,
            NoSignal::Indecisive {
                reason: IndecisionReason::PoorRiskReward,
                ..
            }
        ));
    }

    #[test]
    fn test_zero_atr_is_degenerate() {
        let indicators = IndicatorBundle {
            atr: 0.0,
            ..bullish_indicators()
        };
        let outcome = score(&[hammer()], &indicators, 100.0, &ScoringProfile::generic()).unwrap_err();
        assert!(matches!(outcome, NoSignal::DegenerateInput(_)));
    }

    #[test]
    fn test_zero_volume_average_is_degenerate() {
        let indicators = IndicatorBundle {
            volume: VolumeProfile {
                current: 0.0,
                average: 0.0,
                strength: f64::NAN,
            },
            ..bullish_indicators()
        };
        let outcome = score(&[hammer()], &indicators, 100.0, &ScoringProfile::generic()).unwrap_err();
        assert!(matches!(outcome, NoSignal::DegenerateInput(_)));
    }

    #[test]
    fn test_missing_indicator() {
        let indicators = IndicatorBundle {
            ema50: f64::NAN,
            ..bullish_indicators()
        };
        let outcome = score(&[], &indicators, 100.0, &ScoringProfile::generic()).unwrap_err();
        assert_eq!(outcome, NoSignal::MissingIndicator { indicator: "ema50" });
        assert!(outcome.is_insufficient_data());
    }

    #[test]
    fn test_tiny_atr_collapses_after_rounding() {
        let indicators = IndicatorBundle {
            atr: 0.001,
            ..bullish_indicators()
        };
        let outcome = score(&[hammer()], &indicators, 100.0, &ScoringProfile::generic()).unwrap_err();
        assert!(matches!(outcome, NoSignal::DegenerateInput(_)));
    }

    #[test]
    fn test_risk_reward_rounding_to_zero_is_degenerate() {
        // Wide stop, tiny targets: 0.03 / 8.0 rounds to 0.00
        let profile = ScoringProfile {
            atr_stop_multiple: 400.0,
            ..ScoringProfile::generic()
        };
        let indicators = IndicatorBundle {
            atr: 0.02,
            ..bullish_indicators()
        };

        let outcome = score(&[hammer()], &indicators, 100.0, &profile).unwrap_err();
        assert!(matches!(outcome, NoSignal::DegenerateInput(ref reason) if reason.contains("rounds to zero")));
    }

    #[test]
    fn test_negative_stop_is_degenerate() {
        let indicators = IndicatorBundle {
            atr: 1.0,
            ..bullish_indicators()
        };

        // BUY stop would be 1.0 - 1.5
        let outcome = score(&[hammer()], &indicators, 1.0, &ScoringProfile::generic()).unwrap_err();
        assert!(matches!(outcome, NoSignal::DegenerateInput(ref reason) if reason.contains("below zero")));
    }

    #[test]
    fn test_negative_sell_target_is_degenerate() {
        let patterns = [PatternObservation::chart(DOUBLE_TOP, Direction::Bearish, 0.8)];
        let indicators = IndicatorBundle {
            atr: 0.5,
            volume: VolumeProfile {
                current: 3000.0,
                average: 1500.0,
                strength: 2.0,
            },
            ..bearish_indicators()
        };

        // t3 would be 1.0 - 4 * 0.5
        let outcome = score(&patterns, &indicators, 1.0, &ScoringProfile::generic()).unwrap_err();
        assert!(matches!(outcome, NoSignal::DegenerateInput(_)));
    }

    #[test]
    fn test_prices_rounded_to_cents() {
        let indicators = IndicatorBundle {
            atr: 1.2345,
            ..bullish_indicators()
        };
        let setup = score(&[hammer()], &indicators, 123.456, &ScoringProfile::generic()).unwrap();

        for price in [setup.entry, setup.stop_loss, setup.targets.t1, setup.targets.t2, setup.targets.t3] {
            assert_eq!(round2(price), price);
        }
        assert_eq!(setup.entry, 123.46);
    }
}
