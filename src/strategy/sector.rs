//! Sector-level rollup of emitted signals.

use crate::models::{Action, Direction, Signal};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorSentiment {
    pub sector: String,
    pub total: usize,
    pub bullish: usize,
    pub bearish: usize,
    pub sentiment: Direction,
}

/// Count BUY and SELL signals whose instrument belongs to `sector`
pub fn summarize(signals: &[Signal], sector: &str) -> SectorSentiment {
    let in_sector: Vec<&Signal> = signals
        .iter()
        .filter(|s| s.instrument.sector.as_deref() == Some(sector))
        .collect();

    let bullish = in_sector
        .iter()
        .filter(|s| s.setup.action == Action::Buy)
        .count();
    let bearish = in_sector
        .iter()
        .filter(|s| s.setup.action == Action::Sell)
        .count();

    let sentiment = match bullish.cmp(&bearish) {
        std::cmp::Ordering::Greater => Direction::Bullish,
        std::cmp::Ordering::Less => Direction::Bearish,
        std::cmp::Ordering::Equal => Direction::Neutral,
    };

    SectorSentiment {
        sector: sector.to_string(),
        total: in_sector.len(),
        bullish,
        bearish,
        sentiment,
    }
}
