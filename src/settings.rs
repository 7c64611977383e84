//! Application configuration.
//!
//! Built-in defaults, then an optional TOML file, then `TRADESIGNAL_*`
//! environment variables (nested keys use `__`, e.g.
//! `TRADESIGNAL_OVERRIDES__MIN_CONFIDENCE=55`).

use crate::api::binance::BINANCE_API_BASE;
use crate::strategy::ScoringProfile;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const ENV_PREFIX: &str = "TRADESIGNAL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error(
        "unknown scoring profile '{0}' (expected one of: {names})",
        names = ScoringProfile::builtin_names().join(", ")
    )]
    UnknownProfile(String),
}

/// Partial adjustments applied on top of a built-in profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileOverrides {
    pub candle_weight: Option<f64>,
    pub chart_weight: Option<f64>,
    pub min_confidence: Option<f64>,
    pub min_score_gap: Option<f64>,
    pub min_risk_reward: Option<f64>,
    pub atr_stop_multiple: Option<f64>,
    pub percent_stop: Option<f64>,
    pub max_reasons: Option<usize>,
}

impl ProfileOverrides {
    pub fn apply(&self, mut profile: ScoringProfile) -> ScoringProfile {
        if let Some(v) = self.candle_weight {
            profile.candle_weight = v;
        }
        if let Some(v) = self.chart_weight {
            profile.chart_weight = v;
        }
        if let Some(v) = self.min_confidence {
            profile.min_confidence = v;
        }
        if let Some(v) = self.atr_stop_multiple {
            profile.atr_stop_multiple = v;
        }
        // Gates and the percent stop can only be set, not removed
        profile.min_score_gap = self.min_score_gap.or(profile.min_score_gap);
        profile.min_risk_reward = self.min_risk_reward.or(profile.min_risk_reward);
        profile.percent_stop = self.percent_stop.or(profile.percent_stop);
        profile.max_reasons = self.max_reasons.or(profile.max_reasons);
        profile
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Built-in profile name
    pub profile: String,
    pub overrides: ProfileOverrides,
    /// Kline interval requested from providers, also stamped on signals
    pub interval: String,
    /// Candles requested per instrument
    pub limit: usize,
    pub cache_ttl_secs: u64,
    /// Directory of `<SYMBOL>.json` candle files for offline scans
    pub data_dir: PathBuf,
    pub binance_base_url: String,
    /// Default symbols for `scan`
    pub symbols: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            profile: ScoringProfile::GENERIC.to_string(),
            overrides: ProfileOverrides::default(),
            interval: "5m".to_string(),
            limit: 200,
            cache_ttl_secs: 60,
            data_dir: PathBuf::from("data"),
            binance_base_url: BINANCE_API_BASE.to_string(),
            symbols: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load defaults, then `path` if given, then environment variables
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("symbols")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Resolve the configured profile with overrides applied
    pub fn scoring_profile(&self) -> Result<ScoringProfile, ConfigError> {
        let base = ScoringProfile::by_name(&self.profile)
            .ok_or_else(|| ConfigError::UnknownProfile(self.profile.clone()))?;
        Ok(self.overrides.apply(base))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
