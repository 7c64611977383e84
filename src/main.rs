//! tradesignal CLI
//!
//! Scores candle windows from files, Binance or the synthetic generator and
//! prints the resulting signals as JSON.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;
use tokio::task::JoinSet;
use tracing_subscriber::EnvFilter;
use tradesignal::api::{interval_millis, load_candles_file, BinanceClient, JsonFileProvider, MarketDataProvider};
use tradesignal::cache::{CachedProvider, TtlCache};
use tradesignal::settings::AppConfig;
use tradesignal::strategy::sector::summarize as summarize_sector;
use tradesignal::synthetic::{MarketScenario, SyntheticDataGenerator};
use tradesignal::{check_uniform_spacing, Candle, Instrument, NoSignal, Signal, SignalEngine};

#[derive(Parser)]
#[command(name = "tradesignal")]
#[command(about = "Candlestick pattern and indicator trading signals", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Scoring profile (generic, equity-relaxed)
    #[arg(short, long, global = true)]
    profile: Option<String>,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "tradesignal=trace"
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a JSON file holding one candle array
    Analyze {
        #[arg(short, long)]
        file: PathBuf,

        /// Defaults to the file stem
        #[arg(short, long)]
        symbol: Option<String>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        sector: Option<String>,
    },

    /// Analyze several symbols from a directory of <SYMBOL>.json files
    Scan {
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Comma separated symbols; defaults to the configured list
        #[arg(short, long, value_delimiter = ',')]
        symbols: Vec<String>,

        /// Sector of every scanned symbol, adds a sector summary
        #[arg(long)]
        sector: Option<String>,
    },

    /// Fetch klines from Binance and analyze them
    Fetch {
        /// Trading pair (e.g., BTCUSDT)
        #[arg(short, long, default_value = "BTCUSDT")]
        symbol: String,

        /// Interval (1m, 5m, 15m, 1h, 4h, 1d)
        #[arg(short, long)]
        interval: Option<String>,

        /// Number of candles to fetch
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Analyze a generated market scenario
    Demo {
        #[arg(long, value_enum, default_value = "uptrend")]
        scenario: MarketScenario,

        #[arg(long, default_value = "42")]
        seed: u64,

        #[arg(long, default_value = "120")]
        candles: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    setup_logging(cli.log_level.as_deref());

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(profile) = cli.profile {
        config.profile = profile;
    }

    let engine = SignalEngine::new(config.scoring_profile()?, config.interval.clone());
    tracing::debug!("Using profile {} at {}", engine.profile().name, engine.timeframe());

    let output = match cli.command {
        Commands::Analyze {
            file,
            symbol,
            name,
            sector,
        } => {
            let candles = load_candles_file(&file).await?;
            let symbol = symbol
                .or_else(|| file.file_stem().map(|s| s.to_string_lossy().into_owned()))
                .unwrap_or_else(|| "UNKNOWN".to_string());
            let instrument = build_instrument(symbol, name, sector);

            warn_on_gaps(&instrument.symbol, &candles, &config.interval);
            let result = engine.analyze(&candles, &instrument, Utc::now().timestamp_millis());
            outcome_json(&instrument.symbol, result)?
        }

        Commands::Scan { dir, symbols, sector } => {
            let symbols = if symbols.is_empty() {
                config.symbols.clone()
            } else {
                symbols
            };
            if symbols.is_empty() {
                anyhow::bail!("No symbols to scan: pass --symbols or set `symbols` in the config");
            }

            let dir = dir.unwrap_or_else(|| config.data_dir.clone());
            let provider = CachedProvider::new(JsonFileProvider::new(dir), TtlCache::new(config.cache_ttl()));
            scan(&engine, provider, &config, symbols, sector).await?
        }

        Commands::Fetch {
            symbol,
            interval,
            limit,
        } => {
            let interval = interval.unwrap_or_else(|| config.interval.clone());
            let limit = limit.unwrap_or(config.limit);
            let engine = SignalEngine::new(engine.profile().clone(), interval.clone());

            let client = BinanceClient::with_base_url(&config.binance_base_url)?;
            let candles = client.get_candles(&symbol, &interval, limit).await?;
            let price = client.get_current_price(&symbol).await?;
            tracing::info!("{} last price {:.4} ({} candles)", symbol, price, candles.len());

            warn_on_gaps(&symbol, &candles, &interval);
            let result = engine.analyze(&candles, &Instrument::new(&symbol), Utc::now().timestamp_millis());
            outcome_json(&symbol, result)?
        }

        Commands::Demo {
            scenario,
            seed,
            candles,
        } => {
            let interval_minutes = interval_millis(&config.interval).map_or(5, |ms| ms / 60_000).max(1);
            let candles = SyntheticDataGenerator::new(seed)
                .with_start(Utc::now())
                .generate(scenario, candles, interval_minutes);

            let instrument = Instrument::new(format!("SYNTH-{:?}", scenario).to_uppercase());
            let result = engine.analyze(&candles, &instrument, Utc::now().timestamp_millis());
            outcome_json(&instrument.symbol, result)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn setup_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tradesignal=info")),
    };

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_instrument(symbol: String, name: Option<String>, sector: Option<String>) -> Instrument {
    let mut instrument = Instrument::new(symbol);
    if let Some(name) = name {
        instrument = instrument.with_name(name);
    }
    if let Some(sector) = sector {
        instrument = instrument.with_sector(sector);
    }
    instrument
}

fn warn_on_gaps(symbol: &str, candles: &[Candle], interval: &str) {
    let Some(interval_ms) = interval_millis(interval) else {
        return;
    };
    if let Err(e) = check_uniform_spacing(candles, interval_ms) {
        tracing::warn!("{}: {} - signal may be unreliable", symbol, e);
    }
}

fn outcome_json(symbol: &str, result: Result<Signal, NoSignal>) -> Result<Value> {
    Ok(match result {
        Ok(signal) => serde_json::to_value(signal)?,
        Err(no_signal) => json!({
            "symbol": symbol,
            "action": no_signal.verdict().map_or("NONE".to_string(), |v| v.to_string()),
            "insufficientData": no_signal.is_insufficient_data(),
            "reason": no_signal.to_string(),
        }),
    })
}

/// Analyze every symbol concurrently, one task per symbol
async fn scan<P>(
    engine: &SignalEngine,
    provider: CachedProvider<P>,
    config: &AppConfig,
    symbols: Vec<String>,
    sector: Option<String>,
) -> Result<Value>
where
    P: MarketDataProvider + Clone + 'static,
{
    let mut tasks = JoinSet::new();

    for (index, symbol) in symbols.into_iter().enumerate() {
        let engine = engine.clone();
        let provider = provider.clone();
        let instrument = build_instrument(symbol, None, sector.clone());
        let (interval, limit) = (config.interval.clone(), config.limit);

        tasks.spawn(async move {
            let candles = provider
                .get_candles(&instrument.symbol, &interval, limit)
                .await
                .with_context(|| format!("Failed to load candles for {}", instrument.symbol));

            let result = candles.map(|candles| {
                warn_on_gaps(&instrument.symbol, &candles, &interval);
                engine.analyze(&candles, &instrument, Utc::now().timestamp_millis())
            });
            (index, instrument.symbol, result)
        });
    }

    let mut rows = Vec::new();
    let mut signals = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let (index, symbol, result) = joined.context("Scan task panicked")?;
        let row = match result {
            Ok(Ok(signal)) => {
                signals.push(signal.clone());
                outcome_json(&symbol, Ok(signal))?
            }
            Ok(Err(no_signal)) => outcome_json(&symbol, Err(no_signal))?,
            Err(e) => {
                tracing::warn!("{:#}", e);
                json!({ "symbol": symbol, "error": format!("{:#}", e) })
            }
        };
        rows.push((index, row));
    }

    // Keep the requested symbol order
    rows.sort_by_key(|(index, _)| *index);
    let results: Vec<Value> = rows.into_iter().map(|(_, row)| row).collect();

    Ok(match sector {
        Some(sector) => json!({
            "results": results,
            "sector": summarize_sector(&signals, &sector),
        }),
        None => Value::Array(results),
    })
}
