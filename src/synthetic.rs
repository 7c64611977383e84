use crate::models::Candle;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Market scenario types for synthetic data generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum MarketScenario {
    /// Steady uptrend with noise
    Uptrend,
    /// Steady downtrend with noise
    Downtrend,
    /// Mean-reverting chop around the base price
    Sideways,
    /// Large swings, up to ±5% per candle
    Volatile,
    /// Constant price and volume (zero ATR)
    Flat,
}

/// Generates reproducible candle windows for demos and tests
pub struct SyntheticDataGenerator {
    rng: StdRng,
    base_price: f64,
    base_volume: f64,
    start: DateTime<Utc>,
}

impl SyntheticDataGenerator {
    /// Create a new generator with a seed for reproducibility
    ///
    /// Timestamps start at the Unix epoch unless [`Self::with_start`] is used,
    /// so the same seed always yields identical candles.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            base_price: 150.0,
            base_volume: 1_000_000.0,
            start: DateTime::<Utc>::default(),
        }
    }

    pub fn with_start(mut self, start: DateTime<Utc>) -> Self {
        self.start = start;
        self
    }

    pub fn with_base_price(mut self, base_price: f64) -> Self {
        self.base_price = base_price;
        self
    }

    pub fn base_price(&self) -> f64 {
        self.base_price
    }

    /// Generate candles for a specific market scenario
    ///
    /// # Arguments
    /// * `scenario` - The market scenario to simulate
    /// * `num_candles` - Number of candles to generate
    /// * `interval_minutes` - Minutes between candles
    pub fn generate(
        &mut self,
        scenario: MarketScenario,
        num_candles: usize,
        interval_minutes: i64,
    ) -> Vec<Candle> {
        let mut candles = Vec::with_capacity(num_candles);
        let mut current_price = self.base_price;

        for i in 0..num_candles {
            let timestamp = self.start + Duration::minutes(i as i64 * interval_minutes);

            if scenario == MarketScenario::Flat {
                candles.push(Candle::new(
                    timestamp.timestamp_millis(),
                    current_price,
                    current_price,
                    current_price,
                    current_price,
                    self.base_volume,
                ));
                continue;
            }

            current_price = self.next_price(scenario, current_price);
            candles.push(self.create_candle(current_price, timestamp));
        }

        candles
    }

    fn next_price(&mut self, scenario: MarketScenario, price: f64) -> f64 {
        match scenario {
            // Drift dominates the ±0.3% noise
            MarketScenario::Uptrend => price * (1.0 + 0.004 + self.rng.gen_range(-0.003..0.003)),
            MarketScenario::Downtrend => price * (1.0 - 0.004 + self.rng.gen_range(-0.003..0.003)),
            MarketScenario::Sideways => {
                // Mean reversion force + noise
                let reversion = (self.base_price - price) * 0.1;
                let noise = price * self.rng.gen_range(-0.01..0.01);
                price + reversion + noise
            }
            MarketScenario::Volatile => {
                let next = price * (1.0 + self.rng.gen_range(-0.05..0.05));
                // Prevent price from going too low
                next.max(self.base_price * 0.5)
            }
            MarketScenario::Flat => price,
        }
    }

    /// Helper to create a candle from price and timestamp
    fn create_candle(&mut self, price: f64, timestamp: DateTime<Utc>) -> Candle {
        // ±0.2% intrabar movement
        let noise_pct = 0.002;

        let high = price * (1.0 + self.rng.gen_range(0.0..noise_pct));
        let low = price * (1.0 - self.rng.gen_range(0.0..noise_pct));

        // Generate open and clamp it between low and high
        let open_raw = price * (1.0 + self.rng.gen_range(-noise_pct..noise_pct));
        let open = open_raw.clamp(low, high);

        // Vary volume ±30%
        let volume = self.base_volume * self.rng.gen_range(0.7..1.3);

        Candle::new(timestamp.timestamp_millis(), open, high, low, price, volume)
    }
}
