use crate::api::MarketDataProvider;
use crate::models::Candle;
use anyhow::Result;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Thread-safe key/value cache with a fixed time-to-live
///
/// Cloning yields another handle onto the same entries.
pub struct TtlCache<K, V> {
    entries: Arc<RwLock<HashMap<K, (V, Instant)>>>,
    ttl: Duration,
}

impl<K, V> Clone for TtlCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            ttl: self.ttl,
        }
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Value for `key` if it was inserted less than one TTL ago
    pub fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .filter(|(_, inserted_at)| inserted_at.elapsed() < self.ttl)
            .map(|(value, _)| value.clone())
    }

    pub fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key, (value, Instant::now()));
    }

    pub fn invalidate(&self, key: &K) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.clear();
    }

    /// Drop expired entries, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, (_, inserted_at)| inserted_at.elapsed() < self.ttl);
        before - entries.len()
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Provider wrapper that serves repeated candle requests from a cache
///
/// The cache is supplied by the caller, so several providers (or several
/// scans) can share one. Expired windows are purged whenever a miss is
/// stored. Spot prices are always fetched fresh.
#[derive(Clone)]
pub struct CachedProvider<P> {
    inner: P,
    cache: TtlCache<String, Vec<Candle>>,
}

impl<P: MarketDataProvider> CachedProvider<P> {
    pub fn new(inner: P, cache: TtlCache<String, Vec<Candle>>) -> Self {
        Self { inner, cache }
    }

    pub fn cache_key(symbol: &str, interval: &str, limit: usize) -> String {
        format!("{}_{}_{}", symbol, interval, limit)
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: MarketDataProvider> MarketDataProvider for CachedProvider<P> {
    async fn get_candles(&self, symbol: &str, interval: &str, limit: usize) -> Result<Vec<Candle>> {
        let key = Self::cache_key(symbol, interval, limit);

        if let Some(candles) = self.cache.get(&key) {
            tracing::debug!("Cache hit for {}", key);
            return Ok(candles);
        }

        let candles = self.inner.get_candles(symbol, interval, limit).await?;

        // Misses are the only writes, so stale windows are dropped here
        let purged = self.cache.purge_expired();
        if purged > 0 {
            tracing::debug!("Purged {} expired candle windows", purged);
        }
        self.cache.insert(key, candles.clone());
        Ok(candles)
    }

    async fn get_current_price(&self, symbol: &str) -> Result<f64> {
        self.inner.get_current_price(symbol).await
    }
}
