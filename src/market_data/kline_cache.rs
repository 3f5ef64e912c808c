// =============================================================================
// Kline Cache — time-bounded memo of fetched series per (symbol, interval)
// =============================================================================

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::debug;

use super::candle::{CandleKey, CandleSeries};

struct CachedSeries {
    series: CandleSeries,
    expires_at: Instant,
}

/// Thread-safe cache of fetched candle series. Each entry carries its own
/// expiry instant; expired entries are ignored on read and overwritten on the
/// next insert.
///
/// A zero `ttl` disables caching entirely.
pub struct KlineCache {
    entries: RwLock<HashMap<CandleKey, CachedSeries>>,
    ttl: Duration,
}

impl KlineCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Return the cached series for `key` if it has not expired at `now`.
    pub fn get(&self, key: &CandleKey, now: Instant) -> Option<CandleSeries> {
        let map = self.entries.read();
        let entry = map.get(key)?;
        if now < entry.expires_at {
            Some(entry.series.clone())
        } else {
            debug!(key = %key, "cache entry expired");
            None
        }
    }

    /// Store `series` under its own key, valid until `now + ttl`.
    pub fn insert(&self, series: CandleSeries, now: Instant) {
        if !self.is_enabled() {
            return;
        }
        let key = series.key().clone();
        let Some(expires_at) = now.checked_add(self.ttl) else {
            debug!(key = %key, ttl = ?self.ttl, "cache expiry out of range, not caching");
            return;
        };
        self.entries.write().insert(key, CachedSeries { series, expires_at });
    }

    /// Drop every expired entry.
    pub fn purge_expired(&self, now: Instant) -> usize {
        let mut map = self.entries.write();
        let before = map.len();
        map.retain(|_, entry| now < entry.expires_at);
        before - map.len()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }
}
