//! In-memory response store with lazy expiry
//!
//! Provides a `ResponseCache` that keeps API payloads in memory alongside the
//! time they were stored. Entries older than the TTL are treated as absent on
//! read but stay in the map until overwritten or cleared.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::clock::{Clock, SystemClock};

/// Default time-to-live for cached responses, in seconds
pub const DEFAULT_TTL_SECS: i64 = 300;

/// A cached payload and the instant it was stored
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The cached payload
    pub payload: V,
    /// When the payload was stored
    pub stored_at: DateTime<Utc>,
}

/// Thread-safe map from query key to payload with a fixed TTL
///
/// Cloning the cache yields a handle to the same underlying entries.
///
/// There is no size bound: every distinct key stays in memory until
/// [`ResponseCache::clear`] is called.
#[derive(Debug)]
pub struct ResponseCache<V> {
    entries: Arc<RwLock<HashMap<String, CacheEntry<V>>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> ResponseCache<V> {
    /// Creates an empty cache with the default 5 minute TTL
    pub fn new() -> Self {
        Self::with_ttl(Duration::seconds(DEFAULT_TTL_SECS))
    }

    /// Creates an empty cache with a custom TTL
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the time source used to stamp and age entries
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The configured time-to-live
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Reads an entry from the cache
    ///
    /// Returns `None` if the key is missing or the entry is at least `ttl` old.
    /// Expired entries are left in place.
    pub fn get(&self, key: &str) -> Option<CacheEntry<V>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.get(key)?;

        if self.clock.now() - entry.stored_at < self.ttl {
            Some(entry.clone())
        } else {
            None
        }
    }

    /// Stores `payload` under `key`, stamping it with the current time
    ///
    /// Overwrites any existing entry for the key.
    pub fn put(&self, key: impl Into<String>, payload: V) {
        let entry = CacheEntry {
            payload,
            stored_at: self.clock.now(),
        };

        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), entry);
    }

    /// Removes every entry regardless of age
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of occupied slots, including expired entries
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no slots are occupied
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Clone> Default for ResponseCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for ResponseCache<V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            ttl: self.ttl,
            clock: Arc::clone(&self.clock),
        }
    }
}
