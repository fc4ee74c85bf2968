//! In-memory TTL cache for upstream feed responses.
//!
//! Entries expire lazily: an expired entry is only evicted when a `get`
//! observes it, there is no background sweep.
//!
//! The cache has no size bound and no eviction policy beyond expiry. It is
//! intended for a handful of well-known keys (one per upstream feed), not as
//! a general-purpose cache.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Source of the current time for expiry checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Cloning shares the underlying time, so a test can keep one handle and
/// give another to the cache.
#[derive(Debug, Clone)]
pub struct ManualClock {
    start: Instant,
    elapsed: Arc<Mutex<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut elapsed = self.elapsed.lock().unwrap_or_else(|e| e.into_inner());
        *elapsed += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let elapsed = self.elapsed.lock().unwrap_or_else(|e| e.into_inner());
        self.start + *elapsed
    }
}

/// A cached value and the instant it stops being valid.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Key-value store with per-entry expiry.
///
/// Expiry is checked against an injectable [`Clock`] on every read and
/// expired entries are evicted there, which is why this is a plain locked
/// map rather than a `moka` cache: `moka` reads the system time itself and
/// evicts in the background.
///
/// Each operation locks the map for its own duration only. A `get` followed
/// by a `set` is not atomic: two callers racing on a cold key will both
/// miss and both populate it.
pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
    clock: Arc<dyn Clock>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create an empty cache driven by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty cache driven by the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<K, CacheEntry<V>>> {
        // A panic while holding the lock cannot leave a half-written entry,
        // so a poisoned map is still usable.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Look up a live entry.
    ///
    /// Returns `None` for keys that were never set and for keys whose expiry
    /// has passed; the latter are removed.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.entries();

        let entry = entries.get(key)?;
        if now < entry.expires_at {
            return Some(entry.value.clone());
        }

        entries.remove(key);
        None
    }

    /// Insert or replace an entry, valid for `ttl` from now.
    pub fn set(&self, key: K, value: V, ttl: Duration) {
        let expires_at = self.clock.now() + ttl;
        self.entries().insert(key, CacheEntry { value, expires_at });
    }

    /// Remove a single entry, live or not.
    pub fn remove(&self, key: &K) {
        self.entries().remove(key);
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.entries().clear();
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
