//! Cache Store Module
//!
//! TTL cache engine combining a sharded concurrent map with lazy and
//! background expiration.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::trace;

use crate::cache::{CacheEntry, CacheStats, InsertionOrder, StatsCounters};
use crate::clock::{Clock, MonotonicClock};
use crate::config::CacheConfig;
use crate::error::{CacheError, CacheResult};
use crate::tasks::{spawn_reaper, Lifecycle, LifecycleState, Sweep};

// == Shared State ==
/// State shared between the cache handle and its reaper task.
struct Shared<V> {
    entries: DashMap<String, CacheEntry<V>>,
    /// Only fed when `max_entries > 0`
    order: InsertionOrder,
    counters: StatsCounters,
    clock: Arc<dyn Clock>,
    default_ttl: Duration,
    max_entries: usize,
    next_seq: AtomicU64,
}

impl<V> Shared<V> {
    /// Removes `key` only if it is still expired at `now`.
    ///
    /// A concurrent `set` between the check and the removal wins.
    fn remove_if_expired(&self, key: &str, now: Instant) {
        if self
            .entries
            .remove_if(key, |_, entry| entry.is_expired_at(now))
            .is_some()
        {
            self.counters.record_expirations(1);
        }
    }

    // == Enforce Capacity ==
    /// Evicts oldest insertions until the size bound holds.
    fn enforce_capacity(&self) {
        while self.entries.len() > self.max_entries {
            let Some((key, seq)) = self.order.pop_oldest() else {
                break;
            };
            // Stale pairs (overwritten or removed keys) fail the seq check
            if self
                .entries
                .remove_if(&key, |_, entry| entry.seq == seq)
                .is_some()
            {
                self.counters.record_eviction();
                trace!(key = %key, "Evicted oldest entry");
            }
        }
    }

    /// Drops queued pairs that no longer match a live entry.
    fn compact_order(&self) {
        self.order.retain(|key, seq| {
            self.entries
                .get(key)
                .is_some_and(|entry| entry.seq == seq)
        });
    }
}

impl<V: Send + Sync + 'static> Sweep for Shared<V> {
    fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            if entry.is_expired_at(now) {
                removed += 1;
                false
            } else {
                true
            }
        });
        self.counters.record_expirations(removed as u64);

        if self.max_entries > 0 {
            self.compact_order();
        }
        removed
    }
}

// == TTL Cache ==
/// String-keyed cache with per-entry TTL and a background reaper.
///
/// Expired entries are never returned. They are removed lazily by `get` and
/// `has`, and proactively by a Tokio task that sweeps the whole table every
/// half default TTL (or the configured cleanup interval).
///
/// Constructing a cache spawns the reaper, so it must happen inside a Tokio
/// runtime. Call [`TtlCache::close`] to stop the reaper and wait for it;
/// dropping the cache only signals it to stop.
pub struct TtlCache<V> {
    shared: Arc<Shared<V>>,
    lifecycle: Lifecycle,
}

impl<V> TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a cache with the given default TTL.
    ///
    /// A zero `default_ttl` is replaced by five minutes.
    pub fn new(default_ttl: Duration) -> Self {
        Self::with_config(&CacheConfig::with_ttl(default_ttl))
    }

    /// Creates a cache from a full configuration.
    pub fn with_config(config: &CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(MonotonicClock))
    }

    /// Creates a cache that reads time from `clock`.
    pub fn with_clock(config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let shared = Arc::new(Shared {
            entries: DashMap::new(),
            order: InsertionOrder::new(),
            counters: StatsCounters::new(),
            clock,
            default_ttl: config.effective_ttl(),
            max_entries: config.max_entries,
            next_seq: AtomicU64::new(0),
        });

        let interval = config.sweep_interval();
        let lifecycle =
            Lifecycle::start(|token| spawn_reaper(Arc::clone(&shared), interval, token));

        Self { shared, lifecycle }
    }

    // == Get ==
    /// Retrieves a live value by key.
    ///
    /// Counts a hit on success and a miss otherwise. An expired entry is
    /// removed and reported as a miss.
    pub fn get(&self, key: &str) -> CacheResult<V> {
        let now = self.shared.clock.now();
        let lookup = self.shared.entries.get(key).map(|entry| {
            if entry.is_expired_at(now) {
                None
            } else {
                Some(entry.value.clone())
            }
        });

        match lookup {
            Some(Some(value)) => {
                self.shared.counters.record_hit();
                Ok(value)
            }
            Some(None) => {
                self.shared.remove_if_expired(key, now);
                self.shared.counters.record_miss();
                Err(CacheError::Miss(key.to_string()))
            }
            None => {
                self.shared.counters.record_miss();
                Err(CacheError::Miss(key.to_string()))
            }
        }
    }

    // == Set ==
    /// Stores a value for `ttl`, or the default TTL when `ttl` is None or zero.
    ///
    /// Overwriting a key replaces its value and restarts its TTL. With a
    /// size bound, inserting a new key may evict the oldest insertion.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let key = key.into();
        let ttl = ttl
            .filter(|ttl| !ttl.is_zero())
            .unwrap_or(self.shared.default_ttl);
        let seq = self.shared.next_seq.fetch_add(1, Ordering::Relaxed);
        let entry = CacheEntry::new(value, self.shared.clock.now(), ttl, seq);

        self.shared.counters.record_set();

        if self.shared.max_entries == 0 {
            self.shared.entries.insert(key, entry);
            return;
        }

        let replaced = self.shared.entries.insert(key.clone(), entry).is_some();
        self.shared.order.push(key, seq);
        if !replaced {
            self.shared.enforce_capacity();
        }
        if self.shared.order.len() > self.shared.max_entries.saturating_mul(2) {
            self.shared.compact_order();
        }
    }

    // == Has ==
    /// Returns true if a live entry exists. Does not touch hit/miss counters.
    pub fn has(&self, key: &str) -> bool {
        let now = self.shared.clock.now();
        let expired = match self.shared.entries.get(key) {
            Some(entry) => entry.is_expired_at(now),
            None => return false,
        };

        if expired {
            self.shared.remove_if_expired(key, now);
        }
        !expired
    }

    // == Delete ==
    /// Removes an entry by key. Returns true if one was present.
    pub fn delete(&self, key: &str) -> bool {
        let removed = self.shared.entries.remove(key).is_some();
        if removed {
            self.shared.counters.record_delete();
        }
        removed
    }

    /// Removes every entry. Counters are kept.
    pub fn clear(&self) {
        self.shared
            .order
            .clear_with(|| self.shared.entries.clear());
    }

    /// Remaining lifetime of a live entry.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let now = self.shared.clock.now();
        self.shared
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.ttl_remaining(now))
    }

    /// Runs one sweep immediately, returning the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        self.shared.purge_expired()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.shared
            .counters
            .snapshot(self.shared.entries.len(), self.shared.max_entries)
    }

    // == Length ==
    /// Number of stored entries, expired ones not yet reaped included.
    pub fn len(&self) -> usize {
        self.shared.entries.len()
    }

    // == Is Empty ==
    /// Returns true if no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.shared.entries.is_empty()
    }

    /// TTL applied when `set` is given none.
    pub fn default_ttl(&self) -> Duration {
        self.shared.default_ttl
    }

    /// Current state of the reaper.
    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    // == Close ==
    /// Stops the reaper and waits until it has exited.
    ///
    /// Idempotent. The cache stays usable afterwards but nothing sweeps it.
    pub async fn close(&self) {
        self.lifecycle.shutdown().await;
    }
}

impl<V> fmt::Debug for TtlCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("len", &self.shared.entries.len())
            .field("default_ttl", &self.shared.default_ttl)
            .field("max_entries", &self.shared.max_entries)
            .field("state", &self.lifecycle.state())
            .finish()
    }
}
