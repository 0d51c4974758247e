//! Cache Traits Module
//!
//! Object-safe interface shared by the TTL cache and the disabled cache.

use std::marker::PhantomData;
use std::time::Duration;

use crate::cache::{CacheStats, TtlCache};
use crate::error::{CacheError, CacheResult};

// == Cache Trait ==
/// Operations every string-keyed cache supports.
pub trait Cache<V>: Send + Sync {
    /// Returns a live value, or `CacheError::Miss`.
    fn get(&self, key: &str) -> CacheResult<V>;

    /// Stores a value; `None` or zero TTL means the default TTL.
    fn set(&self, key: &str, value: V, ttl: Option<Duration>) -> CacheResult<()>;

    /// True if a live entry exists.
    fn has(&self, key: &str) -> bool;

    /// Removes an entry, returning true if one was present.
    fn delete(&self, key: &str) -> bool;

    fn clear(&self);

    fn stats(&self) -> CacheStats;
}

impl<V> Cache<V> for TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, key: &str) -> CacheResult<V> {
        TtlCache::get(self, key)
    }

    fn set(&self, key: &str, value: V, ttl: Option<Duration>) -> CacheResult<()> {
        TtlCache::set(self, key, value, ttl);
        Ok(())
    }

    fn has(&self, key: &str) -> bool {
        TtlCache::has(self, key)
    }

    fn delete(&self, key: &str) -> bool {
        TtlCache::delete(self, key)
    }

    fn clear(&self) {
        TtlCache::clear(self)
    }

    fn stats(&self) -> CacheStats {
        TtlCache::stats(self)
    }
}

// == No-Op Cache ==
/// Cache used when caching is disabled. Stores nothing.
#[derive(Debug)]
pub struct NoOpCache<V> {
    _value: PhantomData<fn() -> V>,
}

impl<V> NoOpCache<V> {
    /// Creates a disabled cache.
    pub fn new() -> Self {
        Self {
            _value: PhantomData,
        }
    }
}

impl<V> Default for NoOpCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Cache<V> for NoOpCache<V> {
    fn get(&self, _key: &str) -> CacheResult<V> {
        Err(CacheError::Disabled)
    }

    fn set(&self, _key: &str, _value: V, _ttl: Option<Duration>) -> CacheResult<()> {
        Err(CacheError::Disabled)
    }

    fn has(&self, _key: &str) -> bool {
        false
    }

    fn delete(&self, _key: &str) -> bool {
        false
    }

    fn clear(&self) {}

    fn stats(&self) -> CacheStats {
        CacheStats::default()
    }
}
