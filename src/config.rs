//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::time::Duration;

/// Default TTL applied when neither the caller nor the configuration supplies one.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// When false, `cache::from_config` builds a cache that stores nothing
    pub enabled: bool,
    /// TTL for entries set without an explicit TTL
    pub default_ttl: Duration,
    /// Size bound with oldest-first eviction, 0 = unbounded
    pub max_entries: usize,
    /// Reaper tick interval, None = half of `default_ttl`
    pub cleanup_interval: Option<Duration>,
}

impl CacheConfig {
    /// Creates a config with the given default TTL and defaults elsewhere.
    pub fn with_ttl(default_ttl: Duration) -> Self {
        Self {
            default_ttl,
            ..Self::default()
        }
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_ENABLED` - `true`/`false` (default: true)
    /// - `CACHE_DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `CACHE_MAX_ENTRIES` - Size bound, 0 disables it (default: 0)
    /// - `CACHE_CLEANUP_INTERVAL` - Reaper interval in seconds (default: TTL / 2)
    pub fn from_env() -> Self {
        Self {
            enabled: env::var("CACHE_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            default_ttl: env::var("CACHE_DEFAULT_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TTL),
            max_entries: env::var("CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            cleanup_interval: env::var("CACHE_CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs),
        }
    }

    /// Default TTL with the zero value replaced by [`DEFAULT_TTL`].
    pub fn effective_ttl(&self) -> Duration {
        if self.default_ttl.is_zero() {
            DEFAULT_TTL
        } else {
            self.default_ttl
        }
    }

    /// Interval between reaper sweeps.
    ///
    /// Never shorter than one millisecond.
    pub fn sweep_interval(&self) -> Duration {
        let interval = self
            .cleanup_interval
            .filter(|d| !d.is_zero())
            .unwrap_or_else(|| self.effective_ttl() / 2);
        interval.max(Duration::from_millis(1))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_ttl: DEFAULT_TTL,
            max_entries: 0,
            cleanup_interval: None,
        }
    }
}
