//! Cache Module
//!
//! Provides a string-keyed in-memory cache with TTL expiration, background
//! reaping, and an optional oldest-first size bound.

mod entry;
mod key;
mod order;
mod stats;
mod store;
mod traits;


// Re-export public types
pub use entry::{CacheEntry, MAX_TTL};
pub use key::CacheKeyGenerator;
pub use order::InsertionOrder;
pub use stats::{CacheStats, StatsCounters};
pub use store::TtlCache;
pub use traits::{Cache, NoOpCache};

use tracing::info;

use crate::config::CacheConfig;

// == From Config ==
/// Builds the cache described by `config`.
///
/// A disabled config yields a [`NoOpCache`]; otherwise a [`TtlCache`] whose
/// reaper is signalled to stop when the returned box is dropped. Must be
/// called inside a Tokio runtime when the cache is enabled.
pub fn from_config<V>(config: &CacheConfig) -> Box<dyn Cache<V>>
where
    V: Clone + Send + Sync + 'static,
{
    if !config.enabled {
        info!("Caching disabled by configuration");
        return Box::new(NoOpCache::new());
    }

    info!(
        "Cache configured: default_ttl={:?}, max_entries={}, sweep_interval={:?}",
        config.effective_ttl(),
        config.max_entries,
        config.sweep_interval()
    );
    Box::new(TtlCache::with_config(config))
}
