//! Error types for the indexed store and the TTL cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Index Error Enum ==
/// Errors reported by [`IndexedStore`](crate::index::IndexedStore).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// Lookup through an index name that was never registered
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    /// Registration of an index name that already exists
    #[error("Index already defined: {0}")]
    IndexAlreadyDefined(String),
}

// == Cache Error Enum ==
/// Errors reported by [`TtlCache`](crate::cache::TtlCache) and other
/// [`Cache`](crate::cache::Cache) implementations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// No live entry exists for the key (absent or expired)
    #[error("Cache miss: {0}")]
    Miss(String),

    /// The cache was configured as disabled
    #[error("Cache is disabled")]
    Disabled,

    /// Key parameters could not be encoded as JSON
    #[error("Failed to encode key parameters: {0}")]
    KeyEncoding(#[from] serde_json::Error),
}

impl CacheError {
    /// Returns true for the expected-path miss signal.
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheError::Miss(_))
    }
}

// == Result Type Aliases ==
/// Convenience Result type for index operations.
pub type IndexResult<T> = std::result::Result<T, IndexError>;

/// Convenience Result type for cache operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;
