//! indexcache - In-process keyed object storage
//!
//! Provides two thread-safe building blocks:
//! - [`IndexedStore`]: primary-key map with named secondary indexes kept
//!   consistent with every mutation
//! - [`TtlCache`]: string-keyed cache with per-entry TTL, a background
//!   reaper and hit/miss statistics
//!
//! # Example
//! ```
//! use indexcache::IndexedStore;
//!
//! #[derive(Clone)]
//! struct Tool {
//!     name: String,
//!     category: String,
//! }
//!
//! let tools = IndexedStore::new();
//! tools.add_index("category", |t: &Tool| t.category.clone()).unwrap();
//! tools.set(
//!     "calc".to_string(),
//!     Tool { name: "calc".into(), category: "math".into() },
//! );
//!
//! let math = tools.find("category", "math").unwrap();
//! assert_eq!(math[0].name, "calc");
//! ```

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod index;
pub mod tasks;

pub use cache::{Cache, CacheKeyGenerator, CacheStats, NoOpCache, TtlCache};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::CacheConfig;
pub use error::{CacheError, CacheResult, IndexError, IndexResult};
pub use index::{IndexValue, IndexedStore};
pub use tasks::LifecycleState;
