//! Index Module
//!
//! Keyed object storage with named secondary indexes.

mod key_set;
mod store;
mod value;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use key_set::KeySet;
pub use store::IndexedStore;
pub use value::IndexValue;
