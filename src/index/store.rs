//! Indexed Store Module
//!
//! Primary-key storage with named secondary indexes kept in lockstep with
//! every mutation.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::{IndexError, IndexResult};
use crate::index::{IndexValue, KeySet};

type Extractor<V> = Box<dyn Fn(&V) -> IndexValue + Send + Sync>;

/// Index value -> primary keys, for one named index.
type IndexBucket<K> = HashMap<IndexValue, KeySet<K>>;

// == Tables ==
/// Primary map, extractor table and index table, guarded as one unit.
struct Tables<K, V> {
    primary: HashMap<K, V>,
    extractors: HashMap<String, Extractor<V>>,
    indexes: HashMap<String, IndexBucket<K>>,
}

impl<K, V> Tables<K, V>
where
    K: Eq + Hash + Clone,
{
    fn new() -> Self {
        Self {
            primary: HashMap::new(),
            extractors: HashMap::new(),
            indexes: HashMap::new(),
        }
    }

    /// Runs every extractor against `value`.
    fn extract(&self, value: &V) -> Vec<(String, IndexValue)> {
        self.extractors
            .iter()
            .map(|(name, extractor)| (name.clone(), extractor(value)))
            .collect()
    }

    fn link(&mut self, name: &str, value: IndexValue, key: K) {
        if let Some(bucket) = self.indexes.get_mut(name) {
            bucket.entry(value).or_default().insert(key);
        }
    }

    fn unlink<Q>(&mut self, name: &str, value: &IndexValue, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if let Some(bucket) = self.indexes.get_mut(name) {
            if let Some(keys) = bucket.get_mut(value) {
                keys.remove(key);
                if keys.is_empty() {
                    bucket.remove(value);
                }
            }
        }
    }

    // == Upsert ==
    /// Replaces or inserts `key`, moving it between index buckets.
    ///
    /// Extractors run before any map is touched, so a panicking extractor
    /// leaves the tables unchanged.
    fn upsert(&mut self, key: K, value: V) -> Option<V> {
        let old = self.primary.get(&key).map(|old| self.extract(old));
        let new = self.extract(&value);

        if let Some(old) = old {
            for (name, index_value) in &old {
                self.unlink(name, index_value, &key);
            }
        }
        for (name, index_value) in new {
            self.link(&name, index_value, key.clone());
        }
        self.primary.insert(key, value)
    }

    fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let old = self.extract(self.primary.get(key)?);
        for (name, index_value) in &old {
            self.unlink(name, index_value, key);
        }
        self.primary.remove(key)
    }
}

// == Indexed Store ==
/// Thread-safe map from `K` to `V` with named secondary indexes.
///
/// A single reader-writer lock guards the primary map and all indexes.
/// Lookups share the lock; mutations take it exclusively. Extractors,
/// predicates and key functions run while the lock is held and must not
/// call back into the same store.
pub struct IndexedStore<K, V> {
    tables: RwLock<Tables<K, V>>,
}

impl<K, V> IndexedStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates an empty store with no indexes.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::new()),
        }
    }

    // == Set ==
    /// Stores `value` under `key`, updating every index.
    ///
    /// Returns the value previously stored under `key`, if any.
    pub fn set(&self, key: K, value: V) -> Option<V> {
        self.tables.write().upsert(key, value)
    }

    // == Get ==
    /// Returns a copy of the value stored under `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.tables.read().primary.get(key).cloned()
    }

    // == Delete ==
    /// Removes `key` from the primary map and from every index.
    ///
    /// Returns the removed value; absent keys are a no-op.
    pub fn delete<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.tables.write().remove(key)
    }

    /// Returns true if `key` is stored.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.tables.read().primary.contains_key(key)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.tables.read().primary.len()
    }

    /// Returns true if no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.tables.read().primary.is_empty()
    }

    /// Snapshot of all keys, in no particular order.
    pub fn keys(&self) -> Vec<K> {
        self.tables.read().primary.keys().cloned().collect()
    }

    /// Snapshot of all values, in no particular order.
    pub fn values(&self) -> Vec<V> {
        self.tables.read().primary.values().cloned().collect()
    }

    // == Clear ==
    /// Removes every entry. Registered indexes survive, emptied.
    pub fn clear(&self) {
        let mut tables = self.tables.write();
        tables.primary.clear();
        for bucket in tables.indexes.values_mut() {
            bucket.clear();
        }
    }

    // == Load ==
    /// Upserts every item in order under the key computed by `key_fn`.
    ///
    /// The whole batch runs under one exclusive lock. Items are applied
    /// independently: if `key_fn` or an extractor panics, items before the
    /// failing one stay applied.
    pub fn load<I, F>(&self, items: I, mut key_fn: F)
    where
        I: IntoIterator<Item = V>,
        F: FnMut(&V) -> K,
    {
        let mut tables = self.tables.write();
        for item in items {
            let key = key_fn(&item);
            tables.upsert(key, item);
        }
    }

    // == Add Index ==
    /// Registers a secondary index and populates it from existing entries.
    ///
    /// # Errors
    /// `IndexAlreadyDefined` when `name` is taken; the existing index is kept.
    pub fn add_index<F, T>(&self, name: impl Into<String>, extractor: F) -> IndexResult<()>
    where
        F: Fn(&V) -> T + Send + Sync + 'static,
        T: Into<IndexValue>,
    {
        let name = name.into();
        let extractor: Extractor<V> = Box::new(move |value: &V| extractor(value).into());

        let mut tables = self.tables.write();
        if tables.extractors.contains_key(&name) {
            return Err(IndexError::IndexAlreadyDefined(name));
        }

        let mut bucket: IndexBucket<K> = HashMap::new();
        for (key, value) in &tables.primary {
            bucket
                .entry(extractor(value))
                .or_default()
                .insert(key.clone());
        }

        debug!(
            index = %name,
            entries = tables.primary.len(),
            distinct = bucket.len(),
            "Index registered"
        );
        tables.indexes.insert(name.clone(), bucket);
        tables.extractors.insert(name, extractor);
        Ok(())
    }

    // == Find ==
    /// Returns every value whose `name` index output equals `value`.
    ///
    /// # Errors
    /// `IndexNotFound` when `name` was never registered.
    pub fn find(&self, name: &str, value: impl Into<IndexValue>) -> IndexResult<Vec<V>> {
        let value = value.into();
        let tables = self.tables.read();

        if !tables.extractors.contains_key(name) {
            return Err(IndexError::IndexNotFound(name.to_string()));
        }
        let Some(keys) = tables.indexes.get(name).and_then(|b| b.get(&value)) else {
            return Ok(Vec::new());
        };

        Ok(keys
            .iter()
            .filter_map(|key| tables.primary.get(key).cloned())
            .collect())
    }

    // == Filter ==
    /// Full scan returning every value that satisfies `pred`.
    pub fn filter<P>(&self, pred: P) -> Vec<V>
    where
        P: Fn(&V) -> bool,
    {
        self.tables
            .read()
            .primary
            .values()
            .filter(|value| pred(value))
            .cloned()
            .collect()
    }

    /// Names of all registered indexes, sorted.
    pub fn index_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.read().extractors.keys().cloned().collect();
        names.sort();
        names
    }

    /// Distinct index values currently present under `name`, sorted.
    ///
    /// # Errors
    /// `IndexNotFound` when `name` was never registered.
    pub fn index_values(&self, name: &str) -> IndexResult<Vec<IndexValue>> {
        let tables = self.tables.read();
        let bucket = tables
            .indexes
            .get(name)
            .ok_or_else(|| IndexError::IndexNotFound(name.to_string()))?;

        let mut values: Vec<IndexValue> = bucket.keys().cloned().collect();
        values.sort();
        Ok(values)
    }

    /// Panics if the primary map and the indexes disagree.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let tables = self.tables.read();
        assert_eq!(tables.extractors.len(), tables.indexes.len());

        for (name, extractor) in &tables.extractors {
            let bucket = tables.indexes.get(name).expect("index table missing");

            // Every entry is filed under its extractor output
            for (key, value) in &tables.primary {
                let keys = bucket.get(&extractor(value)).expect("bucket missing");
                assert!(keys.contains(key), "key missing from index {}", name);
            }

            // Every filed key is live, correctly placed, and no bucket is empty
            for (index_value, keys) in bucket {
                assert!(!keys.is_empty(), "empty bucket left in index {}", name);
                for key in keys {
                    let value = tables.primary.get(key).expect("dangling key in index");
                    assert_eq!(&extractor(value), index_value);
                }
            }
        }
    }
}

impl<K, V> Default for IndexedStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for IndexedStore<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tables = self.tables.read();
        let mut indexes: Vec<&String> = tables.extractors.keys().collect();
        indexes.sort();
        f.debug_struct("IndexedStore")
            .field("len", &tables.primary.len())
            .field("indexes", &indexes)
            .finish()
    }
}
