//! Key Set Module
//!
//! Unordered set of primary keys sharing one index value.

use std::borrow::Borrow;
use std::collections::hash_set::Iter;
use std::collections::HashSet;
use std::hash::Hash;

// == Key Set ==
/// Primary keys grouped under a single index value.
#[derive(Debug, Clone)]
pub struct KeySet<K> {
    keys: HashSet<K>,
}

impl<K: Eq + Hash> KeySet<K> {
    // == Constructor ==
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            keys: HashSet::new(),
        }
    }

    // == Insert ==
    /// Adds a key. Returns false if it was already present.
    pub fn insert(&mut self, key: K) -> bool {
        self.keys.insert(key)
    }

    // == Remove ==
    /// Removes a key. Returns false if it was absent.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.keys.remove(key)
    }

    /// Returns true if `key` is in the set.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.keys.contains(key)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if the set holds no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterates keys in no particular order.
    pub fn iter(&self) -> Iter<'_, K> {
        self.keys.iter()
    }
}

impl<K: Eq + Hash> Default for KeySet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, K> IntoIterator for &'a KeySet<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}
