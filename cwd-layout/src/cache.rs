use std::collections::HashMap;
use std::hash::Hash;

/// Memo table owned by a packer instance.
///
/// Holds seed point sets and settled layouts keyed by circle count, so
/// repeated rebuilds of the same cardinality skip the expensive work.
#[derive(Debug, Clone)]
pub struct LayoutCache<K, V> {
    entries: HashMap<K, V>,
}

impl<K, V> Default for LayoutCache<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V> LayoutCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key`, computing it with `factory` first if absent.
    pub fn get_or_compute<F>(&mut self, key: K, factory: F) -> &V
    where
        F: FnOnce() -> V,
    {
        self.entries.entry(key).or_insert_with(factory)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.entries.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
