//! Ordered map over the alpha-balanced tree
//!
//! The map is an [`AbTreeSet`] of [`Entry`] values compared by key. The
//! tree never sees values; replacing a value happens in place on the stored
//! entry, which cannot change its position.

mod entry;

pub use entry::Entry;

use std::fmt;
use std::mem;

use crate::abtree::{AbTreeResult, AbTreeSet};
use crate::config::TreeConfig;

/// Ordered key/value map backed by an alpha-balanced tree
#[derive(Debug, Clone)]
pub struct AbTreeMap<K, V> {
    entries: AbTreeSet<Entry<K, V>>,
}

impl<K, V> AbTreeMap<K, V> {
    /// Create an empty map over a tree that never rebalances
    pub fn new() -> Self {
        Self {
            entries: AbTreeSet::new(),
        }
    }

    /// Create an empty map; when `self_balancing` is set alpha is 2/3
    pub fn with_balancing(self_balancing: bool) -> Self {
        Self {
            entries: AbTreeSet::with_balancing(self_balancing),
        }
    }

    /// Create an empty map with alpha = top / bottom
    pub fn with_ratio(self_balancing: bool, top: u32, bottom: u32) -> AbTreeResult<Self> {
        Ok(Self {
            entries: AbTreeSet::with_ratio(self_balancing, top, bottom)?,
        })
    }

    pub fn with_config(config: TreeConfig) -> AbTreeResult<Self> {
        Ok(Self {
            entries: AbTreeSet::with_config(config)?,
        })
    }

    /// Number of key/value mappings
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Alias of [`len`](Self::len)
    pub fn size(&self) -> usize {
        self.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The underlying entry tree, for structural inspection
    pub fn entries(&self) -> &AbTreeSet<Entry<K, V>> {
        &self.entries
    }

    /// Values in ascending key order (duplicates possible)
    pub fn values(&self) -> Vec<&V> {
        let Some(root) = self.entries.root() else {
            return Vec::new();
        };

        self.entries
            .inorder(root)
            .into_iter()
            .filter_map(|id| self.entries.get_node(id))
            .map(|node| node.element().value())
            .collect()
    }

    /// Keys in ascending order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(Entry::key)
    }

    /// Key/value pairs in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|entry| (entry.key(), entry.value()))
    }
}

impl<K: Ord, V> AbTreeMap<K, V> {
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains(key)
    }

    /// Get the value mapped to `key`
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key).map(Entry::value)
    }

    /// Associate `value` with `key`
    ///
    /// Returns the previous value, or `None` if there was no mapping.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let existing = self
            .entries
            .search(&key)
            .and_then(|id| self.entries.element_mut(id));

        if let Some(entry) = existing {
            return Some(mem::replace(&mut entry.value, value));
        }

        self.entries.insert(Entry::new(key, value));
        None
    }

    /// Remove the mapping for `key`, returning its value if present
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.take(key).map(Entry::into_value)
    }

    /// The keys as a set with the same shape as this map's tree
    ///
    /// Keys are inserted parents first into a non-balancing set, which
    /// reproduces the entry tree's structure exactly.
    pub fn key_set(&self) -> AbTreeSet<K>
    where
        K: Clone,
    {
        let mut keys = AbTreeSet::new();

        if let Some(root) = self.entries.root() {
            for id in self.entries.preorder(root) {
                if let Some(node) = self.entries.get_node(id) {
                    keys.insert(node.element().key().clone());
                }
            }
        }

        keys
    }
}

impl<K, V> Default for AbTreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Structural dump of the entry tree, entries rendered as `key=value`
impl<K: fmt::Display, V: fmt::Display> fmt::Display for AbTreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.entries, f)
    }
}
