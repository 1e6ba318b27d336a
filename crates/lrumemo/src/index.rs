//! Key index backends
//!
//! The cache never touches its map directly; it goes through [`KeyIndex`],
//! so any associative container with insert/get/remove/len can hold the
//! entries. Unordered (`HashMap`) and ordered (`BTreeMap`) maps are provided.

use std::collections::{btree_map, hash_map, BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use ahash::RandomState;

/// Unordered index using AHash
pub type HashIndex<K, E> = HashMap<K, E, RandomState>;

/// Ordered index, iterates in key order
pub type OrderedIndex<K, E> = BTreeMap<K, E>;

/// Associative map from a key to its cache entry
pub trait KeyIndex<K, E> {
    /// Iterator over `(key, entry)` pairs in the map's native order
    type Iter<'a>: Iterator<Item = (&'a K, &'a E)>
    where
        Self: 'a,
        K: 'a,
        E: 'a;

    /// Create an empty index sized for roughly `capacity` keys
    fn with_capacity(capacity: usize) -> Self
    where
        Self: Sized;

    /// Look up the entry for `key`
    fn get(&self, key: &K) -> Option<&E>;

    /// Check whether `key` has an entry
    fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Insert an entry, returning the one it replaced
    fn insert(&mut self, key: K, entry: E) -> Option<E>;

    /// Remove the entry for `key`
    fn remove(&mut self, key: &K) -> Option<E>;

    /// Number of entries
    fn len(&self) -> usize;

    /// Check if the index is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every entry
    fn clear(&mut self);

    /// Iterate over all entries
    fn iter(&self) -> Self::Iter<'_>;
}

impl<K, E, S> KeyIndex<K, E> for HashMap<K, E, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    type Iter<'a> = hash_map::Iter<'a, K, E>
    where
        Self: 'a,
        K: 'a,
        E: 'a;

    fn with_capacity(capacity: usize) -> Self {
        HashMap::with_capacity_and_hasher(capacity, S::default())
    }

    fn get(&self, key: &K) -> Option<&E> {
        HashMap::get(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        HashMap::contains_key(self, key)
    }

    fn insert(&mut self, key: K, entry: E) -> Option<E> {
        HashMap::insert(self, key, entry)
    }

    fn remove(&mut self, key: &K) -> Option<E> {
        HashMap::remove(self, key)
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn clear(&mut self) {
        HashMap::clear(self)
    }

    fn iter(&self) -> Self::Iter<'_> {
        HashMap::iter(self)
    }
}

impl<K, E> KeyIndex<K, E> for BTreeMap<K, E>
where
    K: Ord,
{
    type Iter<'a> = btree_map::Iter<'a, K, E>
    where
        Self: 'a,
        K: 'a,
        E: 'a;

    // BTreeMap has no preallocation
    fn with_capacity(_capacity: usize) -> Self {
        BTreeMap::new()
    }

    fn get(&self, key: &K) -> Option<&E> {
        BTreeMap::get(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        BTreeMap::contains_key(self, key)
    }

    fn insert(&mut self, key: K, entry: E) -> Option<E> {
        BTreeMap::insert(self, key, entry)
    }

    fn remove(&mut self, key: &K) -> Option<E> {
        BTreeMap::remove(self, key)
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn clear(&mut self) {
        BTreeMap::clear(self)
    }

    fn iter(&self) -> Self::Iter<'_> {
        BTreeMap::iter(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise<M: KeyIndex<u32, &'static str>>() {
        let mut index = M::with_capacity(4);
        assert!(index.is_empty());

        assert_eq!(index.insert(2, "two"), None);
        assert_eq!(index.insert(1, "one"), None);
        assert_eq!(index.insert(2, "deux"), Some("two"));

        assert_eq!(index.len(), 2);
        assert_eq!(index.get(&2), Some(&"deux"));
        assert!(index.contains_key(&1));
        assert!(!index.contains_key(&3));

        assert_eq!(index.remove(&1), Some("one"));
        assert_eq!(index.remove(&1), None);
        assert_eq!(index.len(), 1);

        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.iter().count(), 0);
    }

    #[test]
    fn test_hash_index() {
        exercise::<HashIndex<u32, &'static str>>();
    }

    #[test]
    fn test_std_hasher_index() {
        exercise::<HashMap<u32, &'static str>>();
    }

    #[test]
    fn test_ordered_index() {
        exercise::<OrderedIndex<u32, &'static str>>();
    }

    #[test]
    fn test_ordered_index_iterates_in_key_order() {
        let mut index: OrderedIndex<u32, char> = OrderedIndex::new();
        KeyIndex::insert(&mut index, 3, 'c');
        KeyIndex::insert(&mut index, 1, 'a');
        KeyIndex::insert(&mut index, 2, 'b');

        let keys: Vec<u32> = KeyIndex::iter(&index).map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![1, 2, 3]);
    }
}
