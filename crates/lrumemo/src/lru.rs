//! LRU memoization cache
//!
//! Couples a [`KeyIndex`] with a slot-arena access order so that lookup,
//! promotion on hit and eviction are all O(1). The index stores each value
//! next to the slot of its key in the access order.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use tracing::{debug, trace};

use crate::error::{self, Error};
use crate::index::{HashIndex, KeyIndex, OrderedIndex};
use crate::order::{AccessOrder, KeysByRecency, Slot};
use crate::stats::CacheStats;

/// Upper bound on storage reserved up front
const MAX_PREALLOC: usize = 1 << 16;

/// Cached value together with its position in the access order
#[derive(Debug)]
pub struct Entry<V> {
    value: V,
    slot: Slot,
}

impl<V> Entry<V> {
    /// The cached value
    pub fn value(&self) -> &V {
        &self.value
    }
}

/// Memoizes a function over at most `capacity` keys, evicting the least
/// recently used key when full
///
/// The index backend defaults to an AHash `HashMap`; see [`OrderedMemo`] for
/// the `BTreeMap` variant.
pub struct LruMemo<K, V, F, M = HashIndex<K, Entry<V>>> {
    function: F,
    index: M,
    order: AccessOrder<K>,
    stats: CacheStats,
    capacity: usize,
    _value: PhantomData<V>,
}

/// [`LruMemo`] keyed through a `BTreeMap`
pub type OrderedMemo<K, V, F> = LruMemo<K, V, F, OrderedIndex<K, Entry<V>>>;

impl<K, V, F> LruMemo<K, V, F>
where
    K: Hash + Eq + Clone,
{
    /// Create a cache of `function` holding at most `capacity` entries
    ///
    /// # Panics
    /// If `capacity` is zero.
    pub fn new(function: F, capacity: usize) -> Self {
        Self::with_index(function, capacity)
    }

    /// Like [`new`](Self::new), but reports a zero capacity as an error
    pub fn try_new(function: F, capacity: usize) -> error::Result<Self> {
        Self::try_with_index(function, capacity)
    }
}

impl<K, V, F, M> LruMemo<K, V, F, M>
where
    K: Eq + Clone,
    M: KeyIndex<K, Entry<V>>,
{
    /// Create a cache backed by the index type `M`
    ///
    /// # Panics
    /// If `capacity` is zero.
    pub fn with_index(function: F, capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than 0");
        Self::build(function, capacity)
    }

    /// Like [`with_index`](Self::with_index), but reports a zero capacity as an error
    pub fn try_with_index(function: F, capacity: usize) -> error::Result<Self> {
        if capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        Ok(Self::build(function, capacity))
    }

    fn build(function: F, capacity: usize) -> Self {
        let reserve = capacity.min(MAX_PREALLOC);
        debug!(capacity, "created LRU memo");

        Self {
            function,
            index: M::with_capacity(reserve),
            order: AccessOrder::with_capacity(reserve),
            stats: CacheStats::new(),
            capacity,
            _value: PhantomData,
        }
    }

    /// Get the value for `key`, computing and caching it on a miss
    ///
    /// A hit marks `key` as most recently used. A miss calls the function
    /// exactly once and evicts the least recently used entry if the cache is
    /// full.
    pub fn get(&mut self, key: &K) -> V
    where
        F: FnMut(&K) -> V,
        V: Clone,
    {
        if let Some(value) = self.promote(key).cloned() {
            self.stats.record_hit();
            return value;
        }

        // Counted after the call returns; an unwinding function records nothing
        let value = (self.function)(key);
        self.stats.record_miss();
        trace!(len = self.index.len(), "computed value on miss");

        self.insert(key.clone(), value.clone());
        value
    }

    /// Get the value for `key` from a fallible function
    ///
    /// An error from the function is returned unchanged and leaves the cache
    /// exactly as it was: nothing is inserted and nothing is evicted.
    pub fn try_get<E>(&mut self, key: &K) -> Result<V, E>
    where
        F: FnMut(&K) -> Result<V, E>,
        V: Clone,
    {
        if let Some(value) = self.promote(key).cloned() {
            self.stats.record_hit();
            return Ok(value);
        }

        let computed = (self.function)(key);
        self.stats.record_miss();
        let value = match computed {
            Ok(value) => value,
            Err(err) => {
                self.stats.record_failure();
                trace!(len = self.index.len(), "computation failed, cache unchanged");
                return Err(err);
            }
        };

        self.insert(key.clone(), value.clone());
        Ok(value)
    }

    /// Look up `key` without changing its recency
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(Entry::value)
    }

    /// Check presence without changing recency
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// The entry that would be evicted next
    pub fn least_recently_used(&self) -> Option<(&K, &V)> {
        let key = self.order.front()?;
        self.index.get(key).map(|entry| (key, &entry.value))
    }

    /// Cached keys, most recently used first
    pub fn keys_by_recency(&self) -> KeysByRecency<'_, K> {
        self.order.iter_recent()
    }

    /// Cached entries in the index's own order
    ///
    /// Sorted by key for [`OrderedMemo`], arbitrary for the hashed backend.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.index.iter().map(|(key, entry)| (key, &entry.value))
    }

    /// Drop the entry for `key`, returning its value
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let entry = self.index.remove(key)?;
        let removed = self.order.remove(entry.slot);
        debug_assert!(removed.is_some(), "index entry pointed at a free slot");

        #[cfg(debug_assertions)]
        self.validate_invariants();

        Some(entry.value)
    }

    /// Drop every entry and reset statistics; capacity and function are kept
    pub fn clear(&mut self) {
        let dropped = self.index.len();
        self.index.clear();
        self.order.clear();
        self.stats.reset();
        debug!(dropped, "cleared LRU memo");
    }

    /// Get the current number of entries
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Get the maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Check if the next miss will evict
    pub fn is_full(&self) -> bool {
        self.index.len() == self.capacity
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    fn promote(&mut self, key: &K) -> Option<&V> {
        let entry = self.index.get(key)?;
        self.order.move_to_back(entry.slot);
        Some(&entry.value)
    }

    fn insert(&mut self, key: K, value: V) {
        debug_assert!(!self.index.contains_key(&key), "insert on a resident key");

        if self.index.len() == self.capacity {
            self.evict();
        }

        let slot = self.order.push_back(key.clone());
        self.index.insert(key, Entry { value, slot });

        #[cfg(debug_assertions)]
        self.validate_invariants();
    }

    fn evict(&mut self) {
        debug_assert!(self.order.len() > 0, "evict on an empty cache");
        let Some(key) = self.order.pop_front() else {
            return;
        };

        let evicted = self.index.remove(&key);
        debug_assert!(evicted.is_some(), "evicted key missing from index");

        self.stats.record_eviction();
        trace!(capacity = self.capacity, "evicted least recently used entry");
    }

    /// Every index entry must point at the slot holding its own key, and both
    /// containers must agree on size.
    #[cfg(debug_assertions)]
    fn validate_invariants(&self) {
        debug_assert_eq!(
            self.index.len(),
            self.order.len(),
            "index and access order disagree on size"
        );
        debug_assert!(self.index.len() <= self.capacity, "cache over capacity");

        for (key, entry) in self.index.iter() {
            debug_assert!(
                self.order.key(entry.slot) == Some(key),
                "stale slot in index"
            );
        }
    }
}

impl<K, V, F, M> fmt::Debug for LruMemo<K, V, F, M>
where
    M: KeyIndex<K, Entry<V>>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruMemo")
            .field("len", &self.index.len())
            .field("capacity", &self.capacity)
            .field("stats", &self.stats)
            .finish()
    }
}
