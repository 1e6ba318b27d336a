//! SharedMemo: LruMemo behind a single lock

use std::hash::Hash;

use parking_lot::Mutex;

use crate::error;
use crate::index::{HashIndex, KeyIndex};
use crate::lru::{Entry, LruMemo};
use crate::stats::StatsSnapshot;

/// Thread-safe wrapper serializing every operation through one mutex
///
/// The lock is held while the function runs on a miss, so concurrent callers
/// asking for the same key compute it at most once between them. Callers
/// waiting on the lock block for the duration of that computation.
pub struct SharedMemo<K, V, F, M = HashIndex<K, Entry<V>>> {
    inner: Mutex<LruMemo<K, V, F, M>>,
}

impl<K, V, F> SharedMemo<K, V, F>
where
    K: Hash + Eq + Clone,
{
    /// Create a shared cache of `function` holding at most `capacity` entries
    ///
    /// # Panics
    /// If `capacity` is zero.
    pub fn new(function: F, capacity: usize) -> Self {
        Self::from_memo(LruMemo::new(function, capacity))
    }

    /// Like [`new`](Self::new), but reports a zero capacity as an error
    pub fn try_new(function: F, capacity: usize) -> error::Result<Self> {
        LruMemo::try_new(function, capacity).map(Self::from_memo)
    }
}

impl<K, V, F, M> SharedMemo<K, V, F, M>
where
    K: Eq + Clone,
    M: KeyIndex<K, Entry<V>>,
{
    /// Wrap an existing cache
    pub fn from_memo(memo: LruMemo<K, V, F, M>) -> Self {
        Self {
            inner: Mutex::new(memo),
        }
    }

    /// Get the value for `key`, computing it under the lock on a miss
    pub fn get(&self, key: &K) -> V
    where
        F: FnMut(&K) -> V,
        V: Clone,
    {
        self.inner.lock().get(key)
    }

    /// Get the value for `key` from a fallible function
    pub fn try_get<E>(&self, key: &K) -> Result<V, E>
    where
        F: FnMut(&K) -> Result<V, E>,
        V: Clone,
    {
        self.inner.lock().try_get(key)
    }

    /// Check presence without changing recency
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    /// Clone of the entry that would be evicted next
    pub fn least_recently_used(&self) -> Option<(K, V)>
    where
        V: Clone,
    {
        let memo = self.inner.lock();
        memo.least_recently_used()
            .map(|(key, value)| (key.clone(), value.clone()))
    }

    /// Snapshot of cached keys, most recently used first
    pub fn keys_by_recency(&self) -> Vec<K> {
        self.inner.lock().keys_by_recency().cloned().collect()
    }

    /// Drop the entry for `key`, returning its value
    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.lock().remove(key)
    }

    /// Drop every entry and reset statistics
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Get the current number of entries
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Get the maximum number of entries
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Check if the next miss will evict
    pub fn is_full(&self) -> bool {
        self.inner.lock().is_full()
    }

    /// Counters since creation or the last [`clear`](Self::clear)
    pub fn stats(&self) -> StatsSnapshot {
        self.inner.lock().stats().snapshot()
    }

    /// Unwrap the underlying cache
    pub fn into_inner(self) -> LruMemo<K, V, F, M> {
        self.inner.into_inner()
    }
}

impl<K, V, F, M> From<LruMemo<K, V, F, M>> for SharedMemo<K, V, F, M>
where
    K: Eq + Clone,
    M: KeyIndex<K, Entry<V>>,
{
    fn from(memo: LruMemo<K, V, F, M>) -> Self {
        Self::from_memo(memo)
    }
}
