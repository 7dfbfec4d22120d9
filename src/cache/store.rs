//! Cache Store Module
//!
//! Unsynchronized cache engine combining hash map storage with FIFO order
//! tracking and lazy TTL expiration. Every operation takes the current
//! instant explicitly; [`BoundedTtlCache`](crate::BoundedTtlCache) supplies it
//! under its lock.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use ahash::RandomState;
use tracing::{debug, trace};

use crate::cache::{CacheEntry, FifoOrder};

// Upper bound on slots reserved up front; larger caches grow on demand.
const MAX_PREALLOC: usize = 4096;

// Entry plus the index of its node in the order list.
#[derive(Debug)]
struct Slot<V> {
    entry: CacheEntry<V>,
    position: usize,
}

// == Cache Store ==
/// Cache storage with FIFO eviction and TTL support.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key-value storage
    entries: HashMap<K, Slot<V>, RandomState>,
    /// Insertion order, oldest first
    order: FifoOrder<K>,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Lifespan granted on every write
    ttl: Duration,
}

impl<K, V> CacheStore<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries the store can hold
    /// * `ttl` - Lifespan of each entry, counted from its last write
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let prealloc = capacity.min(MAX_PREALLOC);

        Self {
            entries: HashMap::with_capacity_and_hasher(prealloc, RandomState::new()),
            order: FifoOrder::with_capacity(prealloc),
            capacity,
            ttl,
        }
    }

    // == Get ==
    /// Returns the live value for `key`.
    ///
    /// An expired entry is removed from the store and reported as absent.
    /// A hit neither refreshes the TTL nor changes eviction order.
    pub fn get<Q>(&mut self, key: &Q, now: Instant) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let expired = self.entries.get(key)?.entry.is_expired_at(now);

        if expired {
            self.remove(key);
            trace!("Lazy expiry: removed stale entry, {} entries remain", self.len());
            return None;
        }

        self.entries.get(key).map(|slot| &slot.entry.value)
    }

    // == Upsert ==
    /// Stores `value` under `key` with a fresh TTL.
    ///
    /// An existing key is removed first, so the write also moves it to the
    /// newest position. A new key arriving at capacity evicts the oldest key.
    ///
    /// # Returns
    /// The key that was evicted to make room, if any. With zero capacity the
    /// incoming key itself is returned and nothing is stored.
    pub fn upsert(&mut self, key: K, value: V, now: Instant) -> Option<K> {
        if self.capacity == 0 {
            debug!("Zero-capacity cache: dropped incoming entry");
            return Some(key);
        }

        let mut evicted = None;
        if self.remove(&key).is_none() && self.entries.len() >= self.capacity {
            evicted = self.evict_oldest();
        }

        let position = self.order.push_newest(key.clone());
        let entry = CacheEntry::new(value, self.ttl, now);
        self.entries.insert(key, Slot { entry, position });

        evicted
    }

    // == Delete ==
    /// Removes `key` if present and returns its value, expired or not.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove(key)
    }

    // == Clear ==
    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    // == Length ==
    /// Returns the number of stored entries, including expired ones not yet collected.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Stored keys from oldest to newest write.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }

    fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = self.entries.remove(key)?;
        self.order.remove(slot.position);
        Some(slot.entry.value)
    }

    fn evict_oldest(&mut self) -> Option<K> {
        let victim = self.order.pop_oldest()?;
        self.entries.remove(&victim);
        debug!(
            "FIFO eviction: dropped oldest entry to stay within capacity {}",
            self.capacity
        );
        Some(victim)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: Duration = Duration::from_secs(60);

    fn keys_of(store: &CacheStore<i32, i32>) -> Vec<i32> {
        store.keys().copied().collect()
    }

    #[test]
    fn test_store_new() {
        let store: CacheStore<i32, i32> = CacheStore::new(3, MINUTE);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 3);
        assert_eq!(store.ttl(), MINUTE);
    }

    #[test]
    fn test_store_upsert_and_get() {
        let mut store = CacheStore::new(3, MINUTE);
        let now = Instant::now();

        store.upsert("key1".to_string(), "value1".to_string(), now);

        assert_eq!(store.get("key1", now).map(String::as_str), Some("value1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store: CacheStore<i32, i32> = CacheStore::new(3, MINUTE);
        assert_eq!(store.get(&1, Instant::now()), None);
    }

    #[test]
    fn test_store_get_does_not_refresh_order() {
        let mut store = CacheStore::new(2, MINUTE);
        let now = Instant::now();

        store.upsert(1, 1, now);
        store.upsert(2, 2, now);
        store.get(&1, now);

        // Reads are not accesses in the LRU sense: 1 is still the oldest
        assert_eq!(store.upsert(3, 3, now), Some(1));
        assert_eq!(keys_of(&store), vec![2, 3]);
    }

    #[test]
    fn test_store_expired_entry_is_collected_on_get() {
        let mut store = CacheStore::new(3, Duration::from_millis(100));
        let now = Instant::now();

        store.upsert(1, 1, now);
        store.upsert(2, 2, now);

        assert_eq!(store.get(&1, now + Duration::from_millis(100)), None);
        assert_eq!(store.len(), 1);
        assert_eq!(keys_of(&store), vec![2]);
    }

    #[test]
    fn test_store_expired_entry_stays_until_touched() {
        let mut store = CacheStore::new(3, Duration::from_millis(100));
        let now = Instant::now();

        store.upsert(1, 1, now);

        // Nothing collects it in the background
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&1, now + Duration::from_secs(1)), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_overwrite_resets_ttl() {
        let mut store = CacheStore::new(3, Duration::from_millis(100));
        let now = Instant::now();

        store.upsert(1, 1, now);
        store.upsert(1, 10, now + Duration::from_millis(80));

        assert_eq!(store.get(&1, now + Duration::from_millis(150)), Some(&10));
        assert_eq!(store.get(&1, now + Duration::from_millis(180)), None);
    }

    #[test]
    fn test_store_overwrite_moves_to_newest() {
        let mut store = CacheStore::new(3, MINUTE);
        let now = Instant::now();

        store.upsert(1, 1, now);
        store.upsert(2, 2, now);
        store.upsert(3, 3, now);
        assert_eq!(store.upsert(1, 10, now), None);

        assert_eq!(store.len(), 3);
        assert_eq!(keys_of(&store), vec![2, 3, 1]);

        assert_eq!(store.upsert(4, 4, now), Some(2));
        assert_eq!(store.get(&2, now), None);
        assert_eq!(store.get(&1, now), Some(&10));
    }

    #[test]
    fn test_store_fifo_eviction() {
        let mut store = CacheStore::new(3, MINUTE);
        let now = Instant::now();

        store.upsert("key1", 1, now);
        store.upsert("key2", 2, now);
        store.upsert("key3", 3, now);

        assert_eq!(store.upsert("key4", 4, now), Some("key1"));

        assert_eq!(store.len(), 3);
        assert_eq!(store.get("key1", now), None);
        assert_eq!(store.get("key2", now), Some(&2));
        assert_eq!(store.get("key3", now), Some(&3));
        assert_eq!(store.get("key4", now), Some(&4));
    }

    #[test]
    fn test_store_eviction_ignores_timestamps() {
        let mut store = CacheStore::new(2, MINUTE);
        let now = Instant::now();

        // Same timestamp for all writes: order alone picks the victim
        store.upsert(7, 7, now);
        store.upsert(3, 3, now);

        assert_eq!(store.upsert(5, 5, now), Some(7));
    }

    #[test]
    fn test_store_zero_capacity() {
        let mut store = CacheStore::new(0, MINUTE);
        let now = Instant::now();

        assert_eq!(store.upsert(1, 1, now), Some(1));
        assert!(store.is_empty());
        assert_eq!(store.get(&1, now), None);
    }

    #[test]
    fn test_store_zero_ttl() {
        let mut store = CacheStore::new(3, Duration::ZERO);
        let now = Instant::now();

        store.upsert(1, 1, now);
        assert_eq!(store.get(&1, now), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_delete() {
        let mut store = CacheStore::new(3, MINUTE);
        let now = Instant::now();

        store.upsert(1, 1, now);
        store.upsert(2, 2, now);

        assert_eq!(store.delete(&1), Some(1));
        assert_eq!(store.get(&1, now), None);
        assert_eq!(keys_of(&store), vec![2]);
    }

    #[test]
    fn test_store_delete_nonexistent() {
        let mut store: CacheStore<i32, i32> = CacheStore::new(3, MINUTE);

        assert_eq!(store.delete(&1), None);
        assert_eq!(store.delete(&1), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_delete_frees_capacity() {
        let mut store = CacheStore::new(2, MINUTE);
        let now = Instant::now();

        store.upsert(1, 1, now);
        store.upsert(2, 2, now);
        store.delete(&1);

        assert_eq!(store.upsert(3, 3, now), None);
        assert_eq!(keys_of(&store), vec![2, 3]);
    }

    #[test]
    fn test_store_unbounded_capacity() {
        let mut store = CacheStore::new(usize::MAX, MINUTE);
        let now = Instant::now();

        for i in 0..100 {
            assert_eq!(store.upsert(i, i, now), None);
        }
        assert_eq!(store.len(), 100);
    }

    #[test]
    fn test_store_clear() {
        let mut store = CacheStore::new(3, MINUTE);
        let now = Instant::now();

        store.upsert(1, 1, now);
        store.upsert(2, 2, now);
        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.keys().count(), 0);

        store.upsert(3, 3, now);
        assert_eq!(keys_of(&store), vec![3]);
    }
}
