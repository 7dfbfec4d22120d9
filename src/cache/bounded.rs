//! Thread-safe cache handle.
//!
//! Wraps a [`CacheStore`] in a single mutex. Reads can collect expired
//! entries, so every operation needs exclusive access and a reader/writer
//! lock would buy nothing.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use crate::cache::CacheStore;
use crate::clock::{Clock, SystemClock};
use crate::config::CacheConfig;

/// In-memory cache with a per-entry TTL and bounded FIFO eviction.
///
/// Every write grants the entry `ttl` from the moment of the write. When a
/// new key arrives and the cache already holds `capacity` entries, the entry
/// written longest ago is dropped. Overwriting a key counts as a fresh write
/// for both the TTL and the eviction order.
///
/// Expired entries are not swept in the background; they are dropped the
/// next time their key is read.
///
/// Share it between threads with `Arc`.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use bounded_ttl_cache::BoundedTtlCache;
///
/// let cache = BoundedTtlCache::new(3, Duration::from_secs(60));
/// cache.upsert(1, 1);
/// cache.upsert(2, 2);
/// cache.upsert(3, 3);
/// cache.upsert(1, 10);
/// cache.upsert(4, 4);
///
/// assert_eq!(cache.read(&2), (0, false));
/// assert_eq!(cache.read(&1), (10, true));
/// ```
pub struct BoundedTtlCache<K, V, C = SystemClock> {
    store: Mutex<CacheStore<K, V>>,
    clock: C,
}

impl<K, V> BoundedTtlCache<K, V, SystemClock>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates an empty cache using the system clock.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries; zero means nothing is ever retained
    /// * `ttl` - Lifespan of each entry; zero means entries are expired as soon as written
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self::with_clock(capacity, ttl, SystemClock)
    }

    /// Creates an empty cache from a loaded [`CacheConfig`].
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.capacity, config.ttl())
    }
}

impl<K, V, C> BoundedTtlCache<K, V, C>
where
    K: Hash + Eq + Clone,
    C: Clock,
{
    /// Creates an empty cache that reads time from `clock`.
    pub fn with_clock(capacity: usize, ttl: Duration, clock: C) -> Self {
        debug!("Cache initialized: capacity={}, ttl={:?}", capacity, ttl);

        Self {
            store: Mutex::new(CacheStore::new(capacity, ttl)),
            clock,
        }
    }

    // == Read ==
    /// Looks up `key`, returning `(value, true)` for a live entry and
    /// `(V::default(), false)` otherwise.
    ///
    /// Use the flag, not the value, to detect absence.
    pub fn read<Q>(&self, key: &Q) -> (V, bool)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone + Default,
    {
        match self.get(key) {
            Some(value) => (value, true),
            None => (V::default(), false),
        }
    }

    // == Get ==
    /// Returns a clone of the live value for `key`.
    ///
    /// An expired entry is removed and `None` returned. A hit does not
    /// extend the entry's TTL or its place in the eviction order.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let mut store = self.store.lock();
        let now = self.clock.now();
        store.get(key, now).cloned()
    }

    /// Checks whether `key` holds a live entry, collecting it if expired.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut store = self.store.lock();
        let now = self.clock.now();
        store.get(key, now).is_some()
    }

    // == Upsert ==
    /// Inserts or overwrites `key` with a fresh TTL.
    ///
    /// May silently evict the oldest entry to stay within capacity.
    pub fn upsert(&self, key: K, value: V) {
        let mut store = self.store.lock();
        let now = self.clock.now();
        store.upsert(key, value, now);
    }

    // == Delete ==
    /// Removes `key`. Deleting an absent key is a no-op.
    pub fn delete<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.lock().delete(key);
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.store.lock().clear();
    }

    /// Number of stored entries, including expired ones whose keys have not
    /// been read since they expired.
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.store.lock().capacity()
    }

    pub fn ttl(&self) -> Duration {
        self.store.lock().ttl()
    }
}

impl<K, V, C> fmt::Debug for BoundedTtlCache<K, V, C>
where
    K: Hash + Eq + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.store.lock();
        f.debug_struct("BoundedTtlCache")
            .field("capacity", &store.capacity())
            .field("ttl", &store.ttl())
            .field("len", &store.len())
            .finish()
    }
}
