//! Bounded memoization with first-in-first-out eviction

use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::hash::Hash;

/// Default capacity for measurement caches
pub const MEASURE_CACHE_CAPACITY: usize = 1000;

/// Default capacity for layout and line caches
pub const LAYOUT_CACHE_CAPACITY: usize = 100;

/// Capacity-bounded map that evicts the oldest inserted key on overflow.
///
/// This is insertion order, not recency: a `get` never changes which entry
/// goes next, and overwriting an existing key keeps its original slot.
#[derive(Debug, Clone)]
pub struct BoundedCache<K, V> {
    entries: FxHashMap<K, V>,
    /// Keys in insertion order, oldest at the front
    order: VecDeque<K>,
    capacity: usize,
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create an empty cache holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: FxHashMap::default(),
            order: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert a value, evicting the oldest entries if the cache is full
    pub fn insert(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }

        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = value;
            return;
        }

        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                    log::trace!("cache evicted oldest entry ({} remain)", self.entries.len());
                }
                None => break,
            }
        }

        self.order.push_back(key.clone());
        self.entries.insert(key, value);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
