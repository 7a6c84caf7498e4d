use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// The `Memo` struct remembers the results of an expensive computation, keyed by its input.
///
/// An unbounded memo never forgets, so it grows for as long as its owner lives.  A bounded memo
/// holds at most `capacity` entries and evicts the least recently used one to make room.  Every
/// read stamps the entry with a fresh tick, and `order` maps ticks back to keys, so the oldest
/// stamp is always the first entry of the [`BTreeMap`].
///
/// Hits and misses are counted so callers can check that a second query did not recompute.
#[derive(Debug, Clone)]
pub struct Memo<K, V> {
    capacity: Option<usize>,
    entries: HashMap<K, (V, u64)>,
    order: BTreeMap<u64, K>,
    tick: u64,
    hits: u64,
    misses: u64,
}

impl<K: Eq + Hash + Clone, V: Clone> Memo<K, V> {
    pub fn unbounded() -> Self {
        Self::with_capacity(None)
    }

    /// A memo that keeps at most `capacity` entries.  A capacity of zero keeps nothing.
    pub fn bounded(capacity: usize) -> Self {
        Self::with_capacity(Some(capacity))
    }

    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            order: BTreeMap::new(),
            tick: 0,
            hits: 0,
            misses: 0,
        }
    }

    /// The `get_or_compute` method returns the remembered value for `key`, or runs `compute`,
    /// remembers its result and returns it.
    pub fn get_or_compute<F>(&mut self, key: K, compute: F) -> V
    where
        F: FnOnce(&K) -> V,
    {
        self.tick += 1;
        let tick = self.tick;
        if let Some((value, stamp)) = self.entries.get_mut(&key) {
            self.hits += 1;
            self.order.remove(&*stamp);
            *stamp = tick;
            self.order.insert(tick, key);
            return value.clone();
        }

        self.misses += 1;
        let value = compute(&key);
        if self.capacity == Some(0) {
            return value;
        }
        if let Some(capacity) = self.capacity {
            while self.entries.len() >= capacity {
                self.evict();
            }
        }
        self.order.insert(tick, key.clone());
        self.entries.insert(key, (value.clone(), tick));
        value
    }

    /// Looks up `key` without computing or refreshing its place in line.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.entries.get(key).map(|(value, _)| value)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    fn evict(&mut self) {
        if let Some((_, key)) = self.order.pop_first() {
            self.entries.remove(&key);
            tracing::trace!("Evicted least recently used entry.");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Forgets every entry.  The hit and miss counts survive.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

impl<K: Eq + Hash + Clone, V: Clone> Default for Memo<K, V> {
    fn default() -> Self {
        Self::unbounded()
    }
}
