use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

/// A memo of computed metrics whose entries expire after a fixed time to live.
///
/// A zero TTL turns caching off: every lookup misses and nothing is stored.
/// Values are computed outside the lock, so a computation may read other caches
/// (or race with another thread computing the same key; the first stored value wins).
#[derive(Debug)]
pub struct MetricCache<K, V> {
    ttl: Duration,
    entries: RwLock<HashMap<K, Cached<V>>>,
}

#[derive(Debug)]
struct Cached<V> {
    value: V,
    stored_at: Instant,
}

impl<K, V> MetricCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .filter(|cached| self.is_fresh(cached))
            .map(|cached| cached.value.clone())
    }

    pub fn compute_if_absent<F>(&self, key: K, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(&key) {
            return value;
        }

        let value = compute();
        if self.ttl.is_zero() {
            return value;
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let cached = entries.entry(key).or_insert_with(|| Cached {
            value: value.clone(),
            stored_at: Instant::now(),
        });
        if !self.is_fresh(cached) {
            *cached = Cached {
                value,
                stored_at: Instant::now(),
            };
        }
        cached.value.clone()
    }

    pub fn invalidate(&self, key: &K) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
    }

    pub fn invalidate_all(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.clear();
    }

    fn is_fresh(&self, cached: &Cached<V>) -> bool {
        cached.stored_at.elapsed() < self.ttl
    }
}
