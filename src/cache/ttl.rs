use std::hash::Hash;
use std::time::{Duration, Instant};

use moka::sync::Cache;

/// A stored value with its insertion time
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// Bounded in-memory key/value store with a fixed time-to-live
///
/// Backed by `moka`, which evicts expired entries during housekeeping and
/// keeps at most `max_capacity` entries. Reads also check the entry's own
/// age, so an entry is never served once `now - inserted_at >= ttl`.
pub struct TtlCache<K, V> {
    entries: Cache<K, CacheEntry<V>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub const DEFAULT_CAPACITY: u64 = 10_000;

    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(ttl: Duration, max_capacity: u64) -> Self {
        Self {
            entries: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(max_capacity)
                .build(),
            ttl,
        }
    }

    fn is_expired(&self, entry: &CacheEntry<V>, now: Instant) -> bool {
        now.saturating_duration_since(entry.inserted_at) >= self.ttl
    }

    /// Returns a clone of the live value stored under `key`
    pub fn get(&self, key: &K) -> Option<V> {
        let entry = self.entries.get(key)?;
        if self.is_expired(&entry, Instant::now()) {
            self.entries.invalidate(key);
            return None;
        }
        Some(entry.value)
    }

    /// Stores `value`, replacing any previous entry and restarting its lifetime
    pub fn set(&self, key: K, value: V) {
        let entry = CacheEntry {
            value,
            inserted_at: Instant::now(),
        };
        self.entries.insert(key, entry);
    }

    pub fn flush_all(&self) {
        self.entries.invalidate_all();
        self.entries.run_pending_tasks();
    }

    /// Number of entries that have not yet expired
    pub fn size(&self) -> usize {
        self.entries.run_pending_tasks();
        let now = Instant::now();
        self.entries
            .iter()
            .filter(|(_, entry)| !self.is_expired(entry, now))
            .count()
    }

    /// Entries currently held in memory, expired or not, after housekeeping
    #[cfg(test)]
    fn resident_entries(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }
}

impl<K, V> std::fmt::Debug for TtlCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
