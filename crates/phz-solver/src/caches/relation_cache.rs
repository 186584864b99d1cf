//! Bounded, concurrent cache of subtype results.
//!
//! Results are a pure function of `(source, target, policy)` given one
//! interner and one class hierarchy, so a cache may be shared by every
//! checker built over the same pair. Entries are evicted least recently used
//! first once the capacity is reached: each access stamps the entry with a
//! monotonic tick and eviction drops the oldest eighth in one pass.

use crate::types::TypeId;
use dashmap::DashMap;
use phz_common::limits::DEFAULT_RELATION_CACHE_CAPACITY;
use rustc_hash::FxBuildHasher;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Cache key: the related pair plus the policy bits that affect the answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RelationCacheKey {
    pub source: TypeId,
    pub target: TypeId,
    pub flags: u8,
}

impl RelationCacheKey {
    pub fn new(source: TypeId, target: TypeId, flags: u8) -> Self {
        RelationCacheKey {
            source,
            target,
            flags,
        }
    }
}

#[derive(Debug)]
struct CacheEntry {
    result: bool,
    last_access: AtomicU64,
}

/// Snapshot of cache counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RelationCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub entries: usize,
}

#[derive(Debug)]
pub struct RelationCache {
    entries: DashMap<RelationCacheKey, CacheEntry, FxBuildHasher>,
    capacity: usize,
    tick: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl RelationCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_RELATION_CACHE_CAPACITY)
    }

    /// A cache holding at most `capacity` results (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        RelationCache {
            entries: DashMap::with_hasher(FxBuildHasher),
            capacity,
            tick: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    #[inline]
    fn next_tick(&self) -> u64 {
        self.tick.fetch_add(1, Ordering::Relaxed)
    }

    pub fn get(&self, key: RelationCacheKey) -> Option<bool> {
        match self.entries.get(&key) {
            Some(entry) => {
                entry.last_access.store(self.next_tick(), Ordering::Relaxed);
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.result)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn insert(&self, key: RelationCacheKey, result: bool) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_oldest();
        }
        self.entries.insert(
            key,
            CacheEntry {
                result,
                last_access: AtomicU64::new(self.next_tick()),
            },
        );
    }

    fn evict_oldest(&self) {
        let mut stamps: Vec<(u64, RelationCacheKey)> = self
            .entries
            .iter()
            .map(|entry| (entry.last_access.load(Ordering::Relaxed), *entry.key()))
            .collect();
        let count = (self.capacity / 8).max(1).min(stamps.len());
        if count == 0 {
            return;
        }
        if count < stamps.len() {
            stamps.select_nth_unstable_by_key(count - 1, |(stamp, _)| *stamp);
        }
        for (_, key) in &stamps[..count] {
            self.entries.remove(key);
        }
        self.evictions.fetch_add(count as u64, Ordering::Relaxed);
        debug!(evicted = count, capacity = self.capacity, "relation cache eviction");
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

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> RelationCacheStats {
        RelationCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }
}

impl Default for RelationCache {
    fn default() -> Self {
        Self::new()
    }
}
