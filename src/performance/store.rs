// store.rs - TTL cache store for performance series
//
// Plain keyed map with lazy expiry: validity is evaluated at read time
// and expired entries stay in place until the next successful fetch for
// that key overwrites them. No eviction policy beyond the TTL.
//
// The store does no locking of its own; PerformanceCache guards it
// together with the queue and the active-request set so dequeue and
// mark-active stay atomic as a group.

use super::key::CacheKey;
use crate::models::SharedSeries;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// Cache entry with capture timestamp
///
/// Mutated only by replacement, never partially updated.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    series: SharedSeries,
    captured_at: Instant,
}

impl CacheEntry {
    fn new(series: SharedSeries) -> Self {
        Self {
            series,
            captured_at: Instant::now(),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.captured_at.elapsed() >= ttl
    }
}

/// Keyed TTL store, one entry per canonical cache key
#[derive(Debug, Default)]
pub struct CacheStore {
    entries: HashMap<CacheKey, CacheEntry>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Return the series only if an entry exists and is unexpired
    ///
    /// Expired entries are treated as absent but not removed.
    pub fn lookup(&self, key: &CacheKey, ttl: Duration) -> Option<SharedSeries> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired(ttl))
            .map(|entry| entry.series.clone())
    }

    /// Unconditionally replace the entry for a key with a fresh timestamp
    pub fn store(&mut self, key: CacheKey, series: SharedSeries) {
        self.entries.insert(key, CacheEntry::new(series));
    }

    /// Whether a valid entry exists for the key
    pub fn is_available(&self, key: &CacheKey, ttl: Duration) -> bool {
        self.lookup(key, ttl).is_some()
    }

    /// Drop all entries (diagnostics / forced refresh)
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Total entries, including expired ones awaiting overwrite
    pub fn total_entries(&self) -> usize {
        self.entries.len()
    }

    /// Entries still within their TTL
    pub fn valid_entries(&self, ttl: Duration) -> usize {
        self.entries
            .values()
            .filter(|entry| !entry.is_expired(ttl))
            .count()
    }
}
