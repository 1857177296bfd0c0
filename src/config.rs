// config.rs - Tuning knobs for the performance cache
//
// TTL and concurrency defaults mirror the production configuration:
// performance series change slowly intraday, so an hour of freshness is
// acceptable, and five overlapping fetches keep the API well below its
// rate limits.

use crate::models::Granularity;
use std::time::Duration;

/// Default time-to-live for a cached performance series
pub const PERFORMANCE_CACHE_TTL_SECS: u64 = 3600; // 60 minutes

/// Maximum number of remote fetches allowed in flight at once
pub const MAX_CONCURRENT_REQUESTS: usize = 5;

/// Settings for one `PerformanceCache` instance
#[derive(Debug, Clone)]
pub struct CacheSettings {
    /// Time-to-live for cached entries, evaluated lazily at read time
    pub ttl: Duration,

    /// Upper bound on simultaneously in-flight remote fetches
    pub max_concurrent_requests: usize,

    /// Granularity already loaded at initial screen render; the preloader
    /// skips it to avoid redundant warm-up work
    pub initial_granularity: Granularity,
}

impl CacheSettings {
    /// Custom configuration, mainly for tests
    pub fn custom(ttl: Duration, max_concurrent_requests: usize) -> Self {
        Self {
            ttl,
            max_concurrent_requests,
            initial_granularity: Granularity::All,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(PERFORMANCE_CACHE_TTL_SECS),
            max_concurrent_requests: MAX_CONCURRENT_REQUESTS,
            initial_granularity: Granularity::All,
        }
    }
}
