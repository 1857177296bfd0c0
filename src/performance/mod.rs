// performance - Performance-data cache and request-coalescing manager
//
// Serves "portfolio value over time" queries keyed by (granularity,
// asset subset) with TTL caching, priority-ordered queuing, a bounded
// number of concurrent remote fetches, in-flight deduplication and
// background preloading. The UI only ever talks to this manager; the
// remote source is injected behind the PerformanceSource trait.

use crate::config::CacheSettings;
use crate::errors::FetchError;
use crate::logger::{ self, LogTag };
use crate::models::{ Granularity, SharedSeries };
use crate::source::PerformanceSource;
use once_cell::sync::Lazy;
use std::collections::{ HashMap, HashSet };
use std::sync::atomic::{ AtomicBool, AtomicU64, Ordering };
use std::sync::{ Arc, Mutex };
use tokio::sync::{ oneshot, Notify };

pub mod key;
pub mod preload;
pub mod queue;
pub mod store;

mod dispatcher;


pub use key::CacheKey;
pub use queue::Priority;
pub use store::CacheStore;

use queue::{ QueuedRequest, Waiter };

/// Snapshot of cache and queue state, diagnostics only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Entries in the store, including expired ones awaiting overwrite
    pub total_entries: usize,
    /// Entries still within their TTL
    pub valid_entries: usize,
    /// Remote fetches currently in flight
    pub active_requests: usize,
    /// Requests queued or parked behind an in-flight fetch
    pub queued_requests: usize,
}

/// The three structures the dispatcher mutates as a group
///
/// Invariants:
/// - `active` holds a key iff a remote fetch for it is in flight
/// - at most one QueuedRequest per key exists across `queue` + `waiting`
/// - a key in `waiting` is always also in `active`
struct DispatchState {
    store: CacheStore,
    queue: Vec<QueuedRequest>,
    active: HashSet<CacheKey>,
    /// Requests parked because their key is already being fetched;
    /// re-queued when that fetch settles
    waiting: HashMap<CacheKey, QueuedRequest>,
}

impl DispatchState {
    fn new() -> Self {
        Self {
            store: CacheStore::new(),
            queue: Vec::new(),
            active: HashSet::new(),
            waiting: HashMap::new(),
        }
    }
}

/// Performance-data cache manager
///
/// All mutation happens under one mutex guarding the store, the queue
/// and the active-request set together, and the lock is never held
/// across an await point.
pub struct PerformanceCache {
    settings: CacheSettings,
    source: Arc<dyn PerformanceSource>,
    state: Mutex<DispatchState>,
    /// Wakes the dispatch loop after every enqueue and every settle
    work_signal: Notify,
    shutdown_signal: Notify,
    shutting_down: AtomicBool,
    preload_in_progress: AtomicBool,
    next_sequence: AtomicU64,
}

impl PerformanceCache {
    /// Create a cache and spawn its dispatch loop
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(source: Arc<dyn PerformanceSource>, settings: CacheSettings) -> Arc<Self> {
        let cache = Arc::new(Self {
            settings,
            source,
            state: Mutex::new(DispatchState::new()),
            work_signal: Notify::new(),
            shutdown_signal: Notify::new(),
            shutting_down: AtomicBool::new(false),
            preload_in_progress: AtomicBool::new(false),
            next_sequence: AtomicU64::new(0),
        });

        let worker = Arc::clone(&cache);
        tokio::spawn(async move {
            worker.run_dispatch_loop().await;
        });

        cache
    }

    /// Create with production defaults (60 minute TTL, 5 concurrent fetches)
    pub fn with_defaults(source: Arc<dyn PerformanceSource>) -> Arc<Self> {
        Self::new(source, CacheSettings::default())
    }

    /// Get the performance series for a granularity and optional asset filter
    ///
    /// Resolves immediately on a valid cache entry; otherwise queues a
    /// request and waits for the dispatcher to settle it. A High call
    /// for a key already queued at Low upgrades that record in place
    /// instead of adding a second one.
    pub async fn get_performance_data(
        &self,
        granularity: Granularity,
        symbols: Option<&[String]>,
        priority: Priority
    ) -> Result<SharedSeries, FetchError> {
        let cache_key = CacheKey::derive(granularity, symbols);

        let rx = {
            let mut guard = self.state.lock().unwrap();
            let state = &mut *guard;

            // Checked under the lock so a caller can never enqueue after
            // shutdown has drained the queue, which would leave its
            // waiter unsettled
            if self.shutting_down.load(Ordering::SeqCst) {
                return Err(FetchError::Abandoned);
            }

            if let Some(series) = state.store.lookup(&cache_key, self.settings.ttl) {
                logger::debug(
                    LogTag::Cache,
                    &format!("Cache hit for {}", cache_key.label())
                );
                return Ok(series);
            }

            let (tx, rx) = oneshot::channel();

            // Merge with an existing record for this key if one is
            // queued or parked; otherwise enqueue a fresh one
            if let Some(tx) = Self::try_attach(state, &cache_key, priority, tx) {
                let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst);
                logger::debug(
                    LogTag::Cache,
                    &format!("Queueing {} ({:?} priority)", cache_key.label(), priority)
                );
                state.queue.push(QueuedRequest::new(cache_key, priority, sequence, tx));
            }

            rx
        };

        self.work_signal.notify_one();

        rx.await.unwrap_or(Err(FetchError::Abandoned))
    }

    /// Attach a waiter to the record already covering this key, if any
    ///
    /// Returns the waiter back when no record exists so the caller can
    /// enqueue a fresh one.
    fn try_attach(
        state: &mut DispatchState,
        cache_key: &CacheKey,
        priority: Priority,
        tx: Waiter
    ) -> Option<Waiter> {
        if let Some(existing) = state.queue.iter_mut().find(|r| r.key == *cache_key) {
            existing.attach(priority, tx);
            return None;
        }
        if let Some(parked) = state.waiting.get_mut(cache_key) {
            parked.attach(priority, tx);
            return None;
        }
        Some(tx)
    }

    /// Whether a valid entry exists for this query (no side effects)
    ///
    /// Lets the UI decide up front if a loading indicator is needed.
    pub fn is_cache_available(&self, granularity: Granularity, symbols: Option<&[String]>) -> bool {
        let cache_key = CacheKey::derive(granularity, symbols);
        let state = self.state.lock().unwrap();
        state.store.is_available(&cache_key, self.settings.ttl)
    }

    /// Drop every cached entry (diagnostics / forced refresh)
    pub fn clear_cache(&self) {
        let mut state = self.state.lock().unwrap();
        state.store.clear();
        logger::info(LogTag::Cache, "Cache cleared");
    }

    /// Snapshot cache and queue counters
    pub fn cache_stats(&self) -> CacheStats {
        let state = self.state.lock().unwrap();
        CacheStats {
            total_entries: state.store.total_entries(),
            valid_entries: state.store.valid_entries(self.settings.ttl),
            active_requests: state.active.len(),
            queued_requests: state.queue.len() + state.waiting.len(),
        }
    }

    /// Stop the dispatch loop; queued requests settle with Abandoned,
    /// fetches already in flight still run to completion
    pub fn shutdown(&self) {
        self.shutting_down.store(true, Ordering::SeqCst);
        self.shutdown_signal.notify_one();
    }
}

/// Process-wide cache instance, wired up once at app startup
pub static GLOBAL_PERFORMANCE_CACHE: Lazy<Mutex<Option<Arc<PerformanceCache>>>> =
    Lazy::new(|| Mutex::new(None));

/// Install the process-wide cache instance
pub fn init_global_cache(cache: Arc<PerformanceCache>) {
    let mut guard = GLOBAL_PERFORMANCE_CACHE.lock().unwrap();
    *guard = Some(cache);
    logger::info(LogTag::System, "Global performance cache initialized");
}

/// Get the process-wide cache instance, if initialized
pub fn global_cache() -> Option<Arc<PerformanceCache>> {
    GLOBAL_PERFORMANCE_CACHE.lock().unwrap().clone()
}
