// dispatcher.rs - The work loop turning queued requests into fetches
//
// One spawned task per cache instance drains the queue to a fixed point
// every time it is signalled (new enqueue, fetch settled). Per cycle it
// respects the concurrency bound, services High before Low in strict
// enqueue order, parks records whose key is already being fetched, and
// re-checks the store so requests satisfied while queued resolve without
// consuming a fetch slot.

use super::queue::{ self, QueuedRequest };
use super::PerformanceCache;
use crate::logger::{ self, LogTag };
use crate::models::SharedSeries;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// What dispatch decided for one popped record, carried out of the lock
enum Action {
    /// Key became cached while the record was queued
    Resolve(QueuedRequest, SharedSeries),
    /// Slot claimed, remote fetch starts
    Fetch(QueuedRequest),
}

impl PerformanceCache {
    pub(super) async fn run_dispatch_loop(self: Arc<Self>) {
        logger::debug(LogTag::System, "Dispatch loop started");

        loop {
            tokio::select! {
                _ = self.work_signal.notified() => {}
                _ = self.shutdown_signal.notified() => {}
            }

            if self.shutting_down.load(Ordering::SeqCst) {
                break;
            }

            self.dispatch_cycle();
        }

        self.abandon_pending();
        logger::debug(LogTag::System, "Dispatch loop stopped");
    }

    /// Drain the queue until it is empty or the concurrency bound is hit
    ///
    /// Runs entirely between await points; the state lock is taken per
    /// popped record and released before the record is settled or its
    /// fetch is spawned.
    fn dispatch_cycle(self: &Arc<Self>) {
        loop {
            let action = {
                let mut state = self.state.lock().unwrap();

                if state.active.len() >= self.settings.max_concurrent_requests {
                    // Backpressure: a settling fetch will signal us again
                    break;
                }

                queue::sort_pending(&mut state.queue);
                if state.queue.is_empty() {
                    break;
                }

                let request = state.queue.remove(0);

                if state.active.contains(&request.key) {
                    // A fetch for this key is already in flight; park the
                    // record instead of re-sorting it back in. It returns
                    // to the queue when that fetch settles.
                    state.waiting.insert(request.key.clone(), request);
                    continue;
                }

                match state.store.lookup(&request.key, self.settings.ttl) {
                    Some(series) => Action::Resolve(request, series),
                    None => {
                        state.active.insert(request.key.clone());
                        Action::Fetch(request)
                    }
                }
            };

            match action {
                Action::Resolve(request, series) => {
                    logger::debug(
                        LogTag::Cache,
                        &format!("{} satisfied from cache while queued", request.key.label())
                    );
                    request.settle(Ok(series));
                }
                Action::Fetch(request) => self.spawn_fetch(request),
            }
        }
    }

    /// Perform one remote fetch asynchronously and settle its record
    fn spawn_fetch(self: &Arc<Self>, request: QueuedRequest) {
        let cache = Arc::clone(self);

        tokio::spawn(async move {
            let cache_key = request.key.clone();
            let label = cache_key.label();
            logger::debug(
                LogTag::Fetch,
                &format!(
                    "Fetching {} ({:?} priority, {} waiter(s))",
                    label,
                    request.priority,
                    request.waiter_count()
                )
            );

            let outcome = cache.source
                .fetch_performance(request.granularity, request.symbols.as_deref()).await
                .map(|points| -> SharedSeries { Arc::new(points) });

            // Release the slot and re-queue parked records in all cases;
            // store only on success so a failed fetch never touches a
            // prior valid entry.
            {
                let mut state = cache.state.lock().unwrap();
                if let Ok(series) = &outcome {
                    state.store.store(cache_key.clone(), series.clone());
                }
                state.active.remove(&cache_key);
                if let Some(parked) = state.waiting.remove(&cache_key) {
                    state.queue.push(parked);
                }
            }

            match &outcome {
                Ok(series) => {
                    logger::debug(
                        LogTag::Fetch,
                        &format!("Stored {} points for {}", series.len(), label)
                    );
                }
                Err(e) => {
                    logger::warning(LogTag::Fetch, &format!("Fetch for {} failed: {}", label, e));
                }
            }

            request.settle(outcome);
            cache.work_signal.notify_one();
        });
    }

    /// Settle everything still pending after shutdown
    fn abandon_pending(&self) {
        let pending: Vec<QueuedRequest> = {
            let mut state = self.state.lock().unwrap();
            let mut drained: Vec<QueuedRequest> = state.queue.drain(..).collect();
            drained.extend(state.waiting.drain().map(|(_, request)| request));
            drained
        };

        if pending.is_empty() {
            return;
        }

        logger::warning(
            LogTag::System,
            &format!("Abandoning {} pending request(s) on shutdown", pending.len())
        );
        for request in pending {
            request.settle(Err(crate::errors::FetchError::Abandoned));
        }
    }
}
