// queue.rs - Pending fetch requests and their ordering
//
// One queued record per cache key: every caller waiting on that key holds
// a receiver attached to the record, so resolving the record settles all
// of them at once. High priority drains before low; within a tier the
// monotonic sequence number gives strict enqueue order.

use super::key::CacheKey;
use crate::errors::FetchError;
use crate::models::{ Granularity, SharedSeries };
use tokio::sync::oneshot;

/// Priority tier for a queued request
///
/// High is user-initiated and latency-sensitive, Low is background
/// preloading. Ordering matters: High sorts before Low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    High,
    Low,
}

/// Channel half handed back to one caller of get_performance_data
pub type Waiter = oneshot::Sender<Result<SharedSeries, FetchError>>;

/// One outstanding fetch request, owning every waiter attached to its key
#[derive(Debug)]
pub struct QueuedRequest {
    pub key: CacheKey,
    pub granularity: Granularity,
    /// Canonical symbol list forwarded to the remote source
    pub symbols: Option<Vec<String>>,
    pub priority: Priority,
    /// Strict enqueue order within a priority tier
    pub sequence: u64,
    waiters: Vec<Waiter>,
}

impl QueuedRequest {
    pub fn new(key: CacheKey, priority: Priority, sequence: u64, waiter: Waiter) -> Self {
        let granularity = key.granularity;
        let symbols = key.symbols.clone();
        Self {
            key,
            granularity,
            symbols,
            priority,
            sequence,
            waiters: vec![waiter],
        }
    }

    /// Attach another caller to this record, upgrading priority when a
    /// user-initiated request lands on a scheduled preload
    pub fn attach(&mut self, priority: Priority, waiter: Waiter) {
        if priority == Priority::High && self.priority == Priority::Low {
            self.priority = Priority::High;
        }
        self.waiters.push(waiter);
    }

    pub fn waiter_count(&self) -> usize {
        self.waiters.len()
    }

    /// Settle every waiter with the same outcome, consuming the record
    ///
    /// Dropped receivers are ignored - a caller that went away cannot be
    /// notified and needs nothing else from us.
    pub fn settle(self, outcome: Result<SharedSeries, FetchError>) {
        for waiter in self.waiters {
            let _ = waiter.send(outcome.clone());
        }
    }
}

/// Stable-sort pending requests: High before Low, oldest first within a tier
pub fn sort_pending(queue: &mut Vec<QueuedRequest>) {
    queue.sort_by_key(|request| (request.priority, request.sequence));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(granularity: Granularity, priority: Priority, sequence: u64) -> QueuedRequest {
        let (tx, _rx) = oneshot::channel();
        QueuedRequest::new(CacheKey::derive(granularity, None), priority, sequence, tx)
    }

    #[test]
    fn test_sort_high_before_low_then_by_sequence() {
        let mut queue = vec![
            request(Granularity::OneWeek, Priority::Low, 1),
            request(Granularity::OneMonth, Priority::High, 3),
            request(Granularity::OneYear, Priority::Low, 2),
            request(Granularity::All, Priority::High, 4)
        ];

        sort_pending(&mut queue);

        let order: Vec<(Priority, u64)> = queue
            .iter()
            .map(|r| (r.priority, r.sequence))
            .collect();
        assert_eq!(
            order,
            vec![
                (Priority::High, 3),
                (Priority::High, 4),
                (Priority::Low, 1),
                (Priority::Low, 2)
            ]
        );
    }

    #[test]
    fn test_attach_upgrades_low_to_high() {
        let mut record = request(Granularity::OneYear, Priority::Low, 1);
        let (tx, _rx) = oneshot::channel();
        record.attach(Priority::High, tx);

        assert_eq!(record.priority, Priority::High);
        assert_eq!(record.waiter_count(), 2);

        // A later low attach never downgrades
        let (tx, _rx) = oneshot::channel();
        record.attach(Priority::Low, tx);
        assert_eq!(record.priority, Priority::High);
        assert_eq!(record.waiter_count(), 3);
    }

    #[tokio::test]
    async fn test_settle_reaches_every_waiter() {
        let (tx_a, rx_a) = oneshot::channel();
        let mut record = QueuedRequest::new(
            CacheKey::derive(Granularity::OneMonth, None),
            Priority::High,
            1,
            tx_a
        );
        let (tx_b, rx_b) = oneshot::channel();
        record.attach(Priority::Low, tx_b);

        record.settle(Err(FetchError::Generic {
            message: "boom".to_string(),
        }));

        assert!(rx_a.await.unwrap().is_err());
        assert!(rx_b.await.unwrap().is_err());
    }
}
