//! Delivery counters.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Running totals for the delivery engine.
#[derive(Debug, Default)]
pub struct DeliveryStats {
    // Event counters
    pub events_processed: AtomicU64,
    pub events_without_subscribers: AtomicU64,

    // Per-endpoint outcomes
    pub deliveries_succeeded: AtomicU64,
    pub deliveries_failed: AtomicU64,
    pub deliveries_canceled: AtomicU64,

    // Individual HTTP attempts, retries included
    pub send_attempts: AtomicU64,
}

impl DeliveryStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event handed to `process_event`
    pub fn record_event(&self, matched_endpoints: usize) {
        self.events_processed.fetch_add(1, Ordering::Relaxed);
        if matched_endpoints == 0 {
            self.events_without_subscribers
                .fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_attempt(&self) {
        self.send_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_success(&self) {
        self.deliveries_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.deliveries_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cancel(&self) {
        self.deliveries_canceled.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy for reporting
    pub fn snapshot(&self) -> DeliveryStatsSnapshot {
        DeliveryStatsSnapshot {
            events_processed: self.events_processed.load(Ordering::Relaxed),
            events_without_subscribers: self.events_without_subscribers.load(Ordering::Relaxed),
            deliveries_succeeded: self.deliveries_succeeded.load(Ordering::Relaxed),
            deliveries_failed: self.deliveries_failed.load(Ordering::Relaxed),
            deliveries_canceled: self.deliveries_canceled.load(Ordering::Relaxed),
            send_attempts: self.send_attempts.load(Ordering::Relaxed),
        }
    }
}

/// Serializable view of [`DeliveryStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryStatsSnapshot {
    pub events_processed: u64,
    pub events_without_subscribers: u64,
    pub deliveries_succeeded: u64,
    pub deliveries_failed: u64,
    pub deliveries_canceled: u64,
    pub send_attempts: u64,
}
