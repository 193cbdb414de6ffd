//! Gateway request counters.
//!
//! Exposed as JSON on `/metrics` next to the delivery engine's counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Topic gateway metrics
#[derive(Debug, Default)]
pub struct GatewayMetrics {
    // Request counters
    pub requests_total: AtomicU64,
    pub requests_success: AtomicU64,
    pub requests_error: AtomicU64,

    // Ingestion counters
    pub events_received: AtomicU64,
    pub events_rejected: AtomicU64,

    // Subscription management counters
    pub subscriptions_added: AtomicU64,
    pub subscriptions_replaced: AtomicU64,
    pub subscriptions_removed: AtomicU64,

    // Latency tracking (simplified - no histograms)
    pub total_latency_ms: AtomicU64,
    pub request_count_for_latency: AtomicU64,
}

impl GatewayMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished request
    pub fn record_request(&self, success: bool, latency_ms: u64) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);

        if success {
            self.requests_success.fetch_add(1, Ordering::Relaxed);
        } else {
            self.requests_error.fetch_add(1, Ordering::Relaxed);
        }

        self.total_latency_ms
            .fetch_add(latency_ms, Ordering::Relaxed);
        self.request_count_for_latency
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Record events accepted for delivery
    pub fn record_events_received(&self, count: usize) {
        self.events_received
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Record an event that failed validation
    pub fn record_event_rejected(&self) {
        self.events_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a subscribe call
    pub fn record_subscribe(&self, added: bool) {
        if added {
            self.subscriptions_added.fetch_add(1, Ordering::Relaxed);
        } else {
            self.subscriptions_replaced.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a successful unsubscribe
    pub fn record_unsubscribe(&self) {
        self.subscriptions_removed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get average latency in ms
    pub fn average_latency_ms(&self) -> f64 {
        let total = self.total_latency_ms.load(Ordering::Relaxed);
        let count = self.request_count_for_latency.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    /// Export metrics as JSON
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "requests": {
                "total": self.requests_total.load(Ordering::Relaxed),
                "success": self.requests_success.load(Ordering::Relaxed),
                "error": self.requests_error.load(Ordering::Relaxed),
            },
            "events": {
                "received": self.events_received.load(Ordering::Relaxed),
                "rejected": self.events_rejected.load(Ordering::Relaxed),
            },
            "subscriptions": {
                "added": self.subscriptions_added.load(Ordering::Relaxed),
                "replaced": self.subscriptions_replaced.load(Ordering::Relaxed),
                "removed": self.subscriptions_removed.load(Ordering::Relaxed),
            },
            "latency": {
                "average_ms": self.average_latency_ms(),
            }
        })
    }
}

/// Request timing helper
pub struct RequestTimer {
    start: Instant,
    metrics: Arc<GatewayMetrics>,
}

impl RequestTimer {
    pub fn new(metrics: Arc<GatewayMetrics>) -> Self {
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    pub fn finish(self, success: bool) {
        let latency_ms = self.start.elapsed().as_millis() as u64;
        self.metrics.record_request(success, latency_ms);
    }
}
