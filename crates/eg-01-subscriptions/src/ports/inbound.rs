//! Inbound Ports (Driving Ports)
//!
//! The registry contract used by the delivery engine and the topic gateway.
//! Implementations own their storage; callers hold an
//! `Arc<dyn SubscriptionRegistry>` constructed once at startup.

use shared_types::{Endpoint, Event, EventSubscriptionFilter, Subscription};

/// Concurrent store of endpoint → filter.
///
/// Every method is atomic with respect to every other call on the same
/// registry. No cross-call transaction exists: a `list_matching` issued while
/// a `register` is in flight may or may not include the new endpoint.
pub trait SubscriptionRegistry: Send + Sync {
    /// Insert or replace the filter for `endpoint`.
    ///
    /// Returns `true` if the endpoint was not registered before, `false` if
    /// an existing filter was overwritten.
    fn register(&self, endpoint: Endpoint, filter: EventSubscriptionFilter) -> bool;

    /// Remove `endpoint`. Returns whether it was registered.
    fn unregister(&self, endpoint: &Endpoint) -> bool;

    /// Endpoints whose filter accepts `event`.
    ///
    /// The order is implementation-defined; see the implementation's docs.
    fn list_matching(&self, event: &Event) -> Vec<Endpoint>;

    /// Filter currently registered for `endpoint`.
    fn get(&self, endpoint: &Endpoint) -> Option<EventSubscriptionFilter>;

    /// Point-in-time copy of every subscription.
    fn snapshot(&self) -> Vec<Subscription>;

    /// Number of registered endpoints.
    fn len(&self) -> usize;

    /// Whether no endpoint is registered.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
