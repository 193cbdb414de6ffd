//! In-memory subscription registry.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use shared_types::{Endpoint, Event, EventSubscriptionFilter, Subscription};
use tracing::debug;

use crate::domain::filter;
use crate::ports::SubscriptionRegistry;

/// Lock-protected map of endpoint → filter.
///
/// Reads share the lock, writes are exclusive. Iteration follows the
/// endpoint's string order, so `list_matching` and `snapshot` return
/// endpoints in ascending lexicographic order. Subscriptions do not survive
/// a restart.
#[derive(Debug, Default)]
pub struct InMemorySubscriptionRegistry {
    subscriptions: RwLock<BTreeMap<Endpoint, EventSubscriptionFilter>>,
}

impl InMemorySubscriptionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SubscriptionRegistry for InMemorySubscriptionRegistry {
    fn register(&self, endpoint: Endpoint, filter: EventSubscriptionFilter) -> bool {
        let label = endpoint.to_string();
        let added = self.subscriptions.write().insert(endpoint, filter).is_none();

        debug!(endpoint = %label, added, "Subscription registered");
        added
    }

    fn unregister(&self, endpoint: &Endpoint) -> bool {
        let removed = self.subscriptions.write().remove(endpoint).is_some();

        debug!(endpoint = %endpoint, removed, "Subscription unregistered");
        removed
    }

    fn list_matching(&self, event: &Event) -> Vec<Endpoint> {
        self.subscriptions
            .read()
            .iter()
            .filter(|(_, f)| filter::matches(event, f))
            .map(|(endpoint, _)| endpoint.clone())
            .collect()
    }

    fn get(&self, endpoint: &Endpoint) -> Option<EventSubscriptionFilter> {
        self.subscriptions.read().get(endpoint).cloned()
    }

    fn snapshot(&self) -> Vec<Subscription> {
        self.subscriptions
            .read()
            .iter()
            .map(|(endpoint, filter)| Subscription {
                endpoint: endpoint.clone(),
                filter: filter.clone(),
            })
            .collect()
    }

    fn len(&self) -> usize {
        self.subscriptions.read().len()
    }
}
