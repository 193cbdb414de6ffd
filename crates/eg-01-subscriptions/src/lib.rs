//! # EG-01 Subscriptions
//!
//! Holds the set of registered subscriptions and decides which of them an
//! event should be delivered to.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): the pure filter matcher, no I/O, no locks.
//! - **Ports Layer** (`ports/`): the `SubscriptionRegistry` driving port, so
//!   the delivery engine and gateway never depend on a concrete store.
//! - **Service Layer** (`service/`): `InMemorySubscriptionRegistry`, the
//!   lock-protected map used by the running emulator.
//!
//! ## Invariants
//!
//! - Endpoints are unique keys; registering an existing endpoint replaces its
//!   filter (last write wins).
//! - Filters fail closed: no included event types, no event type, or no
//!   subject all mean "no match".
//! - Each registry operation is atomic on its own. A `list_matching` racing a
//!   `register` may or may not see the new entry.
//!
//! ## Usage
//!
//! ```ignore
//! use eg_01_subscriptions::{InMemorySubscriptionRegistry, SubscriptionRegistry};
//! use shared_types::{Endpoint, Event, EventSubscriptionFilter};
//!
//! let registry = InMemorySubscriptionRegistry::new();
//! let endpoint = Endpoint::parse("http://localhost:9000/hook")?;
//! registry.register(endpoint, EventSubscriptionFilter::for_types(["Created"]));
//!
//! let targets = registry.list_matching(&Event::new("created", "Blobs/1"));
//! assert_eq!(targets.len(), 1);
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::filter::{includes_type, matches, matches_subject};
pub use ports::SubscriptionRegistry;
pub use service::InMemorySubscriptionRegistry;
