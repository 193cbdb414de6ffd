//! Port definitions for the subscription registry.

pub mod inbound;

pub use inbound::SubscriptionRegistry;
