//! # Shared Types Crate
//!
//! This crate contains the records that flow through the topic emulator:
//! inbound [`Event`]s, the per-subscription [`EventSubscriptionFilter`], and
//! the ARM-shaped [`EventSubscription`] registration payload.
//!
//! ## Design Principles
//!
//! - **Pass-through payloads**: an `Event` keeps every field it was given,
//!   including ones it does not model, so delivery re-emits what was published.
//! - **Fail-closed filters**: absent filter fields are kept distinct from empty
//!   ones; the matcher in `eg-01-subscriptions` relies on that distinction.
//! - **Validated endpoints**: an [`Endpoint`] can only be built from an
//!   absolute `http`/`https` URI.

pub mod errors;
pub mod event;
pub mod subscription;

pub use errors::*;
pub use event::Event;
pub use subscription::{
    Endpoint, EventSubscription, EventSubscriptionDestination, EventSubscriptionFilter,
    EventSubscriptionProperties, Subscription, WebHookDestinationProperties, ALL_EVENT_TYPES,
};
