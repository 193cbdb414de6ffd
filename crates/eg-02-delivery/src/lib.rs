//! # EG-02 Delivery
//!
//! Pushes published events to the webhooks of matching subscriptions.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): delivery configuration, duration strings,
//!   the fixed-interval retry policy and delivery counters.
//! - **Ports Layer** (`ports/`): `CallbackSender`, the outbound transport.
//! - **Adapters Layer** (`adapters/`): `HttpCallbackSender` over `reqwest`.
//! - **Service Layer** (`service.rs`): `DeliveryEngine`, which resolves
//!   subscribers from the registry and runs the per-endpoint retry loop.
//!
//! ## Delivery Rules
//!
//! - The event is serialized once; every endpoint receives the same bytes.
//! - Endpoints are attempted strictly one at a time, in registry order.
//! - Transport errors are retried at a fixed interval until the retry budget
//!   runs out. By default any HTTP response counts as delivered; with
//!   `StatusHandling::Classify`, 5xx, 408 and 429 are retried too and other
//!   non-2xx statuses are final.
//! - The first endpoint that fails ends the delivery; later endpoints are
//!   not attempted.
//! - Cancellation is observed before each endpoint and while waiting to
//!   retry. A request already on the wire is allowed to finish.
//!
//! ## Usage
//!
//! ```ignore
//! use eg_02_delivery::{DeliveryConfig, DeliveryEngine, HttpCallbackSender};
//! use tokio_util::sync::CancellationToken;
//!
//! let config = DeliveryConfig::default();
//! let sender = Arc::new(HttpCallbackSender::new(&config)?);
//! let engine = DeliveryEngine::new(registry, sender, &config);
//!
//! engine.process_event(&event, &CancellationToken::new()).await?;
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::HttpCallbackSender;
pub use domain::{
    format_duration, parse_duration, ConfigError, DeliveryConfig, DeliveryStats,
    DeliveryStatsSnapshot, DurationParseError, RetryPolicy, StatusHandling,
};
pub use error::DeliveryError;
pub use ports::{CallbackSender, SendError};
pub use service::DeliveryEngine;
