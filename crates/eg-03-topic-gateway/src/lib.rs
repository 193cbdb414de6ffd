//! # EG-03 Topic Gateway
//!
//! The HTTP face of the emulator: publishers post events here, subscribers
//! register and remove their webhooks here.
//!
//! ## Routes
//!
//! | Route          | Method | Purpose                                  |
//! |----------------|--------|------------------------------------------|
//! | `/api/events`  | POST   | Publish one event or an array of events  |
//! | `/subscribe`   | POST   | Register or replace a webhook            |
//! | `/subscribe`   | DELETE | Remove a webhook                         |
//! | `/health`      | GET    | Liveness and subscription count          |
//! | `/metrics`     | GET    | Gateway and delivery counters            |
//! | anything else  | any    | 307 to the help page                     |
//!
//! Publishing is synchronous: the response is sent after every matching
//! subscriber has been served, or after the first one fails.
//!
//! ## Usage
//!
//! ```ignore
//! use eg_03_topic_gateway::{GatewayConfig, TopicGatewayService};
//!
//! let registry = Arc::new(InMemorySubscriptionRegistry::new());
//! let service = TopicGatewayService::new(GatewayConfig::default(), registry)?;
//! service.start().await?;
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod domain;
pub mod handlers;
pub mod middleware;
pub mod service;

pub use domain::{ApiError, ConfigError, GatewayConfig, GatewayError, HttpConfig, LimitsConfig};
pub use middleware::{GatewayMetrics, REQUEST_ID_HEADER};
pub use service::TopicGatewayService;
