//! Domain layer for delivery: configuration, retry policy and counters.

pub mod config;
pub mod duration;
pub mod retry;
pub mod stats;

pub use config::{ConfigError, DeliveryConfig, StatusHandling};
pub use duration::{format_duration, parse_duration, DurationParseError};
pub use retry::{RetryPolicy, RetryState};
pub use stats::{DeliveryStats, DeliveryStatsSnapshot};
