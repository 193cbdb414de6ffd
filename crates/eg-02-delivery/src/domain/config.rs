//! Delivery configuration with validation.
//!
//! Built once at startup and handed to `DeliveryEngine::new`; it is never
//! mutated afterwards.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::duration::DurationParseError;

/// Default retry budget per endpoint.
pub const DEFAULT_RETRY_DURATION: Duration = Duration::from_secs(24 * 60 * 60);

/// Default pause between attempts to the same endpoint.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// Product token sent in the `User-Agent` header of every callback.
pub const USER_AGENT_PRODUCT: &str = "eventgrid-emulator";

/// How a callback answered with a non-2xx status is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusHandling {
    /// Any HTTP response counts as delivered; only transport errors fail.
    #[default]
    AnyResponse,
    /// 5xx, 408 and 429 are retried; any other non-2xx status fails at once.
    Classify,
}

/// Outbound delivery configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Wall-clock budget for retrying a single endpoint (default: 24h)
    #[serde(with = "humantime_serde")]
    pub retry_duration: Duration,
    /// Fixed pause between attempts (default: 1s)
    #[serde(with = "humantime_serde")]
    pub retry_interval: Duration,
    /// Timeout for one HTTP attempt, connect included
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Timeout for establishing the TCP/TLS connection
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
    /// `User-Agent` header value
    pub user_agent: String,
    /// Whether response statuses can fail a delivery (default: they cannot)
    pub status_handling: StatusHandling,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            retry_duration: DEFAULT_RETRY_DURATION,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("{}/{}", USER_AGENT_PRODUCT, env!("CARGO_PKG_VERSION")),
            status_handling: StatusHandling::AnyResponse,
        }
    }
}

impl DeliveryConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry_interval.is_zero() {
            return Err(ConfigError::InvalidDuration(
                "retry_interval cannot be 0".into(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidDuration(
                "request_timeout cannot be 0".into(),
            ));
        }

        if self.connect_timeout.is_zero() {
            return Err(ConfigError::InvalidDuration(
                "connect_timeout cannot be 0".into(),
            ));
        }

        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid("user_agent cannot be empty".into()));
        }

        Ok(())
    }

    /// Replace the retry budget.
    #[must_use]
    pub fn with_retry_duration(mut self, retry_duration: Duration) -> Self {
        self.retry_duration = retry_duration;
        self
    }

    /// Replace the retry interval.
    #[must_use]
    pub fn with_retry_interval(mut self, retry_interval: Duration) -> Self {
        self.retry_interval = retry_interval;
        self
    }

    /// Replace how error statuses are treated.
    #[must_use]
    pub fn with_status_handling(mut self, status_handling: StatusHandling) -> Self {
        self.status_handling = status_handling;
        self
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A duration setting is out of range
    #[error("invalid duration: {0}")]
    InvalidDuration(String),
    /// A duration string could not be parsed
    #[error(transparent)]
    Parse(#[from] DurationParseError),
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Serde adapter for `Duration` fields written as `24h`, `1h30m`, `500ms`.
pub mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    use crate::domain::duration::{format_duration, parse_duration};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_duration(*duration))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }
}
