//! Domain layer for the topic gateway.

pub mod config;
pub mod error;

pub use config::{ConfigError, GatewayConfig, HttpConfig, LimitsConfig};
pub use error::{ApiError, ApiResult, GatewayError};
