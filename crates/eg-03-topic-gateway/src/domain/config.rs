//! Gateway configuration with validation.

use eg_02_delivery::DeliveryConfig;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Where unknown routes are redirected.
pub const DEFAULT_HELP_PAGE_URI: &str = "https://github.com/Azure/eventgrid-emulator";

/// Main gateway configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP server configuration
    pub http: HttpConfig,
    /// Request size limits
    pub limits: LimitsConfig,
    /// Redirect target for unknown routes
    pub help_page_uri: String,
    /// Outbound delivery settings
    pub delivery: DeliveryConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            limits: LimitsConfig::default(),
            help_page_uri: DEFAULT_HELP_PAGE_URI.to_string(),
            delivery: DeliveryConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate limits
        if self.limits.max_payload_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_payload_size cannot be 0".into(),
            ));
        }

        if self.limits.max_event_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_event_size cannot be 0".into(),
            ));
        }

        if self.limits.max_event_size > self.limits.max_payload_size {
            return Err(ConfigError::InvalidLimit(
                "max_event_size cannot exceed max_payload_size".into(),
            ));
        }

        // The redirect target ends up in a Location header
        if self.help_page_uri.is_empty()
            || axum::http::HeaderValue::from_str(&self.help_page_uri).is_err()
        {
            return Err(ConfigError::InvalidHelpPage(self.help_page_uri.clone()));
        }

        self.delivery.validate()?;

        Ok(())
    }

    /// Get HTTP server bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 80)
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 80,
        }
    }
}

/// Request size limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Max request body size in bytes (default: 1 MiB)
    pub max_payload_size: usize,
    /// Max size of one serialized event in bytes (default: 64 KiB)
    pub max_event_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_payload_size: 1024 * 1024,
            max_event_size: 64 * 1024,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid limit: {0}")]
    InvalidLimit(String),

    #[error("invalid help page URI: {0:?}")]
    InvalidHelpPage(String),

    #[error("delivery: {0}")]
    Delivery(#[from] eg_02_delivery::ConfigError),
}
