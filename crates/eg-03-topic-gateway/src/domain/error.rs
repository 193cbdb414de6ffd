//! Gateway error types.
//!
//! Handlers return [`ApiError`], which renders as
//! `{ "error": { "code": ..., "message": ... } }` with a matching status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use eg_02_delivery::DeliveryError;
use shared_types::errors::SubscriptionPayloadError;
use std::fmt;

/// Machine-readable error codes
pub mod codes {
    pub const INVALID_JSON: &str = "InvalidJson";
    pub const INVALID_EVENT: &str = "InvalidEvent";
    pub const INVALID_SUBSCRIPTION: &str = "InvalidSubscription";
    pub const SUBSCRIPTION_NOT_FOUND: &str = "SubscriptionNotFound";
    pub const PAYLOAD_TOO_LARGE: &str = "PayloadTooLarge";
    pub const DELIVERY_FAILED: &str = "DeliveryFailed";
    pub const DELIVERY_CANCELED: &str = "DeliveryCanceled";
    pub const INTERNAL_ERROR: &str = "InternalError";
}

/// Error returned to HTTP clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status
    pub status: StatusCode,
    /// Error code
    pub code: &'static str,
    /// Error message
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// Body is not valid JSON
    pub fn invalid_json(details: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_JSON,
            format!("Invalid JSON: {details}"),
        )
    }

    /// Body is JSON but not an event
    pub fn invalid_event(details: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_EVENT,
            format!("Invalid event: {details}"),
        )
    }

    /// Subscription payload missing or malformed
    pub fn invalid_subscription(details: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_SUBSCRIPTION,
            format!("Invalid subscription: {details}"),
        )
    }

    pub fn subscription_not_found(endpoint: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            codes::SUBSCRIPTION_NOT_FOUND,
            format!("No subscription for {endpoint}"),
        )
    }

    /// A single event exceeds the per-event limit
    pub fn event_too_large(index: usize, size: usize, limit: usize) -> Self {
        Self::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            codes::PAYLOAD_TOO_LARGE,
            format!("Event {index} is {size} bytes; the limit is {limit} bytes"),
        )
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": {
                "code": self.code,
                "message": self.message,
            }
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<DeliveryError> for ApiError {
    fn from(err: DeliveryError) -> Self {
        let (status, code) = match &err {
            DeliveryError::Canceled => (StatusCode::SERVICE_UNAVAILABLE, codes::DELIVERY_CANCELED),
            DeliveryError::Rejected { .. } | DeliveryError::RetryBudgetExhausted { .. } => {
                (StatusCode::BAD_GATEWAY, codes::DELIVERY_FAILED)
            }
            DeliveryError::Serialization(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, codes::INTERNAL_ERROR)
            }
        };
        Self::new(status, code, err.to_string())
    }
}

impl From<SubscriptionPayloadError> for ApiError {
    fn from(err: SubscriptionPayloadError) -> Self {
        Self::invalid_subscription(err)
    }
}

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Gateway-level errors (startup and serving)
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(std::io::Error),

    /// HTTP client construction failed
    #[error("callback client error: {0}")]
    Client(String),

    /// Server stopped with an I/O error
    #[error("server error: {0}")]
    Serve(std::io::Error),
}
