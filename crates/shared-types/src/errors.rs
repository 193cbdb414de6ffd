//! # Error Types
//!
//! Validation errors raised while turning wire payloads into domain records.

use thiserror::Error;

/// Errors raised when an endpoint identifier is not a usable callback URI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    /// The endpoint string was empty or whitespace.
    #[error("endpoint is empty")]
    Empty,

    /// The endpoint could not be parsed as an absolute URI.
    #[error("endpoint {endpoint:?} is not a valid URI: {reason}")]
    Malformed { endpoint: String, reason: String },

    /// Only `http` and `https` callbacks can be delivered to.
    #[error("endpoint {endpoint:?} uses unsupported scheme {scheme:?}")]
    UnsupportedScheme { endpoint: String, scheme: String },
}

/// Errors raised while reading an `EventSubscription` registration payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscriptionPayloadError {
    /// `properties.destination` was not supplied.
    #[error("subscription has no destination")]
    MissingDestination,

    /// The destination carried no `endpointUrl`.
    #[error("subscription destination has no endpointUrl")]
    MissingEndpointUrl,

    /// The `endpointUrl` was present but unusable.
    #[error(transparent)]
    InvalidEndpoint(#[from] EndpointError),
}
