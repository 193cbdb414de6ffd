//! Delivery errors.

use shared_types::Endpoint;
use thiserror::Error;

use crate::ports::SendError;

/// Why an event was not delivered to every matching endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The caller canceled before a send or during a retry wait.
    #[error("delivery canceled")]
    Canceled,

    /// The endpoint answered with a non-retryable failure.
    #[error("delivery to {endpoint} rejected: {reason}")]
    Rejected {
        endpoint: Endpoint,
        status: Option<u16>,
        reason: String,
    },

    /// Transient failures persisted for the whole retry budget.
    #[error("delivery to {endpoint} failed after {attempts} attempt(s): {last_error}")]
    RetryBudgetExhausted {
        endpoint: Endpoint,
        attempts: u32,
        last_error: String,
    },

    /// The event could not be encoded as JSON.
    #[error("event serialization failed: {0}")]
    Serialization(String),
}

impl DeliveryError {
    /// Caller-initiated abort, as opposed to a delivery failure.
    pub fn is_canceled(&self) -> bool {
        matches!(self, DeliveryError::Canceled)
    }

    /// Endpoint the failure belongs to, if any.
    pub fn endpoint(&self) -> Option<&Endpoint> {
        match self {
            DeliveryError::Rejected { endpoint, .. }
            | DeliveryError::RetryBudgetExhausted { endpoint, .. } => Some(endpoint),
            DeliveryError::Canceled | DeliveryError::Serialization(_) => None,
        }
    }

    pub(crate) fn from_send(endpoint: &Endpoint, attempts: u32, err: SendError) -> Self {
        match err {
            SendError::Rejected { status, reason } => DeliveryError::Rejected {
                endpoint: endpoint.clone(),
                status,
                reason,
            },
            SendError::Transient(reason) => DeliveryError::RetryBudgetExhausted {
                endpoint: endpoint.clone(),
                attempts,
                last_error: reason,
            },
        }
    }
}

impl From<serde_json::Error> for DeliveryError {
    fn from(err: serde_json::Error) -> Self {
        DeliveryError::Serialization(err.to_string())
    }
}
