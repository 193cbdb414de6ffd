//! Outbound Ports (Driven Ports)
//!
//! The engine pushes serialized events through `CallbackSender`. The HTTP
//! adapter is the production implementation; tests use scripted senders.

use async_trait::async_trait;
use bytes::Bytes;
use shared_types::Endpoint;
use thiserror::Error;

/// Outcome of a single failed attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    /// Worth retrying: transport failure, timeout, or a retryable status.
    #[error("transient failure: {0}")]
    Transient(String),

    /// Retrying will not help.
    #[error("rejected: {reason}")]
    Rejected { status: Option<u16>, reason: String },
}

impl SendError {
    /// Whether the engine should schedule another attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, SendError::Transient(_))
    }
}

/// Delivers one JSON body to one endpoint, once.
///
/// Implementations must not retry internally; the engine owns the retry loop.
#[async_trait]
pub trait CallbackSender: Send + Sync {
    async fn send(&self, endpoint: &Endpoint, body: Bytes) -> Result<(), SendError>;
}
