//! HTTP webhook sender backed by `reqwest`.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, StatusCode};
use shared_types::Endpoint;
use tracing::debug;

use crate::domain::{DeliveryConfig, StatusHandling};
use crate::ports::{CallbackSender, SendError};

/// POSTs event JSON to subscriber webhooks.
///
/// One pooled `Client` is shared by every delivery. Whether a non-2xx
/// answer fails the attempt depends on [`StatusHandling`].
#[derive(Debug, Clone)]
pub struct HttpCallbackSender {
    client: Client,
    user_agent: String,
    status_handling: StatusHandling,
}

impl HttpCallbackSender {
    /// Build a sender with the timeouts from `config`.
    pub fn new(config: &DeliveryConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
            status_handling: config.status_handling,
        })
    }
}

#[async_trait]
impl CallbackSender for HttpCallbackSender {
    async fn send(&self, endpoint: &Endpoint, body: Bytes) -> Result<(), SendError> {
        let response = self
            .client
            .post(endpoint.as_str())
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, &self.user_agent)
            .body(body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        check_status(response.status(), self.status_handling)
    }
}

/// Decide whether a received response completes the delivery.
pub fn check_status(status: StatusCode, handling: StatusHandling) -> Result<(), SendError> {
    if status.is_success() {
        return Ok(());
    }

    match handling {
        StatusHandling::AnyResponse => {
            debug!(status = %status, "Subscriber answered with an error status, counted as delivered");
            Ok(())
        }
        StatusHandling::Classify => Err(classify_status(status)),
    }
}

/// Map a non-success status to a retry decision.
pub fn classify_status(status: StatusCode) -> SendError {
    let reason = format!("HTTP {status}");
    if status.is_server_error()
        || status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
    {
        SendError::Transient(reason)
    } else {
        SendError::Rejected {
            status: Some(status.as_u16()),
            reason,
        }
    }
}

fn classify_transport_error(err: reqwest::Error) -> SendError {
    if err.is_builder() {
        SendError::Rejected {
            status: None,
            reason: format!("invalid request: {err}"),
        }
    } else if err.is_connect() {
        SendError::Transient(format!("connection failed: {err}"))
    } else if err.is_timeout() {
        SendError::Transient(format!("timed out: {err}"))
    } else {
        SendError::Transient(err.to_string())
    }
}
