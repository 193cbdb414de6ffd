//! Delivery engine - fans an event out to every matching subscriber.
//!
//! Endpoints are served one after another in registry order. Each endpoint
//! gets a fixed-interval retry loop; the first endpoint that ultimately fails
//! stops the fan-out and its error is returned.

use bytes::Bytes;
use eg_01_subscriptions::SubscriptionRegistry;
use shared_types::{Endpoint, Event};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::{DeliveryConfig, DeliveryStats, RetryPolicy};
use crate::error::DeliveryError;
use crate::ports::CallbackSender;

/// Routes events from the registry to their subscribers.
pub struct DeliveryEngine {
    registry: Arc<dyn SubscriptionRegistry>,
    sender: Arc<dyn CallbackSender>,
    policy: RetryPolicy,
    stats: Arc<DeliveryStats>,
}

impl DeliveryEngine {
    /// Create an engine using the retry settings from `config`.
    pub fn new(
        registry: Arc<dyn SubscriptionRegistry>,
        sender: Arc<dyn CallbackSender>,
        config: &DeliveryConfig,
    ) -> Self {
        Self::with_policy(registry, sender, RetryPolicy::from(config))
    }

    /// Create an engine with an explicit retry policy.
    pub fn with_policy(
        registry: Arc<dyn SubscriptionRegistry>,
        sender: Arc<dyn CallbackSender>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            registry,
            sender,
            policy,
            stats: Arc::new(DeliveryStats::new()),
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn registry(&self) -> &Arc<dyn SubscriptionRegistry> {
        &self.registry
    }

    /// Shared counters
    pub fn stats(&self) -> Arc<DeliveryStats> {
        Arc::clone(&self.stats)
    }

    /// Deliver `event` to every subscriber whose filter accepts it.
    ///
    /// The subscriber list is captured once; registrations made while the
    /// delivery runs do not affect it.
    #[instrument(skip_all, fields(event = %event.log_label()))]
    pub async fn process_event(
        &self,
        event: &Event,
        cancel: &CancellationToken,
    ) -> Result<(), DeliveryError> {
        let endpoints = self.registry.list_matching(event);
        self.stats.record_event(endpoints.len());

        if endpoints.is_empty() {
            debug!("No matching subscriptions");
            return Ok(());
        }

        debug!(subscribers = endpoints.len(), "Delivering event");
        self.deliver(event, &endpoints, cancel).await
    }

    /// Deliver `event` to `endpoints` using the engine's retry policy.
    pub async fn deliver(
        &self,
        event: &Event,
        endpoints: &[Endpoint],
        cancel: &CancellationToken,
    ) -> Result<(), DeliveryError> {
        self.deliver_with_policy(event, endpoints, cancel, self.policy)
            .await
    }

    /// Deliver `event` to `endpoints` with a caller-supplied retry policy.
    ///
    /// The event is serialized once and the same body is sent everywhere.
    /// Cancellation is checked before each endpoint and during retry waits;
    /// an in-flight request is never interrupted.
    pub async fn deliver_with_policy(
        &self,
        event: &Event,
        endpoints: &[Endpoint],
        cancel: &CancellationToken,
        policy: RetryPolicy,
    ) -> Result<(), DeliveryError> {
        let body = Bytes::from(serde_json::to_vec(event)?);

        for endpoint in endpoints {
            if cancel.is_cancelled() {
                self.stats.record_cancel();
                info!(endpoint = %endpoint, "Delivery canceled before send");
                return Err(DeliveryError::Canceled);
            }

            self.deliver_one(endpoint, body.clone(), cancel, policy)
                .await?;
        }

        Ok(())
    }

    /// Retry loop for a single endpoint.
    async fn deliver_one(
        &self,
        endpoint: &Endpoint,
        body: Bytes,
        cancel: &CancellationToken,
        policy: RetryPolicy,
    ) -> Result<(), DeliveryError> {
        let mut state = policy.start();

        loop {
            state.record_attempt();
            self.stats.record_attempt();
            debug!(endpoint = %endpoint, attempt = state.attempts(), "Sending event");

            let err = match self.sender.send(endpoint, body.clone()).await {
                Ok(()) => {
                    self.stats.record_success();
                    info!(
                        endpoint = %endpoint,
                        attempts = state.attempts(),
                        "Event delivered"
                    );
                    return Ok(());
                }
                Err(e) => e,
            };

            let next = if err.is_transient() {
                state.next_delay()
            } else {
                None
            };
            let Some(delay) = next else {
                self.stats.record_failure();
                error!(
                    endpoint = %endpoint,
                    attempts = state.attempts(),
                    elapsed = ?state.elapsed(),
                    error = %err,
                    "Event delivery failed"
                );
                return Err(DeliveryError::from_send(endpoint, state.attempts(), err));
            };

            warn!(
                endpoint = %endpoint,
                attempt = state.attempts(),
                retry_in = ?delay,
                error = %err,
                "Delivery attempt failed, retrying"
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    self.stats.record_cancel();
                    info!(endpoint = %endpoint, attempts = state.attempts(), "Delivery canceled during retry wait");
                    return Err(DeliveryError::Canceled);
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}
