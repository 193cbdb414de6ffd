//! Route handlers.
//!
//! Bodies are taken as raw bytes and decoded here so that malformed input
//! produces the gateway's JSON error shape rather than axum's plain-text
//! rejections.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Json,
};
use bytes::Bytes;
use eg_01_subscriptions::SubscriptionRegistry;
use eg_02_delivery::DeliveryEngine;
use serde_json::{json, Value};
use shared_types::{Event, EventSubscription};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::{ApiError, ApiResult, LimitsConfig};
use crate::middleware::GatewayMetrics;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<dyn SubscriptionRegistry>,
    pub engine: Arc<DeliveryEngine>,
    pub metrics: Arc<GatewayMetrics>,
    pub limits: LimitsConfig,
    pub help_page_uri: Arc<str>,
    /// Cancelled on shutdown; in-flight deliveries observe a child token.
    pub shutdown: CancellationToken,
}

/// `POST /api/events`
///
/// Accepts one event or an array of events and delivers them in order. The
/// first delivery failure aborts the rest of the batch.
pub async fn publish_events(State(state): State<AppState>, body: Bytes) -> ApiResult<StatusCode> {
    let events = parse_events(&body, state.limits.max_event_size).inspect_err(|err| {
        state.metrics.record_event_rejected();
        warn!(error = %err, "Rejected event payload");
    })?;

    state.metrics.record_events_received(events.len());
    debug!(count = events.len(), "Events received");

    let cancel = state.shutdown.child_token();
    for event in &events {
        state.engine.process_event(event, &cancel).await?;
    }

    Ok(StatusCode::OK)
}

/// `POST /subscribe`
///
/// 201 when the endpoint is new, 200 when its filter was replaced.
pub async fn subscribe(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let subscription = parse_subscription(&body)?;
    let (endpoint, filter) = subscription.into_parts()?;
    let endpoint_url = endpoint.to_string();

    let added = state.registry.register(endpoint, filter);
    state.metrics.record_subscribe(added);
    info!(endpoint = %endpoint_url, added, "Subscribed");

    let status = if added {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(json!({ "endpointUrl": endpoint_url, "added": added })),
    ))
}

/// `DELETE /subscribe`
///
/// Only the destination of the payload is read.
pub async fn unsubscribe(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<Value>> {
    let subscription = parse_subscription(&body)?;
    let endpoint = subscription.endpoint()?;

    if !state.registry.unregister(&endpoint) {
        return Err(ApiError::subscription_not_found(&endpoint));
    }

    state.metrics.record_unsubscribe();
    info!(endpoint = %endpoint, "Unsubscribed");
    Ok(Json(json!({ "endpointUrl": endpoint.as_str(), "removed": true })))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "subscriptions": state.registry.len(),
    }))
}

/// `GET /metrics`
pub async fn metrics(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "gateway": state.metrics.to_json(),
        "delivery": state.engine.stats().snapshot(),
    }))
}

/// Any unknown route
pub async fn help_redirect(State(state): State<AppState>) -> impl IntoResponse {
    Redirect::temporary(&state.help_page_uri)
}

/// Decode a publish body into events, enforcing the per-event size limit.
pub fn parse_events(body: &[u8], max_event_size: usize) -> ApiResult<Vec<Event>> {
    let value: Value = serde_json::from_slice(body).map_err(ApiError::invalid_json)?;

    let items = match value {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        _ => {
            return Err(ApiError::invalid_event(
                "expected an event object or an array of events",
            ))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let size = serde_json::to_vec(&item)
                .map_err(ApiError::invalid_json)?
                .len();
            if size > max_event_size {
                return Err(ApiError::event_too_large(index, size, max_event_size));
            }

            serde_json::from_value(item)
                .map_err(|e| ApiError::invalid_event(format!("event {index}: {e}")))
        })
        .collect()
}

fn parse_subscription(body: &[u8]) -> ApiResult<EventSubscription> {
    serde_json::from_slice(body).map_err(ApiError::invalid_json)
}
