//! # Gateway Flows
//!
//! End-to-end over real sockets: a publisher and webhook subscribers talking
//! to a running topic gateway.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::StatusCode;
    use eg_03_topic_gateway::{GatewayConfig, REQUEST_ID_HEADER};
    use serde_json::{json, Value};
    use shared_types::{EventSubscription, EventSubscriptionFilter};

    use crate::integration::support::{client, fast_retry_config, TestGateway, TestSubscriber};

    fn blob_event(subject: &str) -> Value {
        json!({
            "id": "1",
            "eventType": "Microsoft.Storage.BlobCreated",
            "subject": subject,
            "eventTime": "2024-01-01T00:00:00Z",
            "dataVersion": "1.0",
            "data": { "api": "PutBlob" }
        })
    }

    async fn subscribe(
        gateway: &TestGateway,
        url: String,
        filter: Option<EventSubscriptionFilter>,
    ) -> reqwest::Response {
        client()
            .post(gateway.url("/subscribe"))
            .json(&EventSubscription::webhook(url, filter))
            .send()
            .await
            .unwrap()
    }

    async fn publish(gateway: &TestGateway, body: &Value) -> reqwest::Response {
        client()
            .post(gateway.url("/api/events"))
            .json(body)
            .send()
            .await
            .unwrap()
    }

    // =========================================================================
    // SUBSCRIBE AND PUBLISH
    // =========================================================================

    #[tokio::test]
    async fn test_subscribe_then_publish() {
        let subscriber = TestSubscriber::start().await.unwrap();
        let gateway = TestGateway::start(fast_retry_config()).await.unwrap();

        let first = subscribe(&gateway, subscriber.url("/hook"), None).await;
        assert_eq!(first.status(), StatusCode::CREATED);
        let body: Value = first.json().await.unwrap();
        assert_eq!(body["added"], true);

        let again = subscribe(&gateway, subscriber.url("/hook"), None).await;
        assert_eq!(again.status(), StatusCode::OK);

        let response = publish(&gateway, &json!([blob_event("/a"), blob_event("/b")])).await;
        assert_eq!(response.status(), StatusCode::OK);

        let subjects: Vec<Value> = subscriber
            .received()
            .iter()
            .map(|r| r.json()["subject"].clone())
            .collect();
        assert_eq!(subjects, vec![json!("/a"), json!("/b")]);
    }

    #[tokio::test]
    async fn test_filtered_subscription() {
        let subscriber = TestSubscriber::start().await.unwrap();
        let gateway = TestGateway::start(fast_retry_config()).await.unwrap();

        let filter = EventSubscriptionFilter::all().with_subject_begins_with("/images/");
        subscribe(&gateway, subscriber.url("/images"), Some(filter)).await;
        subscribe(&gateway, subscriber.url("/everything"), None).await;

        publish(&gateway, &blob_event("/docs/readme.md")).await;
        publish(&gateway, &blob_event("/IMAGES/cat.png")).await;

        assert_eq!(subscriber.hits("/everything"), 2);
        assert_eq!(subscriber.hits("/images"), 1);
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_delivery() {
        let subscriber = TestSubscriber::start().await.unwrap();
        let gateway = TestGateway::start(fast_retry_config()).await.unwrap();
        subscribe(&gateway, subscriber.url("/hook"), None).await;

        let removed = client()
            .delete(gateway.url("/subscribe"))
            .json(&EventSubscription::webhook(subscriber.url("/hook"), None))
            .send()
            .await
            .unwrap();
        assert_eq!(removed.status(), StatusCode::OK);

        let missing = client()
            .delete(gateway.url("/subscribe"))
            .json(&EventSubscription::webhook(subscriber.url("/hook"), None))
            .send()
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        publish(&gateway, &blob_event("/a")).await;
        assert_eq!(subscriber.hits("/hook"), 0);
    }

    // =========================================================================
    // FAILURES
    // =========================================================================

    #[tokio::test]
    async fn test_rejecting_subscriber_fails_publish() {
        let subscriber = TestSubscriber::start().await.unwrap();
        subscriber.respond_with("/b", StatusCode::FORBIDDEN);
        let gateway = TestGateway::start(fast_retry_config()).await.unwrap();

        for path in ["/a", "/b", "/c"] {
            subscribe(&gateway, subscriber.url(path), None).await;
        }

        let response = publish(&gateway, &blob_event("/x")).await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"]["code"], "DeliveryFailed");

        assert_eq!(subscriber.received_paths(), vec!["/a", "/b"]);
    }

    #[tokio::test]
    async fn test_error_status_does_not_block_later_subscribers_by_default() {
        let subscriber = TestSubscriber::start().await.unwrap();
        subscriber.respond_with("/b", StatusCode::NOT_FOUND);
        let gateway = TestGateway::start(GatewayConfig::default()).await.unwrap();

        for path in ["/a", "/b", "/c"] {
            subscribe(&gateway, subscriber.url(path), None).await;
        }

        let response = publish(&gateway, &blob_event("/x")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(subscriber.received_paths(), vec!["/a", "/b", "/c"]);
    }

    #[tokio::test]
    async fn test_flaky_subscriber_recovers_within_budget() {
        let subscriber = TestSubscriber::start().await.unwrap();
        subscriber.respond_sequence("/hook", [StatusCode::BAD_GATEWAY]);
        let gateway = TestGateway::start(fast_retry_config()).await.unwrap();
        subscribe(&gateway, subscriber.url("/hook"), None).await;

        let response = publish(&gateway, &blob_event("/x")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(subscriber.hits("/hook"), 2);
    }

    #[tokio::test]
    async fn test_oversized_event_rejected() {
        let mut config = GatewayConfig::default();
        config.limits.max_event_size = 512;
        let subscriber = TestSubscriber::start().await.unwrap();
        let gateway = TestGateway::start(config).await.unwrap();
        subscribe(&gateway, subscriber.url("/hook"), None).await;

        let mut event = blob_event("/big");
        event["data"] = json!({ "padding": "x".repeat(1024) });

        let response = publish(&gateway, &json!([blob_event("/small"), event])).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"]["code"], "PayloadTooLarge");

        // Validation happens before any delivery
        assert_eq!(subscriber.hits("/hook"), 0);
    }

    #[tokio::test]
    async fn test_malformed_subscription_rejected() {
        let gateway = TestGateway::start(fast_retry_config()).await.unwrap();

        let response = client()
            .post(gateway.url("/subscribe"))
            .json(&json!({ "properties": { "destination": {} } }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"]["code"], "InvalidSubscription");
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    #[tokio::test]
    async fn test_unknown_route_redirects_to_help() {
        let gateway = TestGateway::start(fast_retry_config()).await.unwrap();

        let response = client().get(gateway.url("/nope")).send().await.unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers()["location"],
            gateway.service.config().help_page_uri.as_str()
        );
    }

    #[tokio::test]
    async fn test_responses_carry_request_id() {
        let gateway = TestGateway::start(fast_retry_config()).await.unwrap();

        let response = client().get(gateway.url("/health")).send().await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let id = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
        assert!(!id.is_empty());
    }

    #[tokio::test]
    async fn test_health_and_metrics_reflect_activity() {
        let subscriber = TestSubscriber::start().await.unwrap();
        let gateway = TestGateway::start(fast_retry_config()).await.unwrap();
        subscribe(&gateway, subscriber.url("/hook"), None).await;
        publish(&gateway, &blob_event("/a")).await;

        let health: Value = client()
            .get(gateway.url("/health"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(health["subscriptions"], 1);

        let metrics: Value = client()
            .get(gateway.url("/metrics"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(metrics["delivery"]["deliveries_succeeded"], 1);
        assert_eq!(metrics["delivery"]["events_processed"], 1);
    }

    #[tokio::test]
    async fn test_shutdown_stops_server() {
        let gateway = TestGateway::start(fast_retry_config()).await.unwrap();

        gateway.service.shutdown();

        let joined = tokio::time::timeout(Duration::from_secs(5), gateway.server)
            .await
            .expect("server did not stop");
        assert!(joined.unwrap().is_ok());
    }
}
