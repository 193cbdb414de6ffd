//! # Delivery Flows
//!
//! The delivery engine driving the real HTTP sender against live in-process
//! subscribers: fan-out order, abort on first failure, retries and
//! cancellation.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use axum::http::StatusCode;
    use eg_01_subscriptions::{InMemorySubscriptionRegistry, SubscriptionRegistry};
    use eg_02_delivery::{
        DeliveryConfig, DeliveryEngine, DeliveryError, HttpCallbackSender, RetryPolicy,
        StatusHandling,
    };
    use shared_types::{Endpoint, Event, EventSubscriptionFilter};
    use tokio_util::sync::CancellationToken;

    use crate::integration::support::TestSubscriber;

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    /// Engine whose sender fails deliveries on error statuses.
    fn engine_with(
        policy: RetryPolicy,
    ) -> (Arc<InMemorySubscriptionRegistry>, DeliveryEngine) {
        engine_handling(policy, StatusHandling::Classify)
    }

    fn engine_handling(
        policy: RetryPolicy,
        handling: StatusHandling,
    ) -> (Arc<InMemorySubscriptionRegistry>, DeliveryEngine) {
        let registry = Arc::new(InMemorySubscriptionRegistry::new());
        let config = DeliveryConfig::default().with_status_handling(handling);
        let sender = HttpCallbackSender::new(&config).unwrap();
        let engine = DeliveryEngine::with_policy(registry.clone(), Arc::new(sender), policy);
        (registry, engine)
    }

    fn fast_policy(budget: Duration) -> RetryPolicy {
        RetryPolicy::new(Duration::from_millis(20), budget)
    }

    fn blob_created() -> Event {
        Event::new("Microsoft.Storage.BlobCreated", "/blobServices/default/containers/c/blobs/a.txt")
            .with_id("evt-1")
            .with_data(serde_json::json!({ "contentLength": 524288 }))
    }

    // =========================================================================
    // FAN-OUT
    // =========================================================================

    #[tokio::test]
    async fn test_event_reaches_subscriber_as_json() {
        let subscriber = TestSubscriber::start().await.unwrap();
        let (registry, engine) = engine_with(RetryPolicy::no_retry());
        registry.register(
            subscriber.endpoint("/hook").unwrap(),
            EventSubscriptionFilter::for_types(["microsoft.storage.blobcreated"]),
        );

        engine
            .process_event(&blob_created(), &CancellationToken::new())
            .await
            .unwrap();

        let received = subscriber.received();
        assert_eq!(received.len(), 1);

        let hit = &received[0];
        assert_eq!(hit.path, "/hook");
        assert_eq!(hit.headers["content-type"], "application/json");
        assert!(hit.headers["user-agent"]
            .to_str()
            .unwrap()
            .starts_with("eventgrid-emulator/"));

        let body = hit.json();
        assert_eq!(body["id"], "evt-1");
        assert_eq!(body["eventType"], "Microsoft.Storage.BlobCreated");
        assert_eq!(body["data"]["contentLength"], 524288);
    }

    #[tokio::test]
    async fn test_non_matching_subscriber_gets_nothing() {
        let subscriber = TestSubscriber::start().await.unwrap();
        let (registry, engine) = engine_with(RetryPolicy::no_retry());
        registry.register(
            subscriber.endpoint("/deleted-only").unwrap(),
            EventSubscriptionFilter::for_types(["Microsoft.Storage.BlobDeleted"]),
        );
        registry.register(
            subscriber.endpoint("/txt-only").unwrap(),
            EventSubscriptionFilter::all().with_subject_ends_with(".TXT"),
        );

        engine
            .process_event(&blob_created(), &CancellationToken::new())
            .await
            .unwrap();

        // Suffix matches case-insensitively; the type filter does not match
        assert_eq!(subscriber.received_paths(), vec!["/txt-only"]);
    }

    #[tokio::test]
    async fn test_first_failure_stops_fan_out() {
        let subscriber = TestSubscriber::start().await.unwrap();
        subscriber.respond_with("/e2", StatusCode::BAD_REQUEST);

        let (registry, engine) = engine_with(fast_policy(Duration::from_secs(5)));
        for path in ["/e1", "/e2", "/e3"] {
            registry.register(subscriber.endpoint(path).unwrap(), EventSubscriptionFilter::all());
        }

        let err = engine
            .process_event(&blob_created(), &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            DeliveryError::Rejected {
                endpoint, status, ..
            } => {
                assert_eq!(endpoint, subscriber.endpoint("/e2").unwrap());
                assert_eq!(status, Some(400));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        assert_eq!(subscriber.received_paths(), vec!["/e1", "/e2"]);
    }

    #[tokio::test]
    async fn test_error_status_counts_as_delivered_by_default() {
        let subscriber = TestSubscriber::start().await.unwrap();
        subscriber.respond_with("/e2", StatusCode::BAD_REQUEST);
        subscriber.respond_with("/e3", StatusCode::SERVICE_UNAVAILABLE);

        let (registry, engine) = engine_handling(
            fast_policy(Duration::from_secs(5)),
            StatusHandling::AnyResponse,
        );
        for path in ["/e1", "/e2", "/e3"] {
            registry.register(subscriber.endpoint(path).unwrap(), EventSubscriptionFilter::all());
        }

        engine
            .process_event(&blob_created(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(subscriber.received_paths(), vec!["/e1", "/e2", "/e3"]);
        assert_eq!(engine.stats().snapshot().send_attempts, 3);
    }

    // =========================================================================
    // RETRY
    // =========================================================================

    #[tokio::test]
    async fn test_exhausted_endpoint_stops_later_subscribers() {
        let subscriber = TestSubscriber::start().await.unwrap();
        subscriber.respond_with("/e2", StatusCode::SERVICE_UNAVAILABLE);

        let (registry, engine) = engine_with(fast_policy(Duration::from_millis(100)));
        for path in ["/e1", "/e2", "/e3"] {
            registry.register(subscriber.endpoint(path).unwrap(), EventSubscriptionFilter::all());
        }

        let err = engine
            .process_event(&blob_created(), &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            DeliveryError::RetryBudgetExhausted { endpoint, attempts, .. } => {
                assert_eq!(endpoint, subscriber.endpoint("/e2").unwrap());
                assert_eq!(subscriber.hits("/e2"), attempts as usize);
            }
            other => panic!("expected budget exhaustion, got {other:?}"),
        }
        assert_eq!(subscriber.hits("/e1"), 1);
        assert_eq!(subscriber.hits("/e3"), 0);
    }

    #[tokio::test]
    async fn test_transient_errors_are_retried_until_success() {
        let subscriber = TestSubscriber::start().await.unwrap();
        subscriber.respond_sequence(
            "/flaky",
            [StatusCode::SERVICE_UNAVAILABLE, StatusCode::TOO_MANY_REQUESTS],
        );

        let (registry, engine) = engine_with(fast_policy(Duration::from_secs(5)));
        registry.register(subscriber.endpoint("/flaky").unwrap(), EventSubscriptionFilter::all());

        engine
            .process_event(&blob_created(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(subscriber.hits("/flaky"), 3);
        assert_eq!(engine.stats().snapshot().send_attempts, 3);
    }

    #[tokio::test]
    async fn test_retry_budget_exhausted() {
        let subscriber = TestSubscriber::start().await.unwrap();
        subscriber.respond_with("/down", StatusCode::INTERNAL_SERVER_ERROR);

        let (registry, engine) = engine_with(fast_policy(Duration::from_millis(150)));
        registry.register(subscriber.endpoint("/down").unwrap(), EventSubscriptionFilter::all());

        let started = Instant::now();
        let err = engine
            .process_event(&blob_created(), &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            DeliveryError::RetryBudgetExhausted { attempts, last_error, .. } => {
                assert!(attempts >= 2, "only {attempts} attempt(s)");
                assert!(last_error.contains("500"));
            }
            other => panic!("expected budget exhaustion, got {other:?}"),
        }
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_zero_budget_tries_unreachable_endpoint_once() {
        // Bind then drop to get a port nothing listens on
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let endpoint = Endpoint::parse(format!("http://127.0.0.1:{port}/gone")).unwrap();

        let (registry, engine) = engine_with(fast_policy(Duration::ZERO));
        registry.register(endpoint, EventSubscriptionFilter::all());

        let err = engine
            .process_event(&blob_created(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DeliveryError::RetryBudgetExhausted { attempts: 1, .. }
        ));
    }

    // =========================================================================
    // CANCELLATION
    // =========================================================================

    #[tokio::test]
    async fn test_cancel_stops_retrying() {
        let subscriber = TestSubscriber::start().await.unwrap();
        subscriber.respond_with("/down", StatusCode::SERVICE_UNAVAILABLE);

        let (registry, engine) = engine_with(RetryPolicy::new(
            Duration::from_millis(50),
            Duration::from_secs(60),
        ));
        registry.register(subscriber.endpoint("/down").unwrap(), EventSubscriptionFilter::all());
        registry.register(subscriber.endpoint("/later").unwrap(), EventSubscriptionFilter::all());

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            trigger.cancel();
        });

        let err = engine
            .process_event(&blob_created(), &cancel)
            .await
            .unwrap_err();

        assert!(err.is_canceled());
        assert!(subscriber.hits("/down") >= 1);
        assert_eq!(subscriber.hits("/later"), 0);
    }

    #[tokio::test]
    async fn test_concurrent_events_each_delivered() {
        let subscriber = TestSubscriber::start().await.unwrap();
        let (registry, engine) = engine_with(RetryPolicy::no_retry());
        registry.register(subscriber.endpoint("/all").unwrap(), EventSubscriptionFilter::all());
        let engine = Arc::new(engine);

        let tasks: Vec<_> = (0..10)
            .map(|i| {
                let engine = Arc::clone(&engine);
                tokio::spawn(async move {
                    let event = Event::new("Created", format!("items/{i}"));
                    engine.process_event(&event, &CancellationToken::new()).await
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let mut subjects: Vec<String> = subscriber
            .received()
            .iter()
            .map(|r| r.json()["subject"].as_str().unwrap_or_default().to_string())
            .collect();
        subjects.sort();
        assert_eq!(subjects.len(), 10);
        assert_eq!(subjects[0], "items/0");
    }
}
