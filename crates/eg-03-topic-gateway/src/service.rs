//! Topic gateway service - HTTP server wiring.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use eg_01_subscriptions::SubscriptionRegistry;
use eg_02_delivery::{DeliveryEngine, HttpCallbackSender};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::info;

use crate::domain::{GatewayConfig, GatewayError};
use crate::handlers::{self, AppState};
use crate::middleware::{GatewayMetrics, TracingLayer};

/// Topic gateway service state
pub struct TopicGatewayService {
    config: GatewayConfig,
    registry: Arc<dyn SubscriptionRegistry>,
    engine: Arc<DeliveryEngine>,
    metrics: Arc<GatewayMetrics>,
    shutdown: CancellationToken,
}

impl TopicGatewayService {
    /// Create a gateway that delivers over HTTP.
    pub fn new(
        config: GatewayConfig,
        registry: Arc<dyn SubscriptionRegistry>,
    ) -> Result<Self, GatewayError> {
        config.validate()?;

        let sender = HttpCallbackSender::new(&config.delivery)
            .map_err(|e| GatewayError::Client(e.to_string()))?;
        let engine = Arc::new(DeliveryEngine::new(
            Arc::clone(&registry),
            Arc::new(sender),
            &config.delivery,
        ));

        Self::with_engine(config, registry, engine)
    }

    /// Create a gateway around an existing engine.
    ///
    /// The engine should resolve subscribers from the same `registry`.
    pub fn with_engine(
        config: GatewayConfig,
        registry: Arc<dyn SubscriptionRegistry>,
        engine: Arc<DeliveryEngine>,
    ) -> Result<Self, GatewayError> {
        config.validate()?;

        Ok(Self {
            config,
            registry,
            engine,
            metrics: Arc::new(GatewayMetrics::new()),
            shutdown: CancellationToken::new(),
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Get metrics
    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn engine(&self) -> Arc<DeliveryEngine> {
        Arc::clone(&self.engine)
    }

    pub fn registry(&self) -> Arc<dyn SubscriptionRegistry> {
        Arc::clone(&self.registry)
    }

    /// Token that stops the server and cancels in-flight deliveries.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Trigger graceful shutdown
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Build the HTTP router
    pub fn router(&self) -> Router {
        let state = AppState {
            registry: Arc::clone(&self.registry),
            engine: Arc::clone(&self.engine),
            metrics: Arc::clone(&self.metrics),
            limits: self.config.limits.clone(),
            help_page_uri: Arc::from(self.config.help_page_uri.as_str()),
            shutdown: self.shutdown.clone(),
        };

        Router::new()
            .route("/api/events", post(handlers::publish_events))
            .route(
                "/subscribe",
                post(handlers::subscribe).delete(handlers::unsubscribe),
            )
            .route("/health", get(handlers::health))
            .route("/metrics", get(handlers::metrics))
            .fallback(handlers::help_redirect)
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(self.config.limits.max_payload_size))
            .layer(TracingLayer::new(Arc::clone(&self.metrics)))
            .with_state(state)
    }

    /// Bind the configured address and serve until shutdown.
    pub async fn start(&self) -> Result<(), GatewayError> {
        let addr = self.config.http_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(GatewayError::Bind)?;

        self.serve(listener).await
    }

    /// Serve on an already-bound listener until shutdown.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), GatewayError> {
        let addr = listener.local_addr().map_err(GatewayError::Bind)?;
        info!(addr = %addr, "Topic gateway listening");

        let shutdown = self.shutdown.clone();
        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await
            .map_err(GatewayError::Serve)?;

        info!("Topic gateway stopped");
        Ok(())
    }
}
