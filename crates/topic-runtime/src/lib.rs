//! # Event Grid Topic Emulator Runtime
//!
//! Wires the subsystems together and runs them as one process.
//!
//! ## Modular Structure
//!
//! - `cli` - flags and environment variables
//! - `telemetry` - tracing subscriber setup
//!
//! ## Startup Sequence
//!
//! 1. Parse flags (environment variables fill in anything not given)
//! 2. Initialize logging
//! 3. Create the in-memory subscription registry
//! 4. Create the delivery engine and topic gateway around it
//! 5. Serve until Ctrl+C, then drain in-flight requests

pub mod cli;
pub mod telemetry;

use std::sync::Arc;

use anyhow::{Context, Result};
use eg_01_subscriptions::{InMemorySubscriptionRegistry, SubscriptionRegistry};
use eg_02_delivery::format_duration;
use eg_03_topic_gateway::{GatewayConfig, TopicGatewayService};
use tracing::{error, info};

pub use cli::Args;

/// The emulator process.
pub struct TopicRuntime {
    gateway: TopicGatewayService,
}

impl TopicRuntime {
    /// Build every subsystem from `config`.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let registry: Arc<dyn SubscriptionRegistry> = Arc::new(InMemorySubscriptionRegistry::new());
        let gateway = TopicGatewayService::new(config, registry)
            .context("failed to initialize topic gateway")?;

        Ok(Self { gateway })
    }

    pub fn gateway(&self) -> &TopicGatewayService {
        &self.gateway
    }

    /// Serve until Ctrl+C.
    pub async fn run(&self) -> Result<()> {
        let config = self.gateway.config();
        info!("===========================================");
        info!("  Event Grid Topic Emulator v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");
        info!(
            addr = %config.http_addr(),
            retry_duration = %format_duration(config.delivery.retry_duration),
            retry_interval = %format_duration(config.delivery.retry_interval),
            "Starting"
        );

        let shutdown = self.gateway.shutdown_token();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for Ctrl+C");
                return;
            }
            info!("Received Ctrl+C, shutting down");
            shutdown.cancel();
        });

        self.gateway
            .start()
            .await
            .context("topic gateway stopped with an error")
    }

    /// Stop serving; in-flight deliveries are canceled.
    pub fn shutdown(&self) {
        self.gateway.shutdown();
    }
}
