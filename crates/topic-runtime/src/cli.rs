//! Command-line flags with environment fallbacks.

use clap::builder::BoolishValueParser;
use clap::Parser;
use eg_02_delivery::{parse_duration, StatusHandling};
use eg_03_topic_gateway::GatewayConfig;
use std::net::IpAddr;
use std::time::Duration;

/// Local Event Grid topic emulator
#[derive(Parser, Debug, Clone)]
#[command(name = "eventgrid-emulator", version)]
#[command(about = "Accepts Event Grid events over HTTP and pushes them to subscribed webhooks")]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "EG_PORT", default_value_t = 80)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "EG_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// How long to keep retrying one subscriber, e.g. 24h, 1h30m, 0
    #[arg(
        long,
        env = "EG_CALLBACK_RETRY_DURATION",
        default_value = "24h",
        value_parser = parse_duration
    )]
    pub callback_retry_duration: Duration,

    /// Pause between delivery attempts
    #[arg(
        long,
        env = "EG_CALLBACK_RETRY_INTERVAL",
        default_value = "1s",
        value_parser = parse_duration
    )]
    pub callback_retry_interval: Duration,

    /// Timeout for a single callback request
    #[arg(
        long,
        env = "EG_CALLBACK_TIMEOUT",
        default_value = "30s",
        value_parser = parse_duration
    )]
    pub callback_timeout: Duration,

    /// Treat non-2xx callback responses as failures: retry 5xx, 408 and 429,
    /// fail on anything else
    #[arg(long, env = "EG_FAIL_ON_ERROR_STATUS", value_parser = BoolishValueParser::new())]
    pub fail_on_error_status: bool,

    /// Log filter directives, e.g. "info" or "eg_02_delivery=debug"
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "EG_JSON_LOGS", value_parser = BoolishValueParser::new())]
    pub json_logs: bool,
}

impl Args {
    /// Gateway configuration described by these flags.
    pub fn to_config(&self) -> GatewayConfig {
        let mut config = GatewayConfig::default();
        config.http.host = self.host;
        config.http.port = self.port;
        config.delivery.retry_duration = self.callback_retry_duration;
        config.delivery.retry_interval = self.callback_retry_interval;
        config.delivery.request_timeout = self.callback_timeout;
        if self.fail_on_error_status {
            config.delivery.status_handling = StatusHandling::Classify;
        }
        config
    }
}
