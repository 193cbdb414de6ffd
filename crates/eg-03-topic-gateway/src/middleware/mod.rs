//! Middleware stack for the topic gateway.
//!
//! Layer order: Request → Tracing → BodyLimit → Handler

pub mod metrics;
pub mod tracing;

pub use metrics::{GatewayMetrics, RequestTimer};
pub use tracing::{TracingLayer, REQUEST_ID_HEADER};
