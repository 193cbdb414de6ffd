//! Adapters layer for delivery.

pub mod http;

pub use http::HttpCallbackSender;
