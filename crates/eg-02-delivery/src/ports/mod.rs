//! Ports layer for delivery.

pub mod outbound;

pub use outbound::{CallbackSender, SendError};
