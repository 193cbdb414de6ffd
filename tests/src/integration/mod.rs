//! Cross-subsystem integration tests.
//!
//! Every test binds its servers to `127.0.0.1:0`, so tests run in parallel
//! without port clashes.


mod delivery_flows;
mod gateway_flows;
