//! # Event Grid Emulator Test Suite
//!
//! Unified test crate for flows that cross subsystem boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── filter_benchmarks.rs   # Filter matching and registry lookup
//! └── src/integration/
//!     ├── support.rs             # In-process webhook subscriber, gateway harness
//!     ├── delivery_flows.rs      # Engine + HTTP sender against live subscribers
//!     └── gateway_flows.rs       # Full HTTP round trips through the gateway
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p eg-tests
//!
//! # By category
//! cargo test -p eg-tests integration::delivery_flows
//! cargo test -p eg-tests integration::gateway_flows
//!
//! # Benchmarks
//! cargo bench -p eg-tests
//! ```

pub mod integration;
