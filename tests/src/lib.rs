//! # Transaction Lifecycle Test Suite
//!
//! Workspace-level tests for the lifecycle tracker.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/
//! │   ├── flows.rs    # Fork, sparse finality, unpinning, re-delivery scenarios
//! │   ├── wire.rs     # JSON event scripts in, JSON callbacks out
//! │   └── driver.rs   # Async event-stream driver with logging installed
//! │
//! └── benches/
//!     └── settlement_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p qc-tests
//!
//! # By category
//! cargo test -p qc-tests integration::flows::
//!
//! # Benchmarks
//! cargo bench -p qc-tests
//! ```

pub mod integration;
