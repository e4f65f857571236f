//! # Integration Tests
//!
//! Cross-crate flows: shared-types wire events into qc-18-tx-lifecycle,
//! quantum-telemetry logging around the async driver.

pub mod flows;
pub mod wire;
