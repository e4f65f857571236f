//! # Lifecycle Metrics
//!
//! Prometheus metrics for the settlement engine.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! qc-18-tx-lifecycle = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `tx_lifecycle_transactions_tracked_total` - Counter of tracked transactions
//! - `tx_lifecycle_transactions_settled_total` - Counter of settlement callbacks
//! - `tx_lifecycle_transactions_done_total` - Counter of completion callbacks
//! - `tx_lifecycle_transactions_reverted_total` - Counter of settlements reverted by finality
//! - `tx_lifecycle_blocks_observed_total` - Counter of new blocks registered
//! - `tx_lifecycle_blocks_finalized_total` - Counter of blocks finalized (path length)
//! - `tx_lifecycle_blocks_unpinned_total` - Counter of blocks released
//! - `tx_lifecycle_inclusion_cache_total` - Counter of inclusion lookups (by result)

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

#[cfg(feature = "metrics")]
lazy_static! {
    pub static ref TRANSACTIONS_TRACKED: IntCounter = register_int_counter!(
        "tx_lifecycle_transactions_tracked_total",
        "Total number of transactions tracked"
    )
    .expect("Failed to create TRANSACTIONS_TRACKED metric");

    pub static ref TRANSACTIONS_SETTLED: IntCounter = register_int_counter!(
        "tx_lifecycle_transactions_settled_total",
        "Total number of settlement callbacks emitted"
    )
    .expect("Failed to create TRANSACTIONS_SETTLED metric");

    pub static ref TRANSACTIONS_DONE: IntCounter = register_int_counter!(
        "tx_lifecycle_transactions_done_total",
        "Total number of completion callbacks emitted"
    )
    .expect("Failed to create TRANSACTIONS_DONE metric");

    pub static ref TRANSACTIONS_REVERTED: IntCounter = register_int_counter!(
        "tx_lifecycle_transactions_reverted_total",
        "Total number of settlements reverted because their block was abandoned"
    )
    .expect("Failed to create TRANSACTIONS_REVERTED metric");

    pub static ref BLOCKS_OBSERVED: IntCounter = register_int_counter!(
        "tx_lifecycle_blocks_observed_total",
        "Total number of blocks registered in the block tree"
    )
    .expect("Failed to create BLOCKS_OBSERVED metric");

    pub static ref BLOCKS_FINALIZED: IntCounter = register_int_counter!(
        "tx_lifecycle_blocks_finalized_total",
        "Total number of blocks finalized, including inferred ancestors"
    )
    .expect("Failed to create BLOCKS_FINALIZED metric");

    pub static ref BLOCKS_UNPINNED: IntCounter = register_int_counter!(
        "tx_lifecycle_blocks_unpinned_total",
        "Total number of blocks released to the chain node"
    )
    .expect("Failed to create BLOCKS_UNPINNED metric");

    pub static ref INCLUSION_LOOKUPS: IntCounterVec = register_int_counter_vec!(
        "tx_lifecycle_inclusion_cache_total",
        "Inclusion cache lookups",
        &["result"]
    )
    .expect("Failed to create INCLUSION_LOOKUPS metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

#[cfg(feature = "metrics")]
pub fn record_transaction_tracked() {
    TRANSACTIONS_TRACKED.inc();
}

#[cfg(feature = "metrics")]
pub fn record_transactions_settled(count: u64) {
    TRANSACTIONS_SETTLED.inc_by(count);
}

#[cfg(feature = "metrics")]
pub fn record_transactions_done(count: u64) {
    TRANSACTIONS_DONE.inc_by(count);
}

#[cfg(feature = "metrics")]
pub fn record_transactions_reverted(count: u64) {
    TRANSACTIONS_REVERTED.inc_by(count);
}

#[cfg(feature = "metrics")]
pub fn record_block_observed() {
    BLOCKS_OBSERVED.inc();
}

#[cfg(feature = "metrics")]
pub fn record_blocks_finalized(count: u64) {
    BLOCKS_FINALIZED.inc_by(count);
}

#[cfg(feature = "metrics")]
pub fn record_blocks_unpinned(count: u64) {
    BLOCKS_UNPINNED.inc_by(count);
}

/// Record an inclusion lookup (`hit` or `miss`)
#[cfg(feature = "metrics")]
pub fn record_inclusion_lookup(result: &str) {
    INCLUSION_LOOKUPS.with_label_values(&[result]).inc();
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_transaction_tracked() {}

#[cfg(not(feature = "metrics"))]
pub fn record_transactions_settled(_count: u64) {}

#[cfg(not(feature = "metrics"))]
pub fn record_transactions_done(_count: u64) {}

#[cfg(not(feature = "metrics"))]
pub fn record_transactions_reverted(_count: u64) {}

#[cfg(not(feature = "metrics"))]
pub fn record_block_observed() {}

#[cfg(not(feature = "metrics"))]
pub fn record_blocks_finalized(_count: u64) {}

#[cfg(not(feature = "metrics"))]
pub fn record_blocks_unpinned(_count: u64) {}

#[cfg(not(feature = "metrics"))]
pub fn record_inclusion_lookup(_result: &str) {}
