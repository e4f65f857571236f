//! Driven Ports (SPI - Outbound Dependencies)
//!
//! The engine calls these synchronously, one event at a time. Failures are
//! never retried here; they surface to whoever delivered the event.

use crate::error::LifecycleResult;
use shared_types::{BlockHash, SettledState, TxId};

/// Chain-node query interface.
///
/// Every call refers to a block the engine still holds pinned.
pub trait ChainQuery: Send + Sync {
    /// Transactions included in the block body.
    fn get_body(&self, block_hash: &BlockHash) -> LifecycleResult<Vec<TxId>>;

    /// Whether `tx` is valid in the context of `block_hash`.
    fn is_tx_valid(&self, block_hash: &BlockHash, tx: &TxId) -> LifecycleResult<bool>;

    /// Whether a valid `tx` executed successfully in `block_hash`.
    fn is_tx_successful(&self, block_hash: &BlockHash, tx: &TxId) -> LifecycleResult<bool>;

    /// Release retained state for blocks the engine no longer needs.
    fn unpin(&self, block_hashes: &[BlockHash]);
}

/// Receiver of lifecycle callbacks.
///
/// Within one notification, calls arrive in transaction arrival order.
pub trait LifecycleObserver: Send + Sync {
    /// First observed inclusion of `tx`. Called at most once per transaction.
    fn on_tx_settled(&self, tx: &TxId, state: &SettledState);

    /// Inclusion of `tx` became irreversible. Called at most once per transaction.
    fn on_tx_done(&self, tx: &TxId, state: &SettledState);
}
