//! Error types for the Transaction Lifecycle subsystem

use shared_types::BlockHash;
use thiserror::Error;

/// Transaction lifecycle errors
///
/// Duplicate transactions and finality notifications at or behind the
/// finalized block are not errors; they are absorbed as no-ops.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LifecycleError {
    /// Finality or an ancestor walk referenced a block never announced via
    /// a new-block notification (upstream ordering violation).
    #[error("Unknown block: {block_hash}")]
    UnknownBlock { block_hash: BlockHash },

    /// Finality named a block that does not descend from the finalized block.
    #[error("Block {block_hash} conflicts with finalized block {finalized}")]
    ConflictingFinality {
        block_hash: BlockHash,
        finalized: BlockHash,
    },

    /// A chain-node query (body, validity, success) failed.
    #[error("Chain query failed for block {block_hash}: {reason}")]
    ChainQuery { block_hash: BlockHash, reason: String },

    /// The event source hung up while the driver was still expecting input.
    #[error("Event stream closed")]
    EventStreamClosed,
}

impl LifecycleError {
    pub fn unknown_block(block_hash: &BlockHash) -> Self {
        Self::UnknownBlock {
            block_hash: block_hash.clone(),
        }
    }

    pub fn chain_query(block_hash: &BlockHash, reason: impl Into<String>) -> Self {
        Self::ChainQuery {
            block_hash: block_hash.clone(),
            reason: reason.into(),
        }
    }
}

/// Result type for lifecycle operations
pub type LifecycleResult<T> = Result<T, LifecycleError>;
