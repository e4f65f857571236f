//! # Inbound Event Payloads
//!
//! Notifications delivered by the chain-head event source, in arrival order.

use crate::entities::{BlockHash, TxId};
use serde::{Deserialize, Serialize};

/// A single chain-head notification.
///
/// Wire form is a `type`-tagged JSON object, e.g.
/// `{"type":"newBlock","blockHash":"0x02","parent":"0x01"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum IncomingEvent {
    /// A block was imported. `parent` is absent only for the first-seen root.
    #[serde(rename_all = "camelCase")]
    NewBlock {
        block_hash: BlockHash,
        #[serde(default)]
        parent: Option<BlockHash>,
    },

    /// A transaction was submitted and should be tracked.
    NewTransaction { value: TxId },

    /// A block (and implicitly all its ancestors) became final.
    #[serde(rename_all = "camelCase")]
    Finalized { block_hash: BlockHash },
}

impl IncomingEvent {
    pub fn new_block(block_hash: impl Into<BlockHash>, parent: Option<&str>) -> Self {
        Self::NewBlock {
            block_hash: block_hash.into(),
            parent: parent.map(BlockHash::from),
        }
    }

    pub fn new_transaction(value: impl Into<TxId>) -> Self {
        Self::NewTransaction {
            value: value.into(),
        }
    }

    pub fn finalized(block_hash: impl Into<BlockHash>) -> Self {
        Self::Finalized {
            block_hash: block_hash.into(),
        }
    }

    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NewBlock { .. } => "newBlock",
            Self::NewTransaction { .. } => "newTransaction",
            Self::Finalized { .. } => "finalized",
        }
    }
}
