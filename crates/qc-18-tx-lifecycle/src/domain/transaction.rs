//! # Transaction Registry
//!
//! Arrival-ordered record of every tracked transaction and its phase.
//!
//! ```text
//! [Pending] ──settle──→ [Settled(block)] ──complete──→ [Done(block)]
//!     ↑                        │
//!     └──── revert (block ─────┘
//!           abandoned)
//! ```
//!
//! Insertion order of the index map is the arrival order; it doubles as the
//! ordering key for every callback batch.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use shared_types::{BlockHash, SettledState, TxId};
use std::collections::HashMap;

/// Lifecycle phase of a tracked transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum TxPhase {
    Pending,
    Settled(SettledState),
    Done(SettledState),
}

impl TxPhase {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Settled(_))
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

#[derive(Debug, Clone)]
struct TxRecord {
    phase: TxPhase,
    /// Settlement callback already emitted; never emitted twice.
    settlement_announced: bool,
}

/// Arrival-ordered transaction registry with a block → settled-tx index.
#[derive(Debug, Default)]
pub struct TxRegistry {
    records: IndexMap<TxId, TxRecord>,
    settled_by_block: HashMap<BlockHash, Vec<TxId>>,
}

impl TxRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `tx`. Returns `false` if it is already tracked.
    pub fn track(&mut self, tx: TxId) -> bool {
        if self.records.contains_key(&tx) {
            return false;
        }
        self.records.insert(
            tx,
            TxRecord {
                phase: TxPhase::Pending,
                settlement_announced: false,
            },
        );
        true
    }

    pub fn phase(&self, tx: &TxId) -> Option<&TxPhase> {
        self.records.get(tx).map(|r| &r.phase)
    }

    /// Arrival sequence number (0-based).
    pub fn arrival(&self, tx: &TxId) -> Option<usize> {
        self.records.get_index_of(tx)
    }

    pub fn settlement_announced(&self, tx: &TxId) -> bool {
        self.records
            .get(tx)
            .is_some_and(|r| r.settlement_announced)
    }

    /// Pending transactions in arrival order.
    pub fn pending(&self) -> Vec<TxId> {
        self.records
            .iter()
            .filter(|(_, r)| r.phase.is_pending())
            .map(|(tx, _)| tx.clone())
            .collect()
    }

    /// Transactions currently settled in `block_hash`, in arrival order.
    pub fn settled_in(&self, block_hash: &BlockHash) -> Vec<TxId> {
        let mut found = self
            .settled_by_block
            .get(block_hash)
            .cloned()
            .unwrap_or_default();
        found.sort_by_key(|tx| self.arrival(tx));
        found
    }

    /// Move a pending transaction to `Settled`.
    ///
    /// Returns `true` if the settlement callback is due, i.e. this is the
    /// transaction's first settlement. Non-pending transactions are left as
    /// they are and `false` is returned.
    pub fn settle(&mut self, tx: &TxId, state: SettledState) -> bool {
        let Some(record) = self.records.get_mut(tx) else {
            return false;
        };
        if !record.phase.is_pending() {
            return false;
        }

        let announce = !record.settlement_announced;
        record.settlement_announced = true;
        self.settled_by_block
            .entry(state.block_hash.clone())
            .or_default()
            .push(tx.clone());
        record.phase = TxPhase::Settled(state);
        announce
    }

    /// Move a transaction to `Done` with the given finalized settlement.
    ///
    /// Returns `false` if the transaction is unknown or already done.
    pub fn complete(&mut self, tx: &TxId, state: SettledState) -> bool {
        let previous = match self.records.get(tx).map(|r| &r.phase) {
            None | Some(TxPhase::Done(_)) => return false,
            Some(TxPhase::Settled(state)) => Some(state.block_hash.clone()),
            Some(TxPhase::Pending) => None,
        };
        if let Some(block) = previous {
            self.unindex(&block, tx);
        }

        if let Some(record) = self.records.get_mut(tx) {
            record.settlement_announced = true;
            record.phase = TxPhase::Done(state);
        }
        true
    }

    /// Return a settled transaction to `Pending`, keeping the fact that its
    /// settlement was already announced.
    pub fn revert(&mut self, tx: &TxId) -> bool {
        let block = match self.records.get(tx).map(|r| &r.phase) {
            Some(TxPhase::Settled(state)) => state.block_hash.clone(),
            _ => return false,
        };
        self.unindex(&block, tx);
        if let Some(record) = self.records.get_mut(tx) {
            record.phase = TxPhase::Pending;
        }
        true
    }

    fn unindex(&mut self, block_hash: &BlockHash, tx: &TxId) {
        if let Some(txs) = self.settled_by_block.get_mut(block_hash) {
            txs.retain(|t| t != tx);
            if txs.is_empty() {
                self.settled_by_block.remove(block_hash);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `(pending, settled, done)` counts.
    pub fn counts(&self) -> (usize, usize, usize) {
        self.records
            .values()
            .fold((0, 0, 0), |(p, s, d), r| match r.phase {
                TxPhase::Pending => (p + 1, s, d),
                TxPhase::Settled(_) => (p, s + 1, d),
                TxPhase::Done(_) => (p, s, d + 1),
            })
    }
}
