//! Driving Ports (API - Inbound)

use crate::domain::TxPhase;
use crate::error::LifecycleResult;
use shared_types::{BlockHash, IncomingEvent, TxId};

/// Summary of what a single event changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventOutcome {
    /// A new transaction started being tracked
    pub tracked: bool,
    /// Settlement callbacks emitted
    pub settled: usize,
    /// Settlements moved silently to another block (already announced)
    pub resettled: usize,
    /// Completion callbacks emitted
    pub done: usize,
    /// Settlements returned to pending because their block was abandoned
    pub reverted: usize,
    /// Blocks released to the chain node
    pub unpinned: usize,
}

impl EventOutcome {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the event changed nothing observable.
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// Snapshot of engine bookkeeping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LifecycleStats {
    pub pending: usize,
    pub settled: usize,
    pub done: usize,
    /// Blocks ever observed
    pub blocks_known: usize,
    /// Blocks still pinned
    pub blocks_live: usize,
}

/// Primary Transaction Lifecycle API
///
/// This is the driving port: the event source pushes notifications here in
/// arrival order, one at a time.
pub trait TxLifecycleApi {
    /// Process one chain-head notification to completion, including all
    /// callbacks and chain-node calls it triggers.
    fn handle_event(&mut self, event: IncomingEvent) -> LifecycleResult<EventOutcome>;

    /// Current phase of a tracked transaction.
    fn tx_phase(&self, tx: &TxId) -> Option<TxPhase>;

    /// Most recently finalized block.
    fn finalized_block(&self) -> Option<BlockHash>;

    /// Whether the block is known and not yet released.
    fn is_block_pinned(&self, block_hash: &BlockHash) -> bool;

    fn stats(&self) -> LifecycleStats;
}
