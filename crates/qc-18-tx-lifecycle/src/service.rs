//! Settlement Engine - Core business logic
//!
//! Synchronous reducer over chain-head notifications. Each event is fully
//! processed, including all chain-node calls and callbacks, before the next
//! one is accepted.
//!
//! ## Finality
//!
//! ```text
//! finalized(Z)
//!   │
//!   ├─ check_finality(Z) ──→ newly finalized path, prunable blocks
//!   ├─ settled on path         ──→ done (recorded block)
//!   ├─ settled on pruned fork  ──→ re-check path ──found──→ done (path block)
//!   │                                │
//!   │                                └─ re-check Z's live descendants
//!   │                                     ──found──→ settled (silent)
//!   │                                     ──else───→ pending
//!   └─ unpin prunable, evict their inclusion records
//! ```
//!
//! All chain-node queries for an event run before any state is mutated or
//! any callback fires, so a failed event leaves the engine untouched and can
//! be re-delivered.

use crate::config::LifecycleConfig;
use crate::domain::{
    BlockTree, FinalityCheck, FinalizationPlan, InclusionCache, TxPhase, TxRegistry,
};
use crate::error::LifecycleResult;
use crate::metrics;
use crate::ports::inbound::{EventOutcome, LifecycleStats, TxLifecycleApi};
use crate::ports::outbound::{ChainQuery, LifecycleObserver};
use shared_types::{BlockHash, IncomingEvent, SettledState, SettlementOutcome, TxId};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Transaction lifecycle tracker.
///
/// Owns the block tree, the inclusion cache and the transaction registry.
/// Not shared across threads; shard by engine instance instead.
pub struct SettlementEngine<Q, O> {
    config: LifecycleConfig,
    tree: BlockTree,
    cache: InclusionCache,
    registry: TxRegistry,
    chain: Arc<Q>,
    observer: Arc<O>,
}

/// Work computed for a finality notification before anything is committed.
struct FinalityWork {
    /// Completions, both direct and re-attributed.
    done: Vec<(TxId, SettledState)>,
    /// Settlements on abandoned blocks, in arrival order.
    reverted: Vec<TxId>,
    /// Reverted transactions found again in a live descendant.
    resettled: Vec<(TxId, SettledState)>,
    /// Reverted transactions found nowhere.
    stranded: Vec<TxId>,
}

impl<Q, O> SettlementEngine<Q, O>
where
    Q: ChainQuery,
    O: LifecycleObserver,
{
    pub fn new(config: LifecycleConfig, chain: Arc<Q>, observer: Arc<O>) -> Self {
        Self {
            config,
            tree: BlockTree::new(),
            cache: InclusionCache::new(),
            registry: TxRegistry::new(),
            chain,
            observer,
        }
    }

    /// Start from a block already known to be finalized.
    ///
    /// Only meaningful before the first event; it replaces the block tree.
    pub fn with_finalized_anchor(mut self, anchor: BlockHash) -> Self {
        info!(block_hash = %anchor, "[qc-18] Starting from finalized anchor");
        self.tree = BlockTree::with_finalized_root(anchor);
        self
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    pub fn chain(&self) -> &Arc<Q> {
        &self.chain
    }

    pub fn observer(&self) -> &Arc<O> {
        &self.observer
    }

    /// Blocks with a memoized inclusion record.
    pub fn cached_blocks(&self) -> usize {
        self.cache.len()
    }

    /// Start tracking a submitted transaction. Duplicates are ignored.
    pub fn track_transaction(&mut self, tx: TxId) -> EventOutcome {
        if !self.registry.track(tx.clone()) {
            debug!(tx = %tx, "[qc-18] Duplicate transaction ignored");
            return EventOutcome::empty();
        }

        metrics::record_transaction_tracked();
        debug!(tx = %tx, "[qc-18] Tracking transaction");
        EventOutcome {
            tracked: true,
            ..EventOutcome::empty()
        }
    }

    /// Register a new block and settle the pending transactions it includes.
    ///
    /// # Errors
    /// `ChainQuery` if the block body or a verdict cannot be fetched. The
    /// block is then not registered.
    pub fn observe_block(
        &mut self,
        hash: BlockHash,
        parent: Option<BlockHash>,
    ) -> LifecycleResult<EventOutcome> {
        if self.tree.contains(&hash) {
            debug!(block_hash = %hash, "[qc-18] Block already known");
            return Ok(EventOutcome::empty());
        }

        let abandoned = parent
            .as_ref()
            .is_some_and(|p| self.tree.contains(p) && !self.tree.is_pinned(p));
        if abandoned && self.config.unpin_abandoned_on_arrival {
            return Ok(self.release_on_arrival(hash, parent));
        }

        let candidates = self.registry.pending();
        let included = self
            .cache
            .inclusion_of(self.chain.as_ref(), &hash, &candidates)?;

        self.tree.observe(hash.clone(), parent);
        metrics::record_block_observed();

        let mut outcome = EventOutcome::empty();
        for (tx, verdict) in included {
            let state = SettledState::new(hash.clone(), verdict);
            if self.registry.settle(&tx, state.clone()) {
                self.observer.on_tx_settled(&tx, &state);
                outcome.settled += 1;
            } else {
                debug!(tx = %tx, block_hash = %hash, "[qc-18] Re-settled without callback");
                outcome.resettled += 1;
            }
        }

        metrics::record_transactions_settled(outcome.settled as u64);
        if outcome.settled + outcome.resettled > 0 {
            info!(
                block_hash = %hash,
                settled = outcome.settled,
                resettled = outcome.resettled,
                pending = candidates.len() - outcome.settled - outcome.resettled,
                "[qc-18] 📥 Block settled transactions"
            );
        }
        Ok(outcome)
    }

    fn release_on_arrival(&mut self, hash: BlockHash, parent: Option<BlockHash>) -> EventOutcome {
        self.tree.observe(hash.clone(), parent);
        self.tree.mark_pruned(&hash);
        self.chain.unpin(std::slice::from_ref(&hash));

        metrics::record_block_observed();
        metrics::record_blocks_unpinned(1);
        warn!(block_hash = %hash, "[qc-18] Block extends an abandoned fork, released on arrival");

        EventOutcome {
            unpinned: 1,
            ..EventOutcome::empty()
        }
    }

    /// Advance finality to `hash`, completing every transaction settled on
    /// the newly finalized path and releasing blocks no longer needed.
    ///
    /// Finality at or behind the current finalized block is a no-op.
    ///
    /// # Errors
    /// - `UnknownBlock` if `hash` or an ancestor was never observed
    /// - `ConflictingFinality` if `hash` sits on an abandoned fork
    /// - `ChainQuery` if re-checking a reverted transaction fails
    pub fn finalize(&mut self, hash: BlockHash) -> LifecycleResult<EventOutcome> {
        let plan = match self.tree.check_finality(&hash)? {
            FinalityCheck::Redundant => {
                debug!(block_hash = %hash, "[qc-18] Finality at or behind finalized block ignored");
                return Ok(EventOutcome::empty());
            }
            FinalityCheck::Advance(plan) => plan,
        };

        let work = self.plan_settlements(&plan)?;
        Ok(self.commit_finality(&plan, work))
    }

    /// Query phase of finality. Reads the chain node but mutates nothing
    /// besides the inclusion memo.
    fn plan_settlements(&mut self, plan: &FinalizationPlan) -> LifecycleResult<FinalityWork> {
        let mut done = Vec::new();
        for block in &plan.newly_finalized {
            for tx in self.registry.settled_in(block) {
                if let Some(TxPhase::Settled(state)) = self.registry.phase(&tx) {
                    done.push((tx.clone(), state.clone()));
                }
            }
        }

        let on_path: HashSet<&BlockHash> = plan.newly_finalized.iter().collect();
        let mut reverted: Vec<TxId> = plan
            .prunable
            .iter()
            .filter(|block| !on_path.contains(block))
            .flat_map(|block| self.registry.settled_in(block))
            .collect();
        reverted.sort_by_key(|tx| self.registry.arrival(tx));

        let mut remaining = reverted.clone();
        for block in &plan.newly_finalized {
            if remaining.is_empty() {
                break;
            }
            for (tx, verdict) in self.find_in(block, &remaining)? {
                remaining.retain(|t| t != &tx);
                done.push((tx, SettledState::new(block.clone(), verdict)));
            }
        }

        let mut resettled = Vec::new();
        for block in self.tree.live_descendants(&plan.target) {
            if remaining.is_empty() {
                break;
            }
            for (tx, verdict) in self.find_in(&block, &remaining)? {
                remaining.retain(|t| t != &tx);
                resettled.push((tx, SettledState::new(block.clone(), verdict)));
            }
        }

        done.sort_by_key(|(tx, _)| self.registry.arrival(tx));
        Ok(FinalityWork {
            done,
            reverted,
            resettled,
            stranded: remaining,
        })
    }

    fn find_in(
        &mut self,
        block: &BlockHash,
        candidates: &[TxId],
    ) -> LifecycleResult<Vec<(TxId, SettlementOutcome)>> {
        self.cache
            .inclusion_of(self.chain.as_ref(), block, candidates)
    }

    fn commit_finality(&mut self, plan: &FinalizationPlan, work: FinalityWork) -> EventOutcome {
        self.tree.apply_finality(plan);
        let mut outcome = EventOutcome::empty();

        for tx in &work.reverted {
            self.registry.revert(tx);
        }
        outcome.reverted = work.reverted.len();

        for (tx, state) in &work.resettled {
            self.registry.settle(tx, state.clone());
            debug!(tx = %tx, block_hash = %state.block_hash, "[qc-18] Settlement moved to live descendant");
        }
        outcome.resettled = work.resettled.len();

        for tx in &work.stranded {
            warn!(tx = %tx, "[qc-18] Settling fork abandoned, transaction pending again");
        }

        for (tx, state) in &work.done {
            if self.registry.complete(tx, state.clone()) {
                self.observer.on_tx_done(tx, state);
                outcome.done += 1;
            }
        }

        if self.config.unpin_pruned && !plan.prunable.is_empty() {
            self.chain.unpin(&plan.prunable);
            outcome.unpinned = plan.prunable.len();
        }
        for block in &plan.prunable {
            self.cache.evict(block);
        }

        metrics::record_blocks_finalized(plan.newly_finalized.len() as u64);
        metrics::record_blocks_unpinned(outcome.unpinned as u64);
        metrics::record_transactions_done(outcome.done as u64);
        metrics::record_transactions_reverted(outcome.reverted as u64);

        info!(
            block_hash = %plan.target,
            finalized = plan.newly_finalized.len(),
            done = outcome.done,
            reverted = outcome.reverted,
            unpinned = outcome.unpinned,
            "[qc-18] 🔒 Finality advanced"
        );
        outcome
    }
}

impl<Q, O> TxLifecycleApi for SettlementEngine<Q, O>
where
    Q: ChainQuery,
    O: LifecycleObserver,
{
    fn handle_event(&mut self, event: IncomingEvent) -> LifecycleResult<EventOutcome> {
        match event {
            IncomingEvent::NewTransaction { value } => Ok(self.track_transaction(value)),
            IncomingEvent::NewBlock { block_hash, parent } => self.observe_block(block_hash, parent),
            IncomingEvent::Finalized { block_hash } => self.finalize(block_hash),
        }
    }

    fn tx_phase(&self, tx: &TxId) -> Option<TxPhase> {
        self.registry.phase(tx).cloned()
    }

    fn finalized_block(&self) -> Option<BlockHash> {
        self.tree.finalized().cloned()
    }

    fn is_block_pinned(&self, block_hash: &BlockHash) -> bool {
        self.tree.is_pinned(block_hash)
    }

    fn stats(&self) -> LifecycleStats {
        let (pending, settled, done) = self.registry.counts();
        LifecycleStats {
            pending,
            settled,
            done,
            blocks_known: self.tree.len(),
            blocks_live: self.tree.live_count(),
        }
    }
}
