//! # Inclusion Cache
//!
//! Per-block memo of which candidate transactions a block body contains and
//! with what verdict. Each block body is fetched at most once and each
//! (block, transaction) verdict is checked at most once, for as long as the
//! block stays pinned.
//!
//! The memo is keyed per transaction rather than per candidate set: a block
//! first evaluated while a transaction was settled elsewhere can still be
//! asked about that transaction later, when finality reverts it.

use crate::error::LifecycleResult;
use crate::metrics;
use crate::ports::ChainQuery;
use shared_types::{BlockHash, SettlementOutcome, TxId};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
struct BlockInclusion {
    body: Option<HashSet<TxId>>,
    verdicts: HashMap<TxId, SettlementOutcome>,
}

/// Memoized inclusion records for pinned blocks.
#[derive(Debug, Default)]
pub struct InclusionCache {
    entries: HashMap<BlockHash, BlockInclusion>,
}

impl InclusionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Candidates contained in `block_hash`, with verdicts, in the order the
    /// candidates were given (callers pass arrival order).
    ///
    /// An empty candidate list never touches the chain node. A query failure
    /// leaves already-learned facts memoized and is returned as-is.
    pub fn inclusion_of<Q>(
        &mut self,
        chain: &Q,
        block_hash: &BlockHash,
        candidates: &[TxId],
    ) -> LifecycleResult<Vec<(TxId, SettlementOutcome)>>
    where
        Q: ChainQuery + ?Sized,
    {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let cached = self
            .entries
            .get(block_hash)
            .is_some_and(|entry| entry.body.is_some());
        if cached {
            metrics::record_inclusion_lookup("hit");
        } else {
            metrics::record_inclusion_lookup("miss");
            let fetched = chain.get_body(block_hash)?;
            self.entries.entry(block_hash.clone()).or_default().body =
                Some(fetched.into_iter().collect());
        }

        let entry = self.entries.entry(block_hash.clone()).or_default();
        let included: Vec<TxId> = match &entry.body {
            Some(body) => candidates
                .iter()
                .filter(|tx| body.contains(*tx))
                .cloned()
                .collect(),
            None => Vec::new(),
        };

        let mut found = Vec::with_capacity(included.len());
        for tx in included {
            let outcome = match entry.verdicts.get(&tx) {
                Some(outcome) => *outcome,
                None => {
                    let outcome = verdict(chain, block_hash, &tx)?;
                    entry.verdicts.insert(tx.clone(), outcome);
                    outcome
                }
            };
            found.push((tx, outcome));
        }

        Ok(found)
    }

    /// Drop the memo for a released block.
    pub fn evict(&mut self, block_hash: &BlockHash) -> bool {
        self.entries.remove(block_hash).is_some()
    }

    pub fn contains(&self, block_hash: &BlockHash) -> bool {
        self.entries.contains_key(block_hash)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn verdict<Q>(chain: &Q, block_hash: &BlockHash, tx: &TxId) -> LifecycleResult<SettlementOutcome>
where
    Q: ChainQuery + ?Sized,
{
    if !chain.is_tx_valid(block_hash, tx)? {
        return Ok(SettlementOutcome::Invalid);
    }
    let successful = chain.is_tx_successful(block_hash, tx)?;
    Ok(SettlementOutcome::Valid { successful })
}
