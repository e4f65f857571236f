//! In-memory chain node
//!
//! Implements `ChainQuery` over a table of block bodies. Every query is
//! counted so callers can verify memoization, and every unpin directive is
//! recorded in arrival order.

use crate::error::{LifecycleError, LifecycleResult};
use crate::ports::outbound::ChainQuery;
use parking_lot::{Mutex, RwLock};
use shared_types::{BlockHash, TxId};
use std::collections::{HashMap, HashSet};

/// Query call counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChainCalls {
    pub body: usize,
    pub valid: usize,
    pub successful: usize,
    pub unpin: usize,
}

impl ChainCalls {
    /// Body, validity and success queries combined (unpin excluded).
    pub fn queries(&self) -> usize {
        self.body + self.valid + self.successful
    }
}

#[derive(Debug, Default)]
struct StoredBlock {
    body: Vec<TxId>,
    invalid: HashSet<TxId>,
    failed: HashSet<TxId>,
}

/// In-memory `ChainQuery` implementation for tests and benches.
///
/// Bodies of blocks never registered are empty. Blocks marked unavailable
/// fail every query until made available again.
#[derive(Debug, Default)]
pub struct InMemoryChain {
    blocks: RwLock<HashMap<BlockHash, StoredBlock>>,
    unavailable: RwLock<HashSet<BlockHash>>,
    calls: Mutex<ChainCalls>,
    body_fetches: Mutex<HashMap<BlockHash, usize>>,
    unpinned: Mutex<Vec<BlockHash>>,
}

impl InMemoryChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_block(self, hash: &str, txs: &[&str]) -> Self {
        self.insert_block(hash, txs);
        self
    }

    /// Mark `tx` invalid within `hash`.
    pub fn with_invalid(self, hash: &str, tx: &str) -> Self {
        self.blocks
            .write()
            .entry(BlockHash::from(hash))
            .or_default()
            .invalid
            .insert(TxId::from(tx));
        self
    }

    /// Mark `tx` as valid but failed within `hash`.
    pub fn with_failed(self, hash: &str, tx: &str) -> Self {
        self.blocks
            .write()
            .entry(BlockHash::from(hash))
            .or_default()
            .failed
            .insert(TxId::from(tx));
        self
    }

    pub fn with_unavailable(self, hash: &str) -> Self {
        self.set_unavailable(hash);
        self
    }

    /// Register (or replace) a block body.
    pub fn insert_block(&self, hash: &str, txs: &[&str]) {
        self.blocks
            .write()
            .entry(BlockHash::from(hash))
            .or_default()
            .body = txs.iter().map(|tx| TxId::from(*tx)).collect();
    }

    pub fn set_unavailable(&self, hash: &str) {
        self.unavailable.write().insert(BlockHash::from(hash));
    }

    pub fn set_available(&self, hash: &str) {
        self.unavailable.write().remove(&BlockHash::from(hash));
    }

    pub fn calls(&self) -> ChainCalls {
        *self.calls.lock()
    }

    /// Number of body fetches issued for one block.
    pub fn body_fetches(&self, hash: &str) -> usize {
        self.body_fetches
            .lock()
            .get(&BlockHash::from(hash))
            .copied()
            .unwrap_or(0)
    }

    /// Every block released so far, in directive order.
    pub fn unpinned(&self) -> Vec<BlockHash> {
        self.unpinned.lock().clone()
    }

    pub fn is_unpinned(&self, hash: &str) -> bool {
        self.unpinned.lock().contains(&BlockHash::from(hash))
    }

    fn check_available(&self, block_hash: &BlockHash) -> LifecycleResult<()> {
        if self.unavailable.read().contains(block_hash) {
            return Err(LifecycleError::chain_query(
                block_hash,
                "block state unavailable",
            ));
        }
        Ok(())
    }
}

impl ChainQuery for InMemoryChain {
    fn get_body(&self, block_hash: &BlockHash) -> LifecycleResult<Vec<TxId>> {
        self.calls.lock().body += 1;
        *self
            .body_fetches
            .lock()
            .entry(block_hash.clone())
            .or_default() += 1;
        self.check_available(block_hash)?;

        Ok(self
            .blocks
            .read()
            .get(block_hash)
            .map(|block| block.body.clone())
            .unwrap_or_default())
    }

    fn is_tx_valid(&self, block_hash: &BlockHash, tx: &TxId) -> LifecycleResult<bool> {
        self.calls.lock().valid += 1;
        self.check_available(block_hash)?;

        Ok(self
            .blocks
            .read()
            .get(block_hash)
            .is_some_and(|block| !block.invalid.contains(tx)))
    }

    fn is_tx_successful(&self, block_hash: &BlockHash, tx: &TxId) -> LifecycleResult<bool> {
        self.calls.lock().successful += 1;
        self.check_available(block_hash)?;

        Ok(self
            .blocks
            .read()
            .get(block_hash)
            .is_some_and(|block| !block.failed.contains(tx)))
    }

    fn unpin(&self, block_hashes: &[BlockHash]) {
        self.calls.lock().unpin += 1;
        self.unpinned.lock().extend(block_hashes.iter().cloned());
    }
}
