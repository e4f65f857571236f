//! # Block Tree
//!
//! Arena of every block announced by the chain head, keyed by hash. Each
//! node records its parent hash and child hashes; ancestor walks are map
//! lookups, never owned links.
//!
//! ```text
//!            ┌── B1 ── C1          finalize(C2):
//!   A ── ────┤                       newly finalized: B2, C2
//!            └── B2 ── C2 ── D2      prunable:        A, B1, C1
//!                                    stays pinned:    C2, D2
//! ```
//!
//! Blocks are never removed from the arena. Once a block is classified
//! prunable it is marked `pruned` and leaves the live index.

use crate::error::{LifecycleError, LifecycleResult};
use shared_types::BlockHash;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

/// A node in the block tree.
#[derive(Debug, Clone)]
pub struct TreeBlock {
    /// Block hash (identity key).
    pub hash: BlockHash,
    /// Parent hash; `None` for the first-seen root.
    pub parent: Option<BlockHash>,
    /// Child hashes in observation order.
    pub children: Vec<BlockHash>,
    /// Observation sequence number.
    pub seq: u64,
    /// Whether the block is part of the finalized chain.
    pub finalized: bool,
    /// Whether the block has been released (superseded or abandoned).
    pub pruned: bool,
}

/// Outcome of registering a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// Block was new. `abandoned` is set when its parent is already pruned,
    /// i.e. the block extends a fork that can never be finalized.
    Inserted { abandoned: bool },
    /// Block had been observed before; nothing changed.
    AlreadyKnown,
}

/// Everything a finality notification changes in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizationPlan {
    /// The block named by the notification.
    pub target: BlockHash,
    /// Finalized block before this notification.
    pub previous: Option<BlockHash>,
    /// Previous finalized (exclusive) to target (inclusive), ancestor first.
    pub newly_finalized: Vec<BlockHash>,
    /// Blocks to release, in observation order: superseded finalized
    /// ancestors plus every live block that does not descend from `target`.
    pub prunable: Vec<BlockHash>,
}

/// Result of checking a finality notification against the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalityCheck {
    /// Target is at or behind the finalized block.
    Redundant,
    /// Target advances finality.
    Advance(FinalizationPlan),
}

/// Parent/child graph of observed blocks with a finalized pointer.
#[derive(Debug, Default)]
pub struct BlockTree {
    blocks: HashMap<BlockHash, TreeBlock>,
    /// Live (not pruned) blocks by observation sequence.
    live: BTreeMap<u64, BlockHash>,
    /// Blocks whose parent has not been observed yet, keyed by that parent.
    orphans: HashMap<BlockHash, Vec<BlockHash>>,
    finalized: Option<BlockHash>,
    next_seq: u64,
}

impl BlockTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tree rooted at an already-finalized block.
    pub fn with_finalized_root(root: BlockHash) -> Self {
        let mut tree = Self::new();
        tree.insert(root.clone(), None);
        if let Some(block) = tree.blocks.get_mut(&root) {
            block.finalized = true;
        }
        tree.finalized = Some(root);
        tree
    }

    /// Register a block. Idempotent for already-known hashes.
    ///
    /// An unknown parent is accepted: the block becomes the root of its own
    /// subtree until either the parent shows up and adopts it, or finality
    /// decides its fate.
    pub fn observe(&mut self, hash: BlockHash, parent: Option<BlockHash>) -> Observation {
        if self.blocks.contains_key(&hash) {
            return Observation::AlreadyKnown;
        }

        let mut abandoned = false;
        if let Some(p) = parent.as_ref() {
            match self.blocks.get_mut(p) {
                Some(parent_block) => {
                    parent_block.children.push(hash.clone());
                    abandoned = parent_block.pruned;
                }
                None => self.orphans.entry(p.clone()).or_default().push(hash.clone()),
            }
        }

        self.insert(hash, parent);
        Observation::Inserted { abandoned }
    }

    fn insert(&mut self, hash: BlockHash, parent: Option<BlockHash>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.live.insert(seq, hash.clone());
        let children = self.orphans.remove(&hash).unwrap_or_default();
        self.blocks.insert(
            hash.clone(),
            TreeBlock {
                hash,
                parent,
                children,
                seq,
                finalized: false,
                pruned: false,
            },
        );
    }

    pub fn get(&self, hash: &BlockHash) -> Option<&TreeBlock> {
        self.blocks.get(hash)
    }

    pub fn contains(&self, hash: &BlockHash) -> bool {
        self.blocks.contains_key(hash)
    }

    /// Known and not yet released.
    pub fn is_pinned(&self, hash: &BlockHash) -> bool {
        self.blocks.get(hash).is_some_and(|b| !b.pruned)
    }

    pub fn finalized(&self) -> Option<&BlockHash> {
        self.finalized.as_ref()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Ancestor chain from the finalized block (exclusive) to `hash`
    /// (inclusive), ancestor first.
    ///
    /// With no finalized block yet, the walk covers the whole known ancestry
    /// and stops at the first block whose parent was never observed.
    ///
    /// # Errors
    /// - `UnknownBlock` if `hash`, or an ancestor between it and the
    ///   finalized block, was never observed
    /// - `ConflictingFinality` if the walk crosses a pruned block or runs
    ///   out of ancestors without meeting the finalized block
    pub fn path_to_finalized(&self, hash: &BlockHash) -> LifecycleResult<Vec<BlockHash>> {
        let mut cursor = self
            .blocks
            .get(hash)
            .ok_or_else(|| LifecycleError::unknown_block(hash))?;
        let mut path = Vec::new();

        loop {
            if self.finalized.as_ref() == Some(&cursor.hash) {
                break;
            }
            if cursor.pruned {
                return Err(self.conflict(hash));
            }
            path.push(cursor.hash.clone());

            let Some(parent) = cursor.parent.as_ref() else {
                if self.finalized.is_none() {
                    break;
                }
                return Err(self.conflict(hash));
            };
            match self.blocks.get(parent) {
                Some(parent_block) => cursor = parent_block,
                None if self.finalized.is_none() => break,
                None => return Err(LifecycleError::unknown_block(parent)),
            }
        }

        path.reverse();
        Ok(path)
    }

    fn conflict(&self, hash: &BlockHash) -> LifecycleError {
        match &self.finalized {
            Some(finalized) => LifecycleError::ConflictingFinality {
                block_hash: hash.clone(),
                finalized: finalized.clone(),
            },
            None => LifecycleError::unknown_block(hash),
        }
    }

    /// Classify a finality notification without mutating the tree.
    pub fn check_finality(&self, hash: &BlockHash) -> LifecycleResult<FinalityCheck> {
        let block = self
            .blocks
            .get(hash)
            .ok_or_else(|| LifecycleError::unknown_block(hash))?;
        if block.finalized {
            return Ok(FinalityCheck::Redundant);
        }

        let newly_finalized = self.path_to_finalized(hash)?;
        let keep = self.live_subtree(hash);
        let prunable = self
            .live
            .values()
            .filter(|h| !keep.contains(*h))
            .cloned()
            .collect();

        Ok(FinalityCheck::Advance(FinalizationPlan {
            target: hash.clone(),
            previous: self.finalized.clone(),
            newly_finalized,
            prunable,
        }))
    }

    /// Apply a plan produced by [`BlockTree::check_finality`].
    pub fn apply_finality(&mut self, plan: &FinalizationPlan) {
        for hash in &plan.newly_finalized {
            if let Some(block) = self.blocks.get_mut(hash) {
                block.finalized = true;
            }
        }
        for hash in &plan.prunable {
            self.mark_pruned(hash);
        }
        self.finalized = Some(plan.target.clone());
    }

    /// Release a block. Returns `false` if it was unknown or already pruned.
    pub fn mark_pruned(&mut self, hash: &BlockHash) -> bool {
        match self.blocks.get_mut(hash) {
            Some(block) if !block.pruned => {
                block.pruned = true;
                self.live.remove(&block.seq);
                true
            }
            _ => false,
        }
    }

    /// Live strict descendants of `hash`, in observation order.
    pub fn live_descendants(&self, hash: &BlockHash) -> Vec<BlockHash> {
        let mut subtree = self.live_subtree(hash);
        subtree.remove(hash);
        let mut found: Vec<&TreeBlock> = subtree
            .iter()
            .filter_map(|h| self.blocks.get(h))
            .collect();
        found.sort_by_key(|b| b.seq);
        found.into_iter().map(|b| b.hash.clone()).collect()
    }

    /// `hash` plus every live block reachable through child links.
    fn live_subtree(&self, hash: &BlockHash) -> HashSet<BlockHash> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([hash.clone()]);
        while let Some(current) = queue.pop_front() {
            let Some(block) = self.blocks.get(&current) else {
                continue;
            };
            if block.pruned || !seen.insert(current) {
                continue;
            }
            queue.extend(block.children.iter().cloned());
        }
        seen
    }
}
