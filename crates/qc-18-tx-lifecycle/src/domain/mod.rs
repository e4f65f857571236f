//! Domain module for the Transaction Lifecycle subsystem
//!
//! ## Core Modules
//! - block_tree: parent/child arena of observed blocks, finality planning
//! - inclusion: per-block memo of body contents and verdicts
//! - transaction: arrival-ordered transaction registry

pub mod block_tree;
pub mod inclusion;
pub mod transaction;

pub use block_tree::{BlockTree, FinalityCheck, FinalizationPlan, Observation, TreeBlock};
pub use inclusion::InclusionCache;
pub use transaction::{TxPhase, TxRegistry};
