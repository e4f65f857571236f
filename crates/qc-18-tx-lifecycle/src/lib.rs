//! # qc-18-tx-lifecycle
//!
//! Transaction Lifecycle Tracker: turns chain-head and finality
//! notifications from a forking chain into exactly-once `settled` / `done`
//! callbacks per transaction.
//!
//! ## Overview
//!
//! This subsystem provides:
//! - **Block Tree**: parent/child arena of observed blocks, ancestor walks,
//!   finality planning (newly finalized path + prunable blocks)
//! - **Inclusion Cache**: per-block memo of body contents and verdicts, so
//!   the chain node is asked each question once
//! - **Settlement Engine**: the synchronous reducer that drives both and
//!   emits callbacks in transaction arrival order
//!
//! ## Architecture
//!
//! ```text
//! Chain head ──newBlock / newTransaction / finalized──→ Tx Lifecycle (18)
//!                                                          │
//!                                                          ├── getBody / isTxValid /
//!                                                          │   isTxSuccessful / unpin ──→ Chain node
//!                                                          │
//!                                                          └── onTxSettled / onTxDone ──→ Observer
//! ```
//!
//! ## Transaction Phases
//!
//! ```text
//! [PENDING] ──included in new block──→ [SETTLED] ──block finalized──→ [DONE]
//!     ↑                                    │
//!     └──── settling fork abandoned ───────┘
//! ```
//!
//! A transaction settled on an abandoned fork is re-checked against the
//! finalized path and completed there if found; its settlement callback is
//! never repeated.
//!
//! ## Example
//!
//! ```rust,ignore
//! use qc_18_tx_lifecycle::{LifecycleConfig, SettlementEngine, TxLifecycleApi};
//! use shared_types::IncomingEvent;
//!
//! let mut engine = SettlementEngine::new(LifecycleConfig::default(), chain, observer);
//!
//! engine.handle_event(IncomingEvent::new_transaction("0xaa"))?;
//! engine.handle_event(IncomingEvent::new_block("0x02", Some("0x01")))?;
//! engine.handle_event(IncomingEvent::finalized("0x02"))?;
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod metrics;
pub mod ports;
pub mod service;

pub use adapters::{
    event_channel, ChainCalls, DriverSummary, EventStreamDriver, InMemoryChain, LoggingObserver,
    RecordingObserver,
};
pub use config::LifecycleConfig;
pub use domain::{BlockTree, FinalityCheck, FinalizationPlan, InclusionCache, TxPhase, TxRegistry};
pub use error::{LifecycleError, LifecycleResult};
pub use events::LifecycleNotification;
pub use ports::{ChainQuery, EventOutcome, LifecycleObserver, LifecycleStats, TxLifecycleApi};
pub use service::SettlementEngine;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
