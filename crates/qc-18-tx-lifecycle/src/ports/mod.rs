//! Ports module for the Transaction Lifecycle subsystem

pub mod inbound;
pub mod outbound;

pub use inbound::{EventOutcome, LifecycleStats, TxLifecycleApi};
pub use outbound::{ChainQuery, LifecycleObserver};
