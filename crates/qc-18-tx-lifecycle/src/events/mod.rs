//! Events module for the Transaction Lifecycle subsystem
//!
//! Incoming chain-head notifications are shared wire types; outgoing
//! notifications mirror the two observer callbacks.

pub mod outgoing;

pub use outgoing::LifecycleNotification;
pub use shared_types::IncomingEvent;
