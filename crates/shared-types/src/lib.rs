//! # Shared Types Crate
//!
//! Value types exchanged between the event source, the lifecycle tracker and
//! its observers.
//!
//! ## Design Principles
//!
//! - **Opaque identity**: block hashes and transaction identifiers are
//!   carried verbatim; nothing here interprets their contents.
//! - **Wire compatibility**: the serde form of every type matches the JSON
//!   the chain-head event source emits (`camelCase`, `type`-tagged unions).

pub mod entities;
pub mod ipc;

pub use entities::*;
pub use ipc::*;
