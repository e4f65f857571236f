//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-memory implementations of the outbound ports, the logging decorator,
//! and the async driver that feeds the inbound port from a channel.

mod event_stream;
mod in_memory_chain;
mod logging_observer;
mod recording_observer;

pub use event_stream::{event_channel, DriverSummary, EventStreamDriver};
pub use in_memory_chain::{ChainCalls, InMemoryChain};
pub use logging_observer::LoggingObserver;
pub use recording_observer::RecordingObserver;
