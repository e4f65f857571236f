//! Event stream driver
//!
//! Feeds chain-head notifications from a bounded `tokio::sync::mpsc` channel
//! into a `TxLifecycleApi`, strictly one at a time. The channel is the only
//! concurrency boundary: producers may live on any task, the engine is owned
//! by the single consumer.
//!
//! ```text
//! producer ──IncomingEvent──→ [mpsc, bounded] ──→ EventStreamDriver ──→ engine
//! ```

use crate::config::LifecycleConfig;
use crate::error::{LifecycleError, LifecycleResult};
use crate::ports::inbound::{EventOutcome, TxLifecycleApi};
use shared_types::IncomingEvent;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Create the bounded event channel sized by `config.event_channel_capacity`.
pub fn event_channel(
    config: &LifecycleConfig,
) -> (mpsc::Sender<IncomingEvent>, mpsc::Receiver<IncomingEvent>) {
    mpsc::channel(config.event_channel_capacity.max(1))
}

/// Totals accumulated over a driver run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DriverSummary {
    pub events: usize,
    pub tracked: usize,
    pub settled: usize,
    pub resettled: usize,
    pub done: usize,
    pub reverted: usize,
    pub unpinned: usize,
}

impl DriverSummary {
    fn absorb(&mut self, outcome: &EventOutcome) {
        self.events += 1;
        self.tracked += usize::from(outcome.tracked);
        self.settled += outcome.settled;
        self.resettled += outcome.resettled;
        self.done += outcome.done;
        self.reverted += outcome.reverted;
        self.unpinned += outcome.unpinned;
    }
}

/// Single consumer of the event channel.
pub struct EventStreamDriver<E> {
    engine: E,
    receiver: mpsc::Receiver<IncomingEvent>,
}

impl<E: TxLifecycleApi> EventStreamDriver<E> {
    pub fn new(engine: E, receiver: mpsc::Receiver<IncomingEvent>) -> Self {
        Self { engine, receiver }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Wait for the next event and process it.
    ///
    /// # Errors
    /// - `EventStreamClosed` once every sender is dropped and the buffer is
    ///   drained
    /// - any error returned by the engine for this event
    pub async fn step(&mut self) -> LifecycleResult<EventOutcome> {
        let event = self
            .receiver
            .recv()
            .await
            .ok_or(LifecycleError::EventStreamClosed)?;
        let kind = event.kind();
        let outcome = self.engine.handle_event(event)?;
        debug!(event = kind, ?outcome, "[qc-18] Event processed");
        Ok(outcome)
    }

    /// Process events until the producers hang up.
    ///
    /// The first engine error stops the loop and is returned; events still
    /// buffered in the channel are left unconsumed.
    pub async fn run(&mut self) -> LifecycleResult<DriverSummary> {
        let mut summary = DriverSummary::default();
        loop {
            match self.step().await {
                Ok(outcome) => summary.absorb(&outcome),
                Err(LifecycleError::EventStreamClosed) => {
                    info!(
                        events = summary.events,
                        settled = summary.settled,
                        done = summary.done,
                        "[qc-18] Event stream closed, driver stopping"
                    );
                    return Ok(summary);
                }
                Err(e) => {
                    error!(
                        error = %e,
                        processed = summary.events,
                        "[qc-18] ❌ Event processing failed, driver stopping"
                    );
                    return Err(e);
                }
            }
        }
    }
}
