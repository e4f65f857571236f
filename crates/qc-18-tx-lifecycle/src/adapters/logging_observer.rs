//! Logging observer decorator
//!
//! Logs every lifecycle callback before forwarding it to the wrapped observer.

use crate::ports::outbound::LifecycleObserver;
use shared_types::{SettledState, SettlementOutcome, TxId};
use tracing::info;

/// Wraps a `LifecycleObserver` and logs each callback it receives.
pub struct LoggingObserver<O> {
    inner: O,
}

impl<O: LifecycleObserver> LoggingObserver<O> {
    pub fn new(inner: O) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }

    pub fn into_inner(self) -> O {
        self.inner
    }
}

fn outcome_label(outcome: &SettlementOutcome) -> &'static str {
    match outcome {
        SettlementOutcome::Valid { successful: true } => "valid/successful",
        SettlementOutcome::Valid { successful: false } => "valid/failed",
        SettlementOutcome::Invalid => "invalid",
    }
}

impl<O: LifecycleObserver> LifecycleObserver for LoggingObserver<O> {
    fn on_tx_settled(&self, tx: &TxId, state: &SettledState) {
        info!(
            tx = %tx,
            block_hash = %state.block_hash,
            outcome = outcome_label(&state.outcome),
            "[qc-18] 📥 Transaction settled"
        );
        self.inner.on_tx_settled(tx, state);
    }

    fn on_tx_done(&self, tx: &TxId, state: &SettledState) {
        info!(
            tx = %tx,
            block_hash = %state.block_hash,
            outcome = outcome_label(&state.outcome),
            "[qc-18] ✅ Transaction done"
        );
        self.inner.on_tx_done(tx, state);
    }
}
