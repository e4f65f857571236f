//! Recording observer
//!
//! Collects every callback as a `LifecycleNotification`, in emission order.

use crate::events::LifecycleNotification;
use crate::ports::outbound::LifecycleObserver;
use parking_lot::Mutex;
use shared_types::{SettledState, TxId};

/// In-memory `LifecycleObserver` for tests and benches.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    notifications: Mutex<Vec<LifecycleNotification>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// All callbacks received so far.
    pub fn notifications(&self) -> Vec<LifecycleNotification> {
        self.notifications.lock().clone()
    }

    /// Settlement callbacks as `(tx, state)` pairs.
    pub fn settled(&self) -> Vec<(TxId, SettledState)> {
        self.filtered(false)
    }

    /// Completion callbacks as `(tx, state)` pairs.
    pub fn done(&self) -> Vec<(TxId, SettledState)> {
        self.filtered(true)
    }

    pub fn settled_ids(&self) -> Vec<String> {
        self.settled().into_iter().map(|(tx, _)| tx.0).collect()
    }

    pub fn done_ids(&self) -> Vec<String> {
        self.done().into_iter().map(|(tx, _)| tx.0).collect()
    }

    pub fn len(&self) -> usize {
        self.notifications.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.lock().is_empty()
    }

    /// Drain the recorded notifications.
    pub fn take(&self) -> Vec<LifecycleNotification> {
        std::mem::take(&mut *self.notifications.lock())
    }

    fn filtered(&self, done: bool) -> Vec<(TxId, SettledState)> {
        self.notifications
            .lock()
            .iter()
            .filter(|n| n.is_done() == done)
            .map(|n| (n.tx().clone(), n.state().clone()))
            .collect()
    }
}

impl LifecycleObserver for RecordingObserver {
    fn on_tx_settled(&self, tx: &TxId, state: &SettledState) {
        self.notifications.lock().push(LifecycleNotification::Settled {
            tx: tx.clone(),
            state: state.clone(),
        });
    }

    fn on_tx_done(&self, tx: &TxId, state: &SettledState) {
        self.notifications.lock().push(LifecycleNotification::Done {
            tx: tx.clone(),
            state: state.clone(),
        });
    }
}
