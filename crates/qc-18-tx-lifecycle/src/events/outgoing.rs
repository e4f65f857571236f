//! Outgoing notifications for the Transaction Lifecycle subsystem

use serde::{Deserialize, Serialize};
use shared_types::{SettledState, TxId};

/// A lifecycle callback, as emitted to a `LifecycleObserver`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum LifecycleNotification {
    /// First observed inclusion of a transaction.
    Settled { tx: TxId, state: SettledState },
    /// Inclusion confirmed irreversible by finality.
    Done { tx: TxId, state: SettledState },
}

impl LifecycleNotification {
    pub fn tx(&self) -> &TxId {
        match self {
            Self::Settled { tx, .. } | Self::Done { tx, .. } => tx,
        }
    }

    pub fn state(&self) -> &SettledState {
        match self {
            Self::Settled { state, .. } | Self::Done { state, .. } => state,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done { .. })
    }
}
