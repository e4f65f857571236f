//! # Lifecycle Configuration
//!
//! Configuration for the settlement engine and its event-stream driver.

use serde::{Deserialize, Serialize};
use std::env;

/// Default bounded capacity of the event-stream channel.
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Settlement engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Issue unpin directives for pruned and superseded blocks on finality.
    pub unpin_pruned: bool,

    /// Unpin a new block immediately when its parent was already unpinned.
    ///
    /// Such a block extends an abandoned fork and is never evaluated for
    /// inclusion.
    pub unpin_abandoned_on_arrival: bool,

    /// Bounded capacity of the event-stream channel.
    pub event_channel_capacity: usize,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            unpin_pruned: true,
            unpin_abandoned_on_arrival: true,
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
        }
    }
}

impl LifecycleConfig {
    /// Create a config for testing (small channel).
    pub fn for_testing() -> Self {
        Self {
            event_channel_capacity: 16,
            ..Self::default()
        }
    }

    /// Create configuration from environment variables.
    ///
    /// - `QC_TX_UNPIN_PRUNED` (default: true)
    /// - `QC_TX_UNPIN_ABANDONED` (default: true)
    /// - `QC_TX_EVENT_CHANNEL_CAPACITY` (default: 1024)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from any key lookup, falling back to defaults
    /// for missing or unparseable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let flag = |name: &str| lookup(name).map(|v| v.to_lowercase() != "false" && v != "0");
        Self {
            unpin_pruned: flag("QC_TX_UNPIN_PRUNED").unwrap_or(defaults.unpin_pruned),
            unpin_abandoned_on_arrival: flag("QC_TX_UNPIN_ABANDONED")
                .unwrap_or(defaults.unpin_abandoned_on_arrival),
            event_channel_capacity: lookup("QC_TX_EVENT_CHANNEL_CAPACITY")
                .and_then(|v| v.trim().parse().ok())
                .filter(|capacity| *capacity > 0)
                .unwrap_or(defaults.event_channel_capacity),
        }
    }
}
