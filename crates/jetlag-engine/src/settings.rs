//! Tunables for the convergence loop.

use serde::{Deserialize, Serialize};

/// Limits applied while scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSettings {
    /// Maximum number of CBTmin entries from departure or shift start onward
    /// (whichever is later) before giving up.
    pub max_days: u32,
    /// Entries still emitted after the clock reaches the destination.
    pub stabilization_days: u32,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            max_days: 120,
            stabilization_days: 2,
        }
    }
}
