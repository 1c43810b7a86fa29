//! Sync state machine

use crate::error::StateMachineError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Observable sync state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    /// Nothing running
    Idle,
    /// Fetching and diffing
    Syncing,
    /// Suspended until a resolution arrives
    AwaitingResolution,
    /// Last sync completed
    Synced,
}

impl SyncState {
    /// Every state
    pub const ALL: [SyncState; 4] = [
        SyncState::Idle,
        SyncState::Syncing,
        SyncState::AwaitingResolution,
        SyncState::Synced,
    ];

    /// Lowercase name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Syncing => "syncing",
            Self::AwaitingResolution => "awaiting_resolution",
            Self::Synced => "synced",
        }
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validates a state transition.
///
/// # Errors
/// [`StateMachineError::IllegalTransition`] when `to` is not reachable from `from`.
pub fn validate_transition(from: SyncState, to: SyncState) -> Result<(), StateMachineError> {
    if allowed(from, to) {
        Ok(())
    } else {
        Err(StateMachineError::IllegalTransition { from, to })
    }
}

/// States reachable from `from` in one step
#[must_use]
pub fn allowed_transitions(from: SyncState) -> Vec<SyncState> {
    use SyncState::{AwaitingResolution, Idle, Synced, Syncing};
    match from {
        Idle => vec![Syncing],
        Syncing => vec![AwaitingResolution, Synced, Idle],
        AwaitingResolution => vec![Synced, Idle],
        Synced => vec![Syncing, Idle],
    }
}

fn allowed(from: SyncState, to: SyncState) -> bool {
    allowed_transitions(from).into_iter().any(|s| s == to)
}
