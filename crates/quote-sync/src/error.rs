//! Error types for quote synchronization

use crate::state_machine::SyncState;
use quote_composition::ResolutionError;
use quote_store::StoreError;

/// Sync engine error
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Another sync or resolution is running
    #[error("a sync is already in progress")]
    InProgress,

    /// A previous sync is waiting for a resolution
    #[error("a sync is waiting for conflict resolution")]
    ResolutionPending,

    /// `resolve`/`abandon` called with nothing pending
    #[error("no conflicts are waiting for resolution")]
    NothingToResolve,

    /// Illegal state change
    #[error("state machine error: {0}")]
    StateMachine(#[from] StateMachineError),

    /// Strategy failed
    #[error("resolution failed: {0}")]
    Resolution(#[from] ResolutionError),

    /// Persisting the result failed
    #[error("storage failed: {0}")]
    Store(#[from] StoreError),

    /// Remote could not be reached
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),
}

impl SyncError {
    /// Check if the caller hit a concurrency guard rather than a failure
    #[inline]
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::InProgress | Self::ResolutionPending)
    }
}

/// Remote source error
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// Transport-level failure
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response
    #[error("{url} returned status {status}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// Remote is not reachable at all (scripted or offline)
    #[error("remote unavailable: {0}")]
    Unavailable(String),
}

impl RemoteError {
    /// Check if a later attempt could succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Unavailable(_) => true,
        }
    }
}

/// State machine error
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StateMachineError {
    /// Transition not in the allowed table
    #[error("illegal transition {from} -> {to}")]
    IllegalTransition {
        /// Current state
        from: SyncState,
        /// Requested state
        to: SyncState,
    },
}
