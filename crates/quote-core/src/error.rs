//! Error types for the quote application
//!
//! Every failure the user can cause is reported through [`AppError`] with a
//! message fit for display; nothing here is fatal to the process.

use quote_model::ImportError;
use quote_store::StoreError;
use quote_sync::SyncError;
use std::path::PathBuf;

/// Application error
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Required input left blank
    #[error("please enter a quote {0}")]
    MissingField(&'static str),

    /// Storage failure or rejected duplicate
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Import payload rejected
    #[error("import failed: {0}")]
    Import(#[from] ImportError),

    /// Reading or writing a user file failed
    #[error("failed to {action} '{}': {source}", .path.display())]
    File {
        /// What was being attempted
        action: &'static str,
        /// File involved
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Export encoding failed
    #[error("failed to encode quotes: {0}")]
    Encode(#[from] serde_json::Error),

    /// Configuration file could not be parsed
    #[error("invalid configuration in '{}': {source}", .path.display())]
    Config {
        /// Configuration file
        path: PathBuf,
        /// Parse error
        #[source]
        source: toml::de::Error,
    },

    /// Sync failure
    #[error(transparent)]
    Sync(#[from] SyncError),
}

impl AppError {
    /// Build a file error
    #[inline]
    pub(crate) fn file(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            action,
            path: path.into(),
            source,
        }
    }

    /// Check if the error was caused by user input
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        match self {
            Self::MissingField(_) | Self::Import(_) | Self::Config { .. } => true,
            Self::Store(e) => e.is_user_error(),
            Self::Sync(e) => e.is_busy(),
            Self::File { .. } | Self::Encode(_) => false,
        }
    }

    /// Process exit code for the CLI
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        if self.is_user_error() {
            2
        } else {
            1
        }
    }
}
