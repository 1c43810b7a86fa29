//! Error types for quote storage

use std::path::PathBuf;

/// Storage error
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem failure
    #[error("failed to {action} '{}': {source}", .path.display())]
    Io {
        /// What was being attempted
        action: &'static str,
        /// File or directory involved
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Value could not be encoded
    #[error("failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),

    /// Key contains characters that cannot be stored
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    /// Exact duplicate rejected on add
    #[error("that exact quote already exists in category '{category}'")]
    Duplicate {
        /// Rejected quote text
        text: String,
        /// Rejected quote category
        category: String,
    },
}

impl StoreError {
    /// Build an I/O error
    #[inline]
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Check if the error is caused by user input rather than the backend
    #[inline]
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}
