//! Session-scoped snapshot
//!
//! Holds the last viewed quote plus session metadata in a slot that is
//! cleared when the session ends.

use crate::error::StoreError;
use crate::kv::KeyValueStore;
use chrono::{DateTime, Utc};
use quote_model::Quote;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Key holding the session snapshot
pub const DEFAULT_SESSION_KEY: &str = "session";

/// Last-viewed quote and session metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Quote shown most recently
    pub last_viewed: Option<Quote>,

    /// When the session started
    pub session_started_at: DateTime<Utc>,

    /// Collection size at the last view
    pub quote_count: usize,
}

/// Session slot over a [`KeyValueStore`]
#[derive(Debug, Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl SessionStore {
    /// Use the default key
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            key: DEFAULT_SESSION_KEY.to_string(),
        }
    }

    /// Override the key
    #[inline]
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Current snapshot; unreadable data counts as no session
    #[must_use]
    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        let raw = match self.store.get(&self.key) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read session snapshot");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!(error = %e, "session snapshot is malformed, starting fresh");
                None
            }
        }
    }

    /// Start a session if none exists, returning its snapshot
    ///
    /// # Errors
    /// Backend or encoding failure.
    pub fn begin(&self, quote_count: usize, now: DateTime<Utc>) -> Result<SessionSnapshot, StoreError> {
        if let Some(existing) = self.snapshot() {
            return Ok(existing);
        }
        let snapshot = SessionSnapshot {
            last_viewed: None,
            session_started_at: now,
            quote_count,
        };
        self.write(&snapshot)?;
        Ok(snapshot)
    }

    /// Record a viewed quote, keeping the original session start
    ///
    /// # Errors
    /// Backend or encoding failure.
    pub fn record_view(
        &self,
        quote: &Quote,
        quote_count: usize,
        now: DateTime<Utc>,
    ) -> Result<SessionSnapshot, StoreError> {
        let session_started_at = self
            .snapshot()
            .map_or(now, |existing| existing.session_started_at);
        let snapshot = SessionSnapshot {
            last_viewed: Some(quote.clone()),
            session_started_at,
            quote_count,
        };
        self.write(&snapshot)?;
        Ok(snapshot)
    }

    /// End the session and clear the slot
    ///
    /// # Errors
    /// Backend failure.
    pub fn end(&self) -> Result<(), StoreError> {
        self.store.remove(&self.key)
    }

    fn write(&self, snapshot: &SessionSnapshot) -> Result<(), StoreError> {
        let json = serde_json::to_string(snapshot)?;
        self.store.set(&self.key, &json)
    }
}
