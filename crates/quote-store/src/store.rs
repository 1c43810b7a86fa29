//! Shared quote store handle
//!
//! Every mutation is written to the durable mirror before the in-memory
//! list is swapped, so a failed save leaves both sides unchanged.

use crate::durable::{DurableQuotes, QuotePersistence};
use crate::error::StoreError;
use parking_lot::RwLock;
use quote_model::{Quote, QuoteCollection};
use std::sync::Arc;

/// Duplicate handling for [`QuoteStore::add`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddPolicy {
    /// Reject an exact (case-insensitive) text + category duplicate
    #[default]
    RejectDuplicates,

    /// Append unconditionally
    AllowDuplicates,
}

/// Authoritative in-memory quote list plus its durable mirror
///
/// Cheap to clone; clones share the same list.
#[derive(Debug, Clone)]
pub struct QuoteStore {
    quotes: Arc<RwLock<QuoteCollection>>,
    persistence: Arc<dyn QuotePersistence>,
}

impl QuoteStore {
    /// Load from `persistence`
    #[must_use]
    pub fn open(persistence: Arc<dyn QuotePersistence>) -> Self {
        let quotes = persistence.load();
        tracing::debug!(count = quotes.len(), "quote store opened");
        Self {
            quotes: Arc::new(RwLock::new(quotes)),
            persistence,
        }
    }

    /// Fresh store over in-memory persistence (starts with the defaults)
    #[must_use]
    pub fn in_memory() -> Self {
        Self::open(Arc::new(DurableQuotes::in_memory()))
    }

    /// Copy of the current list
    #[must_use]
    pub fn snapshot(&self) -> QuoteCollection {
        self.quotes.read().clone()
    }

    /// Run `f` against the current list without cloning it
    pub fn with_quotes<R>(&self, f: impl FnOnce(&QuoteCollection) -> R) -> R {
        f(&self.quotes.read())
    }

    /// Number of quotes
    #[must_use]
    pub fn len(&self) -> usize {
        self.quotes.read().len()
    }

    /// Whether the list is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quotes.read().is_empty()
    }

    /// Persistence port
    #[inline]
    #[must_use]
    pub fn persistence(&self) -> &Arc<dyn QuotePersistence> {
        &self.persistence
    }

    /// Append one quote
    ///
    /// # Errors
    /// - [`StoreError::Duplicate`] under [`AddPolicy::RejectDuplicates`]
    /// - backend failure while saving
    pub fn add(&self, quote: Quote, policy: AddPolicy) -> Result<(), StoreError> {
        self.mutate(|quotes| {
            if policy == AddPolicy::RejectDuplicates
                && quotes.contains_duplicate(&quote.text, &quote.category)
            {
                return Err(StoreError::Duplicate {
                    text: quote.text,
                    category: quote.category,
                });
            }
            quotes.push(quote);
            Ok(())
        })
    }

    /// Append several quotes, returning how many were added
    ///
    /// # Errors
    /// Backend failure while saving.
    pub fn extend(&self, quotes: Vec<Quote>) -> Result<usize, StoreError> {
        self.mutate(|current| Ok(current.extend(quotes)))
    }

    /// Replace the whole list
    ///
    /// # Errors
    /// Backend failure while saving.
    pub fn replace(&self, quotes: Vec<Quote>) -> Result<(), StoreError> {
        self.mutate(|current| {
            *current = QuoteCollection::from(quotes);
            Ok(())
        })
    }

    /// Write the current list to the durable mirror
    ///
    /// # Errors
    /// Backend failure.
    pub fn save(&self) -> Result<(), StoreError> {
        self.persistence.save(&self.quotes.read())
    }

    fn mutate<R>(
        &self,
        f: impl FnOnce(&mut QuoteCollection) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let mut guard = self.quotes.write();
        let mut next = guard.clone();
        let result = f(&mut next)?;
        self.persistence.save(&next)?;
        *guard = next;
        Ok(result)
    }
}
