//! Application facade
//!
//! Wires the quote store, session slot, selected filter and random source
//! together and exposes the operations the CLI drives.

use crate::config::QuoteConfig;
use crate::error::AppError;
use crate::render::{pick_random, render, DisplayInstruction};
use chrono::Utc;
use quote_model::{
    decode_import, encode_export, normalize_category, CategoryFilter, CategorySet, Quote,
};
use quote_store::{AddPolicy, DurableQuotes, FileStore, QuoteStore, SessionSnapshot, SessionStore};
use quote_sync::{RemoteQuoteSource, SyncEngine};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use std::sync::Arc;

/// Default export file name
pub const DEFAULT_EXPORT_FILE: &str = "quotes.json";

/// Outcome of an import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Quotes appended
    pub accepted: usize,
    /// Entries discarded as invalid
    pub rejected: usize,
}

/// The quote generator
#[derive(Debug)]
pub struct QuoteApp {
    config: QuoteConfig,
    store: QuoteStore,
    session: SessionStore,
    filter: CategoryFilter,
    rng: StdRng,
}

impl QuoteApp {
    /// Open file-backed storage described by `config`
    ///
    /// The last selected filter is restored and a session is started unless
    /// one is already open.
    #[must_use]
    pub fn open(config: QuoteConfig) -> Self {
        let durable = DurableQuotes::new(FileStore::new(&config.storage.data_dir))
            .with_quotes_key(config.storage.quotes_key.clone())
            .with_filter_key(config.storage.filter_key.clone());
        let store = QuoteStore::open(Arc::new(durable));
        let session = SessionStore::new(Arc::new(FileStore::new(config.session_dir())))
            .with_key(config.session.key.clone());
        if let Err(e) = session.begin(store.len(), Utc::now()) {
            tracing::warn!(error = %e, "failed to start session");
        }

        tracing::debug!(
            data_dir = %config.storage.data_dir.display(),
            quotes = store.len(),
            "quote app opened"
        );
        Self::with_parts(config, store, session, StdRng::from_os_rng())
    }

    /// Assemble from existing parts
    #[must_use]
    pub fn with_parts(config: QuoteConfig, store: QuoteStore, session: SessionStore, rng: StdRng) -> Self {
        let filter = store.persistence().load_filter();
        Self {
            config,
            store,
            session,
            filter,
            rng,
        }
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &QuoteConfig {
        &self.config
    }

    /// Shared quote store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &QuoteStore {
        &self.store
    }

    /// Selected filter
    #[inline]
    #[must_use]
    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    /// Pick a random quote under the selected filter and record the view
    pub fn show_random(&mut self) -> DisplayInstruction {
        let filter = &self.filter;
        let rng = &mut self.rng;
        let pick = self
            .store
            .with_quotes(|quotes| pick_random(&quotes.pool(filter), rng).cloned());

        if let Some(quote) = &pick {
            if let Err(e) = self.session.record_view(quote, self.store.len(), Utc::now()) {
                tracing::warn!(error = %e, "failed to record last viewed quote");
            }
        }
        render(pick.as_ref(), &self.filter)
    }

    /// Add a quote using the configured duplicate policy
    ///
    /// # Errors
    /// See [`QuoteApp::add_quote_with`].
    pub fn add_quote(&mut self, text: &str, category: &str) -> Result<Quote, AppError> {
        let policy = if self.config.add.reject_duplicates {
            AddPolicy::RejectDuplicates
        } else {
            AddPolicy::AllowDuplicates
        };
        self.add_quote_with(text, category, policy)
    }

    /// Add a quote and select its category
    ///
    /// # Errors
    /// - [`AppError::MissingField`] if text or category is blank
    /// - [`AppError::Store`] on a rejected duplicate or storage failure
    pub fn add_quote_with(&mut self, text: &str, category: &str, policy: AddPolicy) -> Result<Quote, AppError> {
        let text = text.trim();
        let category = category.trim();
        if text.is_empty() {
            return Err(AppError::MissingField("text"));
        }
        if category.is_empty() {
            return Err(AppError::MissingField("category"));
        }

        let category = if self.config.add.title_case_categories {
            normalize_category(category)
        } else {
            category.to_string()
        };
        let quote = Quote::new(text, category);
        self.store.add(quote.clone(), policy)?;
        tracing::info!(category = %quote.category, "quote added");

        self.select_filter(CategoryFilter::category(quote.category.clone()))?;
        Ok(quote)
    }

    /// Categories derived from the current list
    #[must_use]
    pub fn categories(&self) -> CategorySet {
        self.store.with_quotes(quote_model::QuoteCollection::categories)
    }

    /// Select and persist a filter
    ///
    /// # Errors
    /// Storage failure.
    pub fn select_filter(&mut self, filter: CategoryFilter) -> Result<(), AppError> {
        self.store.persistence().save_filter(&filter)?;
        tracing::debug!(filter = %filter, "filter selected");
        self.filter = filter;
        Ok(())
    }

    /// Write the full list as pretty JSON, returning how many were written
    ///
    /// # Errors
    /// Encoding or file failure.
    pub fn export_to(&self, path: &Path) -> Result<usize, AppError> {
        let quotes = self.store.snapshot();
        let json = encode_export(&quotes)?;
        std::fs::write(path, json).map_err(|e| AppError::file("write", path, e))?;
        tracing::info!(path = %path.display(), count = quotes.len(), "quotes exported");
        Ok(quotes.len())
    }

    /// Append the valid entries of a JSON file
    ///
    /// Nothing is appended when the file is unreadable, not an array, or has
    /// no valid entries.
    ///
    /// # Errors
    /// File, import validation or storage failure.
    pub fn import_from(&mut self, path: &Path) -> Result<ImportSummary, AppError> {
        let payload = std::fs::read_to_string(path).map_err(|e| AppError::file("read", path, e))?;
        let batch = decode_import(&payload)?;
        let rejected = batch.rejected.len();
        let accepted = self.store.extend(batch.accepted)?;

        if rejected > 0 {
            tracing::warn!(rejected, "discarded invalid entries during import");
        }
        tracing::info!(path = %path.display(), accepted, "quotes imported");
        Ok(ImportSummary { accepted, rejected })
    }

    /// Current session snapshot
    #[must_use]
    pub fn session(&self) -> Option<SessionSnapshot> {
        self.session.snapshot()
    }

    /// End the session, clearing its slot
    ///
    /// # Errors
    /// Storage failure.
    pub fn end_session(&self) -> Result<(), AppError> {
        self.session.end()?;
        tracing::info!("session ended");
        Ok(())
    }

    /// Sync engine against the configured HTTP remote
    #[must_use]
    pub fn sync_engine(&self) -> SyncEngine {
        self.sync_engine_with(Arc::new(self.config.http_remote()))
    }

    /// Sync engine against `remote`
    #[must_use]
    pub fn sync_engine_with(&self, remote: Arc<dyn RemoteQuoteSource>) -> SyncEngine {
        SyncEngine::new(self.store.clone(), remote)
    }
}
