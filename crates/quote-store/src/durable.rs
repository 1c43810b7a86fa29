//! Durable mirror of the quote list and the selected filter

use crate::error::StoreError;
use crate::kv::{KeyValueStore, MemoryStore};
use quote_model::{default_quotes, CategoryFilter, Quote, QuoteCollection};
use std::fmt::Debug;

/// Key holding the JSON quote array
pub const DEFAULT_QUOTES_KEY: &str = "quotes";

/// Key holding the last selected category filter
pub const DEFAULT_FILTER_KEY: &str = "last_filter";

/// Load/save port for the quote list
///
/// Loading never fails: missing or unreadable data degrades to the built-in
/// default list.
pub trait QuotePersistence: Send + Sync + Debug {
    /// Read the quote list, falling back to defaults
    fn load(&self) -> QuoteCollection;

    /// Overwrite the durable quote list
    ///
    /// # Errors
    /// Backend failure.
    fn save(&self, quotes: &QuoteCollection) -> Result<(), StoreError>;

    /// Read the last selected filter, falling back to `All`
    fn load_filter(&self) -> CategoryFilter;

    /// Persist the selected filter
    ///
    /// # Errors
    /// Backend failure.
    fn save_filter(&self, filter: &CategoryFilter) -> Result<(), StoreError>;
}

/// [`QuotePersistence`] over any [`KeyValueStore`]
#[derive(Debug)]
pub struct DurableQuotes<S: KeyValueStore> {
    store: S,
    quotes_key: String,
    filter_key: String,
}

impl<S: KeyValueStore> DurableQuotes<S> {
    /// Use the default keys
    #[inline]
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            quotes_key: DEFAULT_QUOTES_KEY.to_string(),
            filter_key: DEFAULT_FILTER_KEY.to_string(),
        }
    }

    /// Override the quote list key
    #[inline]
    #[must_use]
    pub fn with_quotes_key(mut self, key: impl Into<String>) -> Self {
        self.quotes_key = key.into();
        self
    }

    /// Override the filter key
    #[inline]
    #[must_use]
    pub fn with_filter_key(mut self, key: impl Into<String>) -> Self {
        self.filter_key = key.into();
        self
    }

    /// Underlying store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl DurableQuotes<MemoryStore> {
    /// Fresh in-memory persistence
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }
}

impl<S: KeyValueStore> QuotePersistence for DurableQuotes<S> {
    fn load(&self) -> QuoteCollection {
        let raw = match self.store.get(&self.quotes_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key = %self.quotes_key, "no stored quotes, using defaults");
                return QuoteCollection::from(default_quotes());
            }
            Err(e) => {
                tracing::warn!(key = %self.quotes_key, error = %e, "failed to read stored quotes, using defaults");
                return QuoteCollection::from(default_quotes());
            }
        };

        match serde_json::from_str::<Vec<Quote>>(&raw) {
            Ok(quotes) => QuoteCollection::from(quotes),
            Err(e) => {
                tracing::warn!(key = %self.quotes_key, error = %e, "stored quotes are malformed, using defaults");
                QuoteCollection::from(default_quotes())
            }
        }
    }

    fn save(&self, quotes: &QuoteCollection) -> Result<(), StoreError> {
        let json = serde_json::to_string(quotes)?;
        self.store.set(&self.quotes_key, &json)
    }

    fn load_filter(&self) -> CategoryFilter {
        match self.store.get(&self.filter_key) {
            Ok(Some(label)) => CategoryFilter::category(label),
            Ok(None) => CategoryFilter::All,
            Err(e) => {
                tracing::warn!(key = %self.filter_key, error = %e, "failed to read stored filter");
                CategoryFilter::All
            }
        }
    }

    fn save_filter(&self, filter: &CategoryFilter) -> Result<(), StoreError> {
        self.store.set(&self.filter_key, filter.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::FileStore;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_data_loads_defaults() {
        let durable = DurableQuotes::in_memory();
        assert_eq!(durable.load().into_vec(), default_quotes());
    }

    #[test]
    fn malformed_data_loads_defaults() {
        let durable = DurableQuotes::in_memory();
        durable.store().set(DEFAULT_QUOTES_KEY, "{not json").unwrap();
        assert_eq!(durable.load().into_vec(), default_quotes());
    }

    #[test]
    fn non_array_data_loads_defaults() {
        let durable = DurableQuotes::in_memory();
        durable
            .store()
            .set(DEFAULT_QUOTES_KEY, r#"{"text":"a","category":"b"}"#)
            .unwrap();
        assert_eq!(durable.load().into_vec(), default_quotes());
    }

    #[test]
    fn save_then_load() {
        let durable = DurableQuotes::in_memory();
        let quotes = QuoteCollection::from(vec![Quote::new("a", "b")]);
        durable.save(&quotes).unwrap();
        assert_eq!(durable.load(), quotes);
    }

    #[test]
    fn empty_saved_list_stays_empty() {
        let durable = DurableQuotes::in_memory();
        durable.save(&QuoteCollection::new()).unwrap();
        assert!(durable.load().is_empty());
    }

    #[test]
    fn filter_round_trip() {
        let durable = DurableQuotes::in_memory();
        assert_eq!(durable.load_filter(), CategoryFilter::All);

        durable.save_filter(&CategoryFilter::category("Tech")).unwrap();
        assert_eq!(durable.load_filter(), CategoryFilter::category("Tech"));

        durable.save_filter(&CategoryFilter::All).unwrap();
        assert_eq!(durable.load_filter(), CategoryFilter::All);
    }

    #[test]
    fn custom_keys_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let durable = DurableQuotes::new(FileStore::new(dir.path()))
            .with_quotes_key("dqg_quotes_v1")
            .with_filter_key("dqg_filter");

        durable.save(&QuoteCollection::from(vec![Quote::new("a", "b")])).unwrap();
        durable.save_filter(&CategoryFilter::category("b")).unwrap();

        assert!(dir.path().join("dqg_quotes_v1.json").exists());
        assert!(dir.path().join("dqg_filter.json").exists());
    }
}
