//! Ordered quote collection

use crate::category::{CategoryFilter, CategorySet};
use crate::quote::Quote;
use serde::{Deserialize, Serialize};

/// Ordered sequence of quotes
///
/// Order is insertion order. There is no identity beyond list position and
/// text content; duplicates are allowed at this level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteCollection(Vec<Quote>);

impl QuoteCollection {
    /// Create an empty collection
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a quote
    #[inline]
    pub fn push(&mut self, quote: Quote) {
        self.0.push(quote);
    }

    /// Append several quotes, returning how many were added
    pub fn extend(&mut self, quotes: impl IntoIterator<Item = Quote>) -> usize {
        let before = self.0.len();
        self.0.extend(quotes);
        self.0.len() - before
    }

    /// Number of quotes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the collection is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow as a slice
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Quote] {
        &self.0
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Quote> {
        self.0.iter()
    }

    /// Consume into the underlying vector
    #[inline]
    #[must_use]
    pub fn into_vec(self) -> Vec<Quote> {
        self.0
    }

    /// Derive the selectable category set
    #[must_use]
    pub fn categories(&self) -> CategorySet {
        CategorySet::from_labels(self.0.iter().map(|q| q.category.as_str()))
    }

    /// Quotes that pass `filter`, in collection order
    #[must_use]
    pub fn pool(&self, filter: &CategoryFilter) -> Vec<&Quote> {
        self.0.iter().filter(|q| filter.matches(&q.category)).collect()
    }

    /// Exact duplicate check (case-insensitive text and category)
    #[must_use]
    pub fn contains_duplicate(&self, text: &str, category: &str) -> bool {
        self.0.iter().any(|q| q.same_as(text, category))
    }
}

impl From<Vec<Quote>> for QuoteCollection {
    fn from(value: Vec<Quote>) -> Self {
        Self(value)
    }
}

impl From<QuoteCollection> for Vec<Quote> {
    fn from(value: QuoteCollection) -> Self {
        value.0
    }
}

impl FromIterator<Quote> for QuoteCollection {
    fn from_iter<I: IntoIterator<Item = Quote>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for QuoteCollection {
    type Item = Quote;
    type IntoIter = std::vec::IntoIter<Quote>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a QuoteCollection {
    type Item = &'a Quote;
    type IntoIter = std::slice::Iter<'a, Quote>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
