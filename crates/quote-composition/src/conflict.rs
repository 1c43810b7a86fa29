//! Text-keyed diff between local and remote quote lists
//!
//! Quotes are matched by exact text equality. Categories are the only field
//! compared once a match is found.

use quote_model::Quote;
use std::collections::{HashMap, HashSet};

/// Same text on both sides with a different category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryConflict {
    /// Position of the conflicting entry in the local list
    pub local_index: usize,

    /// Local entry as it was when the diff ran
    pub local: Quote,

    /// First remote entry with the same text
    pub server: Quote,
}

impl CategoryConflict {
    /// Shared quote text
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.local.text
    }
}

/// Result of diffing a local list against a remote snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictSet {
    /// Text match, category mismatch
    pub conflicts: Vec<CategoryConflict>,

    /// Local entries whose text is absent remotely
    pub new_local: Vec<Quote>,

    /// Remote entries whose text is absent locally
    pub new_server: Vec<Quote>,
}

impl ConflictSet {
    /// Whether the user has to pick a resolution before syncing
    ///
    /// Local-only entries never block: they are simply pushed.
    #[inline]
    #[must_use]
    pub fn requires_resolution(&self) -> bool {
        !self.conflicts.is_empty() || !self.new_server.is_empty()
    }

    /// Whether the two sides agree completely
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty() && self.new_local.is_empty() && self.new_server.is_empty()
    }

    /// Total number of differences
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.conflicts.len() + self.new_local.len() + self.new_server.len()
    }
}

/// Diff `local` against `remote`
///
/// # Classification
/// - same text, different category → [`ConflictSet::conflicts`]
/// - local text absent from remote → [`ConflictSet::new_local`]
/// - remote text absent from local → [`ConflictSet::new_server`]
///
/// When the remote list repeats a text, the first occurrence is the one
/// compared against. Every local entry is classified on its own, so repeated
/// local texts yield repeated entries.
#[must_use]
pub fn detect_conflicts(local: &[Quote], remote: &[Quote]) -> ConflictSet {
    let mut remote_by_text: HashMap<&str, &Quote> = HashMap::with_capacity(remote.len());
    for quote in remote {
        remote_by_text.entry(quote.text.as_str()).or_insert(quote);
    }
    let local_texts: HashSet<&str> = local.iter().map(|q| q.text.as_str()).collect();

    let mut set = ConflictSet::default();

    for (local_index, quote) in local.iter().enumerate() {
        match remote_by_text.get(quote.text.as_str()) {
            Some(server) if server.category != quote.category => {
                set.conflicts.push(CategoryConflict {
                    local_index,
                    local: quote.clone(),
                    server: (*server).clone(),
                });
            }
            Some(_) => {}
            None => set.new_local.push(quote.clone()),
        }
    }

    set.new_server = remote
        .iter()
        .filter(|q| !local_texts.contains(q.text.as_str()))
        .cloned()
        .collect();

    tracing::debug!(
        conflicts = set.conflicts.len(),
        new_local = set.new_local.len(),
        new_server = set.new_server.len(),
        "diffed local against remote"
    );

    set
}
