//! Merge strategy
//!
//! Keeps the local list, takes the remote category for every conflicting
//! entry, then appends remote-only entries.

use crate::conflict::ConflictSet;
use crate::strategy::{
    check_conflicts_fresh, Resolution, ResolutionError, ResolutionStrategy, Resolved,
};
use quote_model::Quote;
use std::collections::HashSet;

/// Local list plus remote additions; remote categories win conflicts
///
/// # Characteristics
/// - Never drops a local entry
/// - Each remote-only text is appended at most once
/// - No per-field choice and no audit trail
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeStrategy;

impl MergeStrategy {
    /// Create new merge strategy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ResolutionStrategy for MergeStrategy {
    fn resolve(
        &self,
        local: &[Quote],
        _remote: &[Quote],
        conflicts: &ConflictSet,
    ) -> Result<Resolved, ResolutionError> {
        check_conflicts_fresh(local, conflicts)?;

        let mut merged = local.to_vec();
        let mut categories_overwritten = 0;
        for conflict in &conflicts.conflicts {
            let entry = &mut merged[conflict.local_index];
            if entry.category != conflict.server.category {
                entry.category.clone_from(&conflict.server.category);
                categories_overwritten += 1;
            }
        }

        let mut seen: HashSet<String> = merged.iter().map(|q| q.text.clone()).collect();
        let mut appended = 0;
        for quote in &conflicts.new_server {
            if seen.insert(quote.text.clone()) {
                merged.push(quote.clone());
                appended += 1;
            }
        }

        tracing::debug!(categories_overwritten, appended, "merged remote into local");

        Ok(Resolved {
            quotes: merged,
            categories_overwritten,
            appended,
        })
    }

    fn resolution(&self) -> Resolution {
        Resolution::Merge
    }

    fn name(&self) -> &'static str {
        "Merge"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::{detect_conflicts, CategoryConflict};
    use pretty_assertions::assert_eq;

    #[test]
    fn overwrites_conflicting_category() {
        let local = vec![Quote::new("A", "X")];
        let remote = vec![Quote::new("A", "Y")];
        let conflicts = detect_conflicts(&local, &remote);

        let resolved = MergeStrategy::new().resolve(&local, &remote, &conflicts).unwrap();

        assert_eq!(resolved.quotes, vec![Quote::new("A", "Y")]);
        assert_eq!(resolved.categories_overwritten, 1);
        assert_eq!(resolved.appended, 0);
    }

    #[test]
    fn appends_remote_only_entries_once() {
        let local = vec![Quote::new("A", "X")];
        let remote = vec![
            Quote::new("A", "Y"),
            Quote::new("R", "Z").with_id("9"),
            Quote::new("R", "Z").with_id("10"),
        ];
        let conflicts = detect_conflicts(&local, &remote);
        assert_eq!(conflicts.new_server.len(), 2);

        let resolved = MergeStrategy::new().resolve(&local, &remote, &conflicts).unwrap();

        assert_eq!(
            resolved.quotes,
            vec![Quote::new("A", "Y"), Quote::new("R", "Z").with_id("9")]
        );
        assert_eq!(resolved.appended, 1);
    }

    #[test]
    fn keeps_local_only_entries() {
        let local = vec![Quote::new("L", "X")];
        let remote = vec![Quote::new("R", "Y")];
        let conflicts = detect_conflicts(&local, &remote);

        let resolved = MergeStrategy::new().resolve(&local, &remote, &conflicts).unwrap();

        assert_eq!(resolved.quotes, vec![Quote::new("L", "X"), Quote::new("R", "Y")]);
    }

    #[test]
    fn repeated_local_texts_are_all_updated() {
        let local = vec![Quote::new("A", "X"), Quote::new("A", "W")];
        let remote = vec![Quote::new("A", "Y")];
        let conflicts = detect_conflicts(&local, &remote);

        let resolved = MergeStrategy::new().resolve(&local, &remote, &conflicts).unwrap();

        assert_eq!(resolved.quotes, vec![Quote::new("A", "Y"), Quote::new("A", "Y")]);
        assert_eq!(resolved.categories_overwritten, 2);
    }

    #[test]
    fn stale_conflicts_are_rejected() {
        let local = vec![Quote::new("B", "X")];
        let conflicts = ConflictSet {
            conflicts: vec![CategoryConflict {
                local_index: 0,
                local: Quote::new("A", "X"),
                server: Quote::new("A", "Y"),
            }],
            ..ConflictSet::default()
        };

        let err = MergeStrategy::new().resolve(&local, &[], &conflicts).unwrap_err();

        assert!(matches!(err, ResolutionError::StaleConflict { index: 0, .. }));
    }
}
