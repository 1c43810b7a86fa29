//! Property tests for diffing and resolution.
//!
//! These exercise the invariants the sync flow relies on:
//! - Disjoint lists classify every entry as local-only or server-only.
//! - Merge never loses a local entry and adds each remote-only text once.
//! - Keep-local and keep-server are pure selections of one side.

use proptest::prelude::*;
use quote_composition::{detect_conflicts, Resolution, StrategyRegistry};
use quote_model::Quote;
use std::collections::HashSet;

fn quotes_with_prefix(prefix: &'static str, max: usize) -> impl Strategy<Value = Vec<Quote>> {
    proptest::collection::vec(("[a-z]{1,6}", "[A-Z][a-z]{0,4}"), 0..max).prop_map(
        move |pairs| {
            pairs
                .into_iter()
                .map(|(text, category)| Quote::new(format!("{prefix}{text}"), category))
                .collect()
        },
    )
}

fn distinct_texts(quotes: Vec<Quote>) -> Vec<Quote> {
    let mut seen = HashSet::new();
    quotes
        .into_iter()
        .filter(|q| seen.insert(q.text.clone()))
        .collect()
}

proptest! {
    /// Disjoint text sets of size n and m yield no conflicts, n local-only
    /// and m server-only entries.
    #[test]
    fn disjoint_lists_split_cleanly(
        local in quotes_with_prefix("local-", 12),
        remote in quotes_with_prefix("remote-", 12),
    ) {
        let set = detect_conflicts(&local, &remote);

        prop_assert!(set.conflicts.is_empty());
        prop_assert_eq!(set.new_local.len(), local.len());
        prop_assert_eq!(set.new_server.len(), remote.len());
    }

    /// Merge keeps every local text, in order, at the front of the result.
    #[test]
    fn merge_preserves_local_prefix(
        local in quotes_with_prefix("", 10),
        remote in quotes_with_prefix("", 10),
    ) {
        let set = detect_conflicts(&local, &remote);
        let resolved = StrategyRegistry::with_defaults()
            .resolve(Resolution::Merge, &local, &remote, &set)
            .unwrap();

        prop_assert!(resolved.quotes.len() >= local.len());
        for (merged, original) in resolved.quotes.iter().zip(local.iter()) {
            prop_assert_eq!(&merged.text, &original.text);
        }
    }

    /// Every remote-only text appears exactly once after a merge.
    #[test]
    fn merge_appends_remote_only_texts_once(
        local in quotes_with_prefix("", 10).prop_map(distinct_texts),
        remote in quotes_with_prefix("", 10),
    ) {
        let set = detect_conflicts(&local, &remote);
        let resolved = StrategyRegistry::with_defaults()
            .resolve(Resolution::Merge, &local, &remote, &set)
            .unwrap();

        for quote in &set.new_server {
            let count = resolved.quotes.iter().filter(|q| q.text == quote.text).count();
            prop_assert_eq!(count, 1);
        }
    }

    /// After a merge, re-diffing against the same remote finds no conflicts
    /// and nothing new on the server.
    #[test]
    fn merge_settles_the_diff(
        local in quotes_with_prefix("", 10),
        remote in quotes_with_prefix("", 10).prop_map(distinct_texts),
    ) {
        let set = detect_conflicts(&local, &remote);
        let resolved = StrategyRegistry::with_defaults()
            .resolve(Resolution::Merge, &local, &remote, &set)
            .unwrap();

        let again = detect_conflicts(&resolved.quotes, &remote);
        prop_assert!(!again.requires_resolution());
    }

    /// Keep-server and keep-local return one side verbatim.
    #[test]
    fn one_sided_policies_select_a_side(
        local in quotes_with_prefix("", 8),
        remote in quotes_with_prefix("", 8),
    ) {
        let registry = StrategyRegistry::with_defaults();
        let set = detect_conflicts(&local, &remote);

        let server = registry.resolve(Resolution::Server, &local, &remote, &set).unwrap();
        let kept = registry.resolve(Resolution::Local, &local, &remote, &set).unwrap();

        prop_assert_eq!(server.quotes, remote);
        prop_assert_eq!(kept.quotes, local);
    }
}
