//! Keep-server strategy
//!
//! The remote snapshot replaces the local list wholesale.

use crate::conflict::ConflictSet;
use crate::strategy::{Resolution, ResolutionError, ResolutionStrategy, Resolved};
use quote_model::Quote;

/// Remote snapshot wins everything
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepServerStrategy;

impl KeepServerStrategy {
    /// Create new keep-server strategy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ResolutionStrategy for KeepServerStrategy {
    fn resolve(
        &self,
        _local: &[Quote],
        remote: &[Quote],
        _conflicts: &ConflictSet,
    ) -> Result<Resolved, ResolutionError> {
        Ok(Resolved::unchanged(remote.to_vec()))
    }

    fn resolution(&self) -> Resolution {
        Resolution::Server
    }

    fn name(&self) -> &'static str {
        "KeepServer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::detect_conflicts;

    #[test]
    fn replaces_local_with_remote() {
        let local = vec![Quote::new("A", "X"), Quote::new("B", "X")];
        let remote = vec![Quote::new("A", "Y").with_id("1")];
        let conflicts = detect_conflicts(&local, &remote);

        let resolved = KeepServerStrategy::new()
            .resolve(&local, &remote, &conflicts)
            .unwrap();

        assert_eq!(resolved.quotes, remote);
    }

    #[test]
    fn empty_remote_empties_local() {
        let local = vec![Quote::new("A", "X")];
        let resolved = KeepServerStrategy::new()
            .resolve(&local, &[], &ConflictSet::default())
            .unwrap();
        assert!(resolved.quotes.is_empty());
    }
}
