//! Keep-local strategy
//!
//! Remote differences are discarded; the local list is kept as-is.

use crate::conflict::ConflictSet;
use crate::strategy::{Resolution, ResolutionError, ResolutionStrategy, Resolved};
use quote_model::Quote;

/// Local list wins everything
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepLocalStrategy;

impl KeepLocalStrategy {
    /// Create new keep-local strategy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ResolutionStrategy for KeepLocalStrategy {
    fn resolve(
        &self,
        local: &[Quote],
        _remote: &[Quote],
        _conflicts: &ConflictSet,
    ) -> Result<Resolved, ResolutionError> {
        Ok(Resolved::unchanged(local.to_vec()))
    }

    fn resolution(&self) -> Resolution {
        Resolution::Local
    }

    fn name(&self) -> &'static str {
        "KeepLocal"
    }
}
