//! Strategy registry for resolution strategies
//!
//! Provides [`StrategyRegistry`] for looking up the strategy behind a
//! user-selected [`Resolution`].

use crate::conflict::ConflictSet;
use crate::keep_local::KeepLocalStrategy;
use crate::keep_server::KeepServerStrategy;
use crate::merge::MergeStrategy;
use crate::strategy::{Resolution, ResolutionError, ResolutionStrategy, Resolved};
use quote_model::Quote;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of resolution strategies
#[derive(Debug, Default, Clone)]
pub struct StrategyRegistry {
    strategies: HashMap<Resolution, Arc<dyn ResolutionStrategy>>,
}

impl StrategyRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            strategies: HashMap::new(),
        }
    }

    /// Create registry with the built-in strategies
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(KeepServerStrategy::new()));
        registry.register(Arc::new(KeepLocalStrategy::new()));
        registry.register(Arc::new(MergeStrategy::new()));
        registry
    }

    /// Register a strategy under the policy it implements
    ///
    /// Replaces any strategy previously registered for that policy.
    pub fn register(&mut self, strategy: Arc<dyn ResolutionStrategy>) {
        self.strategies.insert(strategy.resolution(), strategy);
    }

    /// Look up the strategy for a policy
    #[must_use]
    pub fn get(&self, resolution: Resolution) -> Option<&Arc<dyn ResolutionStrategy>> {
        self.strategies.get(&resolution)
    }

    /// Check if a policy has a strategy
    #[inline]
    #[must_use]
    pub fn contains(&self, resolution: Resolution) -> bool {
        self.strategies.contains_key(&resolution)
    }

    /// Remove a strategy
    #[inline]
    pub fn remove(&mut self, resolution: Resolution) -> bool {
        self.strategies.remove(&resolution).is_some()
    }

    /// Get number of registered strategies
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Look up and apply in one step
    ///
    /// # Errors
    /// [`ResolutionError::NotRegistered`] if the policy has no strategy, or
    /// whatever the strategy itself returns.
    pub fn resolve(
        &self,
        resolution: Resolution,
        local: &[Quote],
        remote: &[Quote],
        conflicts: &ConflictSet,
    ) -> Result<Resolved, ResolutionError> {
        let strategy = self
            .get(resolution)
            .ok_or(ResolutionError::NotRegistered(resolution))?;
        tracing::debug!(strategy = strategy.name(), "applying resolution strategy");
        strategy.resolve(local, remote, conflicts)
    }
}
