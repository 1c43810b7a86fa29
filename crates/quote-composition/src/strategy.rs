//! Resolution strategy trait and core types
//!
//! Provides the [`ResolutionStrategy`] trait for pluggable reconciliation of
//! a local quote list against a remote snapshot.

use crate::conflict::ConflictSet;
use quote_model::Quote;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Resolution policy picked by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    /// Replace the local list with the remote snapshot
    Server,

    /// Keep the local list, discard remote differences
    Local,

    /// Keep local, append remote-only entries, take remote categories
    Merge,
}

impl Resolution {
    /// Every policy, in prompt order
    pub const ALL: [Resolution; 3] = [Self::Server, Self::Local, Self::Merge];

    /// Wire/CLI name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Server => "server",
            Self::Local => "local",
            Self::Merge => "merge",
        }
    }
}

impl Display for Resolution {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = ResolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "server" | "s" => Ok(Self::Server),
            "local" | "l" => Ok(Self::Local),
            "merge" | "m" => Ok(Self::Merge),
            other => Err(ResolutionError::UnknownResolution(other.to_string())),
        }
    }
}

/// Outcome of applying a strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// New local list
    pub quotes: Vec<Quote>,

    /// Local entries whose category was overwritten
    pub categories_overwritten: usize,

    /// Remote-only entries appended
    pub appended: usize,
}

impl Resolved {
    /// Result that leaves `quotes` as the new list with no bookkeeping
    #[inline]
    #[must_use]
    pub fn unchanged(quotes: Vec<Quote>) -> Self {
        Self {
            quotes,
            categories_overwritten: 0,
            appended: 0,
        }
    }
}

/// Resolution error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    /// Name does not match any policy
    #[error("unknown resolution '{0}' (expected server, local or merge)")]
    UnknownResolution(String),

    /// Conflict no longer lines up with the local list it was computed from
    #[error("stale conflict at local index {index}: '{text}' is no longer there")]
    StaleConflict {
        /// Local index recorded in the conflict
        index: usize,
        /// Text recorded in the conflict
        text: String,
    },

    /// No strategy registered for a policy
    #[error("no strategy registered for '{0}'")]
    NotRegistered(Resolution),
}

/// Resolution strategy for local/remote reconciliation
///
/// # Contract
/// `resolve()` must be deterministic and must not drop local entries unless
/// the policy explicitly replaces the local list.
pub trait ResolutionStrategy: Send + Sync + fmt::Debug {
    /// Produce the new local list
    ///
    /// # Errors
    /// Returns [`ResolutionError::StaleConflict`] if `conflicts` was not
    /// computed from `local`.
    fn resolve(
        &self,
        local: &[Quote],
        remote: &[Quote],
        conflicts: &ConflictSet,
    ) -> Result<Resolved, ResolutionError>;

    /// Policy implemented by this strategy
    fn resolution(&self) -> Resolution;

    /// Strategy name (for logging)
    fn name(&self) -> &'static str;
}

/// Check that every conflict still points at the local entry it describes
pub(crate) fn check_conflicts_fresh(
    local: &[Quote],
    conflicts: &ConflictSet,
) -> Result<(), ResolutionError> {
    for conflict in &conflicts.conflicts {
        let fresh = local
            .get(conflict.local_index)
            .is_some_and(|q| q.text == conflict.local.text);
        if !fresh {
            return Err(ResolutionError::StaleConflict {
                index: conflict.local_index,
                text: conflict.local.text.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_parsing() {
        assert_eq!("server".parse::<Resolution>().unwrap(), Resolution::Server);
        assert_eq!(" Local ".parse::<Resolution>().unwrap(), Resolution::Local);
        assert_eq!("m".parse::<Resolution>().unwrap(), Resolution::Merge);
        assert!(matches!(
            "both".parse::<Resolution>(),
            Err(ResolutionError::UnknownResolution(_))
        ));
    }

    #[test]
    fn resolution_display_round_trips() {
        for resolution in Resolution::ALL {
            assert_eq!(resolution.to_string().parse::<Resolution>().unwrap(), resolution);
        }
    }

    #[test]
    fn error_display() {
        let err = ResolutionError::UnknownResolution("x".to_string());
        assert!(err.to_string().contains("unknown resolution"));
    }
}
