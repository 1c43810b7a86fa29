//! Quote Composition
//!
//! Reconciles a local quote list with a remote snapshot.
//!
//! # Core Concepts
//!
//! - [`detect_conflicts`]: text-keyed diff producing a [`ConflictSet`]
//! - [`ResolutionStrategy`]: core trait for resolution policies
//! - [`KeepServerStrategy`]: remote snapshot replaces the local list
//! - [`KeepLocalStrategy`]: remote differences are discarded
//! - [`MergeStrategy`]: local list plus remote-only entries, remote categories win
//! - [`StrategyRegistry`]: maps a [`Resolution`] to its strategy
//!
//! # Example
//!
//! ```rust
//! use quote_composition::{detect_conflicts, Resolution, StrategyRegistry};
//! use quote_model::Quote;
//!
//! let local = vec![Quote::new("A", "X")];
//! let remote = vec![Quote::new("A", "Y")];
//!
//! let conflicts = detect_conflicts(&local, &remote);
//! assert_eq!(conflicts.conflicts.len(), 1);
//!
//! let registry = StrategyRegistry::with_defaults();
//! let merged = registry
//!     .get(Resolution::Merge)
//!     .unwrap()
//!     .resolve(&local, &remote, &conflicts)
//!     .unwrap();
//! assert_eq!(merged.quotes, vec![Quote::new("A", "Y")]);
//! ```

#![warn(unreachable_pub)]

mod conflict;
mod keep_local;
mod keep_server;
mod merge;
mod registry;
mod strategy;

pub use conflict::{detect_conflicts, CategoryConflict, ConflictSet};
pub use keep_local::KeepLocalStrategy;
pub use keep_server::KeepServerStrategy;
pub use merge::MergeStrategy;
pub use registry::StrategyRegistry;
pub use strategy::{Resolution, ResolutionError, ResolutionStrategy, Resolved};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
