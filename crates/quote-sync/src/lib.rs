//! Quote Sync
//!
//! Reconciles the local quote store with a remote source:
//! 1. **Fetch**: read the remote snapshot (hardcoded fallback on failure)
//! 2. **Diff**: classify differences with `detect_conflicts`
//! 3. **Resolve**: suspend for a `server`/`local`/`merge` choice when needed
//! 4. **Publish**: push the result and persist it locally
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use quote_sync::prelude::*;
//!
//! let engine = SyncEngine::new(store, Arc::new(HttpRemote::default()));
//! match engine.sync().await? {
//!     SyncStep::Synced(report) => println!("{} quotes", report.quote_count),
//!     SyncStep::NeedsResolution(_) => {
//!         engine.resolve(Resolution::Merge).await?;
//!     }
//! }
//!
//! let (auto, mut events) = AutoSync::start(engine, AutoSyncConfig::default());
//! while let Some(event) = events.recv().await { /* ... */ }
//! auto.stop();
//! ```

pub mod auto;
pub mod engine;
pub mod error;
pub mod remote;
pub mod scheduler;
pub mod state_machine;

// Re-exports
pub use auto::{AutoSync, AutoSyncConfig, SyncEvent};
pub use engine::{PendingResolution, SyncEngine, SyncReport, SyncStatus, SyncStep};
pub use error::{RemoteError, StateMachineError, SyncError};
pub use remote::{fallback_server_quotes, HttpRemote, PushReceipt, RemoteQuoteSource};
pub use scheduler::{TaskHandle, TaskId, TaskInfo, TaskScheduler};
pub use state_machine::SyncState;

/// Common imports
pub mod prelude {
    pub use crate::auto::{AutoSync, AutoSyncConfig, SyncEvent};
    pub use crate::engine::{SyncEngine, SyncStep};
    pub use crate::remote::{HttpRemote, RemoteQuoteSource};
    pub use crate::state_machine::SyncState;
    pub use quote_composition::Resolution;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
