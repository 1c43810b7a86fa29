//! Quote Core - the dynamic quote generator
//!
//! Application layer over the quote workspace:
//! - Opens durable and session storage from [`QuoteConfig`]
//! - Picks and renders random quotes under the selected category filter
//! - Adds, imports and exports quotes
//! - Builds a [`quote_sync::SyncEngine`] for remote reconciliation
//!
//! # Example
//!
//! ```rust,no_run
//! use quote_core::{QuoteApp, QuoteConfig};
//!
//! let mut app = QuoteApp::open(QuoteConfig::new().with_data_dir("/tmp/quotes"));
//! app.add_quote("Ship it.", "tech").unwrap();
//! println!("{}", app.show_random());
//! ```

#![warn(unreachable_pub)]

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod render;

pub use app::{ImportSummary, QuoteApp, DEFAULT_EXPORT_FILE};
pub use config::QuoteConfig;
pub use error::AppError;
pub use logging::{init_logging, LogOptions};
pub use render::{pick_random, render, render_conflicts, DisplayInstruction};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the quote application
    pub use crate::{AppError, DisplayInstruction, QuoteApp, QuoteConfig};
    pub use quote_composition::Resolution;
    pub use quote_model::{CategoryFilter, Quote};
    pub use quote_sync::{SyncEngine, SyncStep};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
