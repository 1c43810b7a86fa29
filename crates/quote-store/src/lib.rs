//! Quote Store
//!
//! Keeps the authoritative in-memory quote list and its durable mirror in
//! agreement, and holds the session-scoped snapshot.
//!
//! # Core Concepts
//!
//! - [`KeyValueStore`]: storage port (`get`/`set`/`remove`)
//! - [`MemoryStore`] / [`FileStore`]: backends
//! - [`QuotePersistence`] / [`DurableQuotes`]: `load`/`save` of the quote list and filter
//! - [`QuoteStore`]: shared handle passed to every consumer
//! - [`SessionStore`]: last-viewed quote and session metadata
//!
//! # Example
//!
//! ```rust
//! use quote_model::Quote;
//! use quote_store::{AddPolicy, QuoteStore};
//!
//! let store = QuoteStore::in_memory();
//! let before = store.len();
//! store.add(Quote::new("Ship it.", "Tech"), AddPolicy::RejectDuplicates).unwrap();
//! assert_eq!(store.len(), before + 1);
//! ```

#![warn(unreachable_pub)]

mod durable;
mod error;
mod kv;
mod session;
mod store;

pub use durable::{DurableQuotes, QuotePersistence, DEFAULT_FILTER_KEY, DEFAULT_QUOTES_KEY};
pub use error::StoreError;
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use session::{SessionSnapshot, SessionStore, DEFAULT_SESSION_KEY};
pub use store::{AddPolicy, QuoteStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
