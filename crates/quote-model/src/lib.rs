//! Quote Model
//!
//! Plain data types shared by every quotesync crate.
//!
//! # Core Concepts
//!
//! - [`Quote`]: a text/category pair, optionally tagged with a remote id and timestamp
//! - [`QuoteCollection`]: ordered, insertion-order list of quotes
//! - [`CategorySet`]: derived, sorted category list (always led by `"All"`)
//! - [`CategoryFilter`]: restricts the render pool to one category
//! - [`encode_export`] / [`decode_import`]: JSON file transfer
//!
//! # Example
//!
//! ```rust
//! use quote_model::{CategoryFilter, Quote, QuoteCollection};
//!
//! let mut quotes = QuoteCollection::new();
//! quotes.push(Quote::new("Simplicity is the soul of efficiency.", "Tech"));
//!
//! let pool = quotes.pool(&CategoryFilter::category("tech"));
//! assert_eq!(pool.len(), 1);
//! ```

#![warn(unreachable_pub)]

mod category;
mod collection;
mod defaults;
mod quote;
mod transfer;

pub use category::{normalize_category, CategoryFilter, CategorySet, ALL_CATEGORIES};
pub use collection::QuoteCollection;
pub use defaults::default_quotes;
pub use quote::Quote;
pub use transfer::{decode_import, encode_export, ImportBatch, ImportError, RejectedEntry};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn added_quote_is_selectable_by_its_category() {
        let mut quotes = QuoteCollection::from(default_quotes());
        let before = quotes.len();

        quotes.push(Quote::new("Stay hungry, stay foolish.", "Grit"));

        assert_eq!(quotes.len(), before + 1);
        assert!(quotes.categories().contains("Grit"));
        let pool = quotes.pool(&CategoryFilter::category("Grit"));
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].text, "Stay hungry, stay foolish.");
    }

    #[test]
    fn export_then_import_keeps_every_entry() {
        let quotes = QuoteCollection::from(default_quotes());
        let json = encode_export(&quotes).unwrap();

        let batch = decode_import(&json).unwrap();

        assert_eq!(batch.accepted.len(), quotes.len());
        for quote in quotes.iter() {
            assert!(batch.accepted.contains(quote));
        }
        assert!(batch.rejected.is_empty());
    }
}
