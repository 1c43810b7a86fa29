//! JSON import/export encoding
//!
//! Export writes the full collection as a pretty-printed JSON array.
//! Import accepts the same shape and keeps only well-formed entries.

use crate::collection::QuoteCollection;
use crate::quote::Quote;
use serde_json::Value;

/// Errors that abort an import before anything is applied
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// Payload is not valid JSON
    #[error("import file is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Payload is valid JSON but not an array
    #[error("import file must contain a JSON array of quotes, found {found}")]
    NotAnArray {
        /// JSON kind that was found instead
        found: &'static str,
    },

    /// Array contained no usable entries
    #[error("import file contains no valid quotes ({rejected} invalid entries)")]
    NoValidQuotes {
        /// Number of entries discarded
        rejected: usize,
    },
}

/// Entry discarded during import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEntry {
    /// Position in the imported array
    pub index: usize,

    /// Why the entry was discarded
    pub reason: &'static str,
}

/// Validated import payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportBatch {
    /// Entries that passed validation, in file order
    pub accepted: Vec<Quote>,

    /// Entries that were discarded
    pub rejected: Vec<RejectedEntry>,
}

/// Encode the collection for export
///
/// # Errors
/// Only fails if serialization itself fails, which plain strings never do.
pub fn encode_export(quotes: &QuoteCollection) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(quotes)
}

/// Decode and validate an import payload
///
/// Every entry must be an object whose `text` and `category` are strings
/// that are non-empty after trimming. Accepted strings are kept verbatim and
/// optional `id`/`timestamp` strings are preserved. Invalid entries are discarded and reported in
/// [`ImportBatch::rejected`].
///
/// # Errors
/// - [`ImportError::Malformed`] for unparsable JSON
/// - [`ImportError::NotAnArray`] when the root is not an array
/// - [`ImportError::NoValidQuotes`] when nothing survives validation
pub fn decode_import(payload: &str) -> Result<ImportBatch, ImportError> {
    let root: Value = serde_json::from_str(payload)?;
    let Value::Array(entries) = root else {
        return Err(ImportError::NotAnArray {
            found: kind_of(&root),
        });
    };

    let mut batch = ImportBatch::default();
    for (index, entry) in entries.iter().enumerate() {
        match validate_entry(entry) {
            Ok(quote) => batch.accepted.push(quote),
            Err(reason) => batch.rejected.push(RejectedEntry { index, reason }),
        }
    }

    if batch.accepted.is_empty() {
        return Err(ImportError::NoValidQuotes {
            rejected: batch.rejected.len(),
        });
    }

    Ok(batch)
}

fn validate_entry(entry: &Value) -> Result<Quote, &'static str> {
    let Value::Object(fields) = entry else {
        return Err("not an object");
    };

    let text = match fields.get("text") {
        Some(Value::String(text)) if !text.trim().is_empty() => text.as_str(),
        Some(Value::String(_)) => return Err("empty text"),
        _ => return Err("missing string `text`"),
    };
    let category = match fields.get("category") {
        Some(Value::String(category)) if !category.trim().is_empty() => category.as_str(),
        Some(Value::String(_)) => return Err("empty category"),
        _ => return Err("missing string `category`"),
    };

    let mut quote = Quote::new(text, category);
    if let Some(Value::String(id)) = fields.get("id") {
        quote.id = Some(id.clone());
    }
    if let Some(Value::String(timestamp)) = fields.get("timestamp") {
        quote.timestamp = Some(timestamp.clone());
    }
    Ok(quote)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
