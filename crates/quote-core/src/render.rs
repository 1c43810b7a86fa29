//! Pure projection from state to display instructions

use quote_composition::ConflictSet;
use quote_model::{CategoryFilter, Quote};
use rand::Rng;
use std::fmt;

/// What the display region should show; replaces previous output entirely
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayInstruction {
    /// Show one quote
    Quote {
        /// Quote text
        text: String,
        /// Quote category
        category: String,
    },

    /// Nothing matches the filter
    Empty {
        /// Filter label that matched nothing
        filter: String,
    },
}

impl fmt::Display for DisplayInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quote { text, category } => write!(f, "“{text}”\n    — {category}"),
            Self::Empty { filter } => write!(f, "No quotes found for category \"{filter}\"."),
        }
    }
}

/// Uniformly pick one quote from `pool`
pub fn pick_random<'a, R: Rng + ?Sized>(pool: &[&'a Quote], rng: &mut R) -> Option<&'a Quote> {
    if pool.is_empty() {
        return None;
    }
    Some(pool[rng.random_range(0..pool.len())])
}

/// Display instruction for a pick
#[must_use]
pub fn render(pick: Option<&Quote>, filter: &CategoryFilter) -> DisplayInstruction {
    match pick {
        Some(quote) => DisplayInstruction::Quote {
            text: quote.text.clone(),
            category: quote.category.clone(),
        },
        None => DisplayInstruction::Empty {
            filter: filter.label().to_string(),
        },
    }
}

/// Summary lines shown before asking for a resolution
#[must_use]
pub fn render_conflicts(set: &ConflictSet) -> Vec<String> {
    let mut lines = vec![format!(
        "Server differs from local: {} category conflict(s), {} new on server, {} only local.",
        set.conflicts.len(),
        set.new_server.len(),
        set.new_local.len()
    )];
    lines.extend(set.conflicts.iter().map(|c| {
        format!(
            "  ~ “{}”: local '{}' vs server '{}'",
            c.text(),
            c.local.category,
            c.server.category
        )
    }));
    lines.extend(
        set.new_server
            .iter()
            .map(|q| format!("  + “{}” ({})", q.text, q.category)),
    );
    lines
}
