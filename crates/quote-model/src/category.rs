//! Categories and category filtering
//!
//! The category set is never stored. It is recomputed from the collection
//! every time it is needed.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Label of the pseudo-category that selects every quote
pub const ALL_CATEGORIES: &str = "All";

/// Sorted list of selectable categories
///
/// # Invariants
/// - First entry is always [`ALL_CATEGORIES`]
/// - Remaining entries are distinct (case-sensitive), trimmed and non-empty
/// - A quote labelled `"All"` (any case) adds no entry; it is only reachable
///   through the `"All"` filter
/// - Remaining entries are sorted case-insensitively, ties broken by byte order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySet(Vec<String>);

impl CategorySet {
    /// Build from raw category labels
    #[must_use]
    pub fn from_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let mut distinct: Vec<String> = labels
            .into_iter()
            .map(str::trim)
            .filter(|label| !label.is_empty() && !label.eq_ignore_ascii_case(ALL_CATEGORIES))
            .map(str::to_string)
            .collect();

        distinct.sort_by(|a, b| {
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b))
        });
        distinct.dedup();

        let mut all = Vec::with_capacity(distinct.len() + 1);
        all.push(ALL_CATEGORIES.to_string());
        all.extend(distinct);
        Self(all)
    }

    /// All entries, `"All"` first
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Entries without the leading `"All"` (suggestions for the add form)
    #[inline]
    #[must_use]
    pub fn suggestions(&self) -> &[String] {
        &self.0[1..]
    }

    /// Exact (case-sensitive) membership
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|c| c == label)
    }

    /// Number of entries including `"All"`
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true; `"All"` is always present
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }
}

/// Category restriction for the render pool
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum CategoryFilter {
    /// Every quote
    #[default]
    All,

    /// Quotes whose category matches case-insensitively
    Category(String),
}

impl CategoryFilter {
    /// Filter on a single category
    ///
    /// `"All"` (any case) and blank labels collapse to [`CategoryFilter::All`].
    #[must_use]
    pub fn category(label: impl Into<String>) -> Self {
        let label = label.into();
        let trimmed = label.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_CATEGORIES) {
            Self::All
        } else {
            Self::Category(trimmed.to_string())
        }
    }

    /// Check whether a category label passes this filter
    #[must_use]
    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Category(wanted) => {
                category.trim().to_lowercase() == wanted.trim().to_lowercase()
            }
        }
    }

    /// Label as shown in the category selector
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Category(label) => label,
        }
    }
}

impl Display for CategoryFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::category(s))
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        Self::category(value)
    }
}

impl From<CategoryFilter> for String {
    fn from(value: CategoryFilter) -> Self {
        value.label().to_string()
    }
}

/// Title Case a category label
///
/// Lower-cases the label, then upper-cases the first character of each
/// whitespace-separated word. Runs of whitespace collapse to one space.
#[must_use]
pub fn normalize_category(label: &str) -> String {
    label
        .to_lowercase()
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
