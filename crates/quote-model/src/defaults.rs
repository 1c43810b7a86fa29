//! Built-in quote list

use crate::quote::Quote;

const DEFAULT_QUOTES: &[(&str, &str)] = &[
    (
        "The only way to do great work is to love what you do.",
        "Motivation",
    ),
    (
        "If you can\u{2019}t explain it simply, you don\u{2019}t understand it well enough.",
        "Wisdom",
    ),
    (
        "Code is like humor. When you have to explain it, it\u{2019}s bad.",
        "Tech",
    ),
    ("Life is short. Smile while you still have teeth.", "Humor"),
    ("Simplicity is the soul of efficiency.", "Tech"),
    ("Where there is love there is life.", "Love"),
];

/// Quotes used when durable storage is empty or unreadable
#[must_use]
pub fn default_quotes() -> Vec<Quote> {
    DEFAULT_QUOTES
        .iter()
        .map(|(text, category)| Quote::new(*text, *category))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete_local_quotes() {
        let quotes = default_quotes();
        assert_eq!(quotes.len(), 6);
        assert!(quotes
            .iter()
            .all(|q| !q.text.is_empty() && !q.category.is_empty() && !q.is_remote()));
    }
}
