//! Name matching for contact search.
//!
//! Search is a case- and diacritic-insensitive substring match on `name`.
//! Both sides are folded the same way: canonical decomposition, combining
//! marks dropped, then per-character lowercase with final sigma folded to
//! sigma. Lowercasing per character keeps the result independent of where
//! a word ends, so a needle folds the same as the name it is cut from.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Fold a string into its search key.
#[must_use]
pub fn fold(input: &str) -> String {
    input
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| if c == 'ς' { 'σ' } else { c })
        .collect()
}

/// The active name filter derived from search text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameFilter {
    text: String,
    folded: String,
}

impl NameFilter {
    /// Derive the filter for the given search text.
    ///
    /// Empty text means "no filter" and yields `None`.
    #[must_use]
    pub fn from_search_text(text: &str) -> Option<Self> {
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_string(),
            folded: fold(text),
        })
    }

    /// The search text as typed.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The folded needle.
    #[must_use]
    pub fn folded(&self) -> &str {
        &self.folded
    }
}
