//! Fuzzy filtering for the provider list.

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

/// A matcher for fuzzy searching text.
pub struct Matcher {
    inner: SkimMatcherV2,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Matcher {
    pub fn new() -> Self {
        Self {
            inner: SkimMatcherV2::default().ignore_case(),
        }
    }

    /// Check if the text fuzzy-matches the pattern, case-insensitively.
    ///
    /// An empty pattern matches everything.
    pub fn matches(&self, text: &str, pattern: &str) -> bool {
        pattern.is_empty() || self.inner.fuzzy_match(text, pattern).is_some()
    }
}
