//! Key Pattern Module
//!
//! Wildcard matching for bulk cache invalidation.

// == Key Pattern ==
/// A parsed invalidation pattern.
///
/// Exactly one `*` wildcard is supported, at the start, the end, or in
/// the middle of the pattern. A pattern without a wildcard matches one
/// key literally. Patterns with more than one `*` are deliberately not
/// interpreted as globs; they fall back to literal matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPattern {
    /// Match one key exactly
    Literal(String),
    /// `abc*` matches every key starting with `abc`
    Prefix(String),
    /// `*abc` matches every key ending with `abc`
    Suffix(String),
    /// `a*b` matches every key starting with `a` and ending with `b`
    Circumfix(String, String),
}

impl KeyPattern {
    // == Parse ==
    /// Parses a pattern string.
    pub fn parse(pattern: &str) -> Self {
        if pattern.matches('*').count() != 1 {
            return KeyPattern::Literal(pattern.to_string());
        }

        if let Some(prefix) = pattern.strip_suffix('*') {
            KeyPattern::Prefix(prefix.to_string())
        } else if let Some(suffix) = pattern.strip_prefix('*') {
            KeyPattern::Suffix(suffix.to_string())
        } else {
            // Single * somewhere in the middle
            let (head, tail) = pattern
                .split_once('*')
                .unwrap_or((pattern, ""));
            KeyPattern::Circumfix(head.to_string(), tail.to_string())
        }
    }

    // == Matches ==
    /// Checks whether `key` matches this pattern.
    pub fn matches(&self, key: &str) -> bool {
        match self {
            KeyPattern::Literal(literal) => key == literal,
            KeyPattern::Prefix(prefix) => key.starts_with(prefix),
            KeyPattern::Suffix(suffix) => key.ends_with(suffix),
            KeyPattern::Circumfix(head, tail) => key.starts_with(head) && key.ends_with(tail),
        }
    }
}
