//! Query normalization and case-insensitive substring location.

use std::fmt;
use std::ops::Range;

/// A normalized (trimmed, lowercased) search query
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Query(String);

impl Query {
    pub fn new(raw: &str) -> Self {
        // Per-char lowering, the same folding find_ignore_case applies to haystacks
        Query(raw.trim().chars().flat_map(char::to_lowercase).collect())
    }

    /// The empty query means "no results"
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if `haystack` contains this query, ignoring case
    pub fn matches(&self, haystack: &str) -> bool {
        find_ignore_case(haystack, &self.0).is_some()
    }

    /// Byte range of the first case-insensitive occurrence in `haystack`
    pub fn find_in(&self, haystack: &str) -> Option<Range<usize>> {
        find_ignore_case(haystack, &self.0)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Find the first occurrence of `needle_lower` in `haystack`, lowercasing the
/// haystack one char at a time so the returned range indexes the original text.
/// `needle_lower` must already be lowercase. An empty needle matches nothing.
pub(crate) fn find_ignore_case(haystack: &str, needle_lower: &str) -> Option<Range<usize>> {
    if needle_lower.is_empty() {
        return None;
    }

    'starts: for (start, _) in haystack.char_indices() {
        let mut needle = needle_lower.chars().peekable();
        for (offset, ch) in haystack[start..].char_indices() {
            for lower in ch.to_lowercase() {
                match needle.next() {
                    Some(n) if n == lower => {}
                    _ => continue 'starts,
                }
            }
            if needle.peek().is_none() {
                return Some(start..start + offset + ch.len_utf8());
            }
        }
        // Ran out of haystack; shorter suffixes cannot match either
        return None;
    }
    None
}
