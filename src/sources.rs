//! Result provenance: which provider(s) a URL was found in.
//!
//! `Source` is the closed set of providers. `SourceSet` is the per-row
//! badge set, always iterated in the fixed display order tab, bookmark, history.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One of the three result providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Tab,
    Bookmark,
    History,
}

impl Source {
    /// All sources in display order
    pub const ALL: [Source; 3] = [Source::Tab, Source::Bookmark, Source::History];

    /// Human readable label
    pub fn label(self) -> &'static str {
        match self {
            Source::Tab => "Tabs",
            Source::Bookmark => "Bookmarks",
            Source::History => "History",
        }
    }

    /// Single-glyph badge used by text renderers
    pub fn icon(self) -> &'static str {
        match self {
            Source::Tab => "T",
            Source::Bookmark => "B",
            Source::History => "H",
        }
    }

    fn flag(self) -> SourceSet {
        match self {
            Source::Tab => SourceSet::TAB,
            Source::Bookmark => SourceSet::BOOKMARK,
            Source::History => SourceSet::HISTORY,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Source::Tab => "tab",
            Source::Bookmark => "bookmark",
            Source::History => "history",
        };
        f.write_str(name)
    }
}

bitflags! {
    /// Set of sources a merged result was matched by
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SourceSet: u8 {
        const TAB = 1;
        const BOOKMARK = 1 << 1;
        const HISTORY = 1 << 2;
    }
}

impl Default for SourceSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Source> for SourceSet {
    fn from(source: Source) -> Self {
        source.flag()
    }
}

impl SourceSet {
    /// Add a source. Returns true if it was not already present.
    pub fn add(&mut self, source: Source) -> bool {
        let flag = source.flag();
        if self.contains(flag) {
            return false;
        }
        self.insert(flag);
        true
    }

    pub fn has(&self, source: Source) -> bool {
        self.contains(source.flag())
    }

    /// Sources present in this set, in display order
    pub fn sources(&self) -> impl Iterator<Item = Source> + '_ {
        Source::ALL.into_iter().filter(move |s| self.has(*s))
    }

    /// Badge glyphs in display order
    pub fn icons(&self) -> SmallVec<[&'static str; 3]> {
        self.sources().map(Source::icon).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_idempotent() {
        let mut set = SourceSet::from(Source::History);
        assert!(set.add(Source::Tab));
        assert!(!set.add(Source::Tab));
        assert!(!set.add(Source::History));
        assert_eq!(set, SourceSet::TAB | SourceSet::HISTORY);
    }

    #[test]
    fn test_icons_follow_display_order() {
        let mut set = SourceSet::default();
        set.add(Source::History);
        set.add(Source::Bookmark);
        set.add(Source::Tab);
        assert_eq!(set.icons().as_slice(), &["T", "B", "H"]);

        let only_history = SourceSet::from(Source::History);
        assert_eq!(
            only_history.sources().collect::<Vec<_>>(),
            vec![Source::History]
        );
    }

    #[test]
    fn test_source_serde_lowercase() {
        let json = serde_json::to_string(&Source::Bookmark).unwrap();
        assert_eq!(json, "\"bookmark\"");
        let parsed: Source = serde_json::from_str("\"history\"").unwrap();
        assert_eq!(parsed, Source::History);
    }
}
