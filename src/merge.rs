//! URL-keyed merge of results arriving from independent sources.
//!
//! Entries are kept in display order (hostname, then title, then arrival).
//! An entry's sort key never changes after insertion because the first-seen
//! title wins, so rows only ever get inserted; existing rows never move.

use std::collections::HashSet;

use tracing::trace;

use crate::search::{insertion_index, MatchedItem};
use crate::sources::{Source, SourceSet};

/// A merged, de-duplicated result row
#[derive(Debug, Clone, PartialEq)]
pub struct ResultEntry {
    pub url: String,
    /// First-seen title
    pub title: String,
    pub domain: String,
    pub sources: SourceSet,
}

/// What an upsert did to the merged list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// A new row was created at `index`
    Inserted { index: usize },
    /// An existing row gained a source
    Updated { index: usize, sources: SourceSet },
    /// The row already carried this source
    Unchanged { index: usize },
}

/// Table of merged results for one query generation
#[derive(Debug, Default)]
pub struct MergeMap {
    entries: Vec<ResultEntry>,
    urls: HashSet<String>,
}

impl MergeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `source` to the entry for `url`, creating the entry if needed.
    pub fn upsert(&mut self, title: &str, url: &str, domain: &str, source: Source) -> Upsert {
        if self.urls.contains(url) {
            if let Some(index) = self.position(url) {
                let entry = &mut self.entries[index];
                if entry.sources.add(source) {
                    trace!(url, %source, "Merged additional source");
                    return Upsert::Updated {
                        index,
                        sources: entry.sources,
                    };
                }
                return Upsert::Unchanged { index };
            }
            crate::debug_panic!("url set and entry list disagree for {}", url);
        }

        let index = insertion_index(&self.entries, domain, title, |e| {
            (e.domain.as_str(), e.title.as_str())
        });
        self.entries.insert(
            index,
            ResultEntry {
                url: url.to_string(),
                title: title.to_string(),
                domain: domain.to_string(),
                sources: SourceSet::from(source),
            },
        );
        self.urls.insert(url.to_string());
        trace!(url, %source, index, "Inserted new result");
        Upsert::Inserted { index }
    }

    /// Upsert a prepared item
    pub fn upsert_item(&mut self, item: &MatchedItem) -> Upsert {
        self.upsert(&item.title, &item.url, &item.domain, item.source)
    }

    pub fn get(&self, url: &str) -> Option<&ResultEntry> {
        self.position(url).map(|i| &self.entries[i])
    }

    pub fn position(&self, url: &str) -> Option<usize> {
        if !self.urls.contains(url) {
            return None;
        }
        self.entries.iter().position(|e| e.url == url)
    }

    pub fn entries(&self) -> &[ResultEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.urls.clear();
    }
}
