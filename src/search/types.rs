//! Provider records and search candidates
//!
//! This module contains the data types flowing from the providers through
//! matching and scoring into the merge map.

use serde::{Deserialize, Serialize};

use crate::sources::Source;

/// An open tab as reported by the tab provider
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    #[serde(default)]
    pub title: String,
    pub url: String,
}

/// A bookmark node. Folders have no url.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A history entry with visit statistics
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    #[serde(default)]
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub visit_count: u32,
    /// Milliseconds since the Unix epoch
    #[serde(default)]
    pub last_visit_time: i64,
}

/// One provider's raw answer for a query
#[derive(Clone, Debug)]
pub enum SourceBatch {
    Tabs(Vec<Tab>),
    Bookmarks(Vec<Bookmark>),
    History(Vec<HistoryItem>),
}

impl SourceBatch {
    pub fn source(&self) -> Source {
        match self {
            SourceBatch::Tabs(_) => Source::Tab,
            SourceBatch::Bookmarks(_) => Source::Bookmark,
            SourceBatch::History(_) => Source::History,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SourceBatch::Tabs(items) => items.len(),
            SourceBatch::Bookmarks(items) => items.len(),
            SourceBatch::History(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A record from any provider, before matching
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub title: String,
    pub url: Option<String>,
    pub source: Source,
}

impl From<Tab> for Candidate {
    fn from(tab: Tab) -> Self {
        Candidate {
            title: tab.title,
            url: Some(tab.url),
            source: Source::Tab,
        }
    }
}

impl From<Bookmark> for Candidate {
    fn from(bookmark: Bookmark) -> Self {
        Candidate {
            title: bookmark.title,
            url: bookmark.url,
            source: Source::Bookmark,
        }
    }
}

/// A candidate that matched the query and has a usable URL and hostname.
/// This is what gets merged into the result list.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchedItem {
    pub title: String,
    pub url: String,
    pub domain: String,
    pub source: Source,
    /// Recency/frequency score, history only
    pub score: Option<f64>,
}
