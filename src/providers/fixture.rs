//! Providers backed by an in-memory fixture, optionally loaded from JSON.
//!
//! ```json
//! {
//!   "tabs": [{"title": "Example Site", "url": "https://example.com/a"}],
//!   "bookmarks": [{"title": "Reading"}, {"title": "Rust", "url": "https://www.rust-lang.org/"}],
//!   "history": [{"title": "Example", "url": "https://example.com/a", "visitCount": 5, "lastVisitTime": 1700000000000}]
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{BookmarkProvider, HistoryProvider, TabProvider};
use crate::error::{Result, SearchError};
use crate::query::Query;
use crate::search::{Bookmark, HistoryItem, Tab};
use crate::sources::Source;

/// Raw fixture contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureData {
    #[serde(default)]
    pub tabs: Vec<Tab>,
    #[serde(default)]
    pub bookmarks: Vec<Bookmark>,
    #[serde(default)]
    pub history: Vec<HistoryItem>,
}

/// Fixture-backed tab, bookmark and history provider
#[derive(Debug, Clone, Default)]
pub struct FixtureProviders {
    data: FixtureData,
    delays: [Duration; 3],
    failing: HashSet<Source>,
}

impl FixtureProviders {
    pub fn new(data: FixtureData) -> Self {
        FixtureProviders {
            data,
            ..Default::default()
        }
    }

    /// Load a fixture from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| SearchError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let data: FixtureData = serde_json::from_str(&contents)?;
        debug!(
            tabs = data.tabs.len(),
            bookmarks = data.bookmarks.len(),
            history = data.history.len(),
            "Loaded fixture"
        );
        Ok(Self::new(data))
    }

    /// Make a source answer only after `delay`
    pub fn with_delay(mut self, source: Source, delay: Duration) -> Self {
        self.delays[slot(source)] = delay;
        self
    }

    /// Make a source fail every call
    pub fn failing(mut self, source: Source) -> Self {
        self.failing.insert(source);
        self
    }

    pub fn data(&self) -> &FixtureData {
        &self.data
    }

    async fn answer(&self, source: Source) -> Result<()> {
        let delay = self.delays[slot(source)];
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.failing.contains(&source) {
            return Err(SearchError::provider(source, "fixture configured to fail"));
        }
        Ok(())
    }
}

fn slot(source: Source) -> usize {
    match source {
        Source::Tab => 0,
        Source::Bookmark => 1,
        Source::History => 2,
    }
}

#[async_trait(?Send)]
impl TabProvider for FixtureProviders {
    async fn query_all_tabs(&self) -> Result<Vec<Tab>> {
        self.answer(Source::Tab).await?;
        Ok(self.data.tabs.clone())
    }
}

#[async_trait(?Send)]
impl BookmarkProvider for FixtureProviders {
    /// Host-style search: every node whose title or url contains the query,
    /// folders included.
    async fn search_bookmarks(&self, query: &str) -> Result<Vec<Bookmark>> {
        self.answer(Source::Bookmark).await?;
        let query = Query::new(query);
        Ok(self
            .data
            .bookmarks
            .iter()
            .filter(|b| query.matches(&b.title) || b.url.as_deref().is_some_and(|u| query.matches(u)))
            .cloned()
            .collect())
    }
}

#[async_trait(?Send)]
impl HistoryProvider for FixtureProviders {
    /// Entries containing the query, most recent first, capped
    async fn search_history(&self, query: &str, max_results: usize) -> Result<Vec<HistoryItem>> {
        self.answer(Source::History).await?;
        let query = Query::new(query);
        let mut items: Vec<HistoryItem> = self
            .data
            .history
            .iter()
            .filter(|h| query.is_empty() || query.matches(&h.title) || query.matches(&h.url))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.last_visit_time.cmp(&a.last_visit_time));
        items.truncate(max_results);
        Ok(items)
    }
}
