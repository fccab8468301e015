//! Search module - per-source matching, scoring and ordering
//!
//! This module provides functionality for:
//! - Case-insensitive substring matching of titles and URLs
//! - Hostname extraction for display and ordering
//! - History scoring and `(hostname, title)` deduplication
//! - Ordering by hostname then title
//!
//! # Module Structure
//!
//! - `types` - Provider records, candidates and matched items
//! - `matcher` - Substring matching and hostname resolution
//! - `history` - History scoring and deduplication
//! - `sorter` - Case-insensitive (domain, title) ordering

mod history;
mod matcher;
mod sorter;
mod types;

pub use types::{Bookmark, Candidate, HistoryItem, MatchedItem, SourceBatch, Tab};

pub use matcher::{domain_of, filter_candidates, is_match, resolve_matches};

pub use history::{history_score, score_and_dedupe, HistoryKey, MILLIS_PER_DAY};

pub use sorter::{compare_domain_title, insertion_index};

use tracing::{debug, instrument};

use crate::query::Query;

/// Run one provider's raw answer through matching (and, for history,
/// scoring and deduplication). The result is ready to merge.
#[instrument(level = "debug", skip_all, fields(source = %batch.source(), raw = batch.len()))]
pub fn prepare_batch(batch: SourceBatch, query: &Query, now_ms: i64) -> Vec<MatchedItem> {
    let prepared = match batch {
        SourceBatch::Tabs(tabs) => {
            let candidates = tabs.into_iter().map(Candidate::from).collect();
            resolve_matches(filter_candidates(candidates, query))
        }
        SourceBatch::Bookmarks(bookmarks) => {
            let candidates = bookmarks.into_iter().map(Candidate::from).collect();
            resolve_matches(filter_candidates(candidates, query))
        }
        SourceBatch::History(items) => {
            let matching = items
                .into_iter()
                .filter(|h| is_match(&h.title, Some(&h.url), query))
                .collect();
            score_and_dedupe(matching, now_ms)
        }
    };
    debug!(matched = prepared.len(), "Batch prepared");
    prepared
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::Source;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn test_prepare_tabs_filters_by_query() {
        let batch = SourceBatch::Tabs(vec![
            Tab {
                title: "Example Site".to_string(),
                url: "https://example.com/a".to_string(),
            },
            Tab {
                title: "Unrelated".to_string(),
                url: "https://other.org/".to_string(),
            },
        ]);
        let items = prepare_batch(batch, &Query::new("EXAMPLE"), NOW);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].domain, "example.com");
        assert_eq!(items[0].source, Source::Tab);
    }

    #[test]
    fn test_prepare_history_scores_matching_only() {
        let batch = SourceBatch::History(vec![
            HistoryItem {
                title: "Example".to_string(),
                url: "https://example.com/a".to_string(),
                visit_count: 5,
                last_visit_time: NOW - 86_400_000,
            },
            HistoryItem {
                title: "Nope".to_string(),
                url: "https://nope.org/".to_string(),
                visit_count: 99,
                last_visit_time: NOW,
            },
        ]);
        let items = prepare_batch(batch, &Query::new("example"), NOW);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].source, Source::History);
        assert!((items[0].score.unwrap() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_prepare_bookmarks_skips_folders() {
        let batch = SourceBatch::Bookmarks(vec![
            Bookmark {
                title: "Example folder".to_string(),
                url: None,
            },
            Bookmark {
                title: "Example".to_string(),
                url: Some("https://example.com/b".to_string()),
            },
        ]);
        let items = prepare_batch(batch, &Query::new("example"), NOW);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].url, "https://example.com/b");
    }
}
