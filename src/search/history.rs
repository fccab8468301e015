//! History scoring and deduplication
//!
//! History entries are ranked by a simple frequency-minus-age score:
//!
//! `score = visit_count - days_since_last_visit`
//!
//! so one visit is worth one day of recency. Entries that share a
//! `(hostname, lowercase(title))` key are collapsed to the best-scoring one
//! before they reach the merge map.

use std::collections::HashMap;

use tracing::{debug, instrument};

use super::matcher::domain_of;
use super::types::{HistoryItem, MatchedItem};
use crate::sources::Source;

/// Milliseconds in a day for timestamp calculations
pub const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Calculate the recency/frequency score of a history entry.
/// May be negative for old, rarely visited pages.
pub fn history_score(visit_count: u32, last_visit_ms: i64, now_ms: i64) -> f64 {
    let days_since_visit = now_ms.saturating_sub(last_visit_ms) as f64 / MILLIS_PER_DAY;
    visit_count as f64 - days_since_visit
}

/// Deduplication key for history entries
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HistoryKey {
    pub domain: String,
    pub title: String,
}

impl HistoryKey {
    pub fn new(domain: &str, title: &str) -> Self {
        HistoryKey {
            domain: domain.to_lowercase(),
            title: title.to_lowercase(),
        }
    }
}

/// Score history entries and keep only the best one per `HistoryKey`.
///
/// Output preserves the order in which each key was first seen. When two
/// entries score equally the earlier one wins. Entries without a hostname
/// are skipped.
#[instrument(level = "debug", skip_all, fields(input = items.len()))]
pub fn score_and_dedupe(items: Vec<HistoryItem>, now_ms: i64) -> Vec<MatchedItem> {
    let mut best: Vec<MatchedItem> = Vec::with_capacity(items.len());
    let mut slots: HashMap<HistoryKey, usize> = HashMap::with_capacity(items.len());

    for item in items {
        let Some(domain) = domain_of(&item.url) else {
            debug!(url = %item.url, "Skipping history entry without hostname");
            continue;
        };
        let score = history_score(item.visit_count, item.last_visit_time, now_ms);
        let key = HistoryKey::new(&domain, &item.title);
        let scored = MatchedItem {
            title: item.title,
            url: item.url,
            domain,
            source: Source::History,
            score: Some(score),
        };

        match slots.get(&key) {
            Some(&slot) => {
                let current = best[slot].score.unwrap_or(f64::NEG_INFINITY);
                if score > current {
                    debug!(
                        url = %scored.url,
                        replaced = %best[slot].url,
                        score,
                        "History duplicate outscored previous entry"
                    );
                    best[slot] = scored;
                }
            }
            None => {
                slots.insert(key, best.len());
                best.push(scored);
            }
        }
    }

    debug!(output = best.len(), "History entries scored");
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    fn item(title: &str, url: &str, visits: u32, days_ago: f64) -> HistoryItem {
        HistoryItem {
            title: title.to_string(),
            url: url.to_string(),
            visit_count: visits,
            last_visit_time: NOW - (days_ago * MILLIS_PER_DAY) as i64,
        }
    }

    #[test]
    fn test_score_formula() {
        assert!((history_score(5, NOW - 86_400_000, NOW) - 4.0).abs() < 1e-9);
        assert!((history_score(0, NOW, NOW)).abs() < 1e-9);
        // Old, rarely visited pages go negative
        assert!(history_score(1, NOW - 10 * 86_400_000, NOW) < 0.0);
    }

    #[test]
    fn test_score_extreme_timestamps_do_not_overflow() {
        let ancient = history_score(1, i64::MIN, NOW);
        assert!(ancient.is_finite() && ancient < 0.0);
        let future = history_score(1, i64::MAX, i64::MIN);
        assert!(future.is_finite() && future > 0.0);
    }

    #[test]
    fn test_dedupe_keeps_higher_score() {
        let out = score_and_dedupe(
            vec![
                item("Inbox", "https://mail.example.com/u/0", 2, 3.0),
                item("INBOX", "https://mail.example.com/u/1", 10, 1.0),
            ],
            NOW,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].url, "https://mail.example.com/u/1");
        assert!((out[0].score.unwrap() - 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_dedupe_tie_keeps_first() {
        let out = score_and_dedupe(
            vec![
                item("Docs", "https://docs.example.com/a", 3, 1.0),
                item("docs", "https://docs.example.com/b", 3, 1.0),
            ],
            NOW,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].url, "https://docs.example.com/a");
    }

    #[test]
    fn test_different_domains_are_not_merged() {
        let out = score_and_dedupe(
            vec![
                item("Home", "https://a.example.com/", 1, 0.0),
                item("Home", "https://b.example.com/", 1, 0.0),
            ],
            NOW,
        );
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].domain, "a.example.com");
        assert_eq!(out[1].domain, "b.example.com");
    }

    #[test]
    fn test_skips_entries_without_hostname() {
        let out = score_and_dedupe(
            vec![
                item("Blank", "about:blank", 50, 0.0),
                item("Home", "https://example.com/", 1, 0.0),
            ],
            NOW,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].domain, "example.com");
    }
}
