//! Substring matching for provider candidates
//!
//! A candidate matches when its title or URL contains the query, ignoring case.
//! Missing URLs (bookmark folders) never fail the scan; they simply don't match
//! on the URL side.

use tracing::debug;
use url::Url;

use crate::query::Query;

use super::types::{Candidate, MatchedItem};

/// Extract the hostname of an absolute URL.
/// Returns None for relative, malformed or host-less URLs (e.g. `about:blank`).
pub fn domain_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    if host.is_empty() {
        return None;
    }
    Some(host.to_lowercase())
}

/// Check whether a title/url pair matches the query
#[inline]
pub fn is_match(title: &str, url: Option<&str>, query: &Query) -> bool {
    query.matches(title) || url.is_some_and(|u| query.matches(u))
}

/// Filter candidates down to those matching the query, preserving order
pub fn filter_candidates(candidates: Vec<Candidate>, query: &Query) -> Vec<Candidate> {
    candidates
        .into_iter()
        .filter(|c| is_match(&c.title, c.url.as_deref(), query))
        .collect()
}

/// Turn matched candidates into mergeable items.
/// Candidates without a URL or without a parseable hostname are skipped.
pub fn resolve_matches(candidates: Vec<Candidate>) -> Vec<MatchedItem> {
    let mut items = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let Some(url) = candidate.url else {
            debug!(
                source = %candidate.source,
                title = %candidate.title,
                "Skipping matched candidate without url"
            );
            continue;
        };
        let Some(domain) = domain_of(&url) else {
            debug!(source = %candidate.source, url = %url, "Skipping candidate without hostname");
            continue;
        };
        items.push(MatchedItem {
            title: candidate.title,
            url,
            domain,
            source: candidate.source,
            score: None,
        });
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::Source;

    fn candidate(title: &str, url: Option<&str>) -> Candidate {
        Candidate {
            title: title.to_string(),
            url: url.map(str::to_string),
            source: Source::Bookmark,
        }
    }

    #[test]
    fn test_domain_of() {
        assert_eq!(
            domain_of("https://Example.COM/a?b=1").as_deref(),
            Some("example.com")
        );
        assert_eq!(domain_of("/relative/path"), None);
        assert_eq!(domain_of("not a url"), None);
        assert_eq!(domain_of("about:blank"), None);
    }

    #[test]
    fn test_matches_title_or_url_case_insensitive() {
        let q = Query::new("Rust");
        assert!(is_match("The RUST Book", Some("https://doc.example/book"), &q));
        assert!(is_match("Docs", Some("https://www.rust-lang.org"), &q));
        assert!(!is_match("Docs", Some("https://golang.org"), &q));
    }

    #[test]
    fn test_folder_without_url_does_not_panic() {
        let q = Query::new("rust");
        let kept = filter_candidates(
            vec![
                candidate("Rust folder", None),
                candidate("Other folder", None),
                candidate("Crates", Some("https://crates.io/rust")),
            ],
            &q,
        );
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].title, "Rust folder");
        assert_eq!(kept[1].title, "Crates");
    }

    #[test]
    fn test_resolve_skips_missing_and_malformed_urls() {
        let items = resolve_matches(vec![
            candidate("Rust folder", None),
            candidate("Broken", Some("::::rust")),
            candidate("Crates", Some("https://crates.io/rust")),
        ]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].domain, "crates.io");
        assert_eq!(items[0].source, Source::Bookmark);
        assert_eq!(items[0].score, None);
    }
}
