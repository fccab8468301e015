//! Chromium profile readers: the `Bookmarks` JSON file and the `History`
//! SQLite database.
//!
//! History timestamps are WebKit microseconds since 1601-01-01; they are
//! converted to Unix milliseconds on read.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rusqlite::{params, Connection, OpenFlags};
use serde::Deserialize;
use tracing::{debug, warn};

use super::{BookmarkProvider, HistoryProvider};
use crate::error::{Result, SearchError};
use crate::query::Query;
use crate::search::{Bookmark, HistoryItem};
use crate::sources::Source;

/// Milliseconds between 1601-01-01 and 1970-01-01
const WEBKIT_EPOCH_OFFSET_MS: i64 = 11_644_473_600_000;

/// Convert a WebKit timestamp (microseconds since 1601) to Unix milliseconds
pub(crate) fn webkit_to_unix_ms(webkit_us: i64) -> i64 {
    if webkit_us <= 0 {
        return 0;
    }
    webkit_us / 1000 - WEBKIT_EPOCH_OFFSET_MS
}

// ============================================
// BOOKMARKS
// ============================================

#[derive(Debug, Deserialize)]
struct BookmarkFile {
    #[serde(default)]
    roots: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct BookmarkNode {
    #[serde(default)]
    name: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    children: Vec<BookmarkNode>,
}

/// Reads bookmarks from a Chromium `Bookmarks` file on every search
#[derive(Debug, Clone)]
pub struct ChromiumBookmarks {
    path: PathBuf,
}

impl ChromiumBookmarks {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ChromiumBookmarks { path: path.into() }
    }

    /// Parse the file and flatten every root into a node list.
    /// Folders become url-less bookmarks.
    pub fn read_all(&self) -> Result<Vec<Bookmark>> {
        let contents = std::fs::read_to_string(&self.path).map_err(|source| SearchError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        parse_bookmarks(&contents)
    }
}

pub(crate) fn parse_bookmarks(contents: &str) -> Result<Vec<Bookmark>> {
    let file: BookmarkFile = serde_json::from_str(contents)?;
    let mut out = Vec::new();
    for (name, value) in file.roots {
        // `roots` also carries non-node entries such as sync metadata
        match serde_json::from_value::<BookmarkNode>(value) {
            Ok(node) => flatten(node, &mut out),
            Err(e) => debug!(root = %name, error = %e, "Skipping non-folder bookmark root"),
        }
    }
    Ok(out)
}

fn flatten(node: BookmarkNode, out: &mut Vec<Bookmark>) {
    let BookmarkNode {
        name,
        url,
        children,
    } = node;
    out.push(Bookmark { title: name, url });
    for child in children {
        flatten(child, out);
    }
}

#[async_trait(?Send)]
impl BookmarkProvider for ChromiumBookmarks {
    async fn search_bookmarks(&self, query: &str) -> Result<Vec<Bookmark>> {
        let query = Query::new(query);
        let all = self.read_all()?;
        Ok(all
            .into_iter()
            .filter(|b| {
                query.matches(&b.title) || b.url.as_deref().is_some_and(|u| query.matches(u))
            })
            .collect())
    }
}

// ============================================
// HISTORY
// ============================================

/// Reads history from a Chromium `History` database
#[derive(Debug, Clone)]
pub struct ChromiumHistory {
    path: PathBuf,
}

impl ChromiumHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ChromiumHistory { path: path.into() }
    }
}

/// Escape LIKE wildcards so the query is matched literally
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// Open the database read-only. `immutable=1` lets us read while the browser
/// holds its lock.
fn open_history(path: &Path) -> Result<Connection> {
    let uri = format!("file:{}?immutable=1", path.display());
    let conn = Connection::open_with_flags(
        uri,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    Ok(conn)
}

pub(crate) fn query_history(path: &Path, query: &str, max_results: usize) -> Result<Vec<HistoryItem>> {
    let query = Query::new(query);
    let conn = open_history(path)?;
    let mut stmt = conn.prepare(
        "SELECT url, title, visit_count, last_visit_time FROM urls
         WHERE hidden = 0
           AND (?1 IS NULL OR LOWER(url) LIKE ?1 ESCAPE '\\' OR LOWER(title) LIKE ?1 ESCAPE '\\')
         ORDER BY last_visit_time DESC",
    )?;

    // SQLite LOWER() and LIKE fold ASCII only; non-ASCII queries scan every row
    let pattern = query
        .as_str()
        .is_ascii()
        .then(|| like_pattern(query.as_str()));
    let rows = stmt.query_map(params![pattern], |row| {
        let visit_count: i64 = row.get(2)?;
        Ok(HistoryItem {
            url: row.get(0)?,
            title: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            visit_count: u32::try_from(visit_count.max(0)).unwrap_or(u32::MAX),
            last_visit_time: webkit_to_unix_ms(row.get(3)?),
        })
    })?;

    let mut items = Vec::new();
    for row in rows {
        if items.len() >= max_results {
            break;
        }
        match row {
            Ok(item) if query.matches(&item.title) || query.matches(&item.url) => items.push(item),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Skipping unreadable history row"),
        }
    }
    debug!(count = items.len(), "History rows read");
    Ok(items)
}

#[async_trait(?Send)]
impl HistoryProvider for ChromiumHistory {
    async fn search_history(&self, query: &str, max_results: usize) -> Result<Vec<HistoryItem>> {
        let path = self.path.clone();
        let query = query.to_string();
        // SQLite I/O runs off the popup thread
        tokio::task::spawn_blocking(move || query_history(&path, &query, max_results))
            .await
            .map_err(|e| SearchError::provider(Source::History, e.to_string()))?
    }
}
