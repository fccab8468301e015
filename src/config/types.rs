//! Configuration type definitions
//!
//! This module contains all the struct definitions for configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults::*;
use crate::sources::Source;

// ============================================
// HIGHLIGHT CONFIG
// ============================================

/// How the matched part of a title is marked in rendered rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightConfig {
    /// Highlight the first match in the title (default: true)
    #[serde(default = "default_highlight_enabled")]
    pub enabled: bool,
    /// Marker placed before the match (default: "[")
    #[serde(default = "default_highlight_open")]
    pub open: String,
    /// Marker placed after the match (default: "]")
    #[serde(default = "default_highlight_close")]
    pub close: String,
}

fn default_highlight_enabled() -> bool {
    DEFAULT_HIGHLIGHT_ENABLED
}
fn default_highlight_open() -> String {
    DEFAULT_HIGHLIGHT_OPEN.to_string()
}
fn default_highlight_close() -> String {
    DEFAULT_HIGHLIGHT_CLOSE.to_string()
}

impl Default for HighlightConfig {
    fn default() -> Self {
        HighlightConfig {
            enabled: DEFAULT_HIGHLIGHT_ENABLED,
            open: DEFAULT_HIGHLIGHT_OPEN.to_string(),
            close: DEFAULT_HIGHLIGHT_CLOSE.to_string(),
        }
    }
}

// ============================================
// SOURCES CONFIG
// ============================================

/// Which providers are queried
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcesConfig {
    #[serde(default = "default_search_tabs")]
    pub tabs: bool,
    #[serde(default = "default_search_bookmarks")]
    pub bookmarks: bool,
    #[serde(default = "default_search_history")]
    pub history: bool,
}

fn default_search_tabs() -> bool {
    DEFAULT_SEARCH_TABS
}
fn default_search_bookmarks() -> bool {
    DEFAULT_SEARCH_BOOKMARKS
}
fn default_search_history() -> bool {
    DEFAULT_SEARCH_HISTORY
}

impl Default for SourcesConfig {
    fn default() -> Self {
        SourcesConfig {
            tabs: DEFAULT_SEARCH_TABS,
            bookmarks: DEFAULT_SEARCH_BOOKMARKS,
            history: DEFAULT_SEARCH_HISTORY,
        }
    }
}

impl SourcesConfig {
    pub fn is_enabled(&self, source: Source) -> bool {
        match source {
            Source::Tab => self.tabs,
            Source::Bookmark => self.bookmarks,
            Source::History => self.history,
        }
    }
}

// ============================================
// ROOT CONFIG
// ============================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Quiet interval before a typed query is dispatched (milliseconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debounce_ms: Option<u64>,
    /// Cap on history entries requested per query
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_max_results: Option<usize>,
    /// Title highlight markers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<HighlightConfig>,
    /// Provider toggles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<SourcesConfig>,
    /// Open activated links with the system handler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_links: Option<bool>,
}

impl Config {
    /// Returns the debounce interval, or DEFAULT_DEBOUNCE_MS if not configured
    pub fn get_debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS))
    }

    /// Returns the history cap, or DEFAULT_HISTORY_MAX_RESULTS if not configured
    pub fn get_history_max_results(&self) -> usize {
        self.history_max_results.unwrap_or(DEFAULT_HISTORY_MAX_RESULTS)
    }

    /// Returns the highlight configuration, or defaults if not configured
    pub fn get_highlight(&self) -> HighlightConfig {
        self.highlight.clone().unwrap_or_default()
    }

    /// Returns the source toggles, or defaults (all enabled) if not configured
    pub fn get_sources(&self) -> SourcesConfig {
        self.sources.clone().unwrap_or_default()
    }

    pub fn should_open_links(&self) -> bool {
        self.open_links.unwrap_or(DEFAULT_OPEN_LINKS)
    }
}
