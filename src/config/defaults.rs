//! Default configuration values
//!
//! All constants used throughout the config module are defined here.

/// Quiet interval before a typed query is dispatched (milliseconds)
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Maximum number of history entries requested per query
pub const DEFAULT_HISTORY_MAX_RESULTS: usize = 100;

/// Default highlight markers wrapped around the matched part of a title
pub const DEFAULT_HIGHLIGHT_ENABLED: bool = true;
pub const DEFAULT_HIGHLIGHT_OPEN: &str = "[";
pub const DEFAULT_HIGHLIGHT_CLOSE: &str = "]";

/// Default source toggles
pub const DEFAULT_SEARCH_TABS: bool = true;
pub const DEFAULT_SEARCH_BOOKMARKS: bool = true;
pub const DEFAULT_SEARCH_HISTORY: bool = true;

/// Whether activating a row opens the link with the system handler
pub const DEFAULT_OPEN_LINKS: bool = true;

/// Config file location (tilde-expanded)
pub const DEFAULT_CONFIG_PATH: &str = "~/.browser-search/config.json";
