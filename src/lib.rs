//! Browser Search - one input over open tabs, bookmarks and history
//!
//! Typed input is debounced, then every enabled source is queried
//! concurrently. Results stream into a single list keyed by URL, ordered by
//! hostname and title, with badges showing which sources matched.

pub mod config;
pub mod debounce;
pub mod error;
pub mod list_view;
pub mod logging;
pub mod merge;
pub mod navigation;
pub mod popup;
pub mod providers;
pub mod query;
pub mod search;
pub mod sources;
pub mod stdin_commands;
pub mod terminal_view;
