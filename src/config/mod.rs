//! Configuration module - Search behavior and user preferences
//!
//! This module provides functionality for:
//! - Loading configuration from ~/.browser-search/config.json
//! - Default values for all settings
//! - Type definitions for config structures
//!
//! # Module Structure
//!
//! - `defaults` - All default constant values
//! - `types` - Configuration struct definitions (Config, HighlightConfig, etc.)
//! - `loader` - File system loading and parsing

mod defaults;
mod loader;
mod types;

// Re-export defaults that are used externally
pub use defaults::{DEFAULT_DEBOUNCE_MS, DEFAULT_HISTORY_MAX_RESULTS};

// Re-export types that are used externally
pub use types::{Config, HighlightConfig, SourcesConfig};

// Re-export loader
pub use loader::{load_config, load_config_from};

// Additional exports for tests
#[cfg(test)]
pub use defaults::{DEFAULT_HIGHLIGHT_CLOSE, DEFAULT_HIGHLIGHT_OPEN};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
