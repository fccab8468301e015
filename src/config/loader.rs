//! Configuration loading from file system
//!
//! Handles loading and parsing the config.json file.

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use super::defaults::DEFAULT_CONFIG_PATH;
use super::types::Config;
use crate::error::SearchError;

/// Load configuration from ~/.browser-search/config.json
///
/// Returns Config::default() if the file is missing or cannot be parsed.
#[instrument(name = "load_config")]
pub fn load_config() -> Config {
    let config_path = PathBuf::from(shellexpand::tilde(DEFAULT_CONFIG_PATH).as_ref());

    if !config_path.exists() {
        info!(path = %config_path.display(), "Config file not found, using defaults");
        return Config::default();
    }

    match load_config_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            warn!(
                error = %e,
                path = %config_path.display(),
                "Failed to load config, using defaults"
            );
            Config::default()
        }
    }
}

/// Load configuration from an explicit path, reporting failures
pub fn load_config_from(path: &Path) -> Result<Config, SearchError> {
    let contents = std::fs::read_to_string(path).map_err(|source| SearchError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let config: Config = serde_json::from_str(&contents)?;

    if config.debounce_ms == Some(0) {
        warn!("debounceMs is 0, every keystroke will dispatch a query");
    }
    if config.history_max_results == Some(0) {
        return Err(SearchError::Config(
            "historyMaxResults must be at least 1".to_string(),
        ));
    }

    info!(path = %path.display(), "Successfully loaded config");
    Ok(config)
}
