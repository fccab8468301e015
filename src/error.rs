use thiserror::Error;
use tracing::{error, warn};

use crate::sources::Source;

/// Error severity for UI display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,     // informational
    Warning,  // recoverable, result set may be incomplete
    Error,    // operation failed
}

/// Domain-specific errors for browser search
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("{source_kind} provider failed: {message}")]
    Provider { source_kind: Source, message: String },

    #[error("URL has no hostname: {url}")]
    InvalidUrl { url: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse JSON: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("I/O failed for '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("History database error: {0}")]
    HistoryDb(#[from] rusqlite::Error),

    #[error("Could not open '{url}': {message}")]
    LinkOpen { url: String, message: String },

    #[error("Invalid command: {0}")]
    Command(String),
}

impl SearchError {
    pub fn provider(source_kind: Source, message: impl Into<String>) -> Self {
        Self::Provider {
            source_kind,
            message: message.into(),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Provider { .. } => ErrorSeverity::Warning,
            Self::InvalidUrl { .. } => ErrorSeverity::Info,
            Self::Config(_) => ErrorSeverity::Warning,
            Self::ConfigParse(_) => ErrorSeverity::Warning,
            Self::Io { .. } => ErrorSeverity::Error,
            Self::HistoryDb(_) => ErrorSeverity::Warning,
            Self::LinkOpen { .. } => ErrorSeverity::Error,
            Self::Command(_) => ErrorSeverity::Info,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Provider { source_kind, .. } => {
                format!("{} results are unavailable", source_kind.label())
            }
            Self::InvalidUrl { url } => format!("Skipped malformed link {}", url),
            Self::Config(msg) => format!("Configuration issue: {}", msg),
            Self::ConfigParse(e) => format!("Invalid configuration format: {}", e),
            Self::Io { path, .. } => format!("Could not read {}", path),
            Self::HistoryDb(_) => "History results are unavailable".to_string(),
            Self::LinkOpen { url, .. } => format!("Could not open {}", url),
            Self::Command(msg) => msg.clone(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;

/// Extension trait for silent error logging with caller location tracking.
/// Use when the operation is recoverable and the user doesn't need to know.
///
/// # Examples
///
/// ```ignore
/// use browser_search::error::ResultExt;
///
/// // Log and continue if the link handler is missing
/// opener.open(&url).log_err();
/// ```
pub trait ResultExt<T> {
    /// Log error with caller location and return None. Use for recoverable failures.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None. Use for expected failures.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}

/// Panic in debug mode, log error in release mode.
///
/// Use for "impossible" states that should crash during development
/// but gracefully degrade in production.
#[macro_export]
macro_rules! debug_panic {
    ( $($fmt_arg:tt)* ) => {
        if cfg!(debug_assertions) {
            panic!( $($fmt_arg)* );
        } else {
            tracing::error!("IMPOSSIBLE STATE: {}", format_args!($($fmt_arg)*));
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_is_recoverable() {
        let err = SearchError::provider(Source::History, "permission denied");
        assert_eq!(err.severity(), ErrorSeverity::Warning);
        assert_eq!(err.user_message(), "History results are unavailable");
        assert!(err.to_string().contains("permission denied"));
    }

    #[test]
    fn test_log_err_returns_none_on_error() {
        let result: std::result::Result<u32, SearchError> = Err(SearchError::InvalidUrl {
            url: "not a url".to_string(),
        });
        assert_eq!(result.log_err(), None);

        let ok: std::result::Result<u32, SearchError> = Ok(7);
        assert_eq!(ok.warn_on_err(), Some(7));
    }
}
