//! External command handling via stdin.
//!
//! Drives the popup from a script or a test harness instead of a keyboard.
//!
//! # Protocol
//!
//! Commands are sent as JSON objects, one per line (JSONL format):
//!
//! ```json
//! {"type": "input", "text": "exam"}
//! {"type": "key", "key": "down"}
//! {"type": "key", "key": "enter"}
//! {"type": "close"}
//! ```
//!
//! # Example Usage
//!
//! ```bash
//! printf '%s\n' '{"type":"input","text":"rust"}' '{"type":"key","key":"down"}' \
//!     | ./browser-search --fixture fixture.json --dry-run
//! ```

use tracing::{debug, info, warn};

use crate::error::{Result, SearchError};
use crate::navigation::NavKey;

/// External commands that can be sent to the popup via stdin
///
/// All commands support an optional `requestId` field for correlation in logs.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ExternalCommand {
    /// Replace the search input text (debounced like typing)
    Input {
        text: String,
        #[serde(default, rename = "requestId")]
        request_id: Option<String>,
    },
    /// Press a navigation key: "up", "down" or "enter"
    Key {
        key: String,
        #[serde(default, rename = "requestId")]
        request_id: Option<String>,
    },
    /// Close the popup and exit
    Close {
        #[serde(default, rename = "requestId")]
        request_id: Option<String>,
    },
}

impl ExternalCommand {
    pub fn request_id(&self) -> Option<&str> {
        match self {
            ExternalCommand::Input { request_id, .. }
            | ExternalCommand::Key { request_id, .. }
            | ExternalCommand::Close { request_id } => request_id.as_deref(),
        }
    }

    /// The navigation key of a `key` command
    pub fn nav_key(&self) -> Option<Result<NavKey>> {
        match self {
            ExternalCommand::Key { key, .. } => Some(key.parse()),
            _ => None,
        }
    }
}

/// Parse one JSONL line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<ExternalCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(line)
        .map(Some)
        .map_err(|e| SearchError::Command(format!("{} in '{}'", e, line)))
}

/// Start a thread that listens on stdin for external JSONL commands.
/// Returns an async_channel::Receiver that can be awaited without polling.
///
/// Uses a bounded channel (capacity 100). When the receiver is dropped the
/// thread exits on the next line; when stdin reaches EOF the channel closes.
pub fn start_stdin_listener() -> async_channel::Receiver<ExternalCommand> {
    use std::io::BufRead;

    let (tx, rx) = async_channel::bounded(100);

    std::thread::spawn(move || {
        info!(event_type = "stdin", "External command listener started");
        let stdin = std::io::stdin();
        let reader = stdin.lock();

        for line in reader.lines() {
            match line {
                Ok(line) => match parse_command(&line) {
                    Ok(Some(cmd)) => {
                        debug!(event_type = "stdin", command = ?cmd, "Parsed command");
                        // send_blocking is used since we're in a sync thread
                        if tx.send_blocking(cmd).is_err() {
                            info!(event_type = "stdin", "Command channel closed, exiting");
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => warn!(event_type = "stdin", error = %e, "Failed to parse command"),
                },
                Err(e) => {
                    warn!(event_type = "stdin", error = %e, "Error reading stdin");
                    break;
                }
            }
        }
        info!(event_type = "stdin", "External command listener exiting");
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_command_deserialization() {
        let cmd = parse_command(r#"{"type": "input", "text": "exam"}"#)
            .unwrap()
            .unwrap();
        match cmd {
            ExternalCommand::Input { text, request_id } => {
                assert_eq!(text, "exam");
                assert!(request_id.is_none());
            }
            _ => panic!("Expected Input command"),
        }
    }

    #[test]
    fn test_key_command_with_request_id() {
        let cmd = parse_command(r#"{"type": "key", "key": "Down", "requestId": "req-1"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(cmd.request_id(), Some("req-1"));
        assert_eq!(cmd.nav_key().unwrap().unwrap(), NavKey::ArrowDown);
    }

    #[test]
    fn test_close_command() {
        let cmd = parse_command(r#"{"type": "close"}"#).unwrap().unwrap();
        assert_eq!(cmd, ExternalCommand::Close { request_id: None });
        assert!(cmd.nav_key().is_none());
    }

    #[test]
    fn test_unknown_key_is_an_error() {
        let cmd = parse_command(r#"{"type": "key", "key": "escape"}"#)
            .unwrap()
            .unwrap();
        assert!(cmd.nav_key().unwrap().is_err());
    }

    #[test]
    fn test_blank_line_is_skipped() {
        assert!(parse_command("   ").unwrap().is_none());
    }

    #[test]
    fn test_unknown_type_fails() {
        let err = parse_command(r#"{"type": "show"}"#).unwrap_err();
        assert!(matches!(err, SearchError::Command(_)));
    }

    #[test]
    fn test_missing_required_field_fails() {
        assert!(parse_command(r#"{"type": "input"}"#).is_err());
    }
}
