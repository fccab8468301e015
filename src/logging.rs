//! Structured JSONL logging to file and human-readable stderr output.
//!
//! This module provides dual-output logging:
//! - **JSONL to file** (~/.browser-search/logs/browser-search.jsonl) - structured, one event per line
//! - **Pretty to stderr** - human-readable for developers
//!
//! # Usage
//!
//! ```rust,ignore
//! use browser_search::logging;
//!
//! // Initialize logging - MUST keep guard alive for duration of program
//! let _guard = logging::init();
//!
//! // Use tracing macros directly
//! tracing::info!(event_type = "query", generation = 3, "Query dispatched");
//! ```
//!
//! # JSONL Output Format
//!
//! Each line is a valid JSON object:
//! ```json
//! {"timestamp":"2024-12-25T10:30:45.123Z","level":"INFO","target":"browser_search::popup","fields":{"event_type":"source_event","source":"history","count":4,"message":"Source results merged"}}
//! ```

use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use time::macros::format_description;
use time::OffsetDateTime;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::sources::Source;

// =============================================================================
// In-memory log buffer for the terminal footer
// =============================================================================

static LOG_BUFFER: OnceLock<Mutex<VecDeque<String>>> = OnceLock::new();
const MAX_LOG_LINES: usize = 50;

/// Guard that must be kept alive for the duration of the program.
/// Dropping this guard will flush and close the log file.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the dual-output logging system.
///
/// Returns a guard that MUST be kept alive for the duration of the program.
/// Dropping the guard will flush remaining logs and close the file.
pub fn init() -> LoggingGuard {
    let _ = LOG_BUFFER.set(Mutex::new(VecDeque::with_capacity(MAX_LOG_LINES)));

    let log_dir = get_log_dir();
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("[LOGGING] Failed to create log directory: {}", e);
    }

    let log_path = log_dir.join("browser-search.jsonl");

    // Environment filter - default to info, allow override via RUST_LOG
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file = OpenOptions::new().create(true).append(true).open(&log_path);

    let (json_writer, file_guard) = match file {
        Ok(file) => {
            // Non-blocking writer keeps file I/O off the popup thread
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file);
            (Some(non_blocking_file), Some(guard))
        }
        Err(e) => {
            eprintln!("[LOGGING] Failed to open log file: {}", e);
            (None, None)
        }
    };

    build_subscriber(env_filter, json_writer).init();

    tracing::info!(
        event_type = "app_lifecycle",
        action = "started",
        log_path = %log_path.display(),
        "Logging initialized"
    );

    LoggingGuard {
        _file_guard: file_guard,
    }
}

/// Layer stack shared by every run: filter, optional JSONL file, stderr.
/// Without a file writer the JSON layer is `None` and only stderr remains.
fn build_subscriber(
    env_filter: EnvFilter,
    json_writer: Option<NonBlocking>,
) -> impl tracing::Subscriber + Send + Sync + 'static {
    // Pretty layer for stderr (human developers)
    let pretty_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .compact();

    let json_layer = json_writer.map(|writer| {
        fmt::layer()
            .json()
            .with_writer(writer)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_target(true)
            .with_level(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_file(false)
            .with_line_number(false)
            .with_span_events(FmtSpan::NONE)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
}

/// Get the log directory path (~/.browser-search/logs/)
fn get_log_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".browser-search").join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("browser-search-logs"))
}

/// Get the path to the JSONL log file
pub fn log_path() -> PathBuf {
    get_log_dir().join("browser-search.jsonl")
}

/// Add a log entry to the in-memory buffer for UI display
fn add_to_buffer(category: &str, message: &str) {
    let Some(buffer) = LOG_BUFFER.get() else {
        return;
    };
    let stamp = OffsetDateTime::now_utc()
        .format(format_description!("[hour]:[minute]:[second]"))
        .unwrap_or_default();
    if let Ok(mut buf) = buffer.lock() {
        if buf.len() >= MAX_LOG_LINES {
            buf.pop_front();
        }
        buf.push_back(format!("{} [{}] {}", stamp, category, message));
    }
}

/// Get the last N log lines, newest first
pub fn get_last_logs(n: usize) -> Vec<String> {
    if let Some(buffer) = LOG_BUFFER.get() {
        if let Ok(buf) = buffer.lock() {
            return buf.iter().rev().take(n).cloned().collect();
        }
    }
    Vec::new()
}

#[cfg(test)]
pub(crate) fn init_buffer_for_tests() {
    let _ = LOG_BUFFER.set(Mutex::new(VecDeque::with_capacity(MAX_LOG_LINES)));
}

// =============================================================================
// STRUCTURED LOGGING HELPERS
// =============================================================================

/// Log a committed query dispatch
pub fn log_query_event(generation: u64, query: &str, action: &str) {
    add_to_buffer("QUERY", &format!("{} #{} '{}'", action, generation, query));

    tracing::info!(
        event_type = "query_event",
        generation = generation,
        query_len = query.len(),
        action = action,
        "Query {} (generation {})", action, generation
    );
}

/// Log the outcome of one provider call
pub fn log_source_event(
    generation: u64,
    source: Source,
    matched: usize,
    duration_ms: Option<u64>,
    success: bool,
) {
    add_to_buffer(
        "SOURCE",
        &format!("{} #{} matched={} (success={})", source, generation, matched, success),
    );

    match duration_ms {
        Some(duration) => {
            tracing::info!(
                event_type = "source_event",
                generation = generation,
                source = %source,
                matched = matched,
                duration_ms = duration,
                success = success,
                "Source {} settled", source
            );
        }
        None => {
            tracing::info!(
                event_type = "source_event",
                generation = generation,
                source = %source,
                matched = matched,
                success = success,
                "Source {} settled", source
            );
        }
    }
}

/// Log a keyboard event with structured fields
pub fn log_key_event(key: &str, action: &str) {
    add_to_buffer("KEY", &format!("{} {}", action, key));

    tracing::debug!(
        event_type = "key_event",
        key = key,
        action = action,
        "Key {} {}", action, key
    );
}

/// Log an error with structured fields and context
pub fn log_error(category: &str, error: &str, context: Option<&str>) {
    let msg = match context {
        Some(ctx) => format!("{}: {} (context: {})", category, error, ctx),
        None => format!("{}: {}", category, error),
    };
    add_to_buffer("ERROR", &msg);

    tracing::error!(
        event_type = "error",
        category = category,
        error_message = error,
        context = context,
        "{}", msg
    );
}
