use super::*;
use std::io::Write;
use std::time::Duration;

use crate::error::SearchError;
use crate::sources::Source;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.get_debounce(), Duration::from_millis(DEFAULT_DEBOUNCE_MS));
    assert_eq!(config.get_history_max_results(), DEFAULT_HISTORY_MAX_RESULTS);
    assert!(config.should_open_links());

    let highlight = config.get_highlight();
    assert!(highlight.enabled);
    assert_eq!(highlight.open, DEFAULT_HIGHLIGHT_OPEN);
    assert_eq!(highlight.close, DEFAULT_HIGHLIGHT_CLOSE);

    let sources = config.get_sources();
    for source in Source::ALL {
        assert!(sources.is_enabled(source));
    }
}

#[test]
fn test_reference_defaults() {
    assert_eq!(DEFAULT_DEBOUNCE_MS, 300);
    assert_eq!(DEFAULT_HISTORY_MAX_RESULTS, 100);
}

#[test]
fn test_config_serialization_roundtrip_uses_camel_case() {
    let config = Config {
        debounce_ms: Some(150),
        history_max_results: Some(25),
        highlight: None,
        sources: None,
        open_links: Some(false),
    };

    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"debounceMs\":150"));
    assert!(json.contains("\"historyMaxResults\":25"));
    assert!(!json.contains("highlight"));

    let deserialized: Config = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized, config);
}

#[test]
fn test_partial_nested_config_fills_defaults() {
    let json = r#"{"sources": {"history": false}, "highlight": {"open": "<b>"}}"#;
    let config: Config = serde_json::from_str(json).unwrap();

    let sources = config.get_sources();
    assert!(sources.tabs);
    assert!(sources.bookmarks);
    assert!(!sources.is_enabled(Source::History));

    let highlight = config.get_highlight();
    assert_eq!(highlight.open, "<b>");
    assert_eq!(highlight.close, DEFAULT_HIGHLIGHT_CLOSE);
    assert!(highlight.enabled);
}

#[test]
fn test_load_config_from_file() {
    let file = write_config(r#"{"debounceMs": 50, "openLinks": false}"#);
    let config = load_config_from(file.path()).unwrap();
    assert_eq!(config.get_debounce(), Duration::from_millis(50));
    assert!(!config.should_open_links());
}

#[test]
fn test_load_config_from_malformed_file() {
    let file = write_config("{ not json");
    let err = load_config_from(file.path()).unwrap_err();
    assert!(matches!(err, SearchError::ConfigParse(_)));
}

#[test]
fn test_load_config_rejects_zero_history_cap() {
    let file = write_config(r#"{"historyMaxResults": 0}"#);
    let err = load_config_from(file.path()).unwrap_err();
    assert!(matches!(err, SearchError::Config(_)));
}

#[test]
fn test_load_config_from_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_config_from(&dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, SearchError::Io { .. }));
}
