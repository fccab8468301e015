use std::cell::RefCell;

use tracing::info;

use super::LinkOpener;
use crate::error::{Result, SearchError};

/// Opens links with the platform's default handler
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLinkOpener;

impl LinkOpener for SystemLinkOpener {
    fn open(&self, url: &str) -> Result<()> {
        info!(url = %url, "Opening link");
        open::that(url).map_err(|e| SearchError::LinkOpen {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

/// Records every opened url instead of opening it.
/// Used for `--dry-run` and in tests.
#[derive(Debug, Default)]
pub struct RecordingLinkOpener {
    opened: RefCell<Vec<String>>,
}

impl RecordingLinkOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }
}

impl LinkOpener for RecordingLinkOpener {
    fn open(&self, url: &str) -> Result<()> {
        info!(url = %url, "Recorded link open");
        self.opened.borrow_mut().push(url.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_opener_keeps_order() {
        let opener = RecordingLinkOpener::new();
        opener.open("https://a.com/").unwrap();
        opener.open("https://b.com/").unwrap();
        assert_eq!(opener.opened(), vec!["https://a.com/", "https://b.com/"]);
    }

    #[cfg(feature = "system-tests")]
    #[test]
    fn test_system_opener_opens_url() {
        SystemLinkOpener.open("https://example.com/").unwrap();
    }
}
