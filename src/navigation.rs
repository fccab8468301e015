//! Keyboard focus movement between the search input and result rows.
//!
//! Focus is either on the search input or on a result row by index. Arrow keys
//! move focus without wraparound, Enter on a row activates its link.

use std::str::FromStr;

use crate::error::SearchError;

/// Where keyboard focus currently is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    SearchInput,
    ResultRow(usize),
}

/// Keys the popup reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowUp,
    ArrowDown,
    Enter,
}

impl FromStr for NavKey {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" | "arrowup" => Ok(NavKey::ArrowUp),
            "down" | "arrowdown" => Ok(NavKey::ArrowDown),
            "enter" | "return" => Ok(NavKey::Enter),
            other => Err(SearchError::Command(format!("unknown key '{}'", other))),
        }
    }
}

/// Result of handling a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// Focus moved
    Moved(Focus),
    /// Activate the link of the row at this index
    Activate(usize),
    /// Nothing to do
    Ignored,
}

/// Focus state machine
#[derive(Debug, Default)]
pub struct Navigator {
    focus: Focus,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Handle a key given the current number of rendered rows
    pub fn handle_key(&mut self, key: NavKey, row_count: usize) -> NavOutcome {
        // Rows may have been cleared under a focused row
        if let Focus::ResultRow(i) = self.focus {
            if i >= row_count {
                self.focus = Focus::SearchInput;
            }
        }

        match (self.focus, key) {
            (Focus::SearchInput, NavKey::ArrowDown) if row_count > 0 => {
                self.move_to(Focus::ResultRow(0))
            }
            (Focus::ResultRow(i), NavKey::ArrowDown) if i + 1 < row_count => {
                self.move_to(Focus::ResultRow(i + 1))
            }
            (Focus::ResultRow(0), NavKey::ArrowUp) => self.move_to(Focus::SearchInput),
            (Focus::ResultRow(i), NavKey::ArrowUp) => self.move_to(Focus::ResultRow(i - 1)),
            (Focus::ResultRow(i), NavKey::Enter) => NavOutcome::Activate(i),
            _ => NavOutcome::Ignored,
        }
    }

    /// Keep focus on the same row when a row is inserted at or above it
    pub fn on_row_inserted(&mut self, index: usize) {
        if let Focus::ResultRow(i) = self.focus {
            if index <= i {
                self.focus = Focus::ResultRow(i + 1);
            }
        }
    }

    /// Return focus to the search input
    pub fn reset(&mut self) {
        self.focus = Focus::SearchInput;
    }

    fn move_to(&mut self, focus: Focus) -> NavOutcome {
        self.focus = focus;
        NavOutcome::Moved(focus)
    }
}
