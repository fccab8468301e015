//! Abstract result list the popup renders into
//!
//! The popup never touches a concrete widget. It drives a `ListView` with
//! incremental operations (insert a row, refresh a row's badges, clear, toggle
//! the "no results" indicator) so any front end can render without flicker.

use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;

use crate::navigation::Focus;
use crate::query::Query;
use crate::sources::SourceSet;

/// A title with an optional highlighted span (first query occurrence)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedTitle {
    pub text: String,
    /// Byte range into `text`
    pub highlight: Option<Range<usize>>,
}

impl HighlightedTitle {
    pub fn plain(text: impl Into<String>) -> Self {
        HighlightedTitle {
            text: text.into(),
            highlight: None,
        }
    }

    /// Highlight the first case-insensitive occurrence of the query
    pub fn for_query(text: &str, query: &Query) -> Self {
        HighlightedTitle {
            text: text.to_string(),
            highlight: query.find_in(text),
        }
    }

    /// Render with the highlighted span wrapped in `open`/`close` markers
    pub fn render(&self, open: &str, close: &str) -> String {
        match &self.highlight {
            Some(range) => format!(
                "{}{}{}{}{}",
                &self.text[..range.start],
                open,
                &self.text[range.clone()],
                close,
                &self.text[range.end..]
            ),
            None => self.text.clone(),
        }
    }
}

/// Everything a front end needs to draw one result row
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    /// Row identity; also the link target
    pub url: String,
    pub domain: String,
    pub title: HighlightedTitle,
    pub sources: SourceSet,
}

/// Incremental list rendering capability
pub trait ListView {
    /// Insert a new row so that it ends up at `index`
    fn insert_row(&mut self, index: usize, row: RowView);

    /// Refresh the provenance badges of the row whose link is exactly `url`.
    /// Returns false if no such row exists.
    fn update_row(&mut self, url: &str, sources: SourceSet) -> bool;

    /// Remove every row and the "no results" indicator
    fn clear(&mut self);

    /// Show or hide the single "no results" indicator
    fn show_empty(&mut self, visible: bool);

    /// Move the visual focus marker
    fn set_focus(&mut self, _focus: Focus) {}
}

/// Shared handle, so a caller can keep inspecting a view the popup owns
impl<V: ListView> ListView for Rc<RefCell<V>> {
    fn insert_row(&mut self, index: usize, row: RowView) {
        self.borrow_mut().insert_row(index, row)
    }
    fn update_row(&mut self, url: &str, sources: SourceSet) -> bool {
        self.borrow_mut().update_row(url, sources)
    }
    fn clear(&mut self) {
        self.borrow_mut().clear()
    }
    fn show_empty(&mut self, visible: bool) {
        self.borrow_mut().show_empty(visible)
    }
    fn set_focus(&mut self, focus: Focus) {
        self.borrow_mut().set_focus(focus)
    }
}

/// A list operation, as recorded by `RecordingListView`
#[derive(Debug, Clone, PartialEq)]
pub enum ListOp {
    Insert { index: usize, url: String },
    Update { url: String, sources: SourceSet },
    Clear,
    ShowEmpty(bool),
    Focus(Focus),
}

/// In-memory list view that keeps the current rows and a log of operations
#[derive(Debug, Default)]
pub struct RecordingListView {
    rows: Vec<RowView>,
    ops: Vec<ListOp>,
    empty_visible: bool,
    focus: Focus,
}

impl RecordingListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap in a shared handle for handing to a popup
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn rows(&self) -> &[RowView] {
        &self.rows
    }

    pub fn ops(&self) -> &[ListOp] {
        &self.ops
    }

    pub fn urls(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.url.as_str()).collect()
    }

    pub fn row(&self, url: &str) -> Option<&RowView> {
        self.rows.iter().find(|r| r.url == url)
    }

    pub fn is_empty_visible(&self) -> bool {
        self.empty_visible
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }
}

impl ListView for RecordingListView {
    fn insert_row(&mut self, index: usize, row: RowView) {
        let index = index.min(self.rows.len());
        self.ops.push(ListOp::Insert {
            index,
            url: row.url.clone(),
        });
        self.rows.insert(index, row);
    }

    fn update_row(&mut self, url: &str, sources: SourceSet) -> bool {
        self.ops.push(ListOp::Update {
            url: url.to_string(),
            sources,
        });
        match self.rows.iter_mut().find(|r| r.url == url) {
            Some(row) => {
                row.sources = sources;
                true
            }
            None => false,
        }
    }

    fn clear(&mut self) {
        self.ops.push(ListOp::Clear);
        self.rows.clear();
        self.empty_visible = false;
    }

    fn show_empty(&mut self, visible: bool) {
        self.ops.push(ListOp::ShowEmpty(visible));
        self.empty_visible = visible;
    }

    fn set_focus(&mut self, focus: Focus) {
        self.ops.push(ListOp::Focus(focus));
        self.focus = focus;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(url: &str) -> RowView {
        RowView {
            url: url.to_string(),
            domain: "example.com".to_string(),
            title: HighlightedTitle::plain("Example"),
            sources: SourceSet::TAB,
        }
    }

    #[test]
    fn test_highlight_renders_first_occurrence() {
        let title = HighlightedTitle::for_query("Rust by rust", &Query::new("RUST"));
        assert_eq!(title.render("<b>", "</b>"), "<b>Rust</b> by rust");
    }

    #[test]
    fn test_highlight_absent_when_only_url_matched() {
        let title = HighlightedTitle::for_query("Home", &Query::new("example"));
        assert_eq!(title.highlight, None);
        assert_eq!(title.render("[", "]"), "Home");
    }

    #[test]
    fn test_recording_view_updates_by_exact_url() {
        let mut view = RecordingListView::new();
        view.insert_row(0, row("https://example.com/a"));
        view.insert_row(0, row("https://example.com/"));
        assert!(view.update_row("https://example.com/a", SourceSet::all()));
        assert!(!view.update_row("https://example.com/a/", SourceSet::all()));
        assert_eq!(view.urls(), vec!["https://example.com/", "https://example.com/a"]);
        assert_eq!(view.row("https://example.com/a").unwrap().sources, SourceSet::all());
        assert_eq!(view.row("https://example.com/").unwrap().sources, SourceSet::TAB);
    }

    #[test]
    fn test_shared_handle_forwards() {
        let shared = RecordingListView::shared();
        let mut handle: Box<dyn ListView> = Box::new(shared.clone());
        handle.insert_row(0, row("https://example.com/a"));
        handle.show_empty(true);
        assert_eq!(shared.borrow().rows().len(), 1);
        assert!(shared.borrow().is_empty_visible());
        handle.clear();
        assert!(shared.borrow().rows().is_empty());
        assert!(!shared.borrow().is_empty_visible());
    }
}
