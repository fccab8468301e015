//! Plain-text list view for terminals and pipes.
//!
//! Every change reprints the whole list as a block of lines:
//!
//! ```text
//!   --
//! > [T][H]    example.com  [Example] Site
//!   [B]       blog.example.org  Example Blog
//! ```

use std::io::{self, Write};

use crate::config::HighlightConfig;
use crate::error::ResultExt;
use crate::list_view::{ListView, RowView};
use crate::logging;
use crate::navigation::Focus;
use crate::sources::SourceSet;

/// Width of the badge column: three `[X]` glyphs
const BADGE_WIDTH: usize = 9;

pub struct TerminalListView<W: Write> {
    out: W,
    rows: Vec<RowView>,
    focus: Focus,
    empty_visible: bool,
    highlight: HighlightConfig,
    /// Suppress redraws until `flush_frame`
    batching: bool,
    /// Recent log lines printed under the list
    log_lines: usize,
}

impl<W: Write> TerminalListView<W> {
    pub fn new(out: W, highlight: HighlightConfig) -> Self {
        TerminalListView {
            out,
            rows: Vec::new(),
            focus: Focus::SearchInput,
            empty_visible: false,
            highlight,
            batching: false,
            log_lines: 0,
        }
    }

    /// Show the newest `count` log lines as a footer
    pub fn with_log_footer(mut self, count: usize) -> Self {
        self.log_lines = count;
        self
    }

    /// Hold redraws (one-shot mode prints only the final frame)
    pub fn set_batching(&mut self, batching: bool) {
        self.batching = batching;
    }

    /// The current frame, one string per line
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        let input_marker = if self.focus == Focus::SearchInput { ">" } else { " " };
        lines.push(format!("{} --", input_marker));

        for (index, row) in self.rows.iter().enumerate() {
            let marker = if self.focus == Focus::ResultRow(index) { ">" } else { " " };
            let badges = badges(row.sources);
            let title = if self.highlight.enabled {
                row.title.render(&self.highlight.open, &self.highlight.close)
            } else {
                row.title.text.clone()
            };
            lines.push(format!(
                "{} {:<width$} {}  {}",
                marker,
                badges,
                row.domain,
                title,
                width = BADGE_WIDTH
            ));
        }

        if self.empty_visible {
            lines.push("  No results".to_string());
        }

        if self.log_lines > 0 {
            let mut recent = logging::get_last_logs(self.log_lines);
            recent.reverse();
            lines.extend(recent.into_iter().map(|line| format!("  | {}", line)));
        }
        lines
    }

    /// Print the current frame
    pub fn flush_frame(&mut self) -> io::Result<()> {
        let lines = self.lines();
        for line in lines {
            writeln!(self.out, "{}", line)?;
        }
        self.out.flush()
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn redraw(&mut self) {
        if !self.batching {
            self.flush_frame().warn_on_err();
        }
    }
}

fn badges(sources: SourceSet) -> String {
    sources
        .icons()
        .iter()
        .map(|icon| format!("[{}]", icon))
        .collect()
}

impl<W: Write> ListView for TerminalListView<W> {
    fn insert_row(&mut self, index: usize, row: RowView) {
        let index = index.min(self.rows.len());
        self.rows.insert(index, row);
        self.redraw();
    }

    fn update_row(&mut self, url: &str, sources: SourceSet) -> bool {
        let Some(row) = self.rows.iter_mut().find(|r| r.url == url) else {
            return false;
        };
        row.sources = sources;
        self.redraw();
        true
    }

    fn clear(&mut self) {
        self.rows.clear();
        self.empty_visible = false;
        self.redraw();
    }

    fn show_empty(&mut self, visible: bool) {
        self.empty_visible = visible;
        self.redraw();
    }

    fn set_focus(&mut self, focus: Focus) {
        if self.focus != focus {
            self.focus = focus;
            self.redraw();
        }
    }
}
