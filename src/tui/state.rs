use super::ansi;
use crate::diagram::Diagram;
use crate::model::RequestId;
use crate::session::{PrimaryStatus, Session};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
};

pub const TAB_SESSION: usize = 0;
pub const TAB_HELP: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Params,
    ItemId,
}

/// Result of the startup reachability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerStatus {
    Unknown,
    Reachable,
    Unreachable(String),
}

/// Presentation-only state. Owned by the UI thread; session data lives in the store.
pub struct UiState {
    pub tab: usize,
    pub focus: Focus,
    pub server_address: String,
    pub server_status: ServerStatus,
    pub info: String,
    pub spinner_tick: usize,

    pub table_scroll: u16,
    pub table_lines: Vec<Line<'static>>,

    pub diagram: Option<Diagram>,
    pub diagram_error: Option<String>,
    /// Shape whose hover metadata is shown.
    pub hover: Option<usize>,
    /// Inner canvas rect from the last frame, for mapping pointer cells to diagram coordinates.
    pub diagram_area: Option<Rect>,

    seen_revision: Option<u64>,
    seen_result: Option<RequestId>,
    seen_table: String,
}

impl UiState {
    pub fn new(server_address: String) -> Self {
        Self {
            tab: TAB_SESSION,
            focus: Focus::Params,
            server_address,
            server_status: ServerStatus::Unknown,
            info: String::new(),
            spinner_tick: 0,
            table_scroll: 0,
            table_lines: Vec::new(),
            diagram: None,
            diagram_error: None,
            hover: None,
            diagram_area: None,
            seen_revision: None,
            seen_result: None,
            seen_table: String::new(),
        }
    }

    /// Refresh derived data after the session changed. Cheap when nothing did.
    pub fn sync(&mut self, s: &Session) {
        if self.seen_revision == Some(s.revision()) {
            return;
        }
        self.seen_revision = Some(s.revision());

        if s.loaded_params.is_empty() {
            self.focus = Focus::Params;
        }

        let shown = if s.status == PrimaryStatus::Ready {
            s.result_id()
        } else {
            None
        };
        if shown != self.seen_result {
            self.seen_result = shown;
            self.hover = None;
            self.diagram_error = None;
            self.diagram = match shown {
                Some(_) => match Diagram::parse(&s.diagram) {
                    Ok(d) => Some(d),
                    Err(e) => {
                        tracing::warn!("diagram not drawable: {e}");
                        self.diagram_error = Some(e.to_string());
                        None
                    }
                },
                None => None,
            };
        }

        let table = if shown.is_some() { s.table.as_str() } else { "" };
        if table != self.seen_table {
            self.seen_table = table.to_string();
            self.table_lines = if table.is_empty() {
                Vec::new()
            } else {
                ansi::to_lines(table)
            };
            self.table_scroll = 0;
        }
    }

    /// Plain table text for the clipboard.
    pub fn table_text(&self) -> String {
        ansi::strip(&self.seen_table)
    }

    /// Scroll by `delta` lines. The offset stops at the last line, or at `u16::MAX` since that is
    /// as far as a paragraph can scroll.
    pub fn scroll_table(&mut self, delta: i32) {
        let max = self
            .table_lines
            .len()
            .saturating_sub(1)
            .min(u16::MAX as usize) as i64;
        self.table_scroll = (i64::from(self.table_scroll) + i64::from(delta)).clamp(0, max) as u16;
    }

    /// Step the hover selection through shapes that carry metadata.
    pub fn cycle_hover(&mut self, forward: bool) {
        let Some(diagram) = self.diagram.as_ref() else {
            return;
        };
        let targets = diagram.hover_targets();
        if targets.is_empty() {
            self.hover = None;
            return;
        }
        let pos = self
            .hover
            .and_then(|h| targets.iter().position(|&t| t == h));
        let next = match (pos, forward) {
            (None, true) => 0,
            (None, false) => targets.len() - 1,
            (Some(p), true) => (p + 1) % targets.len(),
            (Some(p), false) => (p + targets.len() - 1) % targets.len(),
        };
        self.hover = Some(targets[next]);
    }

    /// Hover whatever lies under the terminal cell `(column, row)`.
    pub fn hover_at(&mut self, column: u16, row: u16) {
        let (Some(diagram), Some(area)) = (self.diagram.as_ref(), self.diagram_area) else {
            self.hover = None;
            return;
        };
        if area.width == 0
            || area.height == 0
            || column < area.x
            || row < area.y
            || column >= area.x + area.width
            || row >= area.y + area.height
        {
            self.hover = None;
            return;
        }
        let view = diagram.view;
        let cell_w = view.width / area.width as f64;
        let cell_h = view.height / area.height as f64;
        let x = view.x + (column - area.x) as f64 * cell_w + cell_w / 2.0;
        let y = view.y + (row - area.y) as f64 * cell_h + cell_h / 2.0;
        self.hover = diagram.hit_test(x, y, cell_w.max(cell_h) / 2.0);
    }

    pub fn tooltip_rows(&self) -> Vec<(String, String)> {
        match (self.diagram.as_ref(), self.hover) {
            (Some(d), Some(idx)) => d.tooltip_entries(idx),
            _ => Vec::new(),
        }
    }
}

/// Append `label: value`, wrapping the value to the panel width.
pub fn push_wrapped_kv(out: &mut Vec<Line<'static>>, label: &str, value: &str, width: u16) {
    let value = value.trim();
    // Account for borders (2 chars on each side)
    let usable = width.saturating_sub(4).max(1) as usize;
    let label_text = format!("{label}:");
    let chars: Vec<char> = value.chars().collect();
    let mut remaining = chars.as_slice();
    let mut first = true;

    loop {
        let line_width = if first {
            usable.saturating_sub(label_text.chars().count() + 1).max(1)
        } else {
            usable.saturating_sub(2).max(1)
        };
        let (head, rest) = remaining.split_at(remaining.len().min(line_width));
        let text: String = head.iter().collect();
        if first {
            out.push(Line::from(vec![
                Span::styled(label_text.clone(), Style::default().fg(Color::Gray)),
                Span::raw(" "),
                Span::raw(text),
            ]));
            first = false;
        } else {
            out.push(Line::from(vec![Span::raw("  "), Span::raw(text)]));
        }
        remaining = rest;
        if remaining.is_empty() {
            break;
        }
    }
}
