use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn keybind(keys: &'static str, pad: usize, what: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(keys, Style::default().fg(Color::Magenta)),
        Span::raw(" ".repeat(pad)),
        Span::raw(what),
    ])
}

pub fn draw_help(area: Rect, f: &mut Frame, server_address: &str) {
    let p = Paragraph::new(vec![
        Line::from("Keybinds:"),
        keybind("Esc / Ctrl-C", 4, "Quit"),
        keybind("F1", 14, "Toggle this help"),
        keybind("Tab", 13, "Switch between params and item id"),
        keybind("Enter", 11, "Run analysis / look up item"),
        keybind("Ctrl-U", 10, "Clear the focused field"),
        Line::from(""),
        Line::from("Results:"),
        keybind("↑/↓", 13, "Cycle through diagram tooltips"),
        keybind("PgUp/PgDn", 7, "Scroll the table"),
        keybind("Home", 12, "Back to the top of the table"),
        keybind("Ctrl-Y", 10, "Copy the table as plain text"),
        Line::from(""),
        Line::from("Mouse:"),
        Line::from("  Point at a diagram element to see its details."),
        Line::from("  Scroll over the table to move through it."),
        Line::from(""),
        Line::from(vec![
            Span::raw("Server: "),
            Span::styled(server_address.to_string(), Style::default().fg(Color::Cyan)),
        ]),
    ])
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}
