use super::canvas::draw_diagram;
use super::help::draw_help;
use super::state::{push_wrapped_kv, Focus, ServerStatus, UiState, TAB_HELP};
use crate::session::{Session, SessionView};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn draw(f: &mut Frame, state: &mut UiState, session: &Session) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(f.area());

    let tabs = Tabs::new(vec![Line::from("Session"), Line::from("Help")])
        .select(state.tab)
        .block(Block::default().borders(Borders::ALL).title("enclone-client"))
        .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(tabs, chunks[0]);

    if state.tab == TAB_HELP {
        state.diagram_area = None;
        draw_help(chunks[1], f, &state.server_address);
    } else {
        draw_session(chunks[1], f, state, session);
    }
}

fn input_block(title: String, focused: bool) -> Block<'static> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
}

/// Single-line text field that keeps its tail visible and places the cursor when focused.
fn draw_input(area: Rect, f: &mut Frame, block: Block<'static>, text: &str, focused: bool) {
    let inner = block.inner(area);
    let len = text.chars().count() as u16;
    let offset = len.saturating_sub(inner.width.saturating_sub(1));
    f.render_widget(
        Paragraph::new(text.to_string())
            .scroll((0, offset))
            .block(block),
        area,
    );
    if focused && inner.width > 0 {
        f.set_cursor_position((inner.x + (len - offset).min(inner.width - 1), inner.y));
    }
}

fn draw_session(area: Rect, f: &mut Frame, state: &mut UiState, session: &Session) {
    let view = SessionView::of(session);

    let mut constraints = vec![Constraint::Length(3)];
    if view.item_lookup.is_some() {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(4));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let params_title = if view.submit_enabled {
        "Params (Enter to run)".to_string()
    } else {
        "Params (running…)".to_string()
    };
    let on_params = state.focus == Focus::Params;
    draw_input(
        rows[0],
        f,
        input_block(params_title, on_params),
        view.params,
        on_params,
    );

    let mut next = 1;
    if let Some(item_id) = view.item_lookup {
        let on_item = state.focus == Focus::ItemId;
        draw_input(
            rows[1],
            f,
            input_block("Clonotype id (Enter to look up)".to_string(), on_item),
            item_id,
            on_item,
        );
        next = 2;
    }
    let body = rows[next];
    let status = rows[next + 1];

    if view.diagram.is_some() {
        draw_results(body, f, state);
    } else {
        state.diagram_area = None;
        let line = if view.loading {
            let frame = SPINNER[state.spinner_tick % SPINNER.len()];
            Line::from(Span::styled(
                format!("{frame} Running analysis…"),
                Style::default().fg(Color::Yellow),
            ))
        } else if let Some(banner) = view.error_banner {
            Line::from(Span::styled(
                banner,
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ))
        } else {
            Line::from(Span::styled(
                "Enter analysis params, e.g. BCR=123085 GEX=123217, and press Enter.",
                Style::default().fg(Color::DarkGray),
            ))
        };
        f.render_widget(
            Paragraph::new(line)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL)),
            body,
        );
    }

    draw_status(status, f, state, &view);
}

fn draw_results(area: Rect, f: &mut Frame, state: &mut UiState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)].as_ref())
        .split(area);

    let block = Block::default().borders(Borders::ALL).title("Diagram");
    state.diagram_area = Some(block.inner(cols[0]));
    match state.diagram.as_ref() {
        Some(diagram) => draw_diagram(cols[0], f, block, diagram, state.hover),
        None => {
            let reason = state.diagram_error.as_deref().unwrap_or("nothing to draw");
            f.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    format!("Diagram unavailable: {reason}"),
                    Style::default().fg(Color::DarkGray),
                )))
                .wrap(Wrap { trim: true })
                .block(block),
                cols[0],
            );
        }
    }

    let mut tooltip = Vec::new();
    for (label, value) in state.tooltip_rows() {
        push_wrapped_kv(&mut tooltip, &label, &value, cols[1].width);
    }
    if tooltip.is_empty() {
        tooltip.push(Line::from(Span::styled(
            "Point at an element for details",
            Style::default().fg(Color::DarkGray),
        )));
    }
    let tooltip_height = (tooltip.len() as u16 + 2).clamp(3, 12);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(tooltip_height), Constraint::Min(0)].as_ref())
        .split(cols[1]);
    f.render_widget(
        Paragraph::new(tooltip).block(Block::default().borders(Borders::ALL).title("Details")),
        right[0],
    );

    let visible = right[1].height.saturating_sub(2) as usize;
    let lines: Vec<Line> = if state.table_lines.is_empty() {
        vec![Line::from(Span::styled(
            "No rows",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        state
            .table_lines
            .iter()
            .skip(state.table_scroll as usize)
            .take(visible)
            .cloned()
            .collect()
    };
    let title = if state.table_lines.len() > visible {
        format!(
            "Table {}/{}",
            state.table_scroll as usize + 1,
            state.table_lines.len()
        )
    } else {
        "Table".to_string()
    };
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title)),
        right[1],
    );
}

fn draw_status(area: Rect, f: &mut Frame, state: &UiState, view: &SessionView) {
    let reachability = match &state.server_status {
        ServerStatus::Unknown => Span::styled("checking…", Style::default().fg(Color::Gray)),
        ServerStatus::Reachable => Span::styled("server reachable", Style::default().fg(Color::Green)),
        ServerStatus::Unreachable(_) => Span::styled(
            format!("server unreachable at {}", state.server_address),
            Style::default().fg(Color::Red),
        ),
    };
    let mut lines = vec![Line::from(vec![
        Span::styled("Server: ", Style::default().fg(Color::Gray)),
        Span::raw(state.server_address.clone()),
        Span::raw("  "),
        reachability,
    ])];

    let mut second = Vec::new();
    if let Some(banner) = view.loaded_banner.as_ref() {
        second.push(Span::styled(banner.clone(), Style::default().fg(Color::Green)));
    }
    if !state.info.is_empty() {
        if !second.is_empty() {
            second.push(Span::raw("  |  "));
        }
        second.push(Span::raw(state.info.clone()));
    }
    lines.push(Line::from(second));

    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Status")),
        area,
    );
}
