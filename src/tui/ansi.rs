//! ANSI SGR escape handling for the tables the server renders for a terminal.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

enum Token<'a> {
    Text(&'a str),
    /// Parameters of an SGR sequence (`ESC [ ... m`), without the delimiters.
    Sgr(&'a str),
}

fn tokens(raw: &str) -> Vec<Token<'_>> {
    let bytes = raw.as_bytes();
    let mut out = Vec::new();
    let (mut start, mut i) = (0, 0);
    while i < bytes.len() {
        if bytes[i] != 0x1b {
            i += 1;
            continue;
        }
        if start < i {
            out.push(Token::Text(&raw[start..i]));
        }
        let mut j = i + 1;
        if bytes.get(j) == Some(&b'[') {
            j += 1;
            let params = j;
            // Parameter bytes (including private markers like `?`), then intermediates.
            while j < bytes.len() && (0x30..=0x3f).contains(&bytes[j]) {
                j += 1;
            }
            let param_end = j;
            while j < bytes.len() && (0x20..=0x2f).contains(&bytes[j]) {
                j += 1;
            }
            let sgr = j == param_end
                && raw[params..j].bytes().all(|b| b.is_ascii_digit() || b == b';');
            match bytes.get(j) {
                Some(b'm') if sgr => {
                    out.push(Token::Sgr(&raw[params..j]));
                    j += 1;
                }
                // Cursor movement, erase and the like carry nothing worth showing.
                Some(b) if (0x40..=0x7e).contains(b) => j += 1,
                _ => {}
            }
        }
        i = j;
        start = j;
    }
    if start < bytes.len() {
        out.push(Token::Text(&raw[start..]));
    }
    out
}

/// Remove every escape sequence, e.g. before copying to the clipboard.
pub fn strip(text: &str) -> String {
    tokens(text)
        .into_iter()
        .filter_map(|t| match t {
            Token::Text(s) => Some(s),
            Token::Sgr(_) => None,
        })
        .collect()
}

/// Convert text with SGR colour codes into styled lines. Styles carry across line breaks.
pub fn to_lines(text: &str) -> Vec<Line<'static>> {
    let mut style = Style::default();
    text.split('\n')
        .map(|raw| {
            let raw = raw.strip_suffix('\r').unwrap_or(raw);
            let mut spans = Vec::new();
            for token in tokens(raw) {
                match token {
                    Token::Text(s) => spans.push(Span::styled(s.to_string(), style)),
                    Token::Sgr(params) => style = apply_sgr(style, params),
                }
            }
            Line::from(spans)
        })
        .collect()
}

fn basic(n: u16) -> Color {
    match n {
        0 => Color::Black,
        1 => Color::Red,
        2 => Color::Green,
        3 => Color::Yellow,
        4 => Color::Blue,
        5 => Color::Magenta,
        6 => Color::Cyan,
        _ => Color::Gray,
    }
}

fn bright(n: u16) -> Color {
    match n {
        0 => Color::DarkGray,
        1 => Color::LightRed,
        2 => Color::LightGreen,
        3 => Color::LightYellow,
        4 => Color::LightBlue,
        5 => Color::LightMagenta,
        6 => Color::LightCyan,
        _ => Color::White,
    }
}

/// Parse the tail of a `38`/`48` extended colour; returns the colour and how many codes it used.
fn extended(rest: &[u16]) -> Option<(Color, usize)> {
    match rest {
        [5, n, ..] => Some((Color::Indexed((*n).min(255) as u8), 2)),
        [2, r, g, b, ..] => Some((
            Color::Rgb((*r).min(255) as u8, (*g).min(255) as u8, (*b).min(255) as u8),
            4,
        )),
        _ => None,
    }
}

fn apply_sgr(mut style: Style, params: &str) -> Style {
    let codes: Vec<u16> = if params.is_empty() {
        vec![0]
    } else {
        params
            .split(';')
            .map(|p| p.parse().unwrap_or(0))
            .collect()
    };

    let mut i = 0;
    while i < codes.len() {
        let code = codes[i];
        i += 1;
        style = match code {
            0 => Style::default(),
            1 => style.add_modifier(Modifier::BOLD),
            2 => style.add_modifier(Modifier::DIM),
            3 => style.add_modifier(Modifier::ITALIC),
            4 => style.add_modifier(Modifier::UNDERLINED),
            7 => style.add_modifier(Modifier::REVERSED),
            22 => style.remove_modifier(Modifier::BOLD | Modifier::DIM),
            23 => style.remove_modifier(Modifier::ITALIC),
            24 => style.remove_modifier(Modifier::UNDERLINED),
            27 => style.remove_modifier(Modifier::REVERSED),
            30..=37 => style.fg(basic(code - 30)),
            39 => style.fg(Color::Reset),
            40..=47 => style.bg(basic(code - 40)),
            49 => style.bg(Color::Reset),
            90..=97 => style.fg(bright(code - 90)),
            100..=107 => style.bg(bright(code - 100)),
            38 | 48 => match extended(&codes[i..]) {
                Some((color, used)) => {
                    i += used;
                    if code == 38 {
                        style.fg(color)
                    } else {
                        style.bg(color)
                    }
                }
                None => break,
            },
            _ => style,
        };
    }
    style
}
