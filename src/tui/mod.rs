mod ansi;
mod canvas;
mod clipboard;
mod draw;
mod help;
mod state;

use crate::bridge::{self, BridgeReceiver, BridgeSender, InboundFrames};
use crate::config::{ClientConfig, UiConfig};
use crate::rpc::GrpcAnalyzer;
use crate::session::{self, SessionEvent, SessionStore, SessionView};
use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use state::{Focus, ServerStatus, UiState, TAB_HELP, TAB_SESSION};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// `params` pre-fills the params field, e.g. from `--args`.
pub async fn run(cfg: ClientConfig, params: Option<String>) -> Result<()> {
    let analyzer = Arc::new(GrpcAnalyzer::connect_lazy(&cfg.server)?);
    let address = analyzer.address().to_string();

    // Reachability is informational; submission never waits for it.
    let (notice_tx, notice_rx) = mpsc::unbounded_channel::<ServerStatus>();
    let pinger = analyzer.clone();
    tokio::spawn(async move {
        let status = match pinger.ping().await {
            Ok(()) => ServerStatus::Reachable,
            Err(e) => {
                tracing::warn!("ping failed: {e}");
                ServerStatus::Unreachable(e.to_string())
            }
        };
        let _ = notice_tx.send(status);
    });

    let (sender, frames, worker) = bridge::spawn(analyzer);

    // TUI runs in a dedicated thread to keep all blocking I/O out of the Tokio runtime.
    let ui = cfg.ui.clone();
    let ui_handle =
        std::thread::spawn(move || run_threaded(ui, address, params, sender, frames, notice_rx));

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    let ui_res = match join_res {
        Ok(Ok(res)) => res,
        Ok(Err(_)) => Err(anyhow::anyhow!("TUI thread panicked")),
        Err(e) => Err(anyhow::anyhow!("TUI thread join failed: {e}")),
    };

    // The UI thread dropped the sender on exit, which stops the worker.
    worker.await.context("bridge worker task failed")??;
    ui_res
}

/// Run the TUI loop on a dedicated thread.
///
/// The session store and its bridge handlers are created here and never leave this thread.
pub fn run_threaded(
    ui: UiConfig,
    address: String,
    params: Option<String>,
    sender: BridgeSender,
    frames: InboundFrames,
    mut notices: UnboundedReceiver<ServerStatus>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();
    if ui.mouse {
        execute!(stdout, EnableMouseCapture).ok();
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    let store = Rc::new(RefCell::new(SessionStore::new(sender)));
    let mut receiver = BridgeReceiver::new(frames);
    session::attach(&store, &mut receiver);
    if let Some(params) = params {
        store.borrow_mut().apply(SessionEvent::ParamsEdited(params));
    }

    let mut state = UiState::new(address);
    let tick_rate = Duration::from_millis(ui.tick_rate_ms.max(10));
    let mut last_tick = Instant::now();
    let mut first_frame = true;

    let res = loop {
        // Responses are applied here, on the thread that owns the session.
        receiver.pump();
        while let Ok(status) = notices.try_recv() {
            state.server_status = status;
        }
        state.sync(store.borrow().session());

        if first_frame || last_tick.elapsed() >= tick_rate {
            state.spinner_tick = state.spinner_tick.wrapping_add(1);
            let store = store.borrow();
            terminal
                .draw(|f| draw::draw(f, &mut state, store.session()))
                .ok();
            last_tick = Instant::now();
            first_frame = false;
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(k)) if k.kind == KeyEventKind::Press => {
                    if handle_key(k, &mut state, &store) == Flow::Quit {
                        break Ok(());
                    }
                }
                Ok(Event::Mouse(m)) => match m.kind {
                    MouseEventKind::Moved => state.hover_at(m.column, m.row),
                    MouseEventKind::ScrollDown => state.scroll_table(3),
                    MouseEventKind::ScrollUp => state.scroll_table(-3),
                    _ => {}
                },
                _ => {}
            }
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    if ui.mouse {
        execute!(stdout, DisableMouseCapture).ok();
    }
    execute!(stdout, LeaveAlternateScreen).ok();
    res
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

fn handle_key(k: KeyEvent, state: &mut UiState, store: &Rc<RefCell<SessionStore>>) -> Flow {
    let (params, item_id, submit_enabled, lookup) = {
        let store = store.borrow();
        let view = SessionView::of(store.session());
        (
            view.params.to_string(),
            view.item_lookup.map(str::to_string),
            view.submit_enabled,
            view.item_lookup.is_some(),
        )
    };
    let focused = match state.focus {
        Focus::ItemId if lookup => Focus::ItemId,
        _ => Focus::Params,
    };
    let edit = |text: String| match focused {
        Focus::Params => SessionEvent::ParamsEdited(text),
        Focus::ItemId => SessionEvent::ItemIdEdited(text),
    };
    let current = match focused {
        Focus::Params => params.clone(),
        Focus::ItemId => item_id.clone().unwrap_or_default(),
    };

    match (k.modifiers, k.code) {
        (_, KeyCode::Esc) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Flow::Quit,
        (_, KeyCode::F(1)) => {
            state.tab = if state.tab == TAB_HELP {
                TAB_SESSION
            } else {
                TAB_HELP
            };
        }
        _ if state.tab == TAB_HELP => {}
        (_, KeyCode::Tab) | (_, KeyCode::BackTab) => {
            state.focus = match focused {
                Focus::Params if lookup => Focus::ItemId,
                _ => Focus::Params,
            };
        }
        (_, KeyCode::Enter) => match focused {
            Focus::Params => {
                if !submit_enabled {
                    state.info = "Analysis already running".into();
                } else if params.is_empty() {
                    state.info = "Enter params first".into();
                } else {
                    state.info.clear();
                    store
                        .borrow_mut()
                        .apply(SessionEvent::PrimarySubmitted(params));
                }
            }
            Focus::ItemId => {
                let id = item_id.unwrap_or_default();
                if id.is_empty() {
                    state.info = "Enter a clonotype id first".into();
                } else {
                    state.info.clear();
                    store.borrow_mut().apply(SessionEvent::SecondarySubmitted(id));
                }
            }
        },
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
            store.borrow_mut().apply(edit(String::new()));
        }
        (KeyModifiers::CONTROL, KeyCode::Char('y')) => {
            let text = state.table_text();
            state.info = if text.is_empty() {
                "No table to copy".into()
            } else {
                match clipboard::copy_to_clipboard(&text) {
                    Ok(()) => "✓ Copied table to clipboard".into(),
                    Err(e) => format!("Clipboard copy failed: {e:#}"),
                }
            };
        }
        (_, KeyCode::Backspace) => {
            let mut text = current;
            if text.pop().is_some() {
                store.borrow_mut().apply(edit(text));
            }
        }
        (KeyModifiers::NONE, KeyCode::Char(c)) | (KeyModifiers::SHIFT, KeyCode::Char(c)) => {
            let mut text = current;
            text.push(c);
            store.borrow_mut().apply(edit(text));
        }
        (_, KeyCode::Up) => state.cycle_hover(false),
        (_, KeyCode::Down) => state.cycle_hover(true),
        (_, KeyCode::PageDown) => state.scroll_table(10),
        (_, KeyCode::PageUp) => state.scroll_table(-10),
        (_, KeyCode::Home) => state.table_scroll = 0,
        _ => {}
    }
    Flow::Continue
}
