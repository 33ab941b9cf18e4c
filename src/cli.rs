use crate::bridge::{self, BridgeReceiver};
use crate::config::ClientConfig;
use crate::diagram::Diagram;
use crate::logging::{self, LogTarget};
use crate::rpc::GrpcAnalyzer;
use crate::session::{self, PrimaryStatus, Session, SessionEvent, SessionStore};
use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use std::cell::RefCell;
use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Output line routing for stdout/stderr writer.
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Spawn a blocking writer for stdout/stderr to avoid blocking async tasks.
fn spawn_output_writer() -> (
    mpsc::UnboundedSender<OutputLine>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let handle = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let mut out = std::io::LineWriter::new(stdout.lock());
        let mut err = std::io::LineWriter::new(stderr.lock());

        while let Some(line) = rx.blocking_recv() {
            match line {
                OutputLine::Stdout(msg) => {
                    let _ = writeln!(out, "{}", msg);
                }
                OutputLine::Stderr(msg) => {
                    let _ = writeln!(err, "{}", msg);
                }
            }
        }

        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "enclone-client",
    version,
    about = "Terminal client for an enclone analysis server"
)]
pub struct Cli {
    /// Analysis server host (overrides config and ENCLONE_SERVER)
    #[arg(long)]
    pub host: Option<String>,

    /// Analysis server port
    #[arg(long)]
    pub port: Option<u16>,

    /// Config file (default: <config dir>/enclone-client/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// How long to wait for the server connection
    #[arg(long)]
    pub connect_timeout: Option<humantime::Duration>,

    /// Deadline for each call; unset waits as long as the server takes
    #[arg(long)]
    pub request_timeout: Option<humantime::Duration>,

    /// Print a text summary and exit (no TUI)
    #[arg(long)]
    pub text: bool,

    /// Print the final session as JSON and exit (no TUI)
    #[arg(long)]
    pub json: bool,

    /// Check that the server answers and exit
    #[arg(long)]
    pub ping: bool,

    /// Analysis params, e.g. "BCR=123085 GEX=123217". Pre-fills the params field in the TUI
    #[arg(long = "args", value_name = "PARAMS")]
    pub params: Option<String>,

    /// Clonotype id to look up after the analysis (--text/--json)
    #[arg(long)]
    pub item: Option<String>,

    /// Log file used while the TUI is running
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Do not capture the mouse (disables hover tooltips, keeps terminal selection)
    #[arg(long)]
    pub no_mouse: bool,
}

/// Resolve configuration: defaults, then file, then environment, then flags.
pub fn build_config(args: &Cli) -> Result<ClientConfig> {
    let mut cfg = ClientConfig::load(args.config.as_deref())?;
    cfg.apply_env()?;
    if let Some(host) = args.host.as_ref() {
        cfg.server.host = host.clone();
    }
    if let Some(port) = args.port {
        cfg.server.port = port;
    }
    if let Some(t) = args.connect_timeout {
        cfg.server.connect_timeout = t.into();
    }
    if let Some(t) = args.request_timeout {
        cfg.server.request_timeout = Some(t.into());
    }
    if let Some(path) = args.log_file.as_ref() {
        cfg.log.file = Some(path.clone());
    }
    if args.no_mouse {
        cfg.ui.mouse = false;
    }
    Ok(cfg)
}

/// Reject flag combinations that would otherwise be silently ignored.
fn check_mode(args: &Cli) -> Result<()> {
    if args.text && args.json {
        bail!("--text and --json are mutually exclusive");
    }
    if args.item.is_some() && !(args.text || args.json) {
        bail!("--item needs --text or --json");
    }
    Ok(())
}

pub async fn run(args: Cli) -> Result<()> {
    check_mode(&args)?;
    let cfg = build_config(&args)?;
    let headless = args.text || args.json || args.ping;

    if !headless {
        #[cfg(feature = "tui")]
        {
            let path = cfg.log.file.clone().unwrap_or_else(crate::config::default_log_path);
            logging::init(&cfg.log, LogTarget::File(&path))?;
            tracing::info!(server = %cfg.server.address(), "starting terminal UI");
            return crate::tui::run(cfg, args.params.clone()).await;
        }
    }

    logging::init(&cfg.log, LogTarget::Stderr)?;
    if args.ping {
        return run_ping(&cfg).await;
    }
    // Fallback when built without TUI support.
    run_headless(&args, &cfg).await
}

async fn run_ping(cfg: &ClientConfig) -> Result<()> {
    let analyzer = GrpcAnalyzer::connect_lazy(&cfg.server)?;
    analyzer
        .ping()
        .await
        .with_context(|| format!("server unreachable at {}", analyzer.address()))?;
    println!("server reachable at {}", analyzer.address());
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    timestamp_utc: String,
    server: String,
    session: &'a Session,
}

/// Drive the same store, bridge and worker as the TUI, without a terminal.
async fn run_headless(args: &Cli, cfg: &ClientConfig) -> Result<()> {
    let Some(params) = args.params.clone() else {
        bail!("--args is required without the terminal UI");
    };

    let analyzer = Arc::new(GrpcAnalyzer::connect_lazy(&cfg.server)?);
    let server = analyzer.address().to_string();
    let (sender, frames, worker) = bridge::spawn(analyzer);
    let mut receiver = BridgeReceiver::new(frames);
    let store = Rc::new(RefCell::new(SessionStore::new(sender)));
    session::attach(&store, &mut receiver);

    let (out_tx, out_handle) = spawn_output_writer();
    let _ = out_tx.send(OutputLine::Stderr(format!("Running with args {params}")));

    store
        .borrow_mut()
        .apply(SessionEvent::PrimarySubmitted(params));
    while store.borrow().session().status == PrimaryStatus::Pending {
        if !receiver.pump_next().await {
            break;
        }
    }

    if let Some(id) = args.item.clone() {
        if store.borrow().session().status == PrimaryStatus::Ready {
            let _ = out_tx.send(OutputLine::Stderr(format!("Looking up clonotype {id}")));
            store
                .borrow_mut()
                .apply(SessionEvent::SecondarySubmitted(id));
            while store.borrow().session().secondary_in_flight() {
                if !receiver.pump_next().await {
                    break;
                }
            }
        }
    }

    let session = store.borrow().session().clone();
    if args.json {
        let timestamp_utc = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .context("format timestamp")?;
        let report = JsonReport {
            timestamp_utc,
            server: server.clone(),
            session: &session,
        };
        let _ = out_tx.send(OutputLine::Stdout(serde_json::to_string_pretty(&report)?));
    } else {
        let diagram = Diagram::parse(&session.diagram).ok();
        for line in crate::text_summary::build_text_summary(&session, &server, diagram.as_ref()) {
            let _ = out_tx.send(OutputLine::Stdout(line));
        }
    }

    // Dropping the store drops the sender, which lets the worker finish.
    drop(receiver);
    drop(store);
    drop(out_tx);
    let _ = out_handle.await;
    worker.await.context("bridge worker task failed")??;

    if session.status == PrimaryStatus::Errored {
        bail!("analysis failed; see the log for the server's reason");
    }
    Ok(())
}
