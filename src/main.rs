mod bridge;
mod cli;
mod config;
mod diagram;
mod logging;
mod model;
mod rpc;
mod session;
mod text_summary;
#[cfg(feature = "tui")]
mod tui;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let is_non_tui = args.json || args.text || args.ping;

    cli::run(args).await?;
    // Exit right away in headless modes; a pending connect task must not hold the process.
    if is_non_tui {
        std::process::exit(0);
    }
    Ok(())
}
