//! `roster-tui` — Terminal browser for a lazily-paged people directory.
//!
//! Built on [ratatui](https://ratatui.rs) with reactive data from
//! `roster-core`'s [`Pager`](roster_core::Pager). The list loads lazily:
//! scrolling near the end fetches the next page, duplicates are dropped
//! by id, and fetch failures self-heal through a delayed full refresh.
//!
//! Logs are written to a file (default `/tmp/roster-tui.log`) to avoid
//! corrupting the terminal UI.
//!
//! Entry point: CLI argument parsing, config loading, tracing setup,
//! panic hooks, and app launch.

mod app;
mod event;
mod tui;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use roster_api::DirectoryClient;
use roster_config::Settings;
use roster_core::Pager;

use crate::app::App;

/// Terminal browser for a lazily-paged people directory.
#[derive(Parser, Debug)]
#[command(name = "roster-tui", version, about)]
struct Cli {
    /// Directory service base URL (overrides the config file)
    #[arg(short = 'e', long, env = "ROSTER_ENDPOINT")]
    endpoint: Option<Url>,

    /// Config file path (defaults to the platform config directory)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Log file path (overrides the config file)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that
/// would corrupt the TUI output. Returns a guard that must be held for
/// the lifetime of the application to ensure logs are flushed.
fn setup_tracing(log_file: &std::path::Path, verbose: u8) -> WorkerGuard {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "roster_tui={log_level},roster_core={log_level},roster_api={log_level}"
        ))
    });

    let log_dir = log_file.parent().unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("roster-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(endpoint) = cli.endpoint {
        settings.endpoint = endpoint;
    }
    if let Some(log_file) = cli.log_file {
        settings.log_file = log_file;
    }

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&settings.log_file, cli.verbose);

    info!(endpoint = %settings.endpoint, "starting roster-tui");

    let client = DirectoryClient::new(
        settings.endpoint.clone(),
        settings.page_limit,
        settings.request_timeout(),
    )?;
    let pager = Pager::new(Arc::new(client), settings.pager_config());

    let mut tui = tui::Tui::new()?;
    tui.enter()?;

    pager.start().await;

    let mut app = App::new(pager.clone());
    let result = app.run(&mut tui).await;

    tui.exit()?;
    pager.shutdown();
    info!("shut down");
    result
}
