pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod debounce;
pub mod event;
pub mod identifier;
pub mod model;
pub mod sync;
pub mod ui;

#[cfg(test)]
mod test_support;

use std::sync::Arc;
use std::time::Duration;

use api::PokeApiClient;
use app::App;
use clap::Parser;
use cli::{Cli, CliCommand};
use config::load_config;
use event::EventHandler;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // Initialize tracing (logs to stderr if RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        // No subcommand or explicit `tui` → launch the interactive TUI.
        None | Some(CliCommand::Tui) => run_tui().await,
        // All other subcommands → non-interactive output.
        Some(cmd) => cli::run_command(cmd).await,
    }
}

/// Launch the interactive TUI.
async fn run_tui() -> color_eyre::Result<()> {
    let config = load_config();
    let client = PokeApiClient::new(
        &config.base_url,
        Duration::from_secs(config.request_timeout_secs),
    )?;
    tracing::info!(base_url = %config.base_url, "catalog client initialized");

    let events = EventHandler::new(config.tick_rate_fps);
    let terminal = ratatui::init();
    let result = App::new(config, Arc::new(client), events).run(terminal).await;
    ratatui::restore();
    result
}
