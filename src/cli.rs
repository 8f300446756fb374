use std::io::Write;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{self, eyre};

use crate::api::pokemon::root_cursor;
use crate::api::{ApiClientError, Catalog, ErrorKind, PokeApiClient};
use crate::config::{AppConfig, load_config};
use crate::identifier::parse_identifier;
use crate::sync::detail::{DetailView, fetch_detail};
use crate::sync::list::{CatalogPage, fetch_page};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "pokedex-tui", about = "TUI and CLI for browsing the Pokédex")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand)]
pub enum CliCommand {
    /// Launch the interactive TUI (default)
    Tui,
    /// Fetch one page of the Pokédex (JSONL)
    List {
        /// Page URL to start from instead of the first page
        #[arg(long)]
        cursor: Option<String>,
    },
    /// Fetch one Pokémon and up to five others of its primary type (JSONL)
    Show {
        /// Name, number or detail URL
        identifier: String,
    },
    /// Print the effective configuration as TOML
    Config,
}

// ---------------------------------------------------------------------------
// Output helpers
// ---------------------------------------------------------------------------

fn page_lines(page: &CatalogPage) -> eyre::Result<Vec<String>> {
    let mut lines = page
        .items
        .iter()
        .map(serde_json::to_string)
        .collect::<Result<Vec<_>, _>>()?;
    lines.push(serde_json::to_string(&serde_json::json!({
        "page": { "next": page.next, "previous": page.previous },
    }))?);
    Ok(lines)
}

fn detail_lines(view: &DetailView) -> eyre::Result<Vec<String>> {
    let mut lines = vec![serde_json::to_string(&serde_json::json!({ "item": view.item }))?];
    for related in &view.related {
        lines.push(serde_json::to_string(
            &serde_json::json!({ "related": related }),
        )?);
    }
    Ok(lines)
}

fn print_lines(out: &mut impl Write, lines: &[String]) -> eyre::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn lookup_error(err: ApiClientError, identifier: &str) -> eyre::Report {
    match err.kind() {
        ErrorKind::NotFound => eyre!("no Pokémon named or numbered {identifier}"),
        _ => eyre!("{err}"),
    }
}

// ---------------------------------------------------------------------------
// Command execution
// ---------------------------------------------------------------------------

pub async fn run_command(cmd: CliCommand) -> eyre::Result<()> {
    let config = load_config();
    let client = PokeApiClient::new(
        &config.base_url,
        Duration::from_secs(config.request_timeout_secs),
    )?;
    let mut stdout = std::io::stdout().lock();
    execute(&client, &config, cmd, &mut stdout).await
}

async fn execute<C: Catalog>(
    catalog: &C,
    config: &AppConfig,
    cmd: CliCommand,
    out: &mut impl Write,
) -> eyre::Result<()> {
    match cmd {
        CliCommand::Tui => unreachable!("tui is handled in main"),

        CliCommand::List { cursor } => {
            let cursor =
                cursor.unwrap_or_else(|| root_cursor(catalog.base_url(), config.page_size));
            let page = fetch_page(catalog, &cursor)
                .await
                .map_err(|e| eyre!("failed to load {cursor}: {e}"))?;
            print_lines(out, &page_lines(&page)?)?;
        }

        CliCommand::Show { identifier } => {
            let ident = parse_identifier(&identifier)
                .ok_or_else(|| eyre!("not a Pokémon name or number: {identifier:?}"))?;
            let view = fetch_detail(catalog, &ident)
                .await
                .map_err(|e| lookup_error(e, &ident))?;
            print_lines(out, &detail_lines(&view)?)?;
        }

        CliCommand::Config => {
            write!(out, "{}", toml::to_string_pretty(config)?)?;
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
