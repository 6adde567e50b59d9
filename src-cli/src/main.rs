//! Omnibar - location bar host
//!
//! Reads location bar commands from stdin, one per line, and answers each
//! with a JSON line on stdout. Logs go to stderr.

mod commands;
mod events;
mod state;

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use omnibar_core::{Config, Database, Setting};

use commands::{CommandResult, Request};
use events::EventWriter;
use state::AppState;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "omnibar")]
#[command(about = "Location bar autocomplete over local history and bookmarks")]
struct Args {
    /// JSON config file
    #[arg(short, long, value_name = "PATH", env = "OMNIBAR_CONFIG")]
    config: Option<PathBuf>,

    /// Database file, overrides the config
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Search URL template containing %s; persisted for later runs
    #[arg(long, value_name = "TEMPLATE")]
    search_engine: Option<String>,

    /// Label for the search row; persisted for later runs
    #[arg(long, value_name = "LABEL")]
    search_label: Option<String>,

    /// Keep history and bookmarks in memory only
    #[arg(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    omnibar_core::init_logging();

    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(path) = args.db {
        config.database_path = path;
    }

    let db = if args.in_memory {
        Database::open_in_memory()?
    } else {
        Database::open(&config.database_path).with_context(|| {
            format!("failed to open {}", config.database_path.display())
        })?
    };

    if let Some(template) = args.search_engine {
        config.search_engine = template;
        config.validate()?;
        db.store_setting(Setting::SearchEngine, &config.search_engine)?;
    }
    if let Some(label) = args.search_label {
        db.store_setting(Setting::SearchLabel, &label)?;
        config.search_label = label;
    }

    let state = AppState::new(&config, db, Arc::new(EventWriter::stdout()))?;

    tracing::info!(
        search_engine = %state.session().search_template(),
        max_results = config.max_results,
        "Omnibar started"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let response = match line.parse::<Request>() {
            Ok(request) => commands::dispatch(&state, request).await,
            Err(e) => CommandResult::err(e),
        };
        state.events().write_line(&response)?;

        if state.events().is_closed() {
            tracing::info!("Location bar closed");
            break;
        }
    }

    Ok(())
}
