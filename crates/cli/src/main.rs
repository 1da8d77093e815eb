//! Product Picker CLI - live searches and scripted picker sessions.
//!
//! # Usage
//!
//! ```bash
//! # Search the live catalog
//! picker-cli search "linen towel" --page 2
//!
//! # Replay a picker session against the live catalog
//! picker-cli session session.yaml
//!
//! # Replay a picker session against a JSON fixture
//! picker-cli session session.yaml --catalog products.json
//! ```
//!
//! # Commands
//!
//! - `search` - Run one product search and log the results
//! - `session` - Replay a YAML script and print the final rows as JSON
//!
//! Logs go to stderr; set `RUST_LOG` to override the default filter.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

const DEFAULT_LOG_FILTER: &str = "product_picker=info,picker_cli=info";

#[derive(Parser)]
#[command(name = "picker-cli")]
#[command(author, version, about = "Product picker CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single product search against the live API
    Search {
        /// Search term (may be empty)
        term: String,

        /// 1-based page number
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Page size (defaults to `PICKER_PAGE_LIMIT`)
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Replay a scripted picker session
    Session {
        /// Path to the YAML session script
        script: PathBuf,

        /// Serve searches from a JSON product fixture instead of the live API
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Search { term, page, limit } => {
            commands::search::run(&term, page, limit).await?;
        }
        Commands::Session { script, catalog } => {
            commands::session::run(&script, catalog.as_deref()).await?;
        }
    }
    Ok(())
}
