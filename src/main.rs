//! # Partdex CLI
//!
//! The `partdex` binary drives the whole system: building the snapshot from
//! an archive tree, querying it from the command line, and serving the JSON
//! HTTP API.
//!
//! ## Usage
//!
//! ```bash
//! partdex --config ./config/partdex.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `partdex build` | Scan the archive and write the JSON snapshot |
//! | `partdex search "<query>"` | Substring search over the snapshot |
//! | `partdex stats` | Print snapshot statistics |
//! | `partdex serve` | Start the HTTP API and static search page |

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use partdex::{config, ingest, search, server, stats};

/// Partdex — substring search over aviation technical-publication archives.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/partdex.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "partdex",
    about = "Partdex — indexes technical-publication archives and serves substring search over them",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// All archive, snapshot, extraction, and server settings are read from
    /// this file.
    #[arg(long, global = true, default_value = "./config/partdex.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Build the snapshot from the configured archive.
    ///
    /// Walks every category directory, extracts part records from XML files,
    /// links them to PDF and image counterparts, and writes one JSON
    /// snapshot with recomputed statistics. Running it again against an
    /// unchanged archive produces the same counts.
    Build,

    /// Search the snapshot for a substring.
    ///
    /// Case-insensitive containment over part number, description, and
    /// document title. Queries shorter than two characters return nothing.
    Search {
        /// The search query string.
        query: String,

        /// Restrict results to one category code (e.g. `EIPC`), or `all`.
        #[arg(long, default_value = "all")]
        category: String,
    },

    /// Print snapshot statistics.
    Stats,

    /// Start the HTTP server.
    ///
    /// Serves the search API, the file endpoint, and the static search page
    /// on the address configured in `[server].bind`.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Build => {
            ingest::run_build(&cfg)?;
        }
        Commands::Search { query, category } => {
            search::run_search(&cfg.snapshot.path, &query, &category)?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg.snapshot.path)?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
