//! CLI interface for farmgate.
//!
//! Stands in for the marketplace's offer endpoint: each subcommand is
//! non-interactive, arguments in, structured output out. Offer records
//! are printed as JSON on stdout; diagnostics go to stderr.
//!
//! Every command acts as a resolved user (see [`crate::identity`]).
//! Offer ids accept a full UUID or an unambiguous prefix.

mod format;
mod offer;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::identity::resolve_identity;
use crate::lifecycle::Lifecycle;
use crate::storage::SqliteStore;

use offer::OfferCommand;

/// farmgate — move marketplace offers through their lifecycle.
#[derive(Debug, Parser)]
#[command(name = "farmgate", version, after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    /// Act as this user. Overrides `FARMGATE_USER` and the config file.
    #[arg(long = "as", global = true)]
    identity: Option<String>,

    #[command(subcommand)]
    command: Command,
}

const WORKFLOW_HELP: &str = r"Workflow: a pickup sale
  1. farmgate --as bea offer new --product okra-3 --seller sam --price 90 --quantity 12 --delivery pickup
     → prints an offer ID (e.g. 5f2c9a10-...)
  2. farmgate --as sam offer transition 5f2 accepted
  3. farmgate --as sam offer transition 5f2 ready_to_pickup
  4. farmgate --as bea offer transition 5f2 picked_up
     → the offer comes back completed

Inspect:
  farmgate --as sam offer list
  farmgate --as bea offer next 5f2
  farmgate --as bea offer transition 5f2 cancelled --reason 'found a closer farm'";

#[derive(Debug, Subcommand)]
enum Command {
    /// Create, inspect, and transition offers.
    Offer {
        #[command(subcommand)]
        command: OfferCommand,
    },
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config) -> Result<(), String> {
    let cli = Cli::parse();

    let user = resolve_identity(cli.identity.as_deref(), config)?;

    let path = config
        .database_path()
        .ok_or("could not determine home directory")?;
    tracing::debug!(database = %path.display(), %user, "opening offer store");
    let store = SqliteStore::open(&path)
        .map_err(|e| format!("failed to open {}: {e}", path.display()))?;
    let lifecycle = Lifecycle::new(store);

    match cli.command {
        Command::Offer { command } => offer::dispatch(&lifecycle, &user, command),
    }
}
