//! Marquee CLI
//!
//! Drives the ticketing contract against a ledger snapshot file.
//!
//! # Commands
//!
//! - `init` - Seed the sequence counters
//! - `invoke` - Run one contract function in one transaction
//! - `query` - Run a rich query
//! - `dump` - Print every record in the snapshot

mod commands;

use clap::{Parser, Subcommand};
use commands::Session;
use marquee_core::{Config, IdScheme};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Marquee ticketing ledger tools.
#[derive(Parser)]
#[command(name = "marquee")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the ledger snapshot file (created if missing)
    #[arg(global = true, short, long, default_value = "marquee-state.json")]
    state: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    /// Derive theatre and coupon numbers with the legacy character-sum scheme
    #[arg(global = true, long)]
    legacy_ids: bool,

    /// Refuse soda exchanges that would drive stock below zero
    #[arg(global = true, long)]
    soda_floor: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the sequence counters
    Init {
        /// Transaction id (random if omitted)
        #[arg(short, long)]
        tx_id: Option<String>,
    },

    /// Invoke a contract function
    Invoke {
        /// Function name (registerTheatre, createShow, purchaseTicket, ...)
        function: String,

        /// Function arguments
        args: Vec<String>,

        /// Transaction id (random if omitted)
        #[arg(short, long)]
        tx_id: Option<String>,
    },

    /// Run a rich query
    Query {
        /// Selector query document
        query: String,
    },

    /// Print every record in the snapshot
    Dump {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::new()
        .id_scheme(if cli.legacy_ids {
            IdScheme::CharSum
        } else {
            IdScheme::Sha256
        })
        .enforce_soda_floor(cli.soda_floor);
    let session = Session::new(cli.state, config);

    match cli.command {
        Commands::Init { tx_id } => {
            commands::init::run(&session, tx_id)?;
        }
        Commands::Invoke {
            function,
            args,
            tx_id,
        } => {
            commands::invoke::run(&session, &function, &args, tx_id)?;
        }
        Commands::Query { query } => {
            commands::query::run(&session, &query)?;
        }
        Commands::Dump { format } => {
            commands::dump::run(&session, &format)?;
        }
        Commands::Version => {
            println!("Marquee CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Marquee Core v{}", marquee_core::VERSION);
        }
    }

    Ok(())
}
