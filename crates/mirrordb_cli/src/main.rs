//! MirrorDB CLI
//!
//! Command-line tools for exploring MirrorDB criteria and stores.
//!
//! # Commands
//!
//! - `compile` - Print the document filter a criteria compiles to
//! - `query` - Load documents into a proxy store and match a criteria
//! - `version` - Show version information

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// MirrorDB command-line tools.
#[derive(Parser)]
#[command(name = "mirrordb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the document filter a criteria compiles to
    Compile {
        /// Criteria as JSON, e.g. '{"attr": {"name": "Age", "value": 18, "comparison": "gte"}}'
        criteria: String,
    },

    /// Load documents into a proxy store and match a criteria
    Query {
        /// JSON file holding an array of documents
        #[arg(short, long)]
        documents: PathBuf,

        /// Criteria as JSON
        criteria: String,

        /// Keep at most this many documents in the local mirror
        #[arg(short, long)]
        capacity: Option<usize>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Compile { criteria } => {
            commands::compile::run(&criteria)?;
        }
        Commands::Query {
            documents,
            criteria,
            capacity,
            format,
        } => {
            commands::query::run(&documents, &criteria, capacity, &format)?;
        }
        Commands::Version => {
            println!("MirrorDB CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("MirrorDB Core v{}", mirrordb_core::VERSION);
        }
    }

    Ok(())
}
