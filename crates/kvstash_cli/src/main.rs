//! kvstash CLI
//!
//! Command-line access to a kvstash store.
//!
//! # Commands
//!
//! - `insert`, `select`, `update`, `delete`, `exists`, `keys` - Single operations
//! - `transact` - Apply a JSON script of operations as one transaction
//! - `version` - Show version information

mod commands;

use clap::{Parser, Subcommand};
use kvstash_core::{Config, StoreKind, DEFAULT_STORE_FILE};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// kvstash command-line store tools.
#[derive(Parser)]
#[command(name = "kvstash")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the store file
    #[arg(global = true, short, long, default_value = DEFAULT_STORE_FILE)]
    path: PathBuf,

    /// Store kind (json, memory)
    #[arg(global = true, short, long, default_value = "json")]
    store: StoreKind,

    /// Write indented JSON
    #[arg(global = true, long)]
    pretty: bool,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert a new key
    Insert {
        /// Key to insert
        key: String,
        /// Value (JSON, or a plain string)
        value: String,
    },

    /// Print the value of a key
    Select {
        /// Key to read
        key: String,
    },

    /// Replace the value of an existing key
    Update {
        /// Key to update
        key: String,
        /// Value (JSON, or a plain string)
        value: String,
    },

    /// Delete an existing key
    Delete {
        /// Key to delete
        key: String,
    },

    /// Report whether a key exists
    Exists {
        /// Key to look up
        key: String,
    },

    /// List keys, optionally filtered by a regular expression
    Keys {
        /// Pattern searched for anywhere in each key
        pattern: Option<String>,
    },

    /// Apply a JSON array of operations as one transaction
    Transact {
        /// File holding `[{"op": "insert", "key": .., "value": ..}, ..]`
        file: PathBuf,
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

    let config = Config::new().path(cli.path).pretty(cli.pretty);

    match cli.command {
        Commands::Insert { key, value } => commands::crud::insert(cli.store, &config, &key, &value)?,
        Commands::Select { key } => commands::crud::select(cli.store, &config, &key)?,
        Commands::Update { key, value } => commands::crud::update(cli.store, &config, &key, &value)?,
        Commands::Delete { key } => commands::crud::delete(cli.store, &config, &key)?,
        Commands::Exists { key } => commands::crud::exists(cli.store, &config, &key)?,
        Commands::Keys { pattern } => commands::crud::keys(cli.store, &config, pattern.as_deref())?,
        Commands::Transact { file } => commands::transact::run(cli.store, &config, &file)?,
        Commands::Version => {
            println!("kvstash CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("kvstash Core v{}", kvstash_core::VERSION);
        }
    }

    Ok(())
}
