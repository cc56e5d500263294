//! Command-line arguments.

use blogengine_core::EntityKind;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "blogengine", version, about = "SQLite-backed blog engine")]
pub struct Cli {
    /// Configuration file (defaults to ./blogengine.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// SQLite database file, overrides the configuration
    #[arg(long, global = true, value_name = "FILE")]
    pub database: Option<PathBuf>,

    /// trace|debug|info|warn|error, overrides the configuration
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the public pages over HTTP
    Serve(ServeArgs),

    /// Add, change or delete categories, tags and posts
    #[command(subcommand)]
    Admin(AdminCommand),

    /// Print the core version
    Version,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Listen address, overrides the configuration
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Create a record from form fields
    Add {
        entity: EntityKind,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Update the submitted fields of an existing record
    Change {
        entity: EntityKind,
        id: i64,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a record
    Delete { entity: EntityKind, id: i64 },
}

#[derive(Debug, Args)]
pub struct FieldArgs {
    /// Form field; repeat for several fields or several tags
    #[arg(short = 'f', long = "field", value_name = "KEY=VALUE")]
    pub pairs: Vec<String>,
}
