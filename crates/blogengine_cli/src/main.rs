//! `blogengine` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration from file and flags.
//! - Initialize logging before touching the database.
//! - Dispatch to the serve and admin commands.

mod cli;
mod commands;
mod config;

use anyhow::{anyhow, Result};
use clap::Parser;
use cli::{Cli, Command};
use config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Command::Version = cli.command {
        println!("blogengine {}", blogengine_core::core_version());
        return Ok(());
    }

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(database_path) = cli.database {
        config.database_path = database_path;
    }
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level;
    }
    blogengine_core::init_logging(&config.log_level, &config.resolved_log_dir()?)
        .map_err(|err| anyhow!(err))?;

    match cli.command {
        Command::Serve(args) => commands::serve(&config, args).await,
        Command::Admin(command) => {
            println!("{}", commands::admin(&config, command)?);
            Ok(())
        }
        Command::Version => Ok(()),
    }
}
