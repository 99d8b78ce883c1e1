//! sitepass CLI - per-site passwords encrypted under one master password.
//!
//! Usage:
//!   sitepass init            - Create database, table and salt file
//!   sitepass add <site>      - Store a password
//!   sitepass get <site>      - Show a stored password
//!   sitepass delete <site>   - Delete all passwords for a site
//!   sitepass [menu]          - Interactive menu

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("sitepass={}", log_level).parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config;
    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Init => cli::commands::init(config),
        Commands::Add { site, username } => cli::commands::add(config, &site, username),
        Commands::Get { site } => cli::commands::get(config, &site),
        Commands::Delete { site } => cli::commands::delete(config, &site),
        Commands::Menu => cli::commands::menu(config),
    }
}
