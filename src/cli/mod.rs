//! CLI definitions and command implementations for sitepass.

pub mod commands;
pub mod menu;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// sitepass - per-site passwords encrypted under one master password
#[derive(Parser)]
#[command(name = "sitepass")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (default: ~/.config/sitepass/sitepass.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database, the passwords table and the salt file
    Init,

    /// Store a password for a site
    Add {
        /// Site name (exact key for later lookup)
        site: String,

        /// Username on the site (prompted if omitted)
        #[arg(short, long)]
        username: Option<String>,
    },

    /// Show the stored password for a site
    Get {
        /// Site name
        site: String,
    },

    /// Delete every stored password for a site
    Delete {
        /// Site name
        site: String,
    },

    /// Interactive menu (default when no command is given)
    Menu,
}
