//! Command implementations for the sitepass CLI.
//!
//! Each command resolves the config, provisions storage if needed,
//! derives the session key and runs one store operation.

use super::menu::Menu;
use anyhow::{bail, Context, Result};
use colored::Colorize;
use sitepass::config::{default_config_path, ENV_MASTER_PASSWORD};
use sitepass::storage::{self, SaltFile};
use sitepass::{Config, CredentialStore, MasterSecret};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;
use zeroize::Zeroizing;

/// Resolve config: explicit path or default, then env overrides.
fn resolve_config(config_path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = config_path.unwrap_or_else(default_config_path);
    let config = Config::resolve(&path)?;
    debug!("Using config {} (db: {})", path.display(), config.database.path.display());
    Ok((config, path))
}

/// Prompt for a secret (input not echoed)
pub fn prompt_secret(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let secret = rpassword::read_password().context("Cannot read input")?;
    Ok(secret)
}

/// Prompt for a visible line of input
fn prompt_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Master password from `MASTER_PASSWORD` or an interactive prompt
fn master_secret() -> Result<MasterSecret> {
    if let Ok(password) = std::env::var(ENV_MASTER_PASSWORD) {
        if !password.is_empty() {
            debug!("Master password taken from {}", ENV_MASTER_PASSWORD);
            return Ok(MasterSecret::new(password));
        }
    }

    let password = prompt_secret("Master password: ")?;
    if password.is_empty() {
        bail!("Master password cannot be empty");
    }
    Ok(MasterSecret::new(password))
}

/// Make sure the table and salt exist, returning the salt.
fn provision(config: &Config) -> Result<[u8; sitepass::crypto::SALT_LEN]> {
    let salt_file = SaltFile::new(&config.salt_path);
    let salt = storage::provision(&config.database.path, &salt_file)
        .context("Cannot provision credential storage")?;
    Ok(salt)
}

/// Resolve config, provision storage and derive the session key.
fn open_store(config_path: Option<PathBuf>) -> Result<CredentialStore> {
    let (config, _) = resolve_config(config_path)?;
    let salt = provision(&config)?;
    let master = master_secret()?;

    let store = CredentialStore::open(&config.store_config(), &master, Some(salt))
        .context("Cannot unlock credential store")?;
    Ok(store)
}

/// Create database, table, salt and default config file
pub fn init(config_path: Option<PathBuf>) -> Result<()> {
    println!("{}", "Initializing sitepass...".cyan());

    let (config, path) = resolve_config(config_path)?;
    if !path.exists() {
        config.save(&path)?;
        println!("  {} Config: {}", "✓".green(), path.display());
    }

    let had_salt = SaltFile::new(&config.salt_path).exists();
    provision(&config)?;

    println!("  {} Database: {}", "✓".green(), config.database.path.display());
    if had_salt {
        println!("  {} Salt: {} (existing)", "✓".green(), config.salt_path.display());
    } else {
        println!("  {} Salt: {} (created)", "✓".green(), config.salt_path.display());
        println!(
            "{}",
            "WARNING: Back up the salt file. Without it stored passwords cannot be recovered.".yellow()
        );
    }

    Ok(())
}

/// Store a password for a site
pub fn add(config_path: Option<PathBuf>, site: &str, username: Option<String>) -> Result<()> {
    let store = open_store(config_path)?;

    let username = match username {
        Some(username) => username,
        None => prompt_line("Username: ")?,
    };
    let password = Zeroizing::new(prompt_secret("Password: ")?);

    store.add(site, &username, &password)?;
    println!("{} Password added for {}", "✓".green(), site.cyan());
    Ok(())
}

/// Show the stored password for a site
pub fn get(config_path: Option<PathBuf>, site: &str) -> Result<()> {
    let store = open_store(config_path)?;

    let credential = store.retrieve_credential(site)?;
    println!("Site:     {}", credential.site_name.cyan());
    println!("Username: {}", credential.username);
    println!("Password: {}", credential.password.as_str().yellow());
    Ok(())
}

/// Delete every stored password for a site
pub fn delete(config_path: Option<PathBuf>, site: &str) -> Result<()> {
    let store = open_store(config_path)?;

    let removed = store.delete(site)?;
    if removed == 0 {
        println!("{}", format!("No password stored for {}", site).yellow());
    } else {
        println!("{} Deleted {} entr{} for {}", "✓".green(), removed, plural(removed), site.cyan());
    }
    Ok(())
}

/// Interactive menu on stdin/stdout
pub fn menu(config_path: Option<PathBuf>) -> Result<()> {
    let store = open_store(config_path)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    Menu::new(&store, stdin.lock(), stdout.lock()).run(prompt_secret)
}

pub(crate) fn plural(n: usize) -> &'static str {
    if n == 1 {
        "y"
    } else {
        "ies"
    }
}
