//! Database provisioning - creates the credential database and table.

use super::salt::SaltFile;
use crate::crypto::SALT_LEN;
use crate::error::{Result, VaultError};
use rusqlite::Connection;
use std::path::Path;
use tracing::info;

/// Create the database file and the `passwords` table if missing.
/// Safe to call on every start.
pub fn ensure_schema(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let conn = Connection::open(db_path)?;

    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA busy_timeout = 5000;

        CREATE TABLE IF NOT EXISTS passwords (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL,
            password TEXT NOT NULL,
            site_name TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_passwords_site_name ON passwords(site_name);
        ",
    )?;

    info!("Credential database ready at {}", db_path.display());
    Ok(())
}

/// Provision the database and its salt file, returning the salt.
///
/// Refuses to create a salt for a database that already exists: a fresh
/// salt would leave every stored row undecryptable.
pub fn provision(db_path: &Path, salt_file: &SaltFile) -> Result<[u8; SALT_LEN]> {
    if !salt_file.exists() && db_path.exists() {
        return Err(VaultError::InvalidInput(format!(
            "salt file {} is missing but database {} exists; stored passwords cannot be decrypted without it",
            salt_file.path().display(),
            db_path.display()
        )));
    }

    ensure_schema(db_path)?;
    salt_file.load_or_create()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::TempDir;

    fn table_exists(conn: &Connection) -> Result<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'passwords'",
            [],
            |row| row.get(0),
        )?;
        Ok(count == 1)
    }

    #[test]
    fn test_creates_parent_dirs_and_table() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("nested").join("dir").join("passwords.db");

        ensure_schema(&db_path)?;

        assert!(db_path.exists());
        assert!(table_exists(&Connection::open(&db_path)?)?);
        Ok(())
    }

    #[test]
    fn test_idempotent_keeps_rows() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("passwords.db");

        ensure_schema(&db_path)?;
        Connection::open(&db_path)?.execute(
            "INSERT INTO passwords (username, password, site_name) VALUES ('u', 'p', 's')",
            [],
        )?;
        ensure_schema(&db_path)?;

        let count: i64 = Connection::open(&db_path)?.query_row(
            "SELECT COUNT(*) FROM passwords",
            [],
            |row| row.get(0),
        )?;
        assert_eq!(count, 1);
        Ok(())
    }

    #[test]
    fn test_provision_reuses_salt() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("passwords.db");
        let salt_file = SaltFile::new(temp_dir.path().join("salt"));

        let first = provision(&db_path, &salt_file)?;
        let second = provision(&db_path, &salt_file)?;

        assert_eq!(first, second);
        assert!(table_exists(&Connection::open(&db_path)?)?);
        Ok(())
    }

    #[test]
    fn test_provision_refuses_lost_salt() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("passwords.db");
        let salt_file = SaltFile::new(temp_dir.path().join("salt"));

        provision(&db_path, &salt_file)?;
        std::fs::remove_file(salt_file.path())?;

        let err = provision(&db_path, &salt_file).unwrap_err();
        assert!(matches!(err, VaultError::InvalidInput(_)));
        // No replacement salt was written
        assert!(!salt_file.exists());
        Ok(())
    }
}
