//! The `passwords` table - raw row access, no crypto.
//!
//! Every operation opens its own connection and drops it before returning,
//! so nothing is held open between menu actions. The table must already
//! exist (see [`super::schema::ensure_schema`]).

use crate::error::Result;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::{Path, PathBuf};
use tracing::debug;

/// One stored credential, password still encrypted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub id: i64,
    pub username: String,
    /// base64url blob produced by [`crate::crypto::Encryptor::encrypt`]
    pub encrypted_password: String,
    pub site_name: String,
}

/// Handle to the `passwords` table in a SQLite database file.
#[derive(Debug, Clone)]
pub struct PasswordTable {
    db_path: PathBuf,
}

impl PasswordTable {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Database file path
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Open a connection for a single operation.
    /// Does not create the file: a missing database is a storage failure.
    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        // Wait for a concurrent writer instead of failing with SQLITE_BUSY
        conn.execute_batch("PRAGMA busy_timeout = 5000;")?;

        Ok(conn)
    }

    /// Insert a row and return its id.
    pub fn insert(&self, site_name: &str, username: &str, encrypted_password: &str) -> Result<i64> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO passwords (username, password, site_name) VALUES (?1, ?2, ?3)",
            params![username, encrypted_password, site_name],
        )?;
        let id = conn.last_insert_rowid();

        debug!(id, site_name, "inserted credential row");
        Ok(id)
    }

    /// Most recently added row for a site (highest id), if any.
    pub fn latest_by_site(&self, site_name: &str) -> Result<Option<CredentialRecord>> {
        let conn = self.connect()?;
        let record = conn
            .query_row(
                "SELECT id, username, password, site_name FROM passwords
                 WHERE site_name = ?1
                 ORDER BY id DESC
                 LIMIT 1",
                params![site_name],
                |row| {
                    Ok(CredentialRecord {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        encrypted_password: row.get(2)?,
                        site_name: row.get(3)?,
                    })
                },
            )
            .optional()?;

        debug!(site_name, found = record.is_some(), "looked up credential");
        Ok(record)
    }

    /// Delete every row for a site. Returns the number of rows removed.
    pub fn delete_by_site(&self, site_name: &str) -> Result<usize> {
        let conn = self.connect()?;
        let removed = conn.execute(
            "DELETE FROM passwords WHERE site_name = ?1",
            params![site_name],
        )?;

        debug!(site_name, removed, "deleted credential rows");
        Ok(removed)
    }
}
