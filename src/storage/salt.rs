//! Salt file - the per-vault PBKDF2 salt, kept next to the database.
//!
//! The salt is not secret, but losing it makes every stored password
//! undecryptable, so it is created once and never rewritten.

use crate::crypto::{generate_salt, SALT_LEN};
use crate::error::{Result, VaultError};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

/// Location of the salt file for one vault
#[derive(Debug, Clone)]
pub struct SaltFile {
    path: PathBuf,
}

impl SaltFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the salt. `None` if the file does not exist yet.
    pub fn load(&self) -> Result<Option<[u8; SALT_LEN]>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let bytes = std::fs::read(&self.path)?;
        let salt: [u8; SALT_LEN] = bytes.as_slice().try_into().map_err(|_| {
            VaultError::InvalidInput(format!(
                "salt file {} has {} bytes, expected {}",
                self.path.display(),
                bytes.len(),
                SALT_LEN
            ))
        })?;

        Ok(Some(salt))
    }

    /// Read the salt, generating and writing a new one on first use.
    pub fn load_or_create(&self) -> Result<[u8; SALT_LEN]> {
        if let Some(salt) = self.load()? {
            return Ok(salt);
        }

        let salt = generate_salt();
        self.write(&salt)?;
        info!("Created new salt file at {}", self.path.display());
        Ok(salt)
    }

    /// Write through a temp file in the same directory, then rename into
    /// place, so a crash never leaves a truncated salt behind.
    fn write(&self, salt: &[u8; SALT_LEN]) -> Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(salt)?;
        tmp.as_file().sync_all()?;

        // Restrict file permissions on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }

        // Never replace a salt another process created first
        tmp.persist_noclobber(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}
