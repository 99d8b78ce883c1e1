//! Credential store - encrypted per-site passwords on top of the `passwords` table.
//!
//! The store owns the key derived from the master password for the whole
//! session. Plaintext passwords only exist in memory: `add` encrypts before
//! the row is written and `retrieve` decrypts after it is read.

use crate::crypto::{derive_key, generate_salt, Encryptor, MasterSecret, KEY_LEN, SALT_LEN};
use crate::error::{Result, VaultError};
use crate::storage::{CredentialRecord, PasswordTable};
use std::fmt;
use std::path::PathBuf;
use tracing::debug;
use zeroize::Zeroizing;

/// Resolved storage settings injected into the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// SQLite database file holding the `passwords` table
    pub db_path: PathBuf,
}

impl StoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }
}

/// A decrypted credential.
pub struct Credential {
    pub id: i64,
    pub site_name: String,
    pub username: String,
    pub password: Zeroizing<String>,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("site_name", &self.site_name)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Encrypted credential store bound to one master password and salt.
pub struct CredentialStore {
    encryptor: Encryptor,
    salt: [u8; SALT_LEN],
    table: PasswordTable,
}

impl CredentialStore {
    /// Derive the session key from the master password and bind the table.
    ///
    /// With `salt = None` a fresh salt is generated. That salt must be kept
    /// (see [`CredentialStore::salt`]); rows written under it cannot be read
    /// back with any other salt.
    pub fn open(
        config: &StoreConfig,
        master: &MasterSecret,
        salt: Option<[u8; SALT_LEN]>,
    ) -> Result<Self> {
        let salt = salt.unwrap_or_else(generate_salt);
        let key = derive_key(master.expose(), &salt)?;
        debug!("Derived session key for {}", config.db_path.display());
        Ok(Self::with_key(config, &key, salt))
    }

    /// Build a store from an already-derived key.
    pub fn with_key(config: &StoreConfig, key: &[u8; KEY_LEN], salt: [u8; SALT_LEN]) -> Self {
        Self {
            encryptor: Encryptor::new(key),
            salt,
            table: PasswordTable::new(config.db_path.clone()),
        }
    }

    /// Salt the session key was derived with
    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    /// Encrypt and store a password. Returns the new row id.
    pub fn add(&self, site_name: &str, username: &str, plaintext_password: &str) -> Result<i64> {
        let blob = self.encryptor.encrypt(plaintext_password)?;
        self.table.insert(site_name, username, &blob)
    }

    /// Decrypted password for a site. The most recently added entry wins.
    pub fn retrieve(&self, site_name: &str) -> Result<Zeroizing<String>> {
        Ok(self.retrieve_credential(site_name)?.password)
    }

    /// Full decrypted credential for a site. The most recently added entry wins.
    pub fn retrieve_credential(&self, site_name: &str) -> Result<Credential> {
        let record = self
            .table
            .latest_by_site(site_name)?
            .ok_or_else(|| VaultError::NotFound(site_name.to_string()))?;

        self.decrypt_record(record)
    }

    /// Delete every entry for a site. Returns how many were removed;
    /// zero is not an error.
    pub fn delete(&self, site_name: &str) -> Result<usize> {
        self.table.delete_by_site(site_name)
    }

    fn decrypt_record(&self, record: CredentialRecord) -> Result<Credential> {
        let password = Zeroizing::new(self.encryptor.decrypt(&record.encrypted_password)?);
        Ok(Credential {
            id: record.id,
            site_name: record.site_name,
            username: record.username,
            password,
        })
    }
}
