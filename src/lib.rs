//! sitepass - command-line password manager library.
//!
//! Per-site credentials live in a SQLite `passwords` table. The password
//! column is encrypted with AES-256-CFB under a key derived from the
//! master password (PBKDF2-HMAC-SHA256, 100k iterations).
//!
//! Pipeline: master password + salt -> key -> encrypt -> row, and back.

pub mod config;
pub mod crypto;
pub mod error;
pub mod storage;
pub mod vault;

// Re-export main types
pub use config::Config;
pub use crypto::{Encryptor, MasterSecret};
pub use error::{Result, VaultError};
pub use storage::{CredentialRecord, PasswordTable, SaltFile};
pub use vault::{Credential, CredentialStore, StoreConfig};
