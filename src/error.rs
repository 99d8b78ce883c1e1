//! Error types for the credential vault.

use thiserror::Error;

/// Result type alias for vault operations
pub type Result<T> = std::result::Result<T, VaultError>;

/// Vault error types
#[derive(Error, Debug)]
pub enum VaultError {
    /// Bad input to key derivation or salt handling
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Ciphertext is too short, not base64url, or does not decrypt to text
    #[error("Malformed encrypted blob: {0}")]
    MalformedBlob(String),

    /// No stored credential for the site
    #[error("No password stored for site '{0}'")]
    NotFound(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VaultError {
    /// True if the error means "nothing stored under that site name".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
