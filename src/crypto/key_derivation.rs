//! Key derivation with PBKDF2-HMAC-SHA256.
//!
//! The master password is stretched into a 256-bit AES key with a salted,
//! iterated HMAC. Derivation is deterministic: the same password and salt
//! always give the same key, which is what lets a later session decrypt
//! passwords stored by an earlier one.

use crate::error::{Result, VaultError};
use pbkdf2::pbkdf2_hmac;
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Salt length (bytes)
pub const SALT_LEN: usize = 16;

/// Key length (bytes) - 256 bits for AES-256
pub const KEY_LEN: usize = 32;

/// PBKDF2 iteration count
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Symmetric key derived from the master password. Zeroed on drop.
pub type DerivedKey = Zeroizing<[u8; KEY_LEN]>;

/// The user's master password, held in memory only for the session.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterSecret(String);

impl MasterSecret {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterSecret(***)")
    }
}

/// Derive the encryption key from a master password.
///
/// # Arguments
/// * `master_password` - Master password (must not be empty)
/// * `salt` - 16-byte salt, fixed for the lifetime of a vault
///
/// # Returns
/// * 32-byte key for AES-256
pub fn derive_key(master_password: &str, salt: &[u8; SALT_LEN]) -> Result<DerivedKey> {
    derive_key_with_rounds(master_password, salt, PBKDF2_ITERATIONS)
}

/// Same as [`derive_key`] with an explicit iteration count.
pub fn derive_key_with_rounds(
    master_password: &str,
    salt: &[u8; SALT_LEN],
    rounds: u32,
) -> Result<DerivedKey> {
    if master_password.is_empty() {
        return Err(VaultError::InvalidInput(
            "master password cannot be empty".to_string(),
        ));
    }
    if rounds == 0 {
        return Err(VaultError::InvalidInput(
            "PBKDF2 iteration count must be positive".to_string(),
        ));
    }

    Ok(pbkdf2_sha256(master_password.as_bytes(), salt, rounds))
}

fn pbkdf2_sha256(password: &[u8], salt: &[u8], rounds: u32) -> DerivedKey {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2_hmac::<Sha256>(password, salt, rounds, key.as_mut());
    key
}

/// Generate random salt for key derivation
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    // Low iteration count keeps debug-build tests fast.
    const TEST_ROUNDS: u32 = 1_000;

    #[test]
    fn test_derive_key_deterministic() -> Result<()> {
        let salt = [0u8; SALT_LEN];

        let key1 = derive_key("test_password_123", &salt)?;
        let key2 = derive_key("test_password_123", &salt)?;

        assert_eq!(*key1, *key2);
        Ok(())
    }

    #[test]
    fn test_derive_key_different_passphrase() -> Result<()> {
        let salt = [0u8; SALT_LEN];

        let key1 = derive_key_with_rounds("password1", &salt, TEST_ROUNDS)?;
        let key2 = derive_key_with_rounds("password2", &salt, TEST_ROUNDS)?;

        assert_ne!(*key1, *key2);
        Ok(())
    }

    #[test]
    fn test_derive_key_different_salt() -> Result<()> {
        let key1 = derive_key_with_rounds("same_password", &[0u8; SALT_LEN], TEST_ROUNDS)?;
        let key2 = derive_key_with_rounds("same_password", &[1u8; SALT_LEN], TEST_ROUNDS)?;

        assert_ne!(*key1, *key2);
        Ok(())
    }

    #[test]
    fn test_rounds_change_key() -> Result<()> {
        let salt = [7u8; SALT_LEN];

        let key1 = derive_key_with_rounds("pw", &salt, TEST_ROUNDS)?;
        let key2 = derive_key_with_rounds("pw", &salt, TEST_ROUNDS + 1)?;

        assert_ne!(*key1, *key2);
        Ok(())
    }

    #[test]
    fn test_empty_password_rejected() {
        let err = derive_key("", &[0u8; SALT_LEN]).unwrap_err();
        assert!(matches!(err, VaultError::InvalidInput(_)));
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let err = derive_key_with_rounds("pw", &[0u8; SALT_LEN], 0).unwrap_err();
        assert!(matches!(err, VaultError::InvalidInput(_)));
    }

    #[test]
    fn test_pbkdf2_sha256_known_answer() {
        // RFC 7914 section 11, P="passwd", S="salt", c=1 (first 32 bytes)
        let expected: [u8; KEY_LEN] = [
            0x55, 0xac, 0x04, 0x6e, 0x56, 0xe3, 0x08, 0x9f, 0xec, 0x16, 0x91, 0xc2, 0x25, 0x44,
            0xb6, 0x05, 0xf9, 0x41, 0x85, 0x21, 0x6d, 0xde, 0x04, 0x65, 0xe6, 0x8b, 0x9d, 0x57,
            0xc2, 0x0d, 0xac, 0xbc,
        ];

        let key = pbkdf2_sha256(b"passwd", b"salt", 1);
        assert_eq!(*key, expected);
    }

    #[test]
    fn test_generate_salt_is_random() {
        assert_ne!(generate_salt(), generate_salt());
    }

    #[test]
    fn test_master_secret_debug_is_redacted() {
        let secret = MasterSecret::new("hunter2");
        assert_eq!(format!("{:?}", secret), "MasterSecret(***)");
        assert_eq!(secret.expose(), "hunter2");
    }
}
