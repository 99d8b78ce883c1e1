//! AES-256-CFB encryption of single password values.
//!
//! CFB (cipher feedback) turns AES into a stream cipher, so plaintext needs
//! no padding and ciphertext is exactly as long as the input.
//!
//! Blob format (text, safe for a TEXT column):
//! - base64url( IV (16 bytes) || ciphertext )
//! - IV is random per call and MUST NOT repeat under the same key
//!
//! CFB carries no authentication tag. Decrypting with the wrong key, or a
//! tampered blob, produces wrong bytes instead of an error.

use super::key_derivation::{DerivedKey, KEY_LEN};
use crate::error::{Result, VaultError};
use aes::Aes256;
use base64::{engine::general_purpose::URL_SAFE, Engine};
use cfb_mode::cipher::{AsyncStreamCipher, KeyIvInit};
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroizing;

/// IV length (bytes) - one AES block
pub const IV_LEN: usize = 16;

type Aes256CfbEnc = cfb_mode::Encryptor<Aes256>;
type Aes256CfbDec = cfb_mode::Decryptor<Aes256>;

/// Encrypts and decrypts values under one derived key
pub struct Encryptor {
    key: DerivedKey,
}

impl Encryptor {
    /// Create encryptor from a 32-byte key
    pub fn new(key: &[u8; KEY_LEN]) -> Self {
        Self {
            key: Zeroizing::new(*key),
        }
    }

    /// Encrypt a value with a fresh random IV.
    /// Returns: base64url(IV || ciphertext)
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let mut iv = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut iv);

        let mut blob = Vec::with_capacity(IV_LEN + plaintext.len());
        blob.extend_from_slice(&iv);
        blob.extend_from_slice(plaintext.as_bytes());

        Aes256CfbEnc::new_from_slices(self.key.as_slice(), &iv)
            .map_err(|e| VaultError::InvalidInput(format!("cannot init AES-256-CFB: {}", e)))?
            .encrypt(&mut blob[IV_LEN..]);

        Ok(URL_SAFE.encode(&blob))
    }

    /// Decrypt a blob back to raw bytes.
    pub fn decrypt_bytes(&self, blob: &str) -> Result<Vec<u8>> {
        let decoded = URL_SAFE
            .decode(blob.trim())
            .map_err(|e| VaultError::MalformedBlob(format!("invalid base64url: {}", e)))?;

        if decoded.len() < IV_LEN {
            return Err(VaultError::MalformedBlob(format!(
                "decoded length {} is shorter than the {}-byte IV",
                decoded.len(),
                IV_LEN
            )));
        }

        let (iv, ciphertext) = decoded.split_at(IV_LEN);
        let mut plaintext = ciphertext.to_vec();

        Aes256CfbDec::new_from_slices(self.key.as_slice(), iv)
            .map_err(|e| VaultError::MalformedBlob(format!("cannot init AES-256-CFB: {}", e)))?
            .decrypt(&mut plaintext);

        Ok(plaintext)
    }

    /// Decrypt a blob back to UTF-8 text.
    pub fn decrypt(&self, blob: &str) -> Result<String> {
        let bytes = self.decrypt_bytes(blob)?;
        String::from_utf8(bytes).map_err(|_| {
            VaultError::MalformedBlob(
                "decrypted value is not valid UTF-8 (wrong master password or salt?)".to_string(),
            )
        })
    }
}
