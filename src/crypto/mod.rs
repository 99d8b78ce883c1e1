//! Crypto module - Encrypts and decrypts stored passwords with AES-256-CFB.
//!
//! This module contains:
//! - PBKDF2-HMAC-SHA256 key derivation from the master password
//! - AES-256-CFB encryption/decryption of single values
//! - IV generation and the base64url blob format

pub mod encryption;
pub mod key_derivation;

pub use encryption::{Encryptor, IV_LEN};
pub use key_derivation::{
    derive_key, generate_salt, DerivedKey, MasterSecret, KEY_LEN,
    PBKDF2_ITERATIONS, SALT_LEN,
};
