//! Storage module - Credential rows, database provisioning and the salt file.
//!
//! This module contains:
//! - `passwords` table access (insert / select / delete by site name)
//! - Schema provisioning for a fresh database, guarded against a lost salt
//! - Salt file persistence

pub mod passwords;
pub mod salt;
pub mod schema;

pub use passwords::{CredentialRecord, PasswordTable};
pub use salt::SaltFile;
pub use schema::{ensure_schema, provision};
