// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository for the single local account.
//!
//! ## Storage Layout
//!
//! ```text
//! {data}/account/
//!   meta.json   # Public values (account number, encryption public key)
//!   seed.key    # Hex-encoded seed, owner-only permissions
//! ```
//!
//! The seed file is the source of truth for "an account exists". Metadata
//! is derived from it and only cached here for inspection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::super::{SecureStorage, StorageError, StorageResult};

/// Public account metadata stored in meta.json.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAccount {
    /// Public account identifier derived from the seed
    pub account_number: String,
    /// Public half of the seed-derived encryption key
    pub enc_pub_key: String,
    /// When the account was created on this device
    pub created_at: DateTime<Utc>,
}

/// Repository for account seed and metadata.
pub struct AccountRepository<'a> {
    storage: &'a SecureStorage,
}

impl<'a> AccountRepository<'a> {
    /// Create a new AccountRepository.
    pub fn new(storage: &'a SecureStorage) -> Self {
        Self { storage }
    }

    /// Check if a local account exists.
    pub fn exists(&self) -> bool {
        self.storage.exists(self.storage.paths().account_seed())
    }

    /// Get the stored public metadata.
    pub fn get(&self) -> StorageResult<StoredAccount> {
        let path = self.storage.paths().account_meta();
        if !self.storage.exists(&path) {
            return Err(StorageError::NotFound("Account metadata".to_string()));
        }
        self.storage.read_json(path)
    }

    /// Read the account seed.
    pub fn read_seed(&self) -> StorageResult<Zeroizing<Vec<u8>>> {
        let path = self.storage.paths().account_seed();
        if !self.storage.exists(&path) {
            return Err(StorageError::NotFound("Account seed".to_string()));
        }

        let encoded = Zeroizing::new(self.storage.read_raw(path)?);
        let text = std::str::from_utf8(&encoded)
            .map_err(|e| StorageError::Corrupted(format!("seed is not UTF-8: {e}")))?;
        hex::decode(text.trim())
            .map(Zeroizing::new)
            .map_err(|e| StorageError::Corrupted(format!("seed is not hex: {e}")))
    }

    /// Persist a new account.
    ///
    /// # Returns
    /// - `Ok(())` if successful
    /// - `Err(StorageError::AlreadyExists)` if an account is already stored
    pub fn create(&self, account: &StoredAccount, seed: &[u8]) -> StorageResult<()> {
        if self.exists() {
            return Err(StorageError::AlreadyExists("Account".to_string()));
        }

        let encoded = Zeroizing::new(hex::encode(seed));
        self.storage
            .write_secret(self.storage.paths().account_seed(), encoded.as_bytes())?;
        self.storage
            .write_json(self.storage.paths().account_meta(), account)
    }
}
