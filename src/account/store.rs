// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account store: at most one local account per device.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::LocalAccount;
use crate::error::AccountCreationError;
use crate::storage::{AccountRepository, AuditEvent, AuditEventType, AuditRepository, SecureStorage};

/// Holds at most one local account.
///
/// `create_account` never replaces an existing account; callers check
/// `get_current_account` first. A stored account that cannot be read is an
/// error, never `Ok(None)`.
pub trait AccountStore: Send + Sync {
    /// The stored account, if any. No side effects.
    fn get_current_account(&self) -> Result<Option<LocalAccount>, AccountCreationError>;

    /// Generate and persist a new account.
    fn create_account(&self) -> Result<LocalAccount, AccountCreationError>;
}

/// Account store backed by the local secure storage.
#[derive(Clone)]
pub struct FileAccountStore {
    storage: Arc<SecureStorage>,
}

impl FileAccountStore {
    pub fn new(storage: Arc<SecureStorage>) -> Self {
        Self { storage }
    }
}

impl AccountStore for FileAccountStore {
    fn get_current_account(&self) -> Result<Option<LocalAccount>, AccountCreationError> {
        let repo = AccountRepository::new(&self.storage);
        if !repo.exists() {
            return Ok(None);
        }

        let seed = repo.read_seed().inspect_err(|e| {
            warn!(error = %e, "Stored account seed is unreadable");
        })?;

        LocalAccount::from_seed(&seed)
            .map(Some)
            .map_err(|e| {
                warn!(error = %e, "Stored account seed does not derive a valid key");
                AccountCreationError::Corrupted(e.to_string())
            })
    }

    fn create_account(&self) -> Result<LocalAccount, AccountCreationError> {
        let repo = AccountRepository::new(&self.storage);
        if repo.exists() {
            return Err(AccountCreationError::AlreadyExists);
        }

        let account = LocalAccount::generate()?;
        repo.create(&account.to_stored(Utc::now()), account.seed())?;

        info!(account_number = %account.account_number(), "Created local account");

        let event = AuditEvent::new(AuditEventType::AccountCreated)
            .with_account(account.account_number().to_string());
        if let Err(e) = AuditRepository::new(&self.storage).log(&event) {
            warn!(error = %e, "Failed to record account creation in audit log");
        }

        Ok(account)
    }
}
