// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Explicit "current account" context owned by the caller.
//!
//! The context is constructed once, shared through `Arc` and handed to every
//! workflow that needs the account. It also carries the single-flight gate
//! that keeps two workflows from creating accounts concurrently.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard, RwLock};

use super::{AccountStore, LocalAccount};
use crate::error::AccountCreationError;

/// Held for the lifetime of one workflow run.
pub type WorkflowGuard<'a> = MutexGuard<'a, ()>;

pub struct AccountContext {
    store: Arc<dyn AccountStore>,
    current: RwLock<Option<LocalAccount>>,
    gate: Mutex<()>,
}

impl AccountContext {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self {
            store,
            current: RwLock::new(None),
            gate: Mutex::new(()),
        }
    }

    /// The current account, loading it from the store on first use.
    pub async fn current(&self) -> Result<Option<LocalAccount>, AccountCreationError> {
        {
            let current = self.current.read().await;
            if current.is_some() {
                return Ok(current.clone());
            }
        }

        let loaded = self.store.get_current_account()?;
        if loaded.is_some() {
            *self.current.write().await = loaded.clone();
        }
        Ok(loaded)
    }

    /// Return the current account, creating one if none exists.
    ///
    /// The boolean is `true` when the account was created by this call.
    pub async fn ensure_account(&self) -> Result<(LocalAccount, bool), AccountCreationError> {
        if let Some(account) = self.current().await? {
            return Ok((account, false));
        }

        let mut current = self.current.write().await;
        if let Some(account) = current.as_ref() {
            return Ok((account.clone(), false));
        }

        let account = self.store.create_account()?;
        *current = Some(account.clone());
        Ok((account, true))
    }

    /// Claim the single-flight gate. Returns `None` if another workflow is
    /// already running against this context.
    pub fn try_begin(&self) -> Option<WorkflowGuard<'_>> {
        self.gate.try_lock().ok()
    }
}
