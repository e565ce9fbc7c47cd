// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Sign-up and Archive Submission Workflow
//!
//! Runs the steps below strictly in order and reports one terminal result:
//!
//! ```text
//! EnsuringAccount -> RegisteringRemote -> RegisteringPush -> SubmittingArchive -> Completed
//!        \                  \                                      \
//!         +------------------+---------------> Failed(reason) <-----+
//! ```
//!
//! - An existing local account skips creation.
//! - "Account already exists" from the backend counts as a successful
//!   registration, so a retry after partial success completes.
//! - Push registration never fails the workflow.
//! - Nothing is rolled back on failure; the next run reuses the account.
//!
//! On completion, cached categorization answers are promoted to a user-info
//! record. That cleanup is best-effort and cannot change the outcome.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::account::{AccountContext, LocalAccount};
use crate::api::{AccountRegistrar, ArchiveSubmitter};
use crate::error::{PushRegistrationFailure, RegistrationError, WorkflowError};
use crate::models::{ArchiveSubmission, Metadata};
use crate::push::NotificationRegistrar;
use crate::storage::{
    AuditEvent, AuditEventType, AuditRepository, PreferencesRepository, SecureStorage,
    UserInfoRepository,
};

/// Workflow stages, used for logging only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    EnsuringAccount,
    RegisteringRemote,
    RegisteringPush,
    SubmittingArchive,
}

/// Inputs for one workflow run.
#[derive(Debug, Clone)]
pub struct SignUpRequest {
    pub submission: ArchiveSubmission,
    /// Metadata sent with the account registration; empty when `None`.
    pub metadata: Option<Metadata>,
}

impl SignUpRequest {
    pub fn new(submission: ArchiveSubmission) -> Self {
        Self {
            submission,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

pub struct RequestDataWorkflow {
    accounts: Arc<AccountContext>,
    registrar: Arc<dyn AccountRegistrar>,
    notifications: Arc<dyn NotificationRegistrar>,
    submitter: Arc<dyn ArchiveSubmitter>,
    storage: Arc<SecureStorage>,
}

impl RequestDataWorkflow {
    pub fn new(
        accounts: Arc<AccountContext>,
        registrar: Arc<dyn AccountRegistrar>,
        notifications: Arc<dyn NotificationRegistrar>,
        submitter: Arc<dyn ArchiveSubmitter>,
        storage: Arc<SecureStorage>,
    ) -> Self {
        Self {
            accounts,
            registrar,
            notifications,
            submitter,
            storage,
        }
    }

    /// Ensure an account, register it, opt into push and submit the archive.
    ///
    /// Only one run per [`AccountContext`] may be active; a concurrent call
    /// fails with [`WorkflowError::AlreadyInProgress`] without side effects.
    pub async fn sign_up_and_submit_archive(
        &self,
        request: SignUpRequest,
    ) -> Result<(), WorkflowError> {
        let Some(_guard) = self.accounts.try_begin() else {
            warn!("Archive submission requested while another is in progress");
            return Err(WorkflowError::AlreadyInProgress);
        };

        match self.run(request).await {
            Ok(account) => {
                info!(account_number = %account.account_number(), "Archive workflow completed");
                self.audit(
                    AuditEvent::new(AuditEventType::ArchiveSubmitted)
                        .with_account(account.account_number().to_string()),
                );
                self.promote_categorization();
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Archive workflow failed");
                let mut event = AuditEvent::new(AuditEventType::WorkflowFailed).failed(e.to_string());
                if let Ok(Some(account)) = self.accounts.current().await {
                    event = event.with_account(account.account_number().to_string());
                }
                self.audit(event);
                Err(e)
            }
        }
    }

    async fn run(&self, request: SignUpRequest) -> Result<LocalAccount, WorkflowError> {
        debug!(stage = ?Stage::EnsuringAccount, "Workflow step");
        let (account, created) = self.accounts.ensure_account().await?;
        if created {
            info!(account_number = %account.account_number(), "Created account for submission");
        }

        debug!(stage = ?Stage::RegisteringRemote, "Workflow step");
        self.register_remote(&account, request.metadata.unwrap_or_default())
            .await?;

        debug!(stage = ?Stage::RegisteringPush, "Workflow step");
        let current = self.accounts.current().await.ok().flatten();
        self.register_push(current.as_ref()).await;

        debug!(stage = ?Stage::SubmittingArchive, "Workflow step");
        self.submitter.submit(&account, &request.submission).await?;

        Ok(account)
    }

    async fn register_remote(
        &self,
        account: &LocalAccount,
        metadata: Metadata,
    ) -> Result<(), RegistrationError> {
        let already_registered = match self.registrar.register(account, metadata).await {
            Ok(_) => false,
            Err(RegistrationError::AccountAlreadyExists) => {
                info!(
                    account_number = %account.account_number(),
                    "Account already registered, continuing"
                );
                true
            }
            Err(e) => return Err(e),
        };

        self.audit(
            AuditEvent::new(AuditEventType::AccountRegistered)
                .with_account(account.account_number().to_string())
                .with_details(json!({ "already_registered": already_registered })),
        );
        Ok(())
    }

    /// Best-effort push registration; never fails the workflow.
    async fn register_push(&self, account: Option<&LocalAccount>) {
        if let Err(e) = self.try_register_push(account).await {
            warn!(error = %e, "Push registration failed");
        }
    }

    /// Registers `account` for push if the user opted in.
    ///
    /// If push is enabled but no account is present this never completes.
    /// An account is always ensured by an earlier step, so reaching that
    /// branch is a bug and stalling keeps it from submitting without one.
    async fn try_register_push(
        &self,
        account: Option<&LocalAccount>,
    ) -> Result<(), PushRegistrationFailure> {
        let preferences = PreferencesRepository::new(&self.storage).load()?;
        if !preferences.push_notifications_enabled {
            debug!("Push notifications not enabled, skipping registration");
            return Ok(());
        }

        let Some(account) = account else {
            error!("Push registration reached without an account; suspending workflow");
            return std::future::pending().await;
        };

        self.notifications
            .register_for_push(account.account_number())
            .await?;
        debug!(account_number = %account.account_number(), "Registered for push notifications");
        Ok(())
    }

    fn promote_categorization(&self) {
        match UserInfoRepository::new(&self.storage).promote_categorization() {
            Ok(Some(record)) => debug!(key = %record.key, "Promoted cached categorization"),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Failed to promote cached categorization"),
        }
    }

    fn audit(&self, event: AuditEvent) {
        if let Err(e) = AuditRepository::new(&self.storage).log(&event) {
            warn!(error = %e, "Failed to write audit event");
        }
    }
}
