// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Error taxonomy for the sign-up and submission workflow.
//!
//! | Error | Policy |
//! |-------|--------|
//! | `AccountCreationError` | fatal, aborts the workflow |
//! | `RegistrationError` | fatal unless the account already exists remotely |
//! | `SubmissionError` | fatal; network-unreachable is distinguishable |
//! | `PushRegistrationFailure` | never propagated, logged only |

use crate::storage::StorageError;

/// Backend error code returned when an account number is already registered.
pub const ACCOUNT_HAS_TAKEN: &str = "AccountHasTaken";

/// Code reported for a 503 response without a decodable error code.
pub const SERVER_UNAVAILABLE: &str = "ServerUnavailable";

/// Error returned by any backend REST call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("backend returned {status} ({code}): {message}")]
    Server {
        status: u16,
        code: String,
        message: String,
    },

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("response was invalid: {0}")]
    InvalidResponse(String),

    #[error("authentication failed: {0}")]
    Auth(String),
}

impl ApiError {
    pub fn server(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Backend error code, when the server supplied one.
    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Server { code, .. } => Some(code),
            _ => None,
        }
    }

    pub fn is_network_unreachable(&self) -> bool {
        matches!(self, ApiError::NetworkUnreachable(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            ApiError::NetworkUnreachable(e.to_string())
        } else if e.is_decode() {
            ApiError::InvalidResponse(e.to_string())
        } else {
            ApiError::Request(e.to_string())
        }
    }
}

/// Failure to create the local account.
#[derive(Debug, thiserror::Error)]
pub enum AccountCreationError {
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("an account already exists on this device")]
    AlreadyExists,

    #[error("stored account is corrupted: {0}")]
    Corrupted(String),

    #[error("account storage failed: {0}")]
    Storage(StorageError),
}

impl From<StorageError> for AccountCreationError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::AlreadyExists(_) => AccountCreationError::AlreadyExists,
            StorageError::Corrupted(reason) => AccountCreationError::Corrupted(reason),
            other => AccountCreationError::Storage(other),
        }
    }
}

/// Failure to register the account with the backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("account is already registered")]
    AccountAlreadyExists,

    #[error(transparent)]
    Api(ApiError),
}

impl From<ApiError> for RegistrationError {
    fn from(e: ApiError) -> Self {
        if e.code() == Some(ACCOUNT_HAS_TAKEN) {
            RegistrationError::AccountAlreadyExists
        } else {
            RegistrationError::Api(e)
        }
    }
}

/// Failure to submit an archive for processing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(transparent)]
pub struct SubmissionError(#[from] pub ApiError);

impl SubmissionError {
    /// Whether the device could not reach the backend at all. Callers may
    /// suppress user-facing alerts for this case.
    pub fn is_network_unreachable(&self) -> bool {
        self.0.is_network_unreachable()
    }
}

/// Failure of the best-effort push registration step.
#[derive(Debug, thiserror::Error)]
pub enum PushRegistrationFailure {
    #[error("push channel rejected registration: {0}")]
    Api(#[from] ApiError),

    #[error("push preferences unavailable: {0}")]
    Preferences(#[from] StorageError),
}

/// Terminal failure of the workflow.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("account creation failed: {0}")]
    AccountCreation(#[from] AccountCreationError),

    #[error("account registration failed: {0}")]
    Registration(#[from] RegistrationError),

    #[error("archive submission failed: {0}")]
    Submission(#[from] SubmissionError),

    #[error("another archive submission is already in progress")]
    AlreadyInProgress,
}

impl WorkflowError {
    /// Backend error code behind this failure, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            WorkflowError::Registration(RegistrationError::Api(e)) => e.code(),
            WorkflowError::Submission(SubmissionError(e)) => e.code(),
            _ => None,
        }
    }

    pub fn is_network_unreachable(&self) -> bool {
        match self {
            WorkflowError::Registration(RegistrationError::Api(e)) => e.is_network_unreachable(),
            WorkflowError::Submission(e) => e.is_network_unreachable(),
            _ => false,
        }
    }
}
