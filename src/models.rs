// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Data Models
//!
//! Domain records exchanged with the archive backend and their wire
//! payloads.
//!
//! ## Account Number Type
//!
//! The [`AccountNumber`] newtype wraps the public identifier derived from
//! the account seed (hex-encoded compressed secp256k1 public key).
//!
//! ## Model Categories
//!
//! - **Accounts**: remote registration request and record
//! - **Archives**: submission request and its wire payload
//! - **Auth**: bearer-token request and response

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque string-keyed metadata attached to a remote account.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

// =============================================================================
// Account Number Type
// =============================================================================

/// Public account identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountNumber(pub String);

impl std::fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AccountNumber {
    fn from(value: String) -> Self {
        AccountNumber(value)
    }
}

impl From<&str> for AccountNumber {
    fn from(value: &str) -> Self {
        AccountNumber(value.to_string())
    }
}

impl AsRef<str> for AccountNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Accounts
// =============================================================================

/// Body of `POST /api/accounts`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegisterAccountRequest {
    pub enc_pub_key: String,
    pub metadata: Metadata,
}

/// Server-side registration of an account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteAccountRecord {
    pub account_number: AccountNumber,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// `{ "result": ... }` envelope used by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultEnvelope<T> {
    pub result: T,
}

// =============================================================================
// Archives
// =============================================================================

/// A request to process a previously uploaded archive.
#[derive(Clone, PartialEq, Eq)]
pub struct ArchiveSubmission {
    /// Request headers captured while downloading the archive
    pub headers: BTreeMap<String, String>,
    /// Location of the uploaded archive
    pub file_url: String,
    /// Session cookie for the social network (sensitive)
    pub raw_cookie: String,
    /// Start of the requested data window, when known
    pub started_at: Option<DateTime<Utc>>,
    /// End of the requested data window
    pub ended_at: DateTime<Utc>,
}

impl std::fmt::Debug for ArchiveSubmission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveSubmission")
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field("file_url", &self.file_url)
            .field("raw_cookie", &"<redacted>")
            .field("started_at", &self.started_at)
            .field("ended_at", &self.ended_at)
            .finish()
    }
}

/// Body of `POST /api/archives/url`. Times are epoch seconds; a missing
/// window start is sent as `0`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmitArchivePayload {
    pub headers: BTreeMap<String, String>,
    pub file_url: String,
    pub raw_cookie: String,
    pub started_at: i64,
    pub ended_at: i64,
}

impl From<&ArchiveSubmission> for SubmitArchivePayload {
    fn from(submission: &ArchiveSubmission) -> Self {
        Self {
            headers: submission.headers.clone(),
            file_url: submission.file_url.clone(),
            raw_cookie: submission.raw_cookie.clone(),
            started_at: submission.started_at.map_or(0, |t| t.timestamp()),
            ended_at: submission.ended_at.timestamp(),
        }
    }
}

// =============================================================================
// Auth
// =============================================================================

/// Body of `POST /api/auth`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthRequest {
    pub requester: AccountNumber,
    /// Epoch milliseconds as a decimal string
    pub timestamp: String,
    /// Hex ECDSA signature over `timestamp`
    pub signature: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub jwt_token: String,
    /// Token lifetime in seconds
    #[serde(default)]
    pub expire_in: Option<u64>,
}
