// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Local audit trail for account and submission events.
//!
//! Every account creation and every terminal workflow outcome is appended
//! to a daily JSONL file so support can reconstruct what a device did.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{SecureStorage, StorageError, StorageResult};

/// Types of auditable events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    AccountCreated,
    AccountRegistered,
    ArchiveSubmitted,
    WorkflowFailed,
}

/// An audit log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique event ID.
    pub event_id: String,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// Type of event.
    pub event_type: AuditEventType,
    /// Account the event belongs to (if one existed yet).
    pub account_number: Option<String>,
    /// Additional details as JSON.
    pub details: Option<serde_json::Value>,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error message if operation failed.
    pub error: Option<String>,
}

impl AuditEvent {
    /// Create a new audit event.
    pub fn new(event_type: AuditEventType) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event_type,
            account_number: None,
            details: None,
            success: true,
            error: None,
        }
    }

    /// Set the account number.
    pub fn with_account(mut self, account_number: impl Into<String>) -> Self {
        self.account_number = Some(account_number.into());
        self
    }

    /// Add details.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Mark as failed with error message.
    pub fn failed(mut self, error: impl Into<String>) -> Self {
        self.success = false;
        self.error = Some(error.into());
        self
    }
}

/// Repository for audit events.
pub struct AuditRepository<'a> {
    storage: &'a SecureStorage,
}

impl<'a> AuditRepository<'a> {
    /// Create a new audit repository.
    pub fn new(storage: &'a SecureStorage) -> Self {
        Self { storage }
    }

    /// Log an audit event.
    ///
    /// Events are appended to a daily log file in JSONL format.
    pub fn log(&self, event: &AuditEvent) -> StorageResult<()> {
        let date = event.timestamp.format("%Y-%m-%d").to_string();
        let path = self.storage.paths().audit_events_file(&date);

        let mut content = match self.storage.read_raw(&path) {
            Ok(content) => content,
            Err(StorageError::NotFound(_)) => Vec::new(),
            Err(e) => return Err(e),
        };

        let event_json = serde_json::to_string(event).map_err(|e| {
            StorageError::SerializationError(format!("Failed to serialize audit event: {e}"))
        })?;

        if !content.is_empty() && !content.ends_with(b"\n") {
            content.push(b'\n');
        }
        content.extend_from_slice(event_json.as_bytes());
        content.push(b'\n');

        self.storage.write_raw(&path, &content)
    }

    /// Read audit events for a specific date (`YYYY-MM-DD`).
    pub fn read_events(&self, date: &str) -> StorageResult<Vec<AuditEvent>> {
        let path = self.storage.paths().audit_events_file(date);
        let content = self.storage.read_raw(&path)?;

        let content_str = String::from_utf8(content).map_err(|e| {
            StorageError::SerializationError(format!("Invalid UTF-8 in audit log: {e}"))
        })?;

        content_str
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line).map_err(|e| {
                    StorageError::SerializationError(format!(
                        "Failed to deserialize audit event: {e}"
                    ))
                })
            })
            .collect()
    }

    /// Read events for one account on a given date.
    pub fn search_by_account(
        &self,
        account_number: &str,
        date: &str,
    ) -> StorageResult<Vec<AuditEvent>> {
        let events = self.read_events(date)?;
        Ok(events
            .into_iter()
            .filter(|e| e.account_number.as_deref() == Some(account_number))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, SecureStorage) {
        let temp = TempDir::new().unwrap();
        let storage = SecureStorage::open(temp.path()).unwrap();
        (temp, storage)
    }

    fn today() -> String {
        Utc::now().format("%Y-%m-%d").to_string()
    }

    #[test]
    fn failed_event() {
        let event = AuditEvent::new(AuditEventType::WorkflowFailed)
            .with_account("acct")
            .failed("server unavailable");

        assert!(!event.success);
        assert_eq!(event.error, Some("server unavailable".to_string()));
    }

    #[test]
    fn log_and_read_events() {
        let (_temp, storage) = setup();
        let repo = AuditRepository::new(&storage);

        repo.log(&AuditEvent::new(AuditEventType::AccountCreated).with_account("a1"))
            .unwrap();
        repo.log(
            &AuditEvent::new(AuditEventType::ArchiveSubmitted)
                .with_account("a1")
                .with_details(serde_json::json!({ "file_url": "s3://bucket/archive.zip" })),
        )
        .unwrap();

        let events = repo.read_events(&today()).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, AuditEventType::AccountCreated);
        assert_eq!(events[1].event_type, AuditEventType::ArchiveSubmitted);
    }

    #[test]
    fn search_by_account_filters_other_accounts() {
        let (_temp, storage) = setup();
        let repo = AuditRepository::new(&storage);

        repo.log(&AuditEvent::new(AuditEventType::AccountRegistered).with_account("target"))
            .unwrap();
        repo.log(&AuditEvent::new(AuditEventType::AccountRegistered).with_account("other"))
            .unwrap();
        repo.log(&AuditEvent::new(AuditEventType::WorkflowFailed))
            .unwrap();

        let events = repo.search_by_account("target", &today()).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].account_number.as_deref(), Some("target"));
    }

    #[test]
    fn reading_a_day_without_events_is_not_found() {
        let (_temp, storage) = setup();
        let repo = AuditRepository::new(&storage);
        assert!(matches!(
            repo.read_events("1999-01-01"),
            Err(StorageError::NotFound(_))
        ));
    }
}
