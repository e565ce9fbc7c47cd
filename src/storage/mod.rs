// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Local Storage Module
//!
//! Persistent on-device state for the archive client: the account seed,
//! onboarding caches, user preferences and an audit trail.
//!
//! ## Storage Layout
//!
//! ```text
//! {data}/
//!   account/
//!     meta.json       # Public account values
//!     seed.key        # Seed (NEVER sent anywhere)
//!   cache/
//!     categorization.json
//!   user_info/
//!     {key}.json
//!   preferences.json
//!   audit/
//!     {date}/events.jsonl  # Daily audit logs
//! ```

pub mod audit;
pub mod paths;
pub mod repository;
pub mod secure_fs;

pub use audit::{AuditEvent, AuditEventType, AuditRepository};
pub use paths::StoragePaths;
pub use repository::{
    AccountRepository, Preferences, PreferencesRepository, StoredAccount, UserInfoRecord,
    UserInfoRepository, CATEGORIZATION_KEY,
};
pub use secure_fs::{SecureStorage, StorageError, StorageResult};
