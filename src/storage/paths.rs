// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path constants and utilities for the local storage layout.

use std::path::{Path, PathBuf};

/// Default base directory for local persistent storage.
pub const DATA_ROOT: &str = "./data";

/// Storage path utilities for the secure local store.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DATA_ROOT)
    }
}

impl StoragePaths {
    /// Create a new StoragePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all local data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // ========== Account Paths ==========

    /// Directory holding the single local account.
    pub fn account_dir(&self) -> PathBuf {
        self.root.join("account")
    }

    /// Path to account metadata (public values only).
    pub fn account_meta(&self) -> PathBuf {
        self.account_dir().join("meta.json")
    }

    /// Path to the account seed. Never leaves the device.
    pub fn account_seed(&self) -> PathBuf {
        self.account_dir().join("seed.key")
    }

    // ========== Cache Paths ==========

    /// Directory for data cached during onboarding.
    pub fn cache_dir(&self) -> PathBuf {
        self.root.join("cache")
    }

    /// Path to the cached categorization answers.
    pub fn categorization_cache(&self) -> PathBuf {
        self.cache_dir().join("categorization.json")
    }

    // ========== User Info Paths ==========

    /// Directory containing persisted user-info records.
    pub fn user_info_dir(&self) -> PathBuf {
        self.root.join("user_info")
    }

    /// Path to a specific user-info record.
    pub fn user_info(&self, key: &str) -> PathBuf {
        self.user_info_dir().join(format!("{key}.json"))
    }

    // ========== Preferences ==========

    pub fn preferences(&self) -> PathBuf {
        self.root.join("preferences.json")
    }

    // ========== Audit Log Paths ==========

    /// Directory containing audit logs.
    pub fn audit_dir(&self) -> PathBuf {
        self.root.join("audit")
    }

    /// Directory for a specific date's audit logs.
    pub fn audit_date_dir(&self, date: &str) -> PathBuf {
        self.audit_dir().join(date)
    }

    /// Path to a daily audit events file (JSONL format).
    pub fn audit_events_file(&self, date: &str) -> PathBuf {
        self.audit_date_dir(date).join("events.jsonl")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_use_data_root() {
        let paths = StoragePaths::default();
        assert_eq!(paths.root(), Path::new("./data"));
    }

    #[test]
    fn account_paths_are_correct() {
        let paths = StoragePaths::new("/tmp/test-data");
        assert_eq!(paths.account_dir(), PathBuf::from("/tmp/test-data/account"));
        assert_eq!(
            paths.account_meta(),
            PathBuf::from("/tmp/test-data/account/meta.json")
        );
        assert_eq!(
            paths.account_seed(),
            PathBuf::from("/tmp/test-data/account/seed.key")
        );
    }

    #[test]
    fn cache_and_user_info_paths_are_correct() {
        let paths = StoragePaths::new("/tmp/test-data");
        assert_eq!(
            paths.categorization_cache(),
            PathBuf::from("/tmp/test-data/cache/categorization.json")
        );
        assert_eq!(
            paths.user_info("categorization"),
            PathBuf::from("/tmp/test-data/user_info/categorization.json")
        );
        assert_eq!(
            paths.preferences(),
            PathBuf::from("/tmp/test-data/preferences.json")
        );
    }

    #[test]
    fn audit_paths_are_correct() {
        let paths = StoragePaths::new("/tmp/test-data");
        assert_eq!(
            paths.audit_events_file("2026-01-28"),
            PathBuf::from("/tmp/test-data/audit/2026-01-28/events.jsonl")
        );
    }
}
