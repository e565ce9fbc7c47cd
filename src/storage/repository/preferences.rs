// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Local user preferences.

use serde::{Deserialize, Serialize};

use super::super::{SecureStorage, StorageResult};

/// Preferences persisted in `preferences.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Whether the user opted into push notifications.
    pub push_notifications_enabled: bool,
}

pub struct PreferencesRepository<'a> {
    storage: &'a SecureStorage,
}

impl<'a> PreferencesRepository<'a> {
    pub fn new(storage: &'a SecureStorage) -> Self {
        Self { storage }
    }

    /// Load preferences, falling back to defaults when none were saved.
    pub fn load(&self) -> StorageResult<Preferences> {
        let path = self.storage.paths().preferences();
        if !self.storage.exists(&path) {
            return Ok(Preferences::default());
        }
        self.storage.read_json(path)
    }

    pub fn save(&self, preferences: &Preferences) -> StorageResult<()> {
        self.storage
            .write_json(self.storage.paths().preferences(), preferences)
    }

    /// Record the push-notification opt-in choice.
    pub fn set_push_notifications_enabled(&self, enabled: bool) -> StorageResult<()> {
        let mut preferences = self.load()?;
        preferences.push_notifications_enabled = enabled;
        self.save(&preferences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_to_push_disabled() {
        let temp = TempDir::new().unwrap();
        let storage = SecureStorage::open(temp.path()).unwrap();
        let repo = PreferencesRepository::new(&storage);

        assert!(!repo.load().unwrap().push_notifications_enabled);
    }

    #[test]
    fn opt_in_is_persisted() {
        let temp = TempDir::new().unwrap();
        let storage = SecureStorage::open(temp.path()).unwrap();
        let repo = PreferencesRepository::new(&storage);

        repo.set_push_notifications_enabled(true).unwrap();

        let reopened = SecureStorage::open(temp.path()).unwrap();
        assert!(PreferencesRepository::new(&reopened)
            .load()
            .unwrap()
            .push_notifications_enabled);
    }
}
