// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Onboarding categorization cache and persisted user-info records.
//!
//! Answers collected before the user has an account are cached under
//! `cache/`. Once an archive submission completes they are promoted to a
//! keyed user-info record and the cache entry is removed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::{SecureStorage, StorageError, StorageResult};

/// User-info key under which promoted categorization data is stored.
pub const CATEGORIZATION_KEY: &str = "categorization";

/// A persisted user-info record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfoRecord {
    pub key: String,
    pub value: serde_json::Value,
    pub saved_at: DateTime<Utc>,
}

/// Repository for the categorization cache and user-info records.
pub struct UserInfoRepository<'a> {
    storage: &'a SecureStorage,
}

impl<'a> UserInfoRepository<'a> {
    pub fn new(storage: &'a SecureStorage) -> Self {
        Self { storage }
    }

    /// Cache categorization data gathered during onboarding.
    pub fn cache_categorization(&self, value: &serde_json::Value) -> StorageResult<()> {
        self.storage
            .write_json(self.storage.paths().categorization_cache(), value)
    }

    /// Read the cached categorization data, if any.
    pub fn cached_categorization(&self) -> StorageResult<Option<serde_json::Value>> {
        let path = self.storage.paths().categorization_cache();
        if !self.storage.exists(&path) {
            return Ok(None);
        }
        self.storage.read_json(path).map(Some)
    }

    /// Remove the cached categorization data. Missing cache is not an error.
    pub fn clear_categorization_cache(&self) -> StorageResult<()> {
        match self.storage.delete(self.storage.paths().categorization_cache()) {
            Ok(()) | Err(StorageError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Store (or replace) a user-info record.
    pub fn save(&self, key: &str, value: serde_json::Value) -> StorageResult<UserInfoRecord> {
        let record = UserInfoRecord {
            key: key.to_string(),
            value,
            saved_at: Utc::now(),
        };
        self.storage
            .write_json(self.storage.paths().user_info(key), &record)?;
        Ok(record)
    }

    /// Get a user-info record by key.
    pub fn get(&self, key: &str) -> StorageResult<UserInfoRecord> {
        let path = self.storage.paths().user_info(key);
        if !self.storage.exists(&path) {
            return Err(StorageError::NotFound(format!("User info {key}")));
        }
        self.storage.read_json(path)
    }

    /// List the keys of all stored user-info records.
    pub fn list_keys(&self) -> StorageResult<Vec<String>> {
        self.storage
            .list_files(self.storage.paths().user_info_dir(), "json")
    }

    /// Promote cached categorization data to a user-info record.
    ///
    /// Returns `Ok(None)` when nothing was cached. The cache is cleared only
    /// after the record has been written.
    pub fn promote_categorization(&self) -> StorageResult<Option<UserInfoRecord>> {
        let Some(value) = self.cached_categorization()? else {
            return Ok(None);
        };
        let record = self.save(CATEGORIZATION_KEY, value)?;
        self.clear_categorization_cache()?;
        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn setup() -> (TempDir, SecureStorage) {
        let temp = TempDir::new().unwrap();
        let storage = SecureStorage::open(temp.path()).unwrap();
        (temp, storage)
    }

    #[test]
    fn promote_moves_cache_into_user_info() {
        let (_temp, storage) = setup();
        let repo = UserInfoRepository::new(&storage);
        let answers = json!({ "interests": ["news", "music"] });

        repo.cache_categorization(&answers).unwrap();
        let record = repo.promote_categorization().unwrap().unwrap();

        assert_eq!(record.key, CATEGORIZATION_KEY);
        assert_eq!(record.value, answers);
        assert_eq!(repo.cached_categorization().unwrap(), None);
        assert_eq!(repo.get(CATEGORIZATION_KEY).unwrap().value, answers);
    }

    #[test]
    fn promote_without_cache_is_noop() {
        let (_temp, storage) = setup();
        let repo = UserInfoRepository::new(&storage);

        assert_eq!(repo.promote_categorization().unwrap(), None);
        assert!(repo.list_keys().unwrap().is_empty());
    }

    #[test]
    fn clearing_missing_cache_is_ok() {
        let (_temp, storage) = setup();
        let repo = UserInfoRepository::new(&storage);
        repo.clear_categorization_cache().unwrap();
    }
}
