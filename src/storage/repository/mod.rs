// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to local storage.
//!
//! Each repository covers one record type and uses `SecureStorage` for all
//! file operations.

pub mod accounts;
pub mod preferences;
pub mod user_info;

pub use accounts::{AccountRepository, StoredAccount};
pub use preferences::{Preferences, PreferencesRepository};
pub use user_info::{UserInfoRecord, UserInfoRepository, CATEGORIZATION_KEY};
