// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Local account identity and its storage.

pub mod context;
pub mod keys;
pub mod store;

pub use context::{AccountContext, WorkflowGuard};
pub use keys::{LocalAccount, SEED_LEN};
pub use store::{AccountStore, FileAccountStore};
