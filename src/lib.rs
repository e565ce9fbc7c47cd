// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! FB Archive Client - Account sign-up and archive submission
//!
//! Ensures a local seed-derived account exists, registers it with the
//! backend, optionally opts it into push notifications and submits a
//! captured data archive for processing.
//!
//! ## Modules
//!
//! - `account` - Local account keys, persistence and the shared account context
//! - `api` - Backend REST client (registration, auth, archive submission)
//! - `capture` - Archive capture window bookkeeping
//! - `push` - Push-notification tag registration
//! - `storage` - File-backed storage (accounts, preferences, user info, audit)
//! - `workflow` - The sign-up and submission orchestrator

pub mod account;
pub mod api;
pub mod capture;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod push;
pub mod storage;
pub mod workflow;
