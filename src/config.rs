// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults and the [`ClientConfig`] loaded from
//! them at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `API_BASE_URL` | Archive backend base URL | `http://localhost:8080` |
//! | `DATA_DIR` | Root directory for local account storage | `./data` |
//! | `PUSH_REGISTRATION_URL` | Push channel registration endpoint | unset (push is a no-op) |
//! | `HTTP_TIMEOUT_SECS` | Per-request timeout | `15` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,fb_archive_client=debug` |

use std::path::PathBuf;
use std::time::Duration;

use crate::logging::LogFormat;
use crate::storage::paths::DATA_ROOT;

pub const API_BASE_URL_ENV: &str = "API_BASE_URL";
pub const DATA_DIR_ENV: &str = "DATA_DIR";
pub const PUSH_REGISTRATION_URL_ENV: &str = "PUSH_REGISTRATION_URL";
pub const HTTP_TIMEOUT_SECS_ENV: &str = "HTTP_TIMEOUT_SECS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(String),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: String, reason: String },
}

/// Client configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub data_dir: PathBuf,
    pub push_registration_url: Option<String>,
    pub http_timeout: Duration,
    pub log_format: LogFormat,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_base_url = get(API_BASE_URL_ENV).unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        url::Url::parse(&api_base_url).map_err(|e| ConfigError::Invalid {
            name: API_BASE_URL_ENV.to_string(),
            reason: e.to_string(),
        })?;

        let push_registration_url = get(PUSH_REGISTRATION_URL_ENV);
        if let Some(push_url) = &push_registration_url {
            url::Url::parse(push_url).map_err(|e| ConfigError::Invalid {
                name: PUSH_REGISTRATION_URL_ENV.to_string(),
                reason: e.to_string(),
            })?;
        }

        let http_timeout = match get(HTTP_TIMEOUT_SECS_ENV) {
            Some(raw) => raw
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| ConfigError::Invalid {
                    name: HTTP_TIMEOUT_SECS_ENV.to_string(),
                    reason: e.to_string(),
                })?,
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        let log_format = get(LOG_FORMAT_ENV)
            .map(|raw| LogFormat::parse(&raw))
            .unwrap_or_default();

        Ok(Self {
            api_base_url,
            data_dir: PathBuf::from(get(DATA_DIR_ENV).unwrap_or_else(|| DATA_ROOT.to_string())),
            push_registration_url,
            http_timeout,
            log_format,
        })
    }
}

/// Read a trimmed, non-empty environment variable.
pub fn env_optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn env_required(name: &str) -> Result<String, ConfigError> {
    env_optional(name).ok_or_else(|| ConfigError::Missing(name.to_string()))
}
