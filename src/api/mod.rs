// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! REST client for the archive backend.
//!
//! ## Endpoints
//!
//! | Method | Path | Auth |
//! |--------|------|------|
//! | `POST` | `/api/auth` | none (signed timestamp) |
//! | `POST` | `/api/accounts` | none (`requester` header) |
//! | `POST` | `/api/archives/url` | bearer token |
//!
//! Error bodies are JSON; the backend error code is decoded into
//! [`ApiError::Server`].

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ApiError, SERVER_UNAVAILABLE};
use crate::models::AccountNumber;

pub mod accounts;
pub mod archives;
pub mod auth;

pub use accounts::{AccountRegistrar, HttpAccountRegistrar};
pub use archives::{ArchiveSubmitter, HttpArchiveSubmitter};
pub use auth::TokenManager;

/// Header identifying the calling account on unauthenticated requests.
pub const REQUESTER_HEADER: &str = "requester";

/// How a request authenticates itself.
#[derive(Debug, Clone, Copy)]
pub enum RequestAuth<'a> {
    None,
    Requester(&'a AccountNumber),
    Bearer(&'a str),
}

/// Thin JSON-over-HTTPS client shared by the backend services.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    http: Client,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(config.api_base_url.clone(), config.http_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// POST a JSON body. Returns `None` for an empty 2xx response body.
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
        auth: RequestAuth<'_>,
    ) -> Result<Option<Value>, ApiError> {
        let mut request = self.http.post(self.url(path)).json(body);
        request = match auth {
            RequestAuth::None => request,
            RequestAuth::Requester(account_number) => {
                request.header(REQUESTER_HEADER, account_number.0.as_str())
            }
            RequestAuth::Bearer(token) => request.bearer_auth(token),
        };

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        debug!(path, status = status.as_u16(), "Backend responded");

        if !status.is_success() {
            return Err(decode_error(status, &bytes));
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| ApiError::InvalidResponse(format!("POST {path} invalid JSON: {e}")))
    }
}

/// Build an [`ApiError`] from a non-success response.
pub fn decode_error(status: StatusCode, body: &[u8]) -> ApiError {
    let parsed: Option<Value> = serde_json::from_slice(body).ok();
    let code = parsed.as_ref().and_then(extract_error_code).map(str::to_string);
    let message = parsed
        .as_ref()
        .and_then(extract_error_message)
        .map(str::to_string)
        .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string());

    let code = match code {
        Some(code) => code,
        None if status == StatusCode::SERVICE_UNAVAILABLE => SERVER_UNAVAILABLE.to_string(),
        None => status
            .canonical_reason()
            .unwrap_or("Unknown")
            .replace(' ', ""),
    };

    ApiError::server(status.as_u16(), code, message)
}

fn extract_error_code(body: &Value) -> Option<&str> {
    body.pointer("/error/message")
        .and_then(Value::as_str)
        .or_else(|| body.pointer("/error/code").and_then(Value::as_str))
        .or_else(|| body.get("message").and_then(Value::as_str))
        .or_else(|| body.get("error").and_then(Value::as_str))
}

fn extract_error_message(body: &Value) -> Option<&str> {
    body.pointer("/error/reason")
        .and_then(Value::as_str)
        .or_else(|| body.pointer("/error/message").and_then(Value::as_str))
        .or_else(|| body.get("message").and_then(Value::as_str))
}
