// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer-token acquisition and caching.
//!
//! The backend issues a JWT in exchange for a timestamp signed by the
//! account key. Tokens are cached per account until shortly before they
//! expire.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use super::{BackendClient, RequestAuth};
use crate::account::LocalAccount;
use crate::error::ApiError;
use crate::models::{AccountNumber, AuthRequest, AuthResponse};

const AUTH_PATH: &str = "/api/auth";

/// Lifetime assumed when the backend omits `expire_in`.
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);

/// Tokens are refreshed this long before their reported expiry.
const REFRESH_MARGIN: Duration = Duration::from_secs(30);

struct CachedToken {
    account_number: AccountNumber,
    token: String,
    expires_at: Instant,
}

/// Issues and caches bearer tokens.
#[derive(Clone)]
pub struct TokenManager {
    client: BackendClient,
    cache: Arc<RwLock<Option<CachedToken>>>,
}

impl TokenManager {
    pub fn new(client: BackendClient) -> Self {
        Self {
            client,
            cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Get a valid token for `account`, requesting a new one if needed.
    pub async fn bearer_token(&self, account: &LocalAccount) -> Result<String, ApiError> {
        {
            let cache = self.cache.read().await;
            if let Some(entry) = &*cache {
                if &entry.account_number == account.account_number()
                    && Instant::now() < entry.expires_at
                {
                    return Ok(entry.token.clone());
                }
            }
        }

        let (token, ttl) = self.request_token(account).await?;

        {
            let mut cache = self.cache.write().await;
            *cache = Some(CachedToken {
                account_number: account.account_number().clone(),
                token: token.clone(),
                expires_at: Instant::now() + ttl.saturating_sub(REFRESH_MARGIN),
            });
        }

        Ok(token)
    }

    /// Drop any cached token.
    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
    }

    #[cfg(test)]
    pub(crate) async fn has_cached_token(&self) -> bool {
        self.cache.read().await.is_some()
    }

    async fn request_token(&self, account: &LocalAccount) -> Result<(String, Duration), ApiError> {
        let request = signed_auth_request(account, Utc::now().timestamp_millis());
        let body = self
            .client
            .post_json(AUTH_PATH, &request, RequestAuth::None)
            .await?
            .ok_or_else(|| ApiError::Auth("empty token response".to_string()))?;

        let response: AuthResponse = serde_json::from_value(body)
            .map_err(|e| ApiError::Auth(format!("invalid token response: {e}")))?;

        if response.jwt_token.trim().is_empty() {
            return Err(ApiError::Auth(
                "token response did not include jwt_token".to_string(),
            ));
        }

        let ttl = response
            .expire_in
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TOKEN_TTL);

        debug!(
            account_number = %account.account_number(),
            ttl_secs = ttl.as_secs(),
            "Obtained bearer token"
        );

        Ok((response.jwt_token, ttl))
    }
}

/// Build the signed `POST /api/auth` body for a millisecond timestamp.
pub fn signed_auth_request(account: &LocalAccount, timestamp_millis: i64) -> AuthRequest {
    let timestamp = timestamp_millis.to_string();
    AuthRequest {
        requester: account.account_number().clone(),
        signature: account.sign(timestamp.as_bytes()),
        timestamp,
    }
}
