// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Archive submission (`POST /api/archives/url`).

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::{BackendClient, RequestAuth, TokenManager};
use crate::account::LocalAccount;
use crate::error::{ApiError, SubmissionError};
use crate::models::{ArchiveSubmission, SubmitArchivePayload};

const ARCHIVES_URL_PATH: &str = "/api/archives/url";

/// Hands an uploaded archive to the backend for processing.
#[async_trait]
pub trait ArchiveSubmitter: Send + Sync {
    /// Submit on behalf of `account`. Success is the server's acknowledgement.
    async fn submit(
        &self,
        account: &LocalAccount,
        submission: &ArchiveSubmission,
    ) -> Result<(), SubmissionError>;
}

#[derive(Clone)]
pub struct HttpArchiveSubmitter {
    client: BackendClient,
    tokens: Arc<TokenManager>,
}

impl HttpArchiveSubmitter {
    pub fn new(client: BackendClient, tokens: Arc<TokenManager>) -> Self {
        Self { client, tokens }
    }
}

#[async_trait]
impl ArchiveSubmitter for HttpArchiveSubmitter {
    async fn submit(
        &self,
        account: &LocalAccount,
        submission: &ArchiveSubmission,
    ) -> Result<(), SubmissionError> {
        let token = self.tokens.bearer_token(account).await?;
        let payload = SubmitArchivePayload::from(submission);

        let result = self
            .client
            .post_json(ARCHIVES_URL_PATH, &payload, RequestAuth::Bearer(&token))
            .await;
        if let Err(ApiError::Server { status: 401, .. }) = &result {
            self.tokens.invalidate().await;
        }
        result?;

        info!(
            account_number = %account.account_number(),
            file_url = %submission.file_url,
            started_at = payload.started_at,
            ended_at = payload.ended_at,
            "Archive submitted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;
    use std::time::Duration;

    #[tokio::test]
    async fn unreachable_backend_is_network_failure() {
        let client = BackendClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let submitter = HttpArchiveSubmitter::new(client.clone(), Arc::new(TokenManager::new(client)));
        let account = LocalAccount::generate().unwrap();
        let submission = ArchiveSubmission {
            headers: BTreeMap::new(),
            file_url: "https://uploads.example.com/a.zip".to_string(),
            raw_cookie: "xs=1".to_string(),
            started_at: None,
            ended_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        };

        let err = submitter.submit(&account, &submission).await.unwrap_err();
        assert!(err.is_network_unreachable(), "unexpected error: {err:?}");
    }

    mod http {
        use super::*;
        use serde_json::json;
        use wiremock::matchers::{body_partial_json, header, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        fn submitter(server: &MockServer) -> HttpArchiveSubmitter {
            let client = BackendClient::new(server.uri(), Duration::from_secs(5)).unwrap();
            HttpArchiveSubmitter::new(client.clone(), Arc::new(TokenManager::new(client)))
        }

        fn submission() -> ArchiveSubmission {
            ArchiveSubmission {
                headers: BTreeMap::from([("Accept".to_string(), "*/*".to_string())]),
                file_url: "https://uploads.example.com/a.zip".to_string(),
                raw_cookie: "xs=1".to_string(),
                started_at: None,
                ended_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            }
        }

        async fn mount_token(server: &MockServer, token: &str, expected_calls: u64) {
            Mock::given(method("POST"))
                .and(path("/api/auth"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(json!({ "jwt_token": token, "expire_in": 900 })),
                )
                .expect(expected_calls)
                .mount(server)
                .await;
        }

        #[tokio::test]
        async fn empty_success_body_is_accepted_and_token_reused() {
            let server = MockServer::start().await;
            mount_token(&server, "jwt-1", 1).await;
            Mock::given(method("POST"))
                .and(path(ARCHIVES_URL_PATH))
                .and(header("authorization", "Bearer jwt-1"))
                .and(body_partial_json(json!({
                    "file_url": "https://uploads.example.com/a.zip",
                    "raw_cookie": "xs=1",
                    "headers": { "Accept": "*/*" },
                    "started_at": 0,
                    "ended_at": 1772366400
                })))
                .respond_with(ResponseTemplate::new(200))
                .expect(2)
                .mount(&server)
                .await;

            let submitter = submitter(&server);
            let account = LocalAccount::generate().unwrap();
            submitter.submit(&account, &submission()).await.unwrap();
            submitter.submit(&account, &submission()).await.unwrap();
        }

        #[tokio::test]
        async fn unauthorized_response_drops_cached_token() {
            let server = MockServer::start().await;
            mount_token(&server, "stale", 2).await;
            Mock::given(method("POST"))
                .and(path(ARCHIVES_URL_PATH))
                .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                    "error": { "message": "Unauthorized", "reason": "token expired" }
                })))
                .expect(2)
                .mount(&server)
                .await;

            let submitter = submitter(&server);
            let account = LocalAccount::generate().unwrap();

            let first = submitter.submit(&account, &submission()).await.unwrap_err();
            assert_eq!(first.0.code(), Some("Unauthorized"));
            assert!(!submitter.tokens.has_cached_token().await);

            submitter.submit(&account, &submission()).await.unwrap_err();
        }

        #[tokio::test]
        async fn rejected_submission_keeps_token() {
            let server = MockServer::start().await;
            mount_token(&server, "jwt-1", 1).await;
            Mock::given(method("POST"))
                .and(path(ARCHIVES_URL_PATH))
                .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                    "error": { "message": "InvalidArchiveURL", "reason": "bad url" }
                })))
                .mount(&server)
                .await;

            let submitter = submitter(&server);
            let account = LocalAccount::generate().unwrap();

            let err = submitter.submit(&account, &submission()).await.unwrap_err();
            assert_eq!(err.0.code(), Some("InvalidArchiveURL"));
            assert!(!err.is_network_unreachable());
            assert!(submitter.tokens.has_cached_token().await);
        }
    }
}
