// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Remote account registration (`POST /api/accounts`).

use async_trait::async_trait;
use tracing::info;

use super::{BackendClient, RequestAuth};
use crate::account::LocalAccount;
use crate::error::{ApiError, RegistrationError};
use crate::models::{Metadata, RegisterAccountRequest, RemoteAccountRecord, ResultEnvelope};

const ACCOUNTS_PATH: &str = "/api/accounts";

/// Registers a local account's public key with the backend.
#[async_trait]
pub trait AccountRegistrar: Send + Sync {
    /// Register `account` with `metadata`.
    ///
    /// Returns `RegistrationError::AccountAlreadyExists` when the backend
    /// reports the account number as taken.
    async fn register(
        &self,
        account: &LocalAccount,
        metadata: Metadata,
    ) -> Result<RemoteAccountRecord, RegistrationError>;
}

#[derive(Debug, Clone)]
pub struct HttpAccountRegistrar {
    client: BackendClient,
}

impl HttpAccountRegistrar {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AccountRegistrar for HttpAccountRegistrar {
    async fn register(
        &self,
        account: &LocalAccount,
        metadata: Metadata,
    ) -> Result<RemoteAccountRecord, RegistrationError> {
        let request = RegisterAccountRequest {
            enc_pub_key: account.enc_pub_key().to_string(),
            metadata,
        };

        let body = self
            .client
            .post_json(
                ACCOUNTS_PATH,
                &request,
                RequestAuth::Requester(account.account_number()),
            )
            .await?
            .ok_or_else(|| ApiError::InvalidResponse("empty account response".to_string()))?;

        let record = parse_account_response(body)?;
        info!(account_number = %record.account_number, "Registered account with backend");
        Ok(record)
    }
}

fn parse_account_response(body: serde_json::Value) -> Result<RemoteAccountRecord, ApiError> {
    serde_json::from_value::<ResultEnvelope<RemoteAccountRecord>>(body)
        .map(|envelope| envelope.result)
        .map_err(|e| ApiError::InvalidResponse(format!("invalid account response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_has_key_and_metadata() {
        let mut metadata = Metadata::new();
        metadata.insert("platform".to_string(), json!("cli"));
        let request = RegisterAccountRequest {
            enc_pub_key: "03abcd".to_string(),
            metadata,
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "enc_pub_key": "03abcd", "metadata": { "platform": "cli" } })
        );
    }

    #[test]
    fn empty_metadata_serializes_as_object() {
        let request = RegisterAccountRequest {
            enc_pub_key: "03abcd".to_string(),
            metadata: Metadata::new(),
        };
        assert_eq!(serde_json::to_value(&request).unwrap()["metadata"], json!({}));
    }

    #[test]
    fn parses_result_envelope() {
        let record = parse_account_response(json!({
            "result": {
                "account_number": "02ff",
                "metadata": {},
                "created_at": "2026-02-01T10:00:00Z",
                "updated_at": "2026-02-02T10:00:00Z"
            }
        }))
        .unwrap();
        assert_eq!(record.account_number.0, "02ff");
        assert!(record.updated_at > record.created_at);
    }

    #[test]
    fn missing_envelope_is_invalid_response() {
        let err = parse_account_response(json!({ "account_number": "02ff" })).unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    mod http {
        use super::*;
        use std::time::Duration;
        use wiremock::matchers::{body_partial_json, header, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        async fn registrar(server: &MockServer) -> HttpAccountRegistrar {
            HttpAccountRegistrar::new(BackendClient::new(server.uri(), Duration::from_secs(5)).unwrap())
        }

        #[tokio::test]
        async fn register_sends_key_and_reads_envelope() {
            let server = MockServer::start().await;
            let account = LocalAccount::generate().unwrap();

            Mock::given(method("POST"))
                .and(path(ACCOUNTS_PATH))
                .and(header("requester", account.account_number().0.as_str()))
                .and(body_partial_json(json!({
                    "enc_pub_key": account.enc_pub_key(),
                    "metadata": { "source": "cli" }
                })))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "result": {
                        "account_number": account.account_number().0,
                        "metadata": { "source": "cli" },
                        "created_at": "2026-03-01T12:00:00Z"
                    }
                })))
                .expect(1)
                .mount(&server)
                .await;

            let mut metadata = Metadata::new();
            metadata.insert("source".to_string(), json!("cli"));
            let record = registrar(&server)
                .await
                .register(&account, metadata)
                .await
                .unwrap();

            assert_eq!(&record.account_number, account.account_number());
            assert_eq!(record.metadata["source"], json!("cli"));
            assert!(record.created_at.is_some());
        }

        #[tokio::test]
        async fn taken_account_maps_to_already_exists() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path(ACCOUNTS_PATH))
                .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                    "error": { "code": 1007, "message": "AccountHasTaken", "reason": "exists" }
                })))
                .mount(&server)
                .await;

            let account = LocalAccount::generate().unwrap();
            let err = registrar(&server)
                .await
                .register(&account, Metadata::new())
                .await
                .unwrap_err();

            assert_eq!(err, RegistrationError::AccountAlreadyExists);
        }

        #[tokio::test]
        async fn unavailable_backend_keeps_server_code() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path(ACCOUNTS_PATH))
                .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
                .mount(&server)
                .await;

            let account = LocalAccount::generate().unwrap();
            let err = registrar(&server)
                .await
                .register(&account, Metadata::new())
                .await
                .unwrap_err();

            match err {
                RegistrationError::Api(api) => {
                    assert_eq!(api.code(), Some(crate::error::SERVER_UNAVAILABLE))
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }

        #[tokio::test]
        async fn empty_success_body_is_invalid() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path(ACCOUNTS_PATH))
                .respond_with(ResponseTemplate::new(201))
                .mount(&server)
                .await;

            let account = LocalAccount::generate().unwrap();
            let err = registrar(&server)
                .await
                .register(&account, Metadata::new())
                .await
                .unwrap_err();

            assert!(matches!(err, RegistrationError::Api(ApiError::InvalidResponse(_))));
        }
    }
}
