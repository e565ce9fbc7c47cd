// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Push-notification channel registration.
//!
//! The channel is tagged with the account number so the backend can notify
//! the device once its archive has been processed. Registration is
//! best-effort; callers log failures and carry on.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, info};

use crate::api::decode_error;
use crate::error::{ApiError, PushRegistrationFailure};
use crate::models::AccountNumber;

#[async_trait]
pub trait NotificationRegistrar: Send + Sync {
    async fn register_for_push(
        &self,
        account_number: &AccountNumber,
    ) -> Result<(), PushRegistrationFailure>;
}

/// Registers the account tag with an HTTP push endpoint.
///
/// Without an endpoint, registration is a logged no-op.
#[derive(Debug, Clone)]
pub struct HttpNotificationRegistrar {
    endpoint: Option<String>,
    http: Client,
}

impl HttpNotificationRegistrar {
    pub fn new(endpoint: Option<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { endpoint, http })
    }
}

#[async_trait]
impl NotificationRegistrar for HttpNotificationRegistrar {
    async fn register_for_push(
        &self,
        account_number: &AccountNumber,
    ) -> Result<(), PushRegistrationFailure> {
        let Some(endpoint) = &self.endpoint else {
            debug!("No push endpoint configured, skipping registration");
            return Ok(());
        };

        let response = self
            .http
            .post(endpoint)
            .json(&tag_payload(account_number))
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.map_err(ApiError::from)?;
            return Err(decode_error(status, &body).into());
        }

        info!(account_number = %account_number, "Registered push notification tag");
        Ok(())
    }
}

fn tag_payload(account_number: &AccountNumber) -> serde_json::Value {
    json!({ "tags": { "account_number": account_number } })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_tags_account_number() {
        let payload = tag_payload(&AccountNumber::from("02beef"));
        assert_eq!(payload, json!({ "tags": { "account_number": "02beef" } }));
    }

    #[tokio::test]
    async fn missing_endpoint_is_noop() {
        let registrar = HttpNotificationRegistrar::new(None, Duration::from_secs(1)).unwrap();
        registrar
            .register_for_push(&AccountNumber::from("02beef"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unreachable_endpoint_reports_failure() {
        let registrar = HttpNotificationRegistrar::new(
            Some("http://127.0.0.1:9/register".to_string()),
            Duration::from_secs(2),
        )
        .unwrap();
        let err = registrar
            .register_for_push(&AccountNumber::from("02beef"))
            .await
            .unwrap_err();
        assert!(matches!(err, PushRegistrationFailure::Api(ApiError::NetworkUnreachable(_))));
    }

    mod http {
        use super::*;
        use wiremock::matchers::{body_json, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        #[tokio::test]
        async fn registers_account_tag() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/register"))
                .and(body_json(json!({ "tags": { "account_number": "02beef" } })))
                .respond_with(ResponseTemplate::new(204))
                .expect(1)
                .mount(&server)
                .await;

            let registrar = HttpNotificationRegistrar::new(
                Some(format!("{}/register", server.uri())),
                Duration::from_secs(5),
            )
            .unwrap();
            registrar
                .register_for_push(&AccountNumber::from("02beef"))
                .await
                .unwrap();
        }

        #[tokio::test]
        async fn rejected_registration_is_api_failure() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/register"))
                .respond_with(ResponseTemplate::new(500))
                .mount(&server)
                .await;

            let registrar = HttpNotificationRegistrar::new(
                Some(format!("{}/register", server.uri())),
                Duration::from_secs(5),
            )
            .unwrap();
            let err = registrar
                .register_for_push(&AccountNumber::from("02beef"))
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                PushRegistrationFailure::Api(ApiError::Server { status: 500, .. })
            ));
        }
    }
}
