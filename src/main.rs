// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::collections::BTreeMap;
use std::process::ExitCode;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info};

use fb_archive_client::account::{AccountContext, FileAccountStore};
use fb_archive_client::api::{BackendClient, HttpAccountRegistrar, HttpArchiveSubmitter, TokenManager};
use fb_archive_client::capture::CaptureSession;
use fb_archive_client::config::{env_optional, env_required, ClientConfig, ConfigError};
use fb_archive_client::error::{ApiError, WorkflowError};
use fb_archive_client::logging::{self, LogFormat};
use fb_archive_client::models::{ArchiveSubmission, Metadata};
use fb_archive_client::push::HttpNotificationRegistrar;
use fb_archive_client::storage::{SecureStorage, StorageError};
use fb_archive_client::workflow::{RequestDataWorkflow, SignUpRequest};

const ARCHIVE_FILE_URL_ENV: &str = "ARCHIVE_FILE_URL";
const ARCHIVE_RAW_COOKIE_ENV: &str = "ARCHIVE_RAW_COOKIE";
const ARCHIVE_HEADERS_ENV: &str = "ARCHIVE_HEADERS";
const ARCHIVE_STARTED_AT_ENV: &str = "ARCHIVE_STARTED_AT";
const ARCHIVE_ENDED_AT_ENV: &str = "ARCHIVE_ENDED_AT";
const ACCOUNT_METADATA_ENV: &str = "ACCOUNT_METADATA";

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("storage unavailable: {0}")]
    Storage(#[from] StorageError),

    #[error("http client setup failed: {0}")]
    Client(#[from] ApiError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            logging::init(LogFormat::default());
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    logging::init(config.log_format);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Archive submission failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ClientConfig) -> Result<(), RunError> {
    let request = request_from_env()?;

    let storage = Arc::new(SecureStorage::open(&config.data_dir)?);
    let accounts = Arc::new(AccountContext::new(Arc::new(FileAccountStore::new(
        storage.clone(),
    ))));

    let client = BackendClient::from_config(&config)?;
    let tokens = Arc::new(TokenManager::new(client.clone()));
    let notifications = HttpNotificationRegistrar::new(
        config.push_registration_url.clone(),
        config.http_timeout,
    )?;

    let workflow = RequestDataWorkflow::new(
        accounts,
        Arc::new(HttpAccountRegistrar::new(client.clone())),
        Arc::new(notifications),
        Arc::new(HttpArchiveSubmitter::new(client, tokens)),
        storage,
    );

    info!(api_base_url = %config.api_base_url, "Submitting archive");
    workflow.sign_up_and_submit_archive(request).await?;
    info!("Archive submitted");
    Ok(())
}

fn request_from_env() -> Result<SignUpRequest, ConfigError> {
    let file_url = env_required(ARCHIVE_FILE_URL_ENV)?;
    let raw_cookie = env_required(ARCHIVE_RAW_COOKIE_ENV)?;
    let headers: BTreeMap<String, String> = match env_optional(ARCHIVE_HEADERS_ENV) {
        Some(raw) => parse_json(ARCHIVE_HEADERS_ENV, &raw)?,
        None => BTreeMap::new(),
    };

    let session = CaptureSession::with_start(timestamp_env(ARCHIVE_STARTED_AT_ENV)?);
    let submission: ArchiveSubmission = match timestamp_env(ARCHIVE_ENDED_AT_ENV)? {
        Some(ended_at) => session.finish_at(headers, file_url, raw_cookie, ended_at),
        None => session.finish(headers, file_url, raw_cookie),
    };

    let mut request = SignUpRequest::new(submission);
    if let Some(raw) = env_optional(ACCOUNT_METADATA_ENV) {
        request = request.with_metadata(parse_json::<Metadata>(ACCOUNT_METADATA_ENV, &raw)?);
    }
    Ok(request)
}

fn timestamp_env(name: &str) -> Result<Option<DateTime<Utc>>, ConfigError> {
    env_optional(name)
        .map(|raw| {
            DateTime::parse_from_rfc3339(&raw)
                .map(|ts| ts.with_timezone(&Utc))
                .map_err(|e| ConfigError::Invalid {
                    name: name.to_string(),
                    reason: e.to_string(),
                })
        })
        .transpose()
}

fn parse_json<T: serde::de::DeserializeOwned>(name: &str, raw: &str) -> Result<T, ConfigError> {
    serde_json::from_str(raw).map_err(|e| ConfigError::Invalid {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
