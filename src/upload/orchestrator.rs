// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upload orchestration
//!
//! checksum -> file id and upload URL -> PUT, with one bounded retry through a
//! refreshed token and URL. The states passed through are recorded so callers
//! and tests can see exactly which path was taken.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::checksum::DocumentPayload;
use super::retry::{RetryPolicy, UploadFailure};
use crate::auth::{AuthError, TokenSession};
use crate::exchange::{ExchangeApi, RemoteError, PDF_CONTENT_TYPE, PDF_FORMAT_CATEGORY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    ChecksumComputed,
    IdObtained,
    UploadAttempted,
    UrlRefreshed,
    UploadRetried,
    Uploaded,
    Failed,
}

#[derive(Debug, Clone)]
pub struct UploadReport {
    pub file_id: String,
    pub checksum: String,
    pub attempts: u32,
    pub states: Vec<UploadState>,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Failed to read document {path}: {source}")]
    Checksum {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("Upload of file {file_id} failed after {attempts} attempts: {last}")]
    Exhausted {
        file_id: String,
        attempts: u32,
        last: UploadFailure,
        states: Vec<UploadState>,
    },
}

pub struct UploadOrchestrator {
    api: Arc<dyn ExchangeApi>,
    policy: RetryPolicy,
}

impl UploadOrchestrator {
    pub fn new(api: Arc<dyn ExchangeApi>, policy: RetryPolicy) -> Self {
        Self { api, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Upload the document at `path` under `file_reference` and return the
    /// remote file id once the payload is stored.
    pub async fn upload(
        &self,
        session: &mut TokenSession,
        file_reference: &str,
        path: &Path,
    ) -> Result<UploadReport, UploadError> {
        let mut states = Vec::new();

        let payload = DocumentPayload::read(path)
            .await
            .map_err(|source| UploadError::Checksum {
                path: path.to_path_buf(),
                source,
            })?;
        states.push(UploadState::ChecksumComputed);
        debug!(file_reference, checksum = %payload.checksum, size = payload.len(), "Checksum computed");

        let mut token = session.token().await?;
        let handle = self
            .api
            .obtain_file_id_and_upload_url(&token, file_reference, PDF_FORMAT_CATEGORY, &payload.checksum)
            .await?;
        states.push(UploadState::IdObtained);
        info!(file_reference, file_id = %handle.file_id, "File id obtained");

        let mut upload_url = handle.upload_url;
        let mut attempt = 0;
        loop {
            attempt += 1;
            states.push(if attempt == 1 {
                UploadState::UploadAttempted
            } else {
                UploadState::UploadRetried
            });

            let failure = match self
                .api
                .upload_bytes(&upload_url, payload.bytes.clone(), PDF_CONTENT_TYPE)
                .await
            {
                Ok(status) if (200..300).contains(&status) => {
                    states.push(UploadState::Uploaded);
                    info!(file_reference, file_id = %handle.file_id, attempt, "File uploaded");
                    return Ok(UploadReport {
                        file_id: handle.file_id,
                        checksum: payload.checksum,
                        attempts: attempt,
                        states,
                    });
                }
                Ok(status) => UploadFailure::Status(status),
                Err(e) => UploadFailure::Transport(e),
            };

            warn!(
                file_reference,
                file_id = %handle.file_id,
                attempt,
                failure = %failure,
                "Upload attempt failed"
            );

            if !self.policy.should_retry(attempt, &failure) {
                states.push(UploadState::Failed);
                return Err(UploadError::Exhausted {
                    file_id: handle.file_id,
                    attempts: attempt,
                    last: failure,
                    states,
                });
            }

            if self.policy.refresh_token {
                token = session.refresh().await?;
            }
            upload_url = self.api.refresh_upload_url(&token, &handle.file_id).await?;
            states.push(UploadState::UrlRefreshed);
            info!(file_id = %handle.file_id, "Upload URL refreshed");
        }
    }
}
