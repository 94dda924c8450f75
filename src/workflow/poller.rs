// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Status poller
//!
//! Polls the processing status of an uploaded file until it is accepted or
//! rejected. The wait between polls grows geometrically up to a cap. The loop
//! stops after a bounded number of polls or an optional deadline, and any wait
//! is cut short when the run is cancelled.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::auth::AccessToken;
use crate::config::PollConfig;
use crate::exchange::{ExchangeApi, FileStatus, RemoteError};

#[derive(Debug, Error)]
pub enum PollError {
    #[error("File {file_id} still pending after {attempts} polls ({elapsed:?})")]
    Timeout {
        file_id: String,
        attempts: u32,
        elapsed: Duration,
    },

    #[error("Polling cancelled")]
    Cancelled,

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

pub struct StatusPoller {
    api: Arc<dyn ExchangeApi>,
    config: PollConfig,
    cancel: CancellationToken,
}

impl StatusPoller {
    pub fn new(api: Arc<dyn ExchangeApi>, config: PollConfig, cancel: CancellationToken) -> Self {
        Self {
            api,
            config,
            cancel,
        }
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Wait that follows `current`: grown by the backoff factor, capped.
    pub fn next_interval(&self, current: Duration) -> Duration {
        let max = Duration::from_millis(self.config.max_interval_ms);
        Duration::from_secs_f64(
            (current.as_secs_f64() * self.config.backoff_factor).min(max.as_secs_f64()),
        )
    }

    /// Poll until the file reaches `Accepted` or `Rejected`
    pub async fn wait_for_terminal(
        &self,
        token: &AccessToken,
        file_id: &str,
    ) -> Result<FileStatus, PollError> {
        let started = Instant::now();
        let deadline = self
            .config
            .deadline_secs
            .map(|secs| started + Duration::from_secs(secs));
        let mut interval = Duration::from_millis(self.config.initial_interval_ms);
        let mut attempts = 0;

        while attempts < self.config.max_attempts {
            if self.cancel.is_cancelled() {
                return Err(PollError::Cancelled);
            }

            attempts += 1;
            let status = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(PollError::Cancelled),
                result = self.api.poll_file_status(token, file_id) => result?,
            };

            if status.is_terminal() {
                info!(file_id, status = %status, attempts, "File processing finished");
                return Ok(status);
            }
            debug!(file_id, attempts, wait_ms = interval.as_millis() as u64, "File still pending");

            if attempts >= self.config.max_attempts {
                break;
            }

            let mut wait = interval;
            if let Some(deadline) = deadline {
                let now = Instant::now();
                if now >= deadline {
                    break;
                }
                wait = wait.min(deadline - now);
            }

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(PollError::Cancelled),
                _ = sleep(wait) => {}
            }
            interval = self.next_interval(interval);
        }

        let elapsed = started.elapsed();
        warn!(file_id, attempts, elapsed_ms = elapsed.as_millis() as u64, "Gave up waiting for file status");
        Err(PollError::Timeout {
            file_id: file_id.to_string(),
            attempts,
            elapsed,
        })
    }
}
