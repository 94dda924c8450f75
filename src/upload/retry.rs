// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Retry policy for the payload upload

use std::fmt;

use crate::exchange::RemoteError;

/// Why a single upload attempt did not succeed
#[derive(Debug, Clone)]
pub enum UploadFailure {
    /// The storage endpoint answered with a non-success status
    Status(u16),
    /// The PUT never got an answer
    Transport(RemoteError),
}

impl fmt::Display for UploadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadFailure::Status(code) => write!(f, "HTTP status {}", code),
            UploadFailure::Transport(e) => write!(f, "{}", e),
        }
    }
}

/// Upload attempts are bounded; between attempts the token and then the
/// pre-signed URL are refreshed.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total PUT attempts, including the first (default: 2)
    pub max_attempts: u32,
    /// Obtain a fresh access token before asking for a new URL (default: true)
    pub refresh_token: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            refresh_token: true,
        }
    }
}

impl RetryPolicy {
    pub fn is_retryable(&self, failure: &UploadFailure) -> bool {
        match failure {
            UploadFailure::Status(code) => !(200..300).contains(code),
            UploadFailure::Transport(RemoteError::Transport(_)) => true,
            UploadFailure::Transport(_) => false,
        }
    }

    /// Whether another attempt follows attempt number `attempt` (1-based)
    pub fn should_retry(&self, attempt: u32, failure: &UploadFailure) -> bool {
        attempt < self.max_attempts && self.is_retryable(failure)
    }
}
