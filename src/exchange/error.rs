// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Errors returned by remote exchange operations

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    /// The service answered with a non-success status
    #[error("DAS API error: {status_code} - {body}")]
    Status { status_code: u16, body: String },

    /// The request never produced a response
    #[error("Transport error: {0}")]
    Transport(String),

    /// A success response was missing a field or was not valid JSON
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl RemoteError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            RemoteError::Status { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RemoteError::Decode(e.to_string())
        } else {
            RemoteError::Transport(e.to_string())
        }
    }
}
