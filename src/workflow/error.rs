// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Workflow errors

use std::path::PathBuf;
use thiserror::Error;

use super::poller::PollError;
use crate::auth::AuthError;
use crate::checkpoint::CheckpointError;
use crate::exchange::RemoteError;
use crate::upload::UploadError;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Checkpoint persistence failed: {0}")]
    Checkpoint(#[from] CheckpointError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Upload(UploadError),

    #[error(transparent)]
    Poll(PollError),

    #[error("Local file error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Run cancelled")]
    Cancelled,
}

impl WorkflowError {
    /// Fatal errors stop the whole run; anything else fails one record.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            WorkflowError::Auth(_) | WorkflowError::Checkpoint(_) | WorkflowError::Cancelled
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WorkflowError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<UploadError> for WorkflowError {
    fn from(e: UploadError) -> Self {
        match e {
            UploadError::Auth(e) => WorkflowError::Auth(e),
            other => WorkflowError::Upload(other),
        }
    }
}

impl From<PollError> for WorkflowError {
    fn from(e: PollError) -> Self {
        match e {
            PollError::Cancelled => WorkflowError::Cancelled,
            PollError::Remote(e) => WorkflowError::Remote(e),
            other => WorkflowError::Poll(other),
        }
    }
}
