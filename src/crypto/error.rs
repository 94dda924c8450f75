// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Signing errors

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignerError {
    #[error("Failed to read private key {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid private key: {reason}")]
    InvalidKey { reason: String },

    #[error("Failed to sign assertion: {reason}")]
    Signing { reason: String },
}
