// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Document payload and its SHA-256 checksum

use bytes::Bytes;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Lowercase hex SHA-256 of `data`
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Content of a local document, read once per upload sequence
#[derive(Debug, Clone)]
pub struct DocumentPayload {
    pub bytes: Bytes,
    pub checksum: String,
}

impl DocumentPayload {
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        let checksum = sha256_hex(&bytes);
        Self { bytes, checksum }
    }

    pub async fn read(path: &Path) -> std::io::Result<Self> {
        let data = tokio::fs::read(path).await?;
        Ok(Self::from_bytes(data))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
