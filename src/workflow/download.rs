// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Streaming a remote body to a local file

use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::error::WorkflowError;
use crate::exchange::ByteStream;

fn part_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}

/// Write every chunk of `stream` to `target`. The body lands in `target.part`
/// first and is renamed only once complete, so `target` is never truncated.
/// Any failure removes the partial file.
pub async fn save_stream(stream: ByteStream, target: &Path) -> Result<u64, WorkflowError> {
    let staging = part_path(target);

    let written = match write_staged(stream, &staging).await {
        Ok(written) => written,
        Err(e) => {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(e);
        }
    };

    if let Err(e) = tokio::fs::rename(&staging, target).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(WorkflowError::io(target, e));
    }
    debug!(path = %target.display(), bytes = written, "Saved file");
    Ok(written)
}

async fn write_staged(mut stream: ByteStream, staging: &Path) -> Result<u64, WorkflowError> {
    let mut file = tokio::fs::File::create(staging)
        .await
        .map_err(|e| WorkflowError::io(staging, e))?;

    let mut written = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)
            .await
            .map_err(|e| WorkflowError::io(staging, e))?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(|e| WorkflowError::io(staging, e))?;
    file.sync_all().await.map_err(|e| WorkflowError::io(staging, e))?;
    Ok(written)
}
