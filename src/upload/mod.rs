// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

pub mod checksum;
pub mod orchestrator;
pub mod retry;

pub use checksum::{sha256_hex, DocumentPayload};
pub use orchestrator::{UploadError, UploadOrchestrator, UploadReport, UploadState};
pub use retry::{RetryPolicy, UploadFailure};
