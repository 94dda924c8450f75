// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod auth;
pub mod checkpoint;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod exchange;
pub mod upload;
pub mod version;
pub mod workflow;

// Re-export main types
pub use auth::{AccessToken, AuthError, OAuthTokenProvider, TokenProvider, TokenSession};
pub use checkpoint::{
    CheckpointError, CheckpointTable, RegistrationLedger, RegistrationRecord, RetrievalLedger,
    RetrievalRecord,
};
pub use config::{ClientConfig, ConfigError};
pub use exchange::{DasClient, ExchangeApi, FileStatus, RemoteError};
pub use upload::{UploadError, UploadOrchestrator, UploadReport, UploadState};
pub use workflow::{
    CertificateWorkflow, RegistrationWorkflow, RetrievalWorkflow, RunSummary, WorkflowError,
};
