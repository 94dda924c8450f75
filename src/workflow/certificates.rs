// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Registration certificates
//!
//! Downloads the certificate of every registered row. The file on disk is the
//! only record of progress; existing certificates are left alone unless
//! `force` is set.

use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::download::save_stream;
use super::error::WorkflowError;
use super::retrieval::ensure_folder;
use super::summary::{RowOutcome, RunSummary};
use crate::auth::TokenSession;
use crate::checkpoint::{document_file_name, RegistrationLedger, RegistrationRecord};
use crate::exchange::ExchangeApi;

pub const CERTIFICATE_PREFIX: &str = "certificate";

pub struct CertificateWorkflow {
    api: Arc<dyn ExchangeApi>,
    local_folder: PathBuf,
    force: bool,
    cancel: CancellationToken,
}

impl CertificateWorkflow {
    pub fn new(
        api: Arc<dyn ExchangeApi>,
        local_folder: impl Into<PathBuf>,
        force: bool,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            api,
            local_folder: local_folder.into(),
            force,
            cancel,
        }
    }

    pub fn target_path(&self, record: &RegistrationRecord) -> PathBuf {
        self.local_folder.join(document_file_name(
            Some(CERTIFICATE_PREFIX),
            &record.priority_number,
            &record.priority_date,
        ))
    }

    pub async fn run(
        &self,
        ledger: &RegistrationLedger,
        session: &mut TokenSession,
    ) -> Result<RunSummary, WorkflowError> {
        let mut summary = RunSummary::default();

        for entry in ledger.records() {
            if self.cancel.is_cancelled() {
                warn!("Certificate run cancelled");
                return Err(WorkflowError::Cancelled);
            }

            let record = match entry {
                Ok(record) => record,
                Err(e) => {
                    warn!(error = %e, "Skipping malformed row");
                    summary.record(e.row().unwrap_or(0), "", RowOutcome::Failed(e.to_string()));
                    continue;
                }
            };

            if !record.registered {
                debug!(row = record.row, document = record.key(), "Not registered yet; no certificate");
                summary.record(record.row, record.key(), RowOutcome::Pending("not registered".to_string()));
                continue;
            }

            let target = self.target_path(&record);
            if !self.force && target.exists() {
                summary.record(record.row, record.key(), RowOutcome::Skipped);
                continue;
            }

            let outcome = match self.fetch(session, &record, &target).await {
                Ok(()) => RowOutcome::Completed,
                Err(e) if e.is_fatal() => {
                    error!(row = record.row, document = record.key(), error = %e, "Certificate run aborted");
                    return Err(e);
                }
                Err(e) => {
                    warn!(row = record.row, document = record.key(), error = %e, "Certificate download failed, moving on");
                    RowOutcome::Failed(e.to_string())
                }
            };
            summary.record(record.row, record.key(), outcome);
        }

        info!(summary = %summary, "Certificate run finished");
        Ok(summary)
    }

    async fn fetch(
        &self,
        session: &mut TokenSession,
        record: &RegistrationRecord,
        target: &std::path::Path,
    ) -> Result<(), WorkflowError> {
        let token = session.token().await?;
        let stream = self.api.get_certificate(&token, &record.document()).await?;
        ensure_folder(&self.local_folder).await?;
        let bytes = save_stream(stream, target).await?;
        info!(row = record.row, document = record.key(), path = %target.display(), bytes, "Certificate saved");
        Ok(())
    }
}
