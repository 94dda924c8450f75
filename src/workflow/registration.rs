// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Registration workflow
//!
//! Per unregistered row: upload the document (unless a file id is already
//! recorded), wait for the service to accept it, register it and record the
//! acknowledgment. Every durable step is written back before the next begins,
//! so a rerun resumes where the previous one stopped. A rejected file id is
//! cleared so the rerun uploads the document afresh.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::error::WorkflowError;
use super::poller::{PollError, StatusPoller};
use super::summary::{RowOutcome, RunSummary};
use crate::auth::TokenSession;
use crate::checkpoint::{RegistrationLedger, RegistrationRecord};
use crate::config::PollConfig;
use crate::exchange::{ExchangeApi, FileStatus};
use crate::upload::{RetryPolicy, UploadOrchestrator};

pub struct RegistrationWorkflow {
    api: Arc<dyn ExchangeApi>,
    uploader: UploadOrchestrator,
    poller: StatusPoller,
    cancel: CancellationToken,
}

impl RegistrationWorkflow {
    pub fn new(
        api: Arc<dyn ExchangeApi>,
        poll: PollConfig,
        retry: RetryPolicy,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            uploader: UploadOrchestrator::new(api.clone(), retry),
            poller: StatusPoller::new(api.clone(), poll, cancel.clone()),
            api,
            cancel,
        }
    }

    /// Drive every row of the ledger in table order
    pub async fn run(
        &self,
        ledger: &mut RegistrationLedger,
        session: &mut TokenSession,
    ) -> Result<RunSummary, WorkflowError> {
        let mut summary = RunSummary::default();

        for entry in ledger.records() {
            if self.cancel.is_cancelled() {
                warn!("Registration run cancelled");
                return Err(WorkflowError::Cancelled);
            }

            let mut record = match entry {
                Ok(record) => record,
                Err(e) => {
                    warn!(error = %e, "Skipping malformed row");
                    summary.record(e.row().unwrap_or(0), "", RowOutcome::Failed(e.to_string()));
                    continue;
                }
            };

            if record.is_terminal() {
                summary.record(record.row, record.key(), RowOutcome::Skipped);
                continue;
            }

            let outcome = match self.advance(ledger, session, &mut record).await {
                Ok(outcome) => outcome,
                Err(e) if e.is_fatal() => {
                    error!(row = record.row, document = record.key(), error = %e, "Registration run aborted");
                    return Err(e);
                }
                Err(e) => {
                    warn!(row = record.row, document = record.key(), error = %e, "Registration failed, moving on");
                    RowOutcome::Failed(e.to_string())
                }
            };
            summary.record(record.row, record.key(), outcome);
        }

        info!(summary = %summary, "Registration run finished");
        Ok(summary)
    }

    async fn advance(
        &self,
        ledger: &mut RegistrationLedger,
        session: &mut TokenSession,
        record: &mut RegistrationRecord,
    ) -> Result<RowOutcome, WorkflowError> {
        let file_id = match record.file_id.clone() {
            Some(file_id) => {
                info!(row = record.row, document = record.key(), file_id = %file_id, "Resuming with recorded file id");
                file_id
            }
            None => {
                let path = ledger.resolve_document_path(&record.file_path);
                let report = self
                    .uploader
                    .upload(session, &record.file_reference, &path)
                    .await?;
                ledger.record_file_id(record, &report.file_id)?;
                report.file_id
            }
        };

        let token = session.token().await?;
        match self.poller.wait_for_terminal(&token, &file_id).await {
            Ok(FileStatus::Accepted) => {}
            Ok(status) => {
                warn!(row = record.row, document = record.key(), file_id = %file_id, status = %status, "File was not accepted");
                if status == FileStatus::Rejected {
                    // a rejected file never turns accepted; the next run uploads again
                    ledger.clear_file_id(record)?;
                    return Ok(RowOutcome::Failed(format!(
                        "file {} {}; fix the document and rerun to upload it again",
                        file_id, status
                    )));
                }
                return Ok(RowOutcome::Failed(format!("file {} {}", file_id, status)));
            }
            Err(e @ PollError::Timeout { .. }) => {
                info!(row = record.row, document = record.key(), file_id = %file_id, "File still processing; leaving for a later run");
                return Ok(RowOutcome::Pending(e.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        let ack_id = self
            .api
            .register_file(&token, &record.attributes(), &file_id)
            .await?;
        ledger.mark_registered(record, &file_id, &ack_id)?;
        Ok(RowOutcome::Completed)
    }
}
