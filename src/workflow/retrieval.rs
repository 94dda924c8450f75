// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Retrieval workflow
//!
//! Per row not yet downloaded: request an acknowledgment once and record it,
//! ask for a download URL, and when one is offered stream the document into
//! the local folder before marking the row downloaded.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::download::save_stream;
use super::error::WorkflowError;
use super::summary::{RowOutcome, RunSummary};
use crate::auth::TokenSession;
use crate::checkpoint::{document_file_name, RetrievalLedger, RetrievalRecord};
use crate::exchange::ExchangeApi;

pub struct RetrievalWorkflow {
    api: Arc<dyn ExchangeApi>,
    local_folder: PathBuf,
    cancel: CancellationToken,
}

impl RetrievalWorkflow {
    pub fn new(
        api: Arc<dyn ExchangeApi>,
        local_folder: impl Into<PathBuf>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            api,
            local_folder: local_folder.into(),
            cancel,
        }
    }

    pub fn target_path(&self, record: &RetrievalRecord) -> PathBuf {
        self.local_folder.join(document_file_name(
            None,
            &record.priority_number,
            &record.priority_date,
        ))
    }

    pub async fn run(
        &self,
        ledger: &mut RetrievalLedger,
        session: &mut TokenSession,
    ) -> Result<RunSummary, WorkflowError> {
        let mut summary = RunSummary::default();

        for entry in ledger.records() {
            if self.cancel.is_cancelled() {
                warn!("Retrieval run cancelled");
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
            let key = record.key();

            if record.is_terminal() {
                summary.record(record.row, &key, RowOutcome::Skipped);
                continue;
            }

            let outcome = match self.advance(ledger, session, &mut record).await {
                Ok(outcome) => outcome,
                Err(e) if e.is_fatal() => {
                    error!(row = record.row, document = %key, error = %e, "Retrieval run aborted");
                    return Err(e);
                }
                Err(e) => {
                    warn!(row = record.row, document = %key, error = %e, "Retrieval failed, moving on");
                    RowOutcome::Failed(e.to_string())
                }
            };
            summary.record(record.row, &key, outcome);
        }

        info!(summary = %summary, "Retrieval run finished");
        Ok(summary)
    }

    async fn advance(
        &self,
        ledger: &mut RetrievalLedger,
        session: &mut TokenSession,
        record: &mut RetrievalRecord,
    ) -> Result<RowOutcome, WorkflowError> {
        let token = session.token().await?;
        let document = record.document();

        let ack_id = match record.ack_id.clone() {
            Some(ack_id) => ack_id,
            None => {
                let ack_id = self.api.request_retrieval_ack(&token, &document).await?;
                ledger.record_acknowledgment(record, &ack_id)?;
                info!(row = record.row, document = %record.key(), ack_id = %ack_id, "Retrieval acknowledged");
                ack_id
            }
        };

        let url = match self
            .api
            .obtain_download_url(&token, &document, &ack_id)
            .await?
        {
            Some(url) => url,
            None => {
                info!(row = record.row, document = %record.key(), ack_id = %ack_id, "Document not ready for download");
                return Ok(RowOutcome::Pending("download not ready".to_string()));
            }
        };

        ensure_folder(&self.local_folder).await?;
        let target = self.target_path(record);
        let stream = self.api.download_bytes(&url).await?;
        let bytes = save_stream(stream, &target).await?;
        info!(row = record.row, document = %record.key(), path = %target.display(), bytes, "Document downloaded");

        ledger.mark_downloaded(record)?;
        Ok(RowOutcome::Completed)
    }
}

pub(crate) async fn ensure_folder(folder: &Path) -> Result<(), WorkflowError> {
    tokio::fs::create_dir_all(folder)
        .await
        .map_err(|e| WorkflowError::io(folder, e))
}
