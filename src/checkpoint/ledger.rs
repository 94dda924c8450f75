// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-flow ledgers: named state transitions over a checkpoint table
//!
//! Each transition writes one field group and flushes before returning, and
//! mirrors the change into the caller's record so both stay in step.

use std::path::{Path, PathBuf};
use tracing::info;

use super::columns::{RegistrationColumns, RetrievalColumns};
use super::error::CheckpointError;
use super::records::{format_flag, RegistrationRecord, RetrievalRecord};
use super::table::CheckpointTable;

pub struct RegistrationLedger {
    table: CheckpointTable,
    columns: RegistrationColumns,
}

impl RegistrationLedger {
    pub fn open(path: impl AsRef<Path>, columns: RegistrationColumns) -> Result<Self, CheckpointError> {
        Ok(Self::new(CheckpointTable::load(path)?, columns))
    }

    pub fn new(table: CheckpointTable, columns: RegistrationColumns) -> Self {
        Self { table, columns }
    }

    pub fn table(&self) -> &CheckpointTable {
        &self.table
    }

    /// Every data row in table order. A row that does not fit the column
    /// mapping is returned as an error in its slot.
    pub fn records(&self) -> Vec<Result<RegistrationRecord, CheckpointError>> {
        self.table
            .data_rows()
            .map(|(row, cells)| RegistrationRecord::from_row(row, cells, &self.columns))
            .collect()
    }

    /// Relative document paths are taken relative to the table's directory.
    pub fn resolve_document_path(&self, path: &Path) -> PathBuf {
        resolve_against(self.table.path(), path)
    }

    /// The upload succeeded; the remote file id is now durable.
    pub fn record_file_id(
        &mut self,
        record: &mut RegistrationRecord,
        file_id: &str,
    ) -> Result<(), CheckpointError> {
        self.table
            .update(record.row, self.columns.file_id, file_id)?;
        record.file_id = Some(file_id.to_string());
        Ok(())
    }

    /// The service rejected the uploaded file. Forgetting its id makes the next
    /// run upload the document again.
    pub fn clear_file_id(&mut self, record: &mut RegistrationRecord) -> Result<(), CheckpointError> {
        self.table.update(record.row, self.columns.file_id, "")?;
        record.file_id = None;
        Ok(())
    }

    /// Terminal transition. The file id is rewritten alongside so the group is
    /// self-consistent even if an earlier checkpoint was edited by hand.
    pub fn mark_registered(
        &mut self,
        record: &mut RegistrationRecord,
        file_id: &str,
        ack_id: &str,
    ) -> Result<(), CheckpointError> {
        self.table.update_fields(
            record.row,
            &[
                (self.columns.file_id, file_id.to_string()),
                (self.columns.registered, format_flag(true)),
                (self.columns.ack_id, ack_id.to_string()),
            ],
        )?;
        record.file_id = Some(file_id.to_string());
        record.registered = true;
        record.ack_id = Some(ack_id.to_string());

        info!(row = record.row, document = record.key(), ack_id, "Checkpoint updated: registered");
        Ok(())
    }
}

pub struct RetrievalLedger {
    table: CheckpointTable,
    columns: RetrievalColumns,
}

impl RetrievalLedger {
    pub fn open(path: impl AsRef<Path>, columns: RetrievalColumns) -> Result<Self, CheckpointError> {
        Ok(Self::new(CheckpointTable::load(path)?, columns))
    }

    pub fn new(table: CheckpointTable, columns: RetrievalColumns) -> Self {
        Self { table, columns }
    }

    pub fn table(&self) -> &CheckpointTable {
        &self.table
    }

    pub fn records(&self) -> Vec<Result<RetrievalRecord, CheckpointError>> {
        self.table
            .data_rows()
            .map(|(row, cells)| RetrievalRecord::from_row(row, cells, &self.columns))
            .collect()
    }

    /// Written on its own so a crash before the download never re-requests
    /// the acknowledgment.
    pub fn record_acknowledgment(
        &mut self,
        record: &mut RetrievalRecord,
        ack_id: &str,
    ) -> Result<(), CheckpointError> {
        self.table.update_fields(
            record.row,
            &[
                (self.columns.ack_id, ack_id.to_string()),
                (self.columns.downloaded, format_flag(false)),
            ],
        )?;
        record.ack_id = Some(ack_id.to_string());
        Ok(())
    }

    pub fn mark_downloaded(&mut self, record: &mut RetrievalRecord) -> Result<(), CheckpointError> {
        self.table
            .update(record.row, self.columns.downloaded, format_flag(true))?;
        record.downloaded = true;

        info!(row = record.row, document = %record.key(), "Checkpoint updated: downloaded");
        Ok(())
    }
}

fn resolve_against(table_path: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match table_path.parent() {
        Some(parent) => parent.join(path),
        None => path.to_path_buf(),
    }
}
