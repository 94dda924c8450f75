// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Checkpoint persistence errors
//!
//! Read and write failures are fatal to the whole run. A row that does not fit
//! the column mapping only fails that row.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("Failed to read checkpoint table {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write checkpoint table {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    #[error("Checkpoint table {path} has no header row")]
    MissingHeader { path: PathBuf },

    #[error("Row {row} is the header row and cannot be updated")]
    HeaderRow { row: usize },

    #[error("Row {row} is out of range (table has {rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("Row {row} has no column {column} ({field})")]
    MissingColumn {
        row: usize,
        column: usize,
        field: &'static str,
    },
}

impl CheckpointError {
    /// Row the error refers to, when it refers to one
    pub fn row(&self) -> Option<usize> {
        match self {
            CheckpointError::HeaderRow { row }
            | CheckpointError::RowOutOfRange { row, .. }
            | CheckpointError::MissingColumn { row, .. } => Some(*row),
            _ => None,
        }
    }

    pub(crate) fn write(path: &std::path::Path, reason: impl std::fmt::Display) -> Self {
        CheckpointError::Write {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}
