// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Row-major checkpoint table backed by a CSV file
//!
//! Row 0 is the header. Every mutation rewrites the whole table so the file is
//! always a complete snapshot. The rewrite goes to a temporary file next to the
//! table which is then renamed over it.
//!
//! Only one process may write a given table at a time. Nothing here enforces it.

use std::path::{Path, PathBuf};
use tracing::debug;

use super::error::CheckpointError;

#[derive(Debug, Clone)]
pub struct CheckpointTable {
    path: PathBuf,
    rows: Vec<Vec<String>>,
}

impl CheckpointTable {
    /// Load a table from disk. The file must contain at least a header row.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CheckpointError> {
        let path = path.as_ref().to_path_buf();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)
            .map_err(|source| CheckpointError::Read {
                path: path.clone(),
                source,
            })?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|source| CheckpointError::Read {
                path: path.clone(),
                source,
            })?;
            rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }

        if rows.is_empty() {
            return Err(CheckpointError::MissingHeader { path });
        }

        debug!(path = %path.display(), rows = rows.len() - 1, "Loaded checkpoint table");
        Ok(Self { path, rows })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &[String] {
        &self.rows[0]
    }

    /// Number of data rows (header excluded)
    pub fn data_len(&self) -> usize {
        self.rows.len() - 1
    }

    /// Data rows in table order, paired with their absolute row index (first is 1)
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .map(|(index, row)| (index, row.as_slice()))
    }

    pub fn row(&self, row: usize) -> Option<&[String]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
    }

    /// Set one cell and flush the whole table to disk.
    pub fn update(
        &mut self,
        row: usize,
        column: usize,
        value: impl Into<String>,
    ) -> Result<(), CheckpointError> {
        self.update_fields(row, &[(column, value.into())])
    }

    /// Set a group of cells in one row and flush once.
    pub fn update_fields(
        &mut self,
        row: usize,
        fields: &[(usize, String)],
    ) -> Result<(), CheckpointError> {
        if row == 0 {
            return Err(CheckpointError::HeaderRow { row });
        }
        let rows = self.rows.len();
        let cells = self
            .rows
            .get_mut(row)
            .ok_or(CheckpointError::RowOutOfRange { row, rows })?;

        for (column, value) in fields {
            if *column >= cells.len() {
                cells.resize(column + 1, String::new());
            }
            cells[*column] = value.clone();
        }

        self.flush()
    }

    fn flush(&self) -> Result<(), CheckpointError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let staged = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| CheckpointError::write(&self.path, e))?;
        {
            let mut writer = csv::WriterBuilder::new()
                .flexible(true)
                .from_writer(staged.as_file());
            for row in &self.rows {
                writer
                    .write_record(row)
                    .map_err(|e| CheckpointError::write(&self.path, e))?;
            }
            writer
                .flush()
                .map_err(|e| CheckpointError::write(&self.path, e))?;
        }
        staged
            .as_file()
            .sync_all()
            .map_err(|e| CheckpointError::write(&self.path, e))?;
        staged
            .persist(&self.path)
            .map_err(|e| CheckpointError::write(&self.path, e.error))?;

        Ok(())
    }
}
