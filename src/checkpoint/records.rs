// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Typed views over checkpoint rows
//!
//! Column positions are resolved here and nowhere else. Drivers only ever see
//! named fields.

use std::path::PathBuf;

use super::columns::{RegistrationColumns, RetrievalColumns};
use super::error::CheckpointError;
use crate::exchange::{DocumentAttributes, RegistrationAttributes};

/// One document in the registration table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRecord {
    /// Absolute row index in the table (header is row 0)
    pub row: usize,
    pub file_reference: String,
    pub file_path: PathBuf,
    pub application_number: String,
    pub application_date: String,
    pub priority_number: String,
    pub priority_date: String,
    pub document_kind: String,
    pub application_category: String,
    pub access_code: String,
    pub file_id: Option<String>,
    pub registered: bool,
    pub ack_id: Option<String>,
}

impl RegistrationRecord {
    pub fn from_row(
        row: usize,
        cells: &[String],
        columns: &RegistrationColumns,
    ) -> Result<Self, CheckpointError> {
        let required = |column: usize, field: &'static str| required_cell(row, cells, column, field);

        Ok(Self {
            row,
            file_reference: required(columns.file_reference, "file_reference")?,
            file_path: PathBuf::from(required(columns.file_path, "file_path")?),
            application_number: required(columns.application_number, "application_number")?,
            application_date: required(columns.application_date, "application_date")?,
            priority_number: required(columns.priority_number, "priority_number")?,
            priority_date: required(columns.priority_date, "priority_date")?,
            document_kind: required(columns.document_kind, "document_kind")?,
            application_category: required(columns.application_category, "application_category")?,
            access_code: required(columns.access_code, "access_code")?,
            file_id: optional_cell(cells, columns.file_id),
            registered: flag_cell(cells, columns.registered),
            ack_id: optional_cell(cells, columns.ack_id),
        })
    }

    /// Stable identifier used in logs
    pub fn key(&self) -> &str {
        &self.file_reference
    }

    pub fn is_terminal(&self) -> bool {
        self.registered
    }

    pub fn document(&self) -> DocumentAttributes {
        DocumentAttributes {
            document_kind_category: self.document_kind.clone(),
            document_number: self.priority_number.clone(),
            document_date: self.priority_date.clone(),
            das_access_code: self.access_code.clone(),
        }
    }

    pub fn attributes(&self) -> RegistrationAttributes {
        RegistrationAttributes {
            document: self.document(),
            application_category: self.application_category.clone(),
            application_number: self.application_number.clone(),
            application_filing_date: self.application_date.clone(),
        }
    }
}

/// One document in the retrieval table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalRecord {
    pub row: usize,
    pub priority_number: String,
    pub priority_date: String,
    pub document_kind: String,
    pub access_code: String,
    pub ack_id: Option<String>,
    pub downloaded: bool,
}

impl RetrievalRecord {
    pub fn from_row(
        row: usize,
        cells: &[String],
        columns: &RetrievalColumns,
    ) -> Result<Self, CheckpointError> {
        let required = |column: usize, field: &'static str| required_cell(row, cells, column, field);

        Ok(Self {
            row,
            priority_number: required(columns.priority_number, "priority_number")?,
            priority_date: required(columns.priority_date, "priority_date")?,
            document_kind: required(columns.document_kind, "document_kind")?,
            access_code: required(columns.access_code, "access_code")?,
            ack_id: optional_cell(cells, columns.ack_id),
            downloaded: flag_cell(cells, columns.downloaded),
        })
    }

    pub fn key(&self) -> String {
        format!("{}@{}", self.priority_number, self.priority_date)
    }

    pub fn is_terminal(&self) -> bool {
        self.downloaded
    }

    pub fn document(&self) -> DocumentAttributes {
        DocumentAttributes {
            document_kind_category: self.document_kind.clone(),
            document_number: self.priority_number.clone(),
            document_date: self.priority_date.clone(),
            das_access_code: self.access_code.clone(),
        }
    }
}

/// Local file name for a document number and date. Slashes in the number
/// would otherwise become directories.
pub fn document_file_name(prefix: Option<&str>, number: &str, date: &str) -> String {
    let number = number.replace('/', "_");
    match prefix {
        Some(prefix) => format!("{}_{}_{}.pdf", prefix, number, date),
        None => format!("{}_{}.pdf", number, date),
    }
}

pub(crate) fn format_flag(value: bool) -> String {
    let flag = if value { "true" } else { "false" };
    flag.to_string()
}

fn required_cell(
    row: usize,
    cells: &[String],
    column: usize,
    field: &'static str,
) -> Result<String, CheckpointError> {
    cells
        .get(column)
        .map(|value| value.trim().to_string())
        .ok_or(CheckpointError::MissingColumn { row, column, field })
}

fn optional_cell(cells: &[String], column: usize) -> Option<String> {
    cells
        .get(column)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn flag_cell(cells: &[String], column: usize) -> bool {
    cells
        .get(column)
        .map(|value| value.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
