// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Checkpoint Store
//!
//! Durable, row-addressed progress for every document a run touches.
//!
//! ## Layout
//! A CSV table whose first row is a header. One data row per document. Column
//! positions come from configuration (`RegistrationColumns`,
//! `RetrievalColumns`) and are resolved only at this boundary.
//!
//! ## Durability
//! Every transition rewrites the full table through a temp file and rename, so
//! the file on disk is always a complete snapshot. Single writer only.

pub mod columns;
pub mod error;
pub mod ledger;
pub mod records;
pub mod table;

pub use columns::{RegistrationColumns, RetrievalColumns};
pub use error::CheckpointError;
pub use ledger::{RegistrationLedger, RetrievalLedger};
pub use records::{document_file_name, RegistrationRecord, RetrievalRecord};
pub use table::CheckpointTable;
