// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Workflow Drivers
//!
//! Per-row state machines over a checkpoint ledger. Rows are processed one at
//! a time in table order; a run shares one token session and one cancellation
//! token across all of them.

pub mod certificates;
pub mod download;
pub mod error;
pub mod poller;
pub mod registration;
pub mod retrieval;
pub mod summary;

pub use certificates::{CertificateWorkflow, CERTIFICATE_PREFIX};
pub use download::save_stream;
pub use error::WorkflowError;
pub use poller::{PollError, StatusPoller};
pub use registration::RegistrationWorkflow;
pub use retrieval::RetrievalWorkflow;
pub use summary::{RowFailure, RowOutcome, RunSummary};
