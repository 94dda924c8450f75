// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-run tally of what happened to each row

use serde::Serialize;
use std::fmt;

/// Result of driving one record during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// Already terminal; nothing was done
    Skipped,
    /// Reached the flow's terminal state in this run
    Completed,
    /// Not done yet; a later run picks it up
    Pending(String),
    /// Could not advance in this run
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFailure {
    pub row: usize,
    pub document: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub rows: usize,
    pub skipped: usize,
    pub completed: usize,
    pub pending: usize,
    pub failed: Vec<RowFailure>,
}

impl RunSummary {
    pub fn record(&mut self, row: usize, document: &str, outcome: RowOutcome) {
        self.rows += 1;
        match outcome {
            RowOutcome::Skipped => self.skipped += 1,
            RowOutcome::Completed => self.completed += 1,
            RowOutcome::Pending(_) => self.pending += 1,
            RowOutcome::Failed(reason) => self.failed.push(RowFailure {
                row,
                document: document.to_string(),
                reason,
            }),
        }
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows: {} completed, {} already done, {} pending, {} failed",
            self.rows,
            self.completed,
            self.skipped,
            self.pending,
            self.failed.len()
        )
    }
}
