// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Column mappings for the two checkpoint table layouts
//!
//! Positions are configuration, not code. The defaults match the sample
//! registration and retrieval tables shipped with the service documentation.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationColumns {
    pub file_reference: usize,
    pub file_path: usize,
    pub application_number: usize,
    pub application_date: usize,
    pub priority_number: usize,
    pub priority_date: usize,
    pub document_kind: usize,
    pub application_category: usize,
    pub access_code: usize,
    pub file_id: usize,
    pub registered: usize,
    pub ack_id: usize,
}

impl Default for RegistrationColumns {
    fn default() -> Self {
        Self {
            file_reference: 0,
            file_path: 1,
            application_number: 2,
            application_date: 3,
            priority_number: 4,
            priority_date: 5,
            document_kind: 6,
            application_category: 7,
            access_code: 8,
            file_id: 9,
            registered: 10,
            ack_id: 11,
        }
    }
}

impl RegistrationColumns {
    fn indices(&self) -> [(&'static str, usize); 12] {
        [
            ("file_reference", self.file_reference),
            ("file_path", self.file_path),
            ("application_number", self.application_number),
            ("application_date", self.application_date),
            ("priority_number", self.priority_number),
            ("priority_date", self.priority_date),
            ("document_kind", self.document_kind),
            ("application_category", self.application_category),
            ("access_code", self.access_code),
            ("file_id", self.file_id),
            ("registered", self.registered),
            ("ack_id", self.ack_id),
        ]
    }

    pub fn validate(&self) -> Result<(), String> {
        check_distinct("registration", &self.indices())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalColumns {
    pub priority_number: usize,
    pub priority_date: usize,
    pub document_kind: usize,
    pub access_code: usize,
    pub ack_id: usize,
    pub downloaded: usize,
}

impl Default for RetrievalColumns {
    fn default() -> Self {
        Self {
            priority_number: 0,
            priority_date: 1,
            document_kind: 2,
            access_code: 3,
            ack_id: 4,
            downloaded: 5,
        }
    }
}

impl RetrievalColumns {
    fn indices(&self) -> [(&'static str, usize); 6] {
        [
            ("priority_number", self.priority_number),
            ("priority_date", self.priority_date),
            ("document_kind", self.document_kind),
            ("access_code", self.access_code),
            ("ack_id", self.ack_id),
            ("downloaded", self.downloaded),
        ]
    }

    pub fn validate(&self) -> Result<(), String> {
        check_distinct("retrieval", &self.indices())
    }
}

fn check_distinct(layout: &str, indices: &[(&'static str, usize)]) -> Result<(), String> {
    let mut seen = HashSet::new();
    for (field, index) in indices {
        if !seen.insert(*index) {
            return Err(format!(
                "{} column {} for '{}' is mapped more than once",
                layout, index, field
            ));
        }
    }
    Ok(())
}
