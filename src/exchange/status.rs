// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Classification of `GET /files` status responses
//!
//! The service reports progress through which fields are populated rather
//! than through a single status value:
//!
//! - `fileStatusCategory` present: the file was accepted
//! - otherwise `error` present: the file was rejected
//! - otherwise (including `fileSizeQuantity` absent): still processing
//!
//! A field counts as present when it is neither null nor an empty string.

use serde_json::Value;

use super::types::FileStatus;

pub const FILE_SIZE_FIELD: &str = "fileSizeQuantity";
pub const STATUS_CATEGORY_FIELD: &str = "fileStatusCategory";
pub const ERROR_FIELD: &str = "error";

pub fn classify_file_status(body: &Value) -> FileStatus {
    if has_field(body, STATUS_CATEGORY_FIELD) {
        FileStatus::Accepted
    } else if has_field(body, ERROR_FIELD) {
        FileStatus::Rejected
    } else {
        FileStatus::Pending
    }
}

fn has_field(body: &Value, name: &str) -> bool {
    match body.get(name) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}
