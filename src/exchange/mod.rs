// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Remote Exchange Client
//!
//! Typed request operations against the DAS document-exchange API:
//! - obtain a file id and pre-signed upload URL, refresh that URL, upload
//! - poll processing status of an uploaded file
//! - register a document, request a retrieval acknowledgment
//! - obtain a download URL and stream the document or a registration certificate

pub mod client;
pub mod error;
pub mod status;
pub mod types;

pub use client::{DasClient, ExchangeApi};
pub use error::RemoteError;
pub use status::classify_file_status;
pub use types::{
    ByteStream, DocumentAttributes, FileStatus, RegistrationAttributes, RemoteFileHandle,
    PDF_CONTENT_TYPE, PDF_FORMAT_CATEGORY,
};
