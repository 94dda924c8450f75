// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Request and response shapes for the DAS exchange API

use bytes::Bytes;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use super::error::RemoteError;

/// Format category sent with every upload request
pub const PDF_FORMAT_CATEGORY: &str = "pdf";

/// Content type of every uploaded payload
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Body of a download, delivered in chunks
pub type ByteStream = BoxStream<'static, Result<Bytes, RemoteError>>;

/// Attributes identifying a priority document at the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentAttributes {
    pub document_kind_category: String,
    pub document_number: String,
    pub document_date: String,
    pub das_access_code: String,
}

/// Attributes needed to register a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationAttributes {
    pub document: DocumentAttributes,
    pub application_category: String,
    pub application_number: String,
    pub application_filing_date: String,
}

/// Identifier and pre-signed upload URL issued for a new file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFileHandle {
    pub file_id: String,
    pub upload_url: String,
}

/// Processing outcome of an uploaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileStatus {
    Pending,
    Accepted,
    Rejected,
}

impl FileStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, FileStatus::Pending)
    }
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FileStatus::Pending => "PENDING",
            FileStatus::Accepted => "ACCEPTED",
            FileStatus::Rejected => "REJECTED",
        };
        f.write_str(label)
    }
}

// ---- wire bodies ----

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UploadUrlRequest<'a> {
    pub file_reference: &'a str,
    pub file_format_category: &'a str,
    pub file_checksum: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UploadUrlResponse {
    pub file_id: Option<String>,
    pub file_upload_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshUploadUrlRequest<'a> {
    pub file_id: &'a str,
}

/// Registration and retrieval requests share one shape; retrieval leaves the
/// application fields null.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OperationRequest<'a> {
    pub operation_category: &'a str,
    pub document_kind_category: &'a str,
    pub document_number: &'a str,
    pub document_date: &'a str,
    pub das_access_code: &'a str,
    pub application_category: Option<&'a str>,
    pub application_number: Option<&'a str>,
    pub application_filing_date: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<&'a str>,
}

impl<'a> OperationRequest<'a> {
    pub fn registration(attrs: &'a RegistrationAttributes, file_id: &'a str) -> Self {
        Self {
            operation_category: "registration",
            document_kind_category: &attrs.document.document_kind_category,
            document_number: &attrs.document.document_number,
            document_date: &attrs.document.document_date,
            das_access_code: &attrs.document.das_access_code,
            application_category: Some(&attrs.application_category),
            application_number: Some(&attrs.application_number),
            application_filing_date: Some(&attrs.application_filing_date),
            email: Some(None),
            file_id: Some(file_id),
        }
    }

    pub fn retrieval(document: &'a DocumentAttributes) -> Self {
        Self {
            operation_category: "retrieval",
            document_kind_category: &document.document_kind_category,
            document_number: &document.document_number,
            document_date: &document.document_date,
            das_access_code: &document.das_access_code,
            application_category: None,
            application_number: None,
            application_filing_date: None,
            email: None,
            file_id: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AcknowledgmentResponse {
    pub request_ack_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DownloadUrlRequest<'a> {
    pub document_kind_category: &'a str,
    pub document_number: &'a str,
    pub document_date: &'a str,
    pub osf_ack_id: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DownloadUrlResponse {
    pub file_download_url: Option<String>,
}
