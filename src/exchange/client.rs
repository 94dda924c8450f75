// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! DAS exchange API client
//!
//! Each operation is a single request/response with no retry of its own.
//! Retry policy belongs to the callers.

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, warn};

use super::error::RemoteError;
use super::status::classify_file_status;
use super::types::{
    AcknowledgmentResponse, ByteStream, DocumentAttributes, DownloadUrlRequest,
    DownloadUrlResponse, FileStatus, OperationRequest, RefreshUploadUrlRequest,
    RegistrationAttributes, RemoteFileHandle, UploadUrlRequest, UploadUrlResponse,
};
use crate::auth::AccessToken;
use crate::config::HttpConfig;

/// Operations offered by the document exchange service
#[async_trait]
pub trait ExchangeApi: Send + Sync {
    async fn obtain_file_id_and_upload_url(
        &self,
        token: &AccessToken,
        file_reference: &str,
        format_category: &str,
        checksum: &str,
    ) -> Result<RemoteFileHandle, RemoteError>;

    async fn refresh_upload_url(
        &self,
        token: &AccessToken,
        file_id: &str,
    ) -> Result<String, RemoteError>;

    /// PUT the payload to a pre-signed URL. Returns the HTTP status whether or
    /// not it indicates success; only transport failures are errors.
    async fn upload_bytes(
        &self,
        upload_url: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<u16, RemoteError>;

    async fn poll_file_status(
        &self,
        token: &AccessToken,
        file_id: &str,
    ) -> Result<FileStatus, RemoteError>;

    async fn register_file(
        &self,
        token: &AccessToken,
        attrs: &RegistrationAttributes,
        file_id: &str,
    ) -> Result<String, RemoteError>;

    async fn request_retrieval_ack(
        &self,
        token: &AccessToken,
        document: &DocumentAttributes,
    ) -> Result<String, RemoteError>;

    /// `None` while the document is not ready for download yet
    async fn obtain_download_url(
        &self,
        token: &AccessToken,
        document: &DocumentAttributes,
        ack_id: &str,
    ) -> Result<Option<String>, RemoteError>;

    async fn download_bytes(&self, url: &str) -> Result<ByteStream, RemoteError>;

    async fn get_certificate(
        &self,
        token: &AccessToken,
        document: &DocumentAttributes,
    ) -> Result<ByteStream, RemoteError>;
}

/// reqwest-backed implementation against a DAS base endpoint
pub struct DasClient {
    base_url: String,
    client: Client,
}

impl DasClient {
    pub fn new(base_url: &str, http: &HttpConfig) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(http.connect_timeout_secs))
            .timeout(Duration::from_secs(http.request_timeout_secs))
            .build()
            .map_err(|e| RemoteError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

/// Pass success responses through; turn anything else into `RemoteError::Status`
async fn ensure_success(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    warn!(status = status.as_u16(), body = %body, "DAS request failed");
    Err(RemoteError::Status {
        status_code: status.as_u16(),
        body,
    })
}

fn required(value: Option<String>, field: &str) -> Result<String, RemoteError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| RemoteError::Decode(format!("response is missing '{}'", field)))
}

fn into_byte_stream(response: Response) -> ByteStream {
    response
        .bytes_stream()
        .map(|chunk| chunk.map_err(RemoteError::from))
        .boxed()
}

#[async_trait]
impl ExchangeApi for DasClient {
    async fn obtain_file_id_and_upload_url(
        &self,
        token: &AccessToken,
        file_reference: &str,
        format_category: &str,
        checksum: &str,
    ) -> Result<RemoteFileHandle, RemoteError> {
        debug!(file_reference, "Obtaining file id and upload URL");
        let response = self
            .client
            .post(self.endpoint("files/url-uploads"))
            .bearer_auth(token.secret())
            .header(ACCEPT, "application/json")
            .json(&UploadUrlRequest {
                file_reference,
                file_format_category: format_category,
                file_checksum: checksum,
            })
            .send()
            .await?;

        let data: UploadUrlResponse = ensure_success(response).await?.json().await?;
        Ok(RemoteFileHandle {
            file_id: required(data.file_id, "fileId")?,
            upload_url: required(data.file_upload_url, "fileUploadUrl")?,
        })
    }

    async fn refresh_upload_url(
        &self,
        token: &AccessToken,
        file_id: &str,
    ) -> Result<String, RemoteError> {
        debug!(file_id, "Refreshing upload URL");
        let response = self
            .client
            .put(self.endpoint("files/url-uploads"))
            .bearer_auth(token.secret())
            .header(ACCEPT, "application/json")
            .json(&RefreshUploadUrlRequest { file_id })
            .send()
            .await?;

        let data: UploadUrlResponse = ensure_success(response).await?.json().await?;
        required(data.file_upload_url, "fileUploadUrl")
    }

    async fn upload_bytes(
        &self,
        upload_url: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<u16, RemoteError> {
        debug!(size = bytes.len(), "Uploading file to pre-signed URL");
        let response = self
            .client
            .put(upload_url)
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        Ok(response.status().as_u16())
    }

    async fn poll_file_status(
        &self,
        token: &AccessToken,
        file_id: &str,
    ) -> Result<FileStatus, RemoteError> {
        let response = self
            .client
            .get(self.endpoint("files"))
            .bearer_auth(token.secret())
            .query(&[("fileId", file_id)])
            .send()
            .await?;

        let body: serde_json::Value = ensure_success(response).await?.json().await?;
        debug!(file_id, body = %body, "File status response");
        Ok(classify_file_status(&body))
    }

    async fn register_file(
        &self,
        token: &AccessToken,
        attrs: &RegistrationAttributes,
        file_id: &str,
    ) -> Result<String, RemoteError> {
        let response = self
            .client
            .post(self.endpoint("registrations"))
            .bearer_auth(token.secret())
            .json(&OperationRequest::registration(attrs, file_id))
            .send()
            .await?;

        let data: AcknowledgmentResponse = ensure_success(response).await?.json().await?;
        required(data.request_ack_id, "requestAckId")
    }

    async fn request_retrieval_ack(
        &self,
        token: &AccessToken,
        document: &DocumentAttributes,
    ) -> Result<String, RemoteError> {
        let response = self
            .client
            .post(self.endpoint("retrievals"))
            .bearer_auth(token.secret())
            .json(&OperationRequest::retrieval(document))
            .send()
            .await?;

        let data: AcknowledgmentResponse = ensure_success(response).await?.json().await?;
        required(data.request_ack_id, "requestAckId")
    }

    async fn obtain_download_url(
        &self,
        token: &AccessToken,
        document: &DocumentAttributes,
        ack_id: &str,
    ) -> Result<Option<String>, RemoteError> {
        let response = self
            .client
            .post(self.endpoint("files/url-downloads"))
            .bearer_auth(token.secret())
            .json(&DownloadUrlRequest {
                document_kind_category: &document.document_kind_category,
                document_number: &document.document_number,
                document_date: &document.document_date,
                osf_ack_id: ack_id,
            })
            .send()
            .await?;

        let data: DownloadUrlResponse = ensure_success(response).await?.json().await?;
        Ok(data.file_download_url.filter(|url| !url.is_empty()))
    }

    async fn download_bytes(&self, url: &str) -> Result<ByteStream, RemoteError> {
        let response = self.client.get(url).send().await?;
        Ok(into_byte_stream(ensure_success(response).await?))
    }

    async fn get_certificate(
        &self,
        token: &AccessToken,
        document: &DocumentAttributes,
    ) -> Result<ByteStream, RemoteError> {
        let response = self
            .client
            .get(self.endpoint("registrations/certificates"))
            .bearer_auth(token.secret())
            .header(ACCEPT, "application/pdf")
            .query(&[
                ("documentKindCategory", document.document_kind_category.as_str()),
                ("documentNumber", document.document_number.as_str()),
                ("documentDate", document.document_date.as_str()),
                ("dasAccessCode", document.das_access_code.as_str()),
            ])
            .send()
            .await?;

        Ok(into_byte_stream(ensure_success(response).await?))
    }
}
