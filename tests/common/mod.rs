// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Shared test doubles for the exchange API and the token endpoint
#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use das_exchange_client::auth::{AccessToken, AuthError, TokenProvider, TokenSession};
use das_exchange_client::exchange::{
    ByteStream, DocumentAttributes, ExchangeApi, FileStatus, RegistrationAttributes,
    RemoteError, RemoteFileHandle,
};
use futures::StreamExt;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

/// Every call the mock exchange received, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ObtainFileId {
        file_reference: String,
        checksum: String,
        token: String,
    },
    RefreshUploadUrl {
        file_id: String,
        token: String,
    },
    Upload {
        url: String,
        size: usize,
        content_type: String,
    },
    PollStatus {
        file_id: String,
    },
    Register {
        document_number: String,
        file_id: String,
    },
    RequestAck {
        document_number: String,
    },
    DownloadUrl {
        ack_id: String,
    },
    Download {
        url: String,
    },
    Certificate {
        document_number: String,
    },
}

fn unscripted(operation: &str) -> RemoteError {
    RemoteError::Transport(format!("no scripted response for {}", operation))
}

fn pop<T>(queue: &Mutex<VecDeque<Result<T, RemoteError>>>, operation: &str) -> Result<T, RemoteError> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(unscripted(operation)))
}

fn body_stream(chunks: Vec<Bytes>) -> ByteStream {
    futures::stream::iter(chunks.into_iter().map(Ok)).boxed()
}

/// In-memory exchange with scripted responses. Each operation pops the next
/// scripted answer; an unscripted call fails with a transport error.
#[derive(Default)]
pub struct MockExchange {
    calls: Mutex<Vec<Call>>,
    handles: Mutex<VecDeque<Result<RemoteFileHandle, RemoteError>>>,
    refreshed_urls: Mutex<VecDeque<Result<String, RemoteError>>>,
    upload_statuses: Mutex<VecDeque<Result<u16, RemoteError>>>,
    file_statuses: Mutex<VecDeque<Result<FileStatus, RemoteError>>>,
    register_acks: Mutex<VecDeque<Result<String, RemoteError>>>,
    retrieval_acks: Mutex<VecDeque<Result<String, RemoteError>>>,
    download_urls: Mutex<VecDeque<Result<Option<String>, RemoteError>>>,
    downloads: Mutex<VecDeque<Result<Vec<Bytes>, RemoteError>>>,
    certificates: Mutex<VecDeque<Result<Vec<Bytes>, RemoteError>>>,
}

impl MockExchange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file_handle(self, file_id: &str, upload_url: &str) -> Self {
        self.handles.lock().unwrap().push_back(Ok(RemoteFileHandle {
            file_id: file_id.to_string(),
            upload_url: upload_url.to_string(),
        }));
        self
    }

    pub fn with_refreshed_url(self, upload_url: &str) -> Self {
        self.refreshed_urls
            .lock()
            .unwrap()
            .push_back(Ok(upload_url.to_string()));
        self
    }

    pub fn with_upload_status(self, status: u16) -> Self {
        self.upload_statuses.lock().unwrap().push_back(Ok(status));
        self
    }

    pub fn with_upload_error(self, error: RemoteError) -> Self {
        self.upload_statuses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn with_file_status(self, status: FileStatus) -> Self {
        self.file_statuses.lock().unwrap().push_back(Ok(status));
        self
    }

    pub fn with_file_status_error(self, error: RemoteError) -> Self {
        self.file_statuses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn with_register_ack(self, ack_id: &str) -> Self {
        self.register_acks
            .lock()
            .unwrap()
            .push_back(Ok(ack_id.to_string()));
        self
    }

    pub fn with_register_error(self, error: RemoteError) -> Self {
        self.register_acks.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn with_retrieval_ack(self, ack_id: &str) -> Self {
        self.retrieval_acks
            .lock()
            .unwrap()
            .push_back(Ok(ack_id.to_string()));
        self
    }

    pub fn with_download_url(self, url: Option<&str>) -> Self {
        self.download_urls
            .lock()
            .unwrap()
            .push_back(Ok(url.map(str::to_string)));
        self
    }

    pub fn with_download(self, body: &'static [u8]) -> Self {
        self.downloads
            .lock()
            .unwrap()
            .push_back(Ok(vec![Bytes::from_static(body)]));
        self
    }

    pub fn with_certificate(self, body: &'static [u8]) -> Self {
        self.certificates
            .lock()
            .unwrap()
            .push_back(Ok(vec![Bytes::from_static(body)]));
        self
    }

    pub fn with_certificate_error(self, error: RemoteError) -> Self {
        self.certificates.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| matches(c)).count()
    }

    pub fn upload_count(&self) -> usize {
        self.count(|c| matches!(c, Call::Upload { .. }))
    }

    fn log(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ExchangeApi for MockExchange {
    async fn obtain_file_id_and_upload_url(
        &self,
        token: &AccessToken,
        file_reference: &str,
        _format_category: &str,
        checksum: &str,
    ) -> Result<RemoteFileHandle, RemoteError> {
        self.log(Call::ObtainFileId {
            file_reference: file_reference.to_string(),
            checksum: checksum.to_string(),
            token: token.secret().to_string(),
        });
        pop(&self.handles, "obtain_file_id_and_upload_url")
    }

    async fn refresh_upload_url(
        &self,
        token: &AccessToken,
        file_id: &str,
    ) -> Result<String, RemoteError> {
        self.log(Call::RefreshUploadUrl {
            file_id: file_id.to_string(),
            token: token.secret().to_string(),
        });
        pop(&self.refreshed_urls, "refresh_upload_url")
    }

    async fn upload_bytes(
        &self,
        upload_url: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<u16, RemoteError> {
        self.log(Call::Upload {
            url: upload_url.to_string(),
            size: bytes.len(),
            content_type: content_type.to_string(),
        });
        pop(&self.upload_statuses, "upload_bytes")
    }

    async fn poll_file_status(
        &self,
        _token: &AccessToken,
        file_id: &str,
    ) -> Result<FileStatus, RemoteError> {
        self.log(Call::PollStatus {
            file_id: file_id.to_string(),
        });
        pop(&self.file_statuses, "poll_file_status")
    }

    async fn register_file(
        &self,
        _token: &AccessToken,
        attrs: &RegistrationAttributes,
        file_id: &str,
    ) -> Result<String, RemoteError> {
        self.log(Call::Register {
            document_number: attrs.document.document_number.clone(),
            file_id: file_id.to_string(),
        });
        pop(&self.register_acks, "register_file")
    }

    async fn request_retrieval_ack(
        &self,
        _token: &AccessToken,
        document: &DocumentAttributes,
    ) -> Result<String, RemoteError> {
        self.log(Call::RequestAck {
            document_number: document.document_number.clone(),
        });
        pop(&self.retrieval_acks, "request_retrieval_ack")
    }

    async fn obtain_download_url(
        &self,
        _token: &AccessToken,
        _document: &DocumentAttributes,
        ack_id: &str,
    ) -> Result<Option<String>, RemoteError> {
        self.log(Call::DownloadUrl {
            ack_id: ack_id.to_string(),
        });
        pop(&self.download_urls, "obtain_download_url")
    }

    async fn download_bytes(&self, url: &str) -> Result<ByteStream, RemoteError> {
        self.log(Call::Download {
            url: url.to_string(),
        });
        pop(&self.downloads, "download_bytes").map(body_stream)
    }

    async fn get_certificate(
        &self,
        _token: &AccessToken,
        document: &DocumentAttributes,
    ) -> Result<ByteStream, RemoteError> {
        self.log(Call::Certificate {
            document_number: document.document_number.clone(),
        });
        pop(&self.certificates, "get_certificate").map(body_stream)
    }
}

/// Token endpoint double. Hands out `token-1`, `token-2`, ... or always refuses.
pub struct MockTokenProvider {
    issued: AtomicU32,
    reject: bool,
}

impl MockTokenProvider {
    pub fn new() -> Self {
        Self {
            issued: AtomicU32::new(0),
            reject: false,
        }
    }

    pub fn rejecting() -> Self {
        Self {
            issued: AtomicU32::new(0),
            reject: true,
        }
    }

    pub fn issued(&self) -> u32 {
        self.issued.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenProvider for MockTokenProvider {
    async fn obtain_token(&self) -> Result<AccessToken, AuthError> {
        if self.reject {
            return Err(AuthError::Rejected {
                status: 401,
                body: "invalid_client".to_string(),
            });
        }
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(AccessToken::new(format!("token-{}", n), Some(3600)))
    }
}

pub fn session(provider: &Arc<MockTokenProvider>) -> TokenSession {
    TokenSession::new(provider.clone())
}

pub const REGISTRATION_HEADER: &str = "fileReference,filePath,applicationNumber,applicationDate,priorityNumber,priorityDate,documentKind,applicationCategory,accessCode,fileId,registered,ackId";

pub const RETRIEVAL_HEADER: &str = "priorityNumber,priorityDate,documentKind,accessCode,ackId,downloaded";

/// Write a CSV table (header plus rows) and return its path
pub fn write_table(dir: &Path, name: &str, header: &str, rows: &[&str]) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut content = String::from(header);
    content.push('\n');
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    std::fs::write(&path, content).unwrap();
    path
}

/// Data cells of a reloaded table
pub fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .unwrap();
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

/// Poll schedule short enough for tests
pub fn fast_poll(max_attempts: u32) -> das_exchange_client::config::PollConfig {
    das_exchange_client::config::PollConfig {
        initial_interval_ms: 1,
        max_interval_ms: 2,
        backoff_factor: 1.5,
        max_attempts,
        deadline_secs: None,
    }
}
