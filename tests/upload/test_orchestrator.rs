// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use crate::common::{session, Call, MockExchange, MockTokenProvider};
use das_exchange_client::exchange::RemoteError;
use das_exchange_client::upload::{
    sha256_hex, RetryPolicy, UploadError, UploadFailure, UploadOrchestrator, UploadState,
};
use std::sync::Arc;

const BODY: &[u8] = b"%PDF-1.4 upload body";

fn document() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc1.pdf");
    std::fs::write(&path, BODY).unwrap();
    (dir, path)
}

#[tokio::test]
async fn test_first_attempt_succeeds() {
    let (_dir, path) = document();
    let api = Arc::new(
        MockExchange::new()
            .with_file_handle("F1", "U1")
            .with_upload_status(200),
    );
    let provider = Arc::new(MockTokenProvider::new());
    let orchestrator = UploadOrchestrator::new(api.clone(), RetryPolicy::default());

    let report = orchestrator
        .upload(&mut session(&provider), "doc1", &path)
        .await
        .unwrap();

    assert_eq!(report.file_id, "F1");
    assert_eq!(report.attempts, 1);
    assert_eq!(
        report.states,
        vec![
            UploadState::ChecksumComputed,
            UploadState::IdObtained,
            UploadState::UploadAttempted,
            UploadState::Uploaded,
        ]
    );
    assert_eq!(report.checksum, sha256_hex(BODY));
    assert_eq!(
        api.calls()[0],
        Call::ObtainFileId {
            file_reference: "doc1".into(),
            checksum: sha256_hex(BODY),
            token: "token-1".into(),
        }
    );
    assert_eq!(
        api.calls()[1],
        Call::Upload {
            url: "U1".into(),
            size: BODY.len(),
            content_type: "application/pdf".into(),
        }
    );
}

#[tokio::test]
async fn test_refresh_then_retry() {
    let (_dir, path) = document();
    let api = Arc::new(
        MockExchange::new()
            .with_file_handle("F1", "U1")
            .with_upload_status(403)
            .with_refreshed_url("U2")
            .with_upload_status(200),
    );
    let provider = Arc::new(MockTokenProvider::new());
    let orchestrator = UploadOrchestrator::new(api.clone(), RetryPolicy::default());

    let report = orchestrator
        .upload(&mut session(&provider), "doc1", &path)
        .await
        .unwrap();

    assert_eq!(report.attempts, 2);
    assert_eq!(
        report.states,
        vec![
            UploadState::ChecksumComputed,
            UploadState::IdObtained,
            UploadState::UploadAttempted,
            UploadState::UrlRefreshed,
            UploadState::UploadRetried,
            UploadState::Uploaded,
        ]
    );
    assert_eq!(provider.issued(), 2);
    let urls: Vec<String> = api
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::Upload { url, .. } => Some(url),
            _ => None,
        })
        .collect();
    assert_eq!(urls, vec!["U1".to_string(), "U2".to_string()]);
}

#[tokio::test]
async fn test_transport_failure_is_retried() {
    let (_dir, path) = document();
    let api = Arc::new(
        MockExchange::new()
            .with_file_handle("F1", "U1")
            .with_upload_error(RemoteError::Transport("connection reset".into()))
            .with_refreshed_url("U2")
            .with_upload_status(201),
    );
    let provider = Arc::new(MockTokenProvider::new());
    let orchestrator = UploadOrchestrator::new(api.clone(), RetryPolicy::default());

    let report = orchestrator
        .upload(&mut session(&provider), "doc1", &path)
        .await
        .unwrap();
    assert_eq!(report.attempts, 2);
    assert_eq!(report.states.last(), Some(&UploadState::Uploaded));
}

#[tokio::test]
async fn test_two_failures_exhaust_policy() {
    let (_dir, path) = document();
    let api = Arc::new(
        MockExchange::new()
            .with_file_handle("F1", "U1")
            .with_upload_status(403)
            .with_refreshed_url("U2")
            .with_upload_status(500),
    );
    let provider = Arc::new(MockTokenProvider::new());
    let orchestrator = UploadOrchestrator::new(api.clone(), RetryPolicy::default());

    let err = orchestrator
        .upload(&mut session(&provider), "doc1", &path)
        .await
        .unwrap_err();

    match err {
        UploadError::Exhausted {
            file_id,
            attempts,
            last,
            states,
        } => {
            assert_eq!(file_id, "F1");
            assert_eq!(attempts, 2);
            assert!(matches!(last, UploadFailure::Status(500)));
            assert_eq!(states.last(), Some(&UploadState::Failed));
            assert!(states.contains(&UploadState::UploadRetried));
        }
        other => panic!("expected exhausted, got {:?}", other),
    }
    assert_eq!(api.upload_count(), 2);
}

#[tokio::test]
async fn test_refresh_failure_surfaces_remote_error() {
    let (_dir, path) = document();
    let api = Arc::new(
        MockExchange::new()
            .with_file_handle("F1", "U1")
            .with_upload_status(403),
    );
    let provider = Arc::new(MockTokenProvider::new());
    let orchestrator = UploadOrchestrator::new(api.clone(), RetryPolicy::default());

    let err = orchestrator
        .upload(&mut session(&provider), "doc1", &path)
        .await
        .unwrap_err();

    assert!(matches!(err, UploadError::Remote(RemoteError::Transport(_))));
    assert_eq!(api.upload_count(), 1);
}

#[tokio::test]
async fn test_missing_file_is_checksum_error() {
    let dir = tempfile::tempdir().unwrap();
    let api = Arc::new(MockExchange::new());
    let provider = Arc::new(MockTokenProvider::new());
    let orchestrator = UploadOrchestrator::new(api.clone(), RetryPolicy::default());

    let err = orchestrator
        .upload(&mut session(&provider), "doc1", &dir.path().join("absent.pdf"))
        .await
        .unwrap_err();

    assert!(matches!(err, UploadError::Checksum { .. }));
    assert!(api.calls().is_empty());
    assert_eq!(provider.issued(), 0);
}
