// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OAuth2 client-credentials token provider
//!
//! Exchanges a signed client assertion for a short-lived bearer token at
//! `POST {issuer}/access_token`. A refused request is fatal to the run: no
//! further remote call can be authorized without a token.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::{HttpConfig, OAuthConfig};
use crate::crypto::{AssertionClaims, AssertionSigner, Es256Signer, SignerError};

pub const CLIENT_CREDENTIALS_GRANT: &str = "client_credentials";
pub const JWT_BEARER_ASSERTION_TYPE: &str =
    "urn:ietf:params:oauth:client-assertion-type:jwt-bearer";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Client assertion could not be produced: {0}")]
    Signing(#[from] SignerError),

    #[error("Token request failed: {0}")]
    Transport(String),

    #[error("Token endpoint refused the request: {status} - {body}")]
    Rejected { status: u16, body: String },

    #[error("Invalid token response: {0}")]
    InvalidResponse(String),
}

/// Short-lived bearer credential. Never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    access_token: String,
    pub expires_in: Option<u64>,
    pub token_type: Option<String>,
}

impl AccessToken {
    pub fn new(access_token: impl Into<String>, expires_in: Option<u64>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_in,
            token_type: Some("Bearer".to_string()),
        }
    }

    pub fn secret(&self) -> &str {
        &self.access_token
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
    token_type: Option<String>,
}

/// Source of access tokens
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn obtain_token(&self) -> Result<AccessToken, AuthError>;
}

pub struct OAuthTokenProvider {
    config: OAuthConfig,
    signer: Arc<dyn AssertionSigner>,
    client: Client,
}

impl OAuthTokenProvider {
    pub fn new(
        config: OAuthConfig,
        signer: Arc<dyn AssertionSigner>,
        http: &HttpConfig,
    ) -> Result<Self, AuthError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(http.connect_timeout_secs))
            .timeout(Duration::from_secs(http.request_timeout_secs))
            .build()
            .map_err(|e| AuthError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            signer,
            client,
        })
    }

    /// Provider signing with the ES256 key named in the configuration
    pub fn from_config(config: OAuthConfig, http: &HttpConfig) -> Result<Self, AuthError> {
        let signer = Es256Signer::from_pem_file(&config.pem_file)?;
        Self::new(config, Arc::new(signer), http)
    }

    fn token_endpoint(&self) -> String {
        format!("{}/access_token", self.config.issuer.trim_end_matches('/'))
    }
}

#[async_trait]
impl TokenProvider for OAuthTokenProvider {
    async fn obtain_token(&self) -> Result<AccessToken, AuthError> {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        let claims = AssertionClaims::for_client(&self.config.client_id, &self.config.audience, now);
        let assertion = self.signer.sign(&claims)?;
        debug!(client_id = %self.config.client_id, "Signed client assertion");

        let response = self
            .client
            .post(self.token_endpoint())
            .form(&[
                ("grant_type", CLIENT_CREDENTIALS_GRANT),
                ("scope", self.config.scope.as_str()),
                ("client_assertion_type", JWT_BEARER_ASSERTION_TYPE),
                ("client_assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %body, "Failed to get access token");
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let data: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        let access_token = data
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::InvalidResponse("missing access_token".to_string()))?;

        info!(expires_in = ?data.expires_in, "Access token obtained");
        Ok(AccessToken {
            access_token,
            expires_in: data.expires_in,
            token_type: data.token_type,
        })
    }
}
