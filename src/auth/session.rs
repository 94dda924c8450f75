// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-run token holder
//!
//! The token is fetched on first use and shared by every row of the run. It is
//! replaced only when a caller asks for a refresh (the upload retry path).
//! There is no proactive refresh before expiry.

use std::sync::Arc;
use tracing::info;

use super::token::{AccessToken, AuthError, TokenProvider};

pub struct TokenSession {
    provider: Arc<dyn TokenProvider>,
    current: Option<AccessToken>,
    acquisitions: u32,
}

impl TokenSession {
    pub fn new(provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            provider,
            current: None,
            acquisitions: 0,
        }
    }

    /// The run's token, fetching it if this is the first request
    pub async fn token(&mut self) -> Result<AccessToken, AuthError> {
        if let Some(token) = &self.current {
            return Ok(token.clone());
        }
        self.refresh().await
    }

    /// Fetch a new token and make it the run's token
    pub async fn refresh(&mut self) -> Result<AccessToken, AuthError> {
        info!("Going to retrieve the access token from the oauth server");
        let token = self.provider.obtain_token().await?;
        self.acquisitions += 1;
        self.current = Some(token.clone());
        Ok(token)
    }

    /// Number of tokens fetched so far in this run
    pub fn acquisitions(&self) -> u32 {
        self.acquisitions
    }

    pub fn has_token(&self) -> bool {
        self.current.is_some()
    }
}
