// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Client configuration
//!
//! Loaded from a TOML file, then overridden from the environment (a `.env`
//! file is honored). Every component receives the piece it needs explicitly.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::checkpoint::{RegistrationColumns, RetrievalColumns};

pub const DEFAULT_SCOPE: &str = "das";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DasConfig {
    /// Base endpoint, e.g. `https://api.example.org/das/v1`
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthConfig {
    /// Token issuer; the token endpoint is `{issuer}/access_token`
    pub issuer: String,
    /// Audience claim of the client assertion
    pub audience: String,
    pub scope: String,
    pub client_id: String,
    /// PKCS#8 PEM file holding the ES256 private key
    pub pem_file: PathBuf,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            issuer: String::new(),
            audience: String::new(),
            scope: DEFAULT_SCOPE.to_string(),
            client_id: String::new(),
            pem_file: PathBuf::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            request_timeout_secs: 60,
        }
    }
}

/// Status poll schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// First wait after a pending answer (default: 5000)
    pub initial_interval_ms: u64,
    /// Upper bound for the wait (default: 60000)
    pub max_interval_ms: u64,
    /// Growth of the wait after each pending answer (default: 1.5)
    pub backoff_factor: f64,
    /// Polls before giving up (default: 120)
    pub max_attempts: u32,
    /// Optional wall-clock bound for a single document
    pub deadline_secs: Option<u64>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_interval_ms: 5000,
            max_interval_ms: 60_000,
            backoff_factor: 1.5,
            max_attempts: 120,
            deadline_secs: None,
        }
    }
}

impl PollConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.initial_interval_ms == 0 {
            return Err("poll initial_interval_ms must be at least 1".to_string());
        }
        if self.max_interval_ms < self.initial_interval_ms {
            return Err("poll max_interval_ms must not be below initial_interval_ms".to_string());
        }
        if self.backoff_factor.is_nan() || self.backoff_factor < 1.0 {
            return Err("poll backoff_factor must be at least 1.0".to_string());
        }
        if self.max_attempts == 0 {
            return Err("poll max_attempts must be at least 1".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Folder receiving retrieved documents and certificates
    pub local_folder: PathBuf,
    pub das: DasConfig,
    pub oauth: OAuthConfig,
    pub http: HttpConfig,
    pub poll: PollConfig,
    pub registration_columns: RegistrationColumns,
    pub retrieval_columns: RetrievalColumns,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            local_folder: PathBuf::from("."),
            das: DasConfig::default(),
            oauth: OAuthConfig::default(),
            http: HttpConfig::default(),
            poll: PollConfig::default(),
            registration_columns: RegistrationColumns::default(),
            retrieval_columns: RetrievalColumns::default(),
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    /// Read the file, apply `.env` and environment overrides, then validate
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Override file values from a variable lookup. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("DAS_URL") {
            debug!("DAS_URL overrides das.url");
            self.das.url = url;
        }
        if let Some(issuer) = get("DAS_OAUTH_ISSUER") {
            self.oauth.issuer = issuer;
        }
        if let Some(client_id) = get("DAS_CLIENT_ID") {
            self.oauth.client_id = client_id;
        }
        if let Some(pem_file) = get("DAS_PEM_FILE") {
            self.oauth.pem_file = PathBuf::from(pem_file);
        }
        if let Some(folder) = get("DAS_LOCAL_FOLDER") {
            self.local_folder = PathBuf::from(folder);
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.das.url.trim().is_empty() {
            return Err("das.url must be set".to_string());
        }
        url::Url::parse(&self.das.url).map_err(|e| format!("das.url is not a valid URL: {}", e))?;
        if self.oauth.issuer.trim().is_empty() {
            return Err("oauth.issuer must be set".to_string());
        }
        if self.oauth.client_id.trim().is_empty() {
            return Err("oauth.client_id must be set".to_string());
        }
        if self.oauth.audience.trim().is_empty() {
            return Err("oauth.audience must be set".to_string());
        }
        if self.oauth.pem_file.as_os_str().is_empty() {
            return Err("oauth.pem_file must be set".to_string());
        }
        if self.http.connect_timeout_secs == 0 || self.http.request_timeout_secs == 0 {
            return Err("http timeouts must be at least 1 second".to_string());
        }
        self.poll.validate()?;
        self.registration_columns.validate()?;
        self.retrieval_columns.validate()?;
        Ok(())
    }
}
