// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Token Provider
//!
//! OAuth2 client-assertion authentication and the per-run token session.

pub mod session;
pub mod token;

pub use session::TokenSession;
pub use token::{
    AccessToken, AuthError, OAuthTokenProvider, TokenProvider, CLIENT_CREDENTIALS_GRANT,
    JWT_BEARER_ASSERTION_TYPE,
};
