// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Credential signing
//!
//! Builds and signs the OAuth2 client assertion used to authenticate against
//! the DAS token endpoint.

pub mod assertion;
pub mod error;

pub use assertion::{AssertionClaims, AssertionSigner, Es256Signer, ASSERTION_LIFETIME_SECS};
pub use error::SignerError;
