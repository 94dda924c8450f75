// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the DAS exchange client

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-checkpointed-exchange-2025-10-19";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Build date
pub const BUILD_DATE: &str = "2025-10-19";

/// Supported flows and capabilities in this version
pub const FEATURES: &[&str] = &[
    "client-assertion-oauth",
    "checkpointed-registration",
    "checkpointed-retrieval",
    "certificate-download",
    "upload-url-refresh",
    "cancellable-status-poll",
];

/// Get version information as a formatted string
pub fn get_version_info() -> String {
    format!(
        "DAS Exchange Client {} (package {})\nBuild Date: {}\nFeatures: {}",
        VERSION,
        VERSION_NUMBER,
        BUILD_DATE,
        FEATURES.join(", ")
    )
}
