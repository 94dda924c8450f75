// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use das_exchange_client::cli::{execute, Cli};
use das_exchange_client::version::{get_version_info, BUILD_DATE, VERSION, VERSION_NUMBER};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();
    info!(version = VERSION, package = VERSION_NUMBER, build_date = BUILD_DATE, "das-cli starting");
    debug!("{}", get_version_info());

    // Ctrl-C stops the run at the next row or poll wait
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping");
            on_interrupt.cancel();
        }
    });

    // Execute the command
    match execute(cli, cancel).await {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
