// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::auth::{OAuthTokenProvider, TokenSession};
use crate::checkpoint::{RegistrationLedger, RetrievalLedger};
use crate::config::ClientConfig;
use crate::exchange::{DasClient, ExchangeApi};
use crate::upload::RetryPolicy;
use crate::workflow::{CertificateWorkflow, RegistrationWorkflow, RetrievalWorkflow, RunSummary};

/// Arguments shared by every run
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Client configuration file (TOML)
    #[arg(long, short, env = "DAS_CONFIG", default_value = "das.toml")]
    pub config: PathBuf,

    /// Checkpoint table (CSV with a header row)
    #[arg(long)]
    pub table: PathBuf,
}

/// Arguments for the certificates command
#[derive(Args, Debug)]
pub struct CertificateArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Download certificates again even if the file already exists
    #[arg(long)]
    pub force: bool,
}

struct Connection {
    config: ClientConfig,
    api: Arc<dyn ExchangeApi>,
    session: TokenSession,
}

fn connect(config_path: &Path) -> Result<Connection> {
    let config = ClientConfig::load(config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;

    let api: Arc<dyn ExchangeApi> = Arc::new(DasClient::new(&config.das.url, &config.http)?);
    let provider = OAuthTokenProvider::from_config(config.oauth.clone(), &config.http)?;
    info!(das_url = %config.das.url, client_id = %config.oauth.client_id, "Client configured");

    Ok(Connection {
        api,
        session: TokenSession::new(Arc::new(provider)),
        config,
    })
}

fn print_summary(flow: &str, summary: &RunSummary) {
    println!("\n📋 {} summary: {}", flow, summary);
    for failure in &summary.failed {
        println!("  ❌ row {} {}: {}", failure.row, failure.document, failure.reason);
    }
}

/// Upload and register every document of the table
pub async fn register(args: RunArgs, cancel: CancellationToken) -> Result<()> {
    let Connection {
        config,
        api,
        mut session,
    } = connect(&args.config)?;
    let mut ledger = RegistrationLedger::open(&args.table, config.registration_columns.clone())?;

    let workflow = RegistrationWorkflow::new(api, config.poll.clone(), RetryPolicy::default(), cancel);
    let summary = workflow.run(&mut ledger, &mut session).await?;

    print_summary("Registration", &summary);
    Ok(())
}

/// Request and download every document of the table
pub async fn retrieve(args: RunArgs, cancel: CancellationToken) -> Result<()> {
    let Connection {
        config,
        api,
        mut session,
    } = connect(&args.config)?;
    let mut ledger = RetrievalLedger::open(&args.table, config.retrieval_columns.clone())?;

    let workflow = RetrievalWorkflow::new(api, config.local_folder.clone(), cancel);
    let summary = workflow.run(&mut ledger, &mut session).await?;

    print_summary("Retrieval", &summary);
    Ok(())
}

/// Download registration certificates for registered rows
pub async fn certificates(args: CertificateArgs, cancel: CancellationToken) -> Result<()> {
    let Connection {
        config,
        api,
        mut session,
    } = connect(&args.run.config)?;
    let ledger = RegistrationLedger::open(&args.run.table, config.registration_columns.clone())?;

    let workflow = CertificateWorkflow::new(api, config.local_folder.clone(), args.force, cancel);
    let summary = workflow.run(&ledger, &mut session).await?;

    print_summary("Certificate", &summary);
    Ok(())
}
