// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

/// DAS document exchange client
#[derive(Parser, Debug)]
#[command(name = "das-cli")]
#[command(version = crate::version::VERSION)]
#[command(about = "Register and retrieve priority documents through the DAS exchange API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload and register the documents listed in a registration table
    Register(commands::RunArgs),

    /// Request and download the documents listed in a retrieval table
    Retrieve(commands::RunArgs),

    /// Download registration certificates for registered documents
    Certificates(commands::CertificateArgs),
}

/// Execute CLI command
pub async fn execute(cli: Cli, cancel: CancellationToken) -> Result<()> {
    match cli.command {
        Commands::Register(args) => commands::register(args, cancel).await,
        Commands::Retrieve(args) => commands::retrieve(args, cancel).await,
        Commands::Certificates(args) => commands::certificates(args, cancel).await,
    }
}
