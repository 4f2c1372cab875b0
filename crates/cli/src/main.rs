// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! herald: run a targets pipeline, persist its outputs and post a status card

mod commands;
mod env;
mod exit_error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::{card, run};

#[derive(Parser)]
#[command(name = "herald", version, about = "Run a targets pipeline and report it to a channel")]
struct Cli {
    /// Directory holding the pipeline and its store
    #[arg(short = 'C', long, global = true, default_value = ".")]
    workdir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline, upload outputs and notify the channel
    Run(run::RunArgs),
    /// Print the status card of the last run
    Card(card::CardArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(env::DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

async fn dispatch(cli: Cli) -> Result<()> {
    tracing::debug!(workdir = %cli.workdir.display(), version = env!("CARGO_PKG_VERSION"), "herald starting");
    match cli.command {
        Commands::Run(args) => run::handle(args, &cli.workdir).await,
        Commands::Card(args) => card::handle(args, &cli.workdir).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(err) = dispatch(cli).await {
        let code = exit_error::exit_code(&err);
        let message = format!("{err:#}");
        if !message.is_empty() {
            eprintln!("Error: {message}");
        }
        std::process::exit(code);
    }
}
