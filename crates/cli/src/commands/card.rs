// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `herald card`: render the status card of the last run without sending it

use anyhow::Result;
use clap::Args;
use herald_adapters::ExecutionEngine;
use herald_core::build_project_card;
use std::path::Path;

use crate::output::{format_report, OutputFormat};

#[derive(Args, Debug)]
pub struct CardArgs {
    /// Run name shown in the card title
    pub run: String,

    #[arg(long)]
    pub project: String,

    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

pub async fn handle(args: CardArgs, workdir: &Path) -> Result<()> {
    let report = super::run::engine(workdir).progress().await?;
    match args.format {
        OutputFormat::Json => {
            let payload = build_project_card(&args.run, &args.project, &report)?;
            println!("{}", payload.to_json()?);
        }
        OutputFormat::Text => {
            print!("{}", format_report(&format!("{}/{}", args.project, args.run), &report));
        }
    }
    Ok(())
}
